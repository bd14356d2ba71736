//! Integration tests for the Sunleaf landing page.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sunleaf-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - page controller driven through a virtual clock
//! - `storefront_routes` - HTTP routes exercised through the router
//!
//! Nothing here needs a running server or network access.

use std::path::Path;

use axum::Router;
use sunleaf_core::CurrencyCode;
use sunleaf_storefront::config::{EffectsConfig, StorefrontConfig};
use sunleaf_storefront::document::Document;
use sunleaf_storefront::page::{Page, landing_document};
use sunleaf_storefront::scheduler::ManualScheduler;
use sunleaf_storefront::state::AppState;

/// A page on the landing layout, driven by a virtual clock.
pub type TestPage = Page<Document, ManualScheduler>;

/// Create a page with default timings, INR prices and a fixed particle seed.
///
/// # Panics
///
/// Panics if the landing layout fails to render.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_page() -> TestPage {
    let effects = EffectsConfig::default();
    let document = landing_document(&effects).expect("landing layout renders");
    let mut page = Page::new(document, ManualScheduler::new(), effects, CurrencyCode::INR)
        .with_seed(7);
    page.refresh_cart();
    page.surface_mut().take_patches();
    page
}

/// Create the application router with default configuration.
///
/// Must be called from within a tokio runtime.
///
/// # Panics
///
/// Panics if the application state fails to initialize.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_app() -> Router {
    let config = StorefrontConfig::default();
    let state = AppState::new(config).expect("application state initializes");
    sunleaf_storefront::app(state, Path::new("../storefront/static"))
}

/// Messages of the notifications currently on the page, oldest first.
#[must_use]
pub fn notification_messages(page: &TestPage) -> Vec<String> {
    page.surface()
        .children("notifications")
        .iter()
        .filter_map(|id| page.surface().html(id.as_str()))
        .map(str::to_string)
        .collect()
}
