//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::runtime::{UiHandle, spawn_ui};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the UI task.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    ui: UiHandle,
}

impl AppState {
    /// Create a new application state and start the UI task.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial page layout fails to render.
    pub fn new(config: StorefrontConfig) -> askama::Result<Self> {
        let ui = spawn_ui(config.effects.clone(), config.currency)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, ui }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a handle to the UI task.
    #[must_use]
    pub fn ui(&self) -> &UiHandle {
        &self.inner.ui
    }
}
