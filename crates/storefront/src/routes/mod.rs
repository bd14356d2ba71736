//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page
//! GET  /health                 - Health check
//! GET  /events                 - Server-sent events with timer-driven fragments
//!
//! # Cart (HTMX, out-of-band fragments)
//! POST /cart/add               - Add one unit (name, price)
//! POST /cart/remove            - Remove a line (index)
//! POST /cart/open              - Open the cart modal
//! POST /cart/close             - Close the cart modal
//! POST /cart/checkout          - Place the order
//!
//! # Contact
//! POST /contact                - Acknowledge the contact form
//!
//! # Page reports (HTMX, out-of-band fragments)
//! POST /ui/load                - Page loaded (width)
//! POST /ui/scroll              - Window scrolled (y)
//! POST /ui/visible             - Observed section visible (target, ratio)
//! POST /ui/anchor              - In-page anchor clicked (offset_top)
//! ```
//!
//! Every POST handler answers with the out-of-band fragments its event
//! produced. Cart changes add an `HX-Trigger: {"cart-updated": {"count": n}}`
//! header; anchor clicks add `{"scroll-to": {"top": n}}`.

pub mod cart;
pub mod contact;
pub mod events;
pub mod home;
pub mod ui;

use axum::{
    Router,
    response::{AppendHeaders, Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Map, Value, json};

use crate::document::Patchset;
use crate::state::AppState;

/// Out-of-band fragments produced by one event, plus client-side triggers.
#[derive(Debug)]
pub struct Patches {
    html: String,
    triggers: Map<String, Value>,
}

impl Patches {
    #[must_use]
    pub fn new(patchset: Patchset) -> Self {
        let mut patches = Self {
            html: patchset.html,
            triggers: Map::new(),
        };
        if let Some(top) = patchset.scroll_to {
            patches = patches.trigger("scroll-to", json!({ "top": top }));
        }
        patches
    }

    /// Fire a client-side event named `name` with `detail` once swapped.
    #[must_use]
    pub fn trigger(mut self, name: &str, detail: Value) -> Self {
        self.triggers.insert(name.to_string(), detail);
        self
    }
}

impl IntoResponse for Patches {
    fn into_response(self) -> Response {
        let body = Html(self.html);
        if self.triggers.is_empty() {
            return body.into_response();
        }
        let header = Value::Object(self.triggers).to_string();
        (AppendHeaders([("HX-Trigger", header)]), body).into_response()
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
        .route("/checkout", post(cart::checkout))
}

/// Create the page report routes router.
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/load", post(ui::load))
        .route("/scroll", post(ui::scroll))
        .route("/visible", post(ui::visible))
        .route("/anchor", post(ui::anchor))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Landing page
        .route("/", get(home::home))
        // Timer-driven fragments
        .route("/events", get(events::stream))
        // Cart routes
        .nest("/cart", cart_routes())
        // Contact form
        .route("/contact", post(contact::submit))
        // Page reports
        .nest("/ui", ui_routes())
}
