//! Cart route handlers.
//!
//! Every handler dispatches one event into the UI task and answers with the
//! out-of-band fragments it produced, plus a `cart-updated` trigger carrying
//! the badge count.

use axum::{Form, extract::State};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::Patches;
use crate::error::{Result, add_breadcrumb};
use crate::page::UiEvent;
use crate::runtime::Dispatched;
use crate::state::AppState;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub name: String,
    pub price: Decimal,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub index: usize,
}

fn cart_updated(dispatched: Dispatched) -> Patches {
    Patches::new(dispatched.patchset)
        .trigger("cart-updated", json!({ "count": dispatched.totals.count }))
}

/// Add one unit of a product (HTMX).
///
/// Name and price are taken as given; lines are keyed on the exact name.
#[instrument(skip(state), fields(item = %form.name))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<Patches> {
    add_breadcrumb("cart", "Added item", Some(&[("item", form.name.as_str())]));
    let dispatched = state
        .ui()
        .dispatch(UiEvent::AddToCart {
            name: form.name,
            unit_price: form.price,
        })
        .await?;
    Ok(cart_updated(dispatched))
}

/// Remove a line by its position (HTMX).
///
/// A stale position is answered with the error notification, not an HTTP
/// error, so the page stays usable.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Patches> {
    let dispatched = state
        .ui()
        .dispatch(UiEvent::RemoveFromCart { index: form.index })
        .await?;
    Ok(cart_updated(dispatched))
}

/// Open the cart modal (HTMX).
#[instrument(skip(state))]
pub async fn open(State(state): State<AppState>) -> Result<Patches> {
    let dispatched = state.ui().dispatch(UiEvent::OpenCart).await?;
    Ok(Patches::new(dispatched.patchset))
}

/// Close the cart modal (HTMX).
#[instrument(skip(state))]
pub async fn close(State(state): State<AppState>) -> Result<Patches> {
    let dispatched = state.ui().dispatch(UiEvent::CloseCart).await?;
    Ok(Patches::new(dispatched.patchset))
}

/// Place the order (HTMX).
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Result<Patches> {
    let dispatched = state.ui().dispatch(UiEvent::Checkout).await?;
    Ok(cart_updated(dispatched))
}
