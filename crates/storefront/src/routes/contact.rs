//! Contact form route handler.

use axum::extract::State;
use tracing::instrument;

use super::Patches;
use crate::error::Result;
use crate::page::UiEvent;
use crate::state::AppState;

/// Acknowledge a contact form submission (HTMX).
///
/// The message itself goes nowhere; the form resets itself client-side once
/// the request succeeds.
#[instrument(skip(state))]
pub async fn submit(State(state): State<AppState>) -> Result<Patches> {
    crate::error::add_breadcrumb("contact", "Contact form submitted", None);
    let dispatched = state.ui().dispatch(UiEvent::ContactSubmitted).await?;
    Ok(Patches::new(dispatched.patchset))
}
