//! Page report handlers.
//!
//! The browser reports what only it can measure (viewport width, scroll
//! position, visibility, anchor offsets); the page controller decides what
//! changes.

use axum::{Form, extract::State};
use serde::Deserialize;
use tracing::instrument;

use super::Patches;
use crate::error::{AppError, Result};
use crate::host::ElementId;
use crate::page::UiEvent;
use crate::state::AppState;

/// Page load report.
#[derive(Debug, Deserialize)]
pub struct LoadForm {
    pub width: f64,
}

/// Scroll report.
#[derive(Debug, Deserialize)]
pub struct ScrollForm {
    pub y: f64,
}

/// Visibility report for an observed element.
#[derive(Debug, Deserialize)]
pub struct VisibleForm {
    pub target: String,
    pub ratio: f64,
}

/// Anchor click report. `offset_top` is empty when the target is missing.
#[derive(Debug, Deserialize)]
pub struct AnchorForm {
    #[serde(default)]
    pub offset_top: Option<String>,
}

/// Round a browser measurement to whole pixels, clamping negatives to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixels(value: f64) -> Option<u32> {
    // `as` saturates, so oversized values clamp to u32::MAX
    value.is_finite().then(|| value.round().max(0.0) as u32)
}

/// Page finished loading (HTMX).
#[instrument(skip(state))]
pub async fn load(State(state): State<AppState>, Form(form): Form<LoadForm>) -> Result<Patches> {
    let viewport_width = pixels(form.width)
        .ok_or_else(|| AppError::BadRequest("width must be a number".to_string()))?;
    let dispatched = state
        .ui()
        .dispatch(UiEvent::Loaded { viewport_width })
        .await?;
    Ok(Patches::new(dispatched.patchset))
}

/// Window scrolled (HTMX).
#[instrument(skip(state))]
pub async fn scroll(
    State(state): State<AppState>,
    Form(form): Form<ScrollForm>,
) -> Result<Patches> {
    let scroll_y =
        pixels(form.y).ok_or_else(|| AppError::BadRequest("y must be a number".to_string()))?;
    let dispatched = state.ui().dispatch(UiEvent::Scrolled { scroll_y }).await?;
    Ok(Patches::new(dispatched.patchset))
}

/// Observed element crossed its visibility threshold (HTMX).
#[instrument(skip(state))]
pub async fn visible(
    State(state): State<AppState>,
    Form(form): Form<VisibleForm>,
) -> Result<Patches> {
    if !(0.0..=1.0).contains(&form.ratio) {
        return Err(AppError::BadRequest(
            "ratio must be between 0 and 1".to_string(),
        ));
    }
    let dispatched = state
        .ui()
        .dispatch(UiEvent::SectionVisible {
            target: ElementId::new(form.target),
            ratio: form.ratio,
        })
        .await?;
    Ok(Patches::new(dispatched.patchset))
}

/// In-page anchor clicked (HTMX).
#[instrument(skip(state))]
pub async fn anchor(
    State(state): State<AppState>,
    Form(form): Form<AnchorForm>,
) -> Result<Patches> {
    let offset_top = form
        .offset_top
        .as_deref()
        .and_then(|value| value.trim().parse::<f64>().ok())
        .and_then(pixels);
    let dispatched = state
        .ui()
        .dispatch(UiEvent::AnchorClicked { offset_top })
        .await?;
    Ok(Patches::new(dispatched.patchset))
}
