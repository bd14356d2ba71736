//! The UI task.
//!
//! A single tokio task owns the [`Page`] and its [`Document`]. Request
//! handlers talk to it through a [`UiHandle`]; events are handled strictly in
//! arrival order, so the cart needs no lock.
//!
//! Changes caused by a dispatched event go back to the caller. Changes caused
//! by timers are broadcast to every `/events` subscriber.

use std::collections::HashMap;

use sunleaf_core::{CurrencyCode, Totals};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::config::EffectsConfig;
use crate::document::{Document, Patchset};
use crate::page::{Page, UiEvent, landing_document, regions};
use crate::scheduler::{Fired, TokioScheduler};

const COMMAND_BUFFER: usize = 64;
const BROADCAST_BUFFER: usize = 256;

/// The UI task has stopped.
#[derive(Debug, Clone, Copy, Error)]
#[error("UI task is not running")]
pub struct UiClosed;

/// Rendered state of every page region at one point in time.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    regions: HashMap<String, String>,
    pub totals: Totals,
}

impl PageSnapshot {
    /// Outer HTML of a region, or an empty string for an unknown id.
    #[must_use]
    pub fn region(&self, id: &str) -> &str {
        self.regions.get(id).map_or("", String::as_str)
    }
}

/// What handling one event produced.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub patchset: Patchset,
    /// Cart totals after the event.
    pub totals: Totals,
}

enum Command {
    Dispatch {
        event: UiEvent,
        reply: oneshot::Sender<Dispatched>,
    },
    Snapshot {
        reply: oneshot::Sender<PageSnapshot>,
    },
}

/// Cheaply cloneable handle to the UI task.
#[derive(Debug, Clone)]
pub struct UiHandle {
    commands: mpsc::Sender<Command>,
    patches: broadcast::Sender<String>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dispatch { event, .. } => f.debug_tuple("Dispatch").field(event).finish(),
            Self::Snapshot { .. } => f.write_str("Snapshot"),
        }
    }
}

impl UiHandle {
    /// Handle `event` and return the fragments it produced.
    ///
    /// # Errors
    ///
    /// Returns [`UiClosed`] if the UI task has stopped.
    pub async fn dispatch(&self, event: UiEvent) -> Result<Dispatched, UiClosed> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Dispatch { event, reply })
            .await
            .map_err(|_| UiClosed)?;
        response.await.map_err(|_| UiClosed)
    }

    /// Render every region of the page as it currently stands.
    ///
    /// # Errors
    ///
    /// Returns [`UiClosed`] if the UI task has stopped.
    pub async fn snapshot(&self) -> Result<PageSnapshot, UiClosed> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| UiClosed)?;
        response.await.map_err(|_| UiClosed)
    }

    /// Receive the fragments produced by timers from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.patches.subscribe()
    }
}

/// Start the UI task. Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns an error if the initial layout fails to render.
pub fn spawn_ui(effects: EffectsConfig, currency: CurrencyCode) -> askama::Result<UiHandle> {
    let document = landing_document(&effects)?;
    let (task_tx, task_rx) = mpsc::unbounded_channel();
    let mut page = Page::new(document, TokioScheduler::new(task_tx), effects, currency);

    // The initial cart display is part of the first full render.
    page.refresh_cart();
    page.surface_mut().take_patches();

    let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (patches, _) = broadcast::channel(BROADCAST_BUFFER);

    tokio::spawn(run(page, command_rx, task_rx, patches.clone()));
    tracing::debug!("UI task started");

    Ok(UiHandle { commands, patches })
}

async fn run(
    mut page: Page<Document, TokioScheduler>,
    mut commands: mpsc::Receiver<Command>,
    mut tasks: mpsc::UnboundedReceiver<Fired>,
    patches: broadcast::Sender<String>,
) {
    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    break;
                };
                match command {
                    Command::Dispatch { event, reply } => {
                        page.handle(event);
                        let dispatched = Dispatched {
                            patchset: page.surface_mut().take_patches(),
                            totals: page.compute_totals(),
                        };
                        // The caller may have gone away; the changes are applied either way.
                        let _ = reply.send(dispatched);
                    }
                    Command::Snapshot { reply } => {
                        let _ = reply.send(snapshot(&page));
                    }
                }
            }
            Some(fired) = tasks.recv() => {
                page.fire(fired);
                let patchset = page.surface_mut().take_patches();
                if !patchset.html.is_empty() {
                    // No subscribers is fine; the next full render catches up.
                    let _ = patches.send(patchset.html);
                }
            }
        }
    }
    tracing::debug!("UI task stopped");
}

fn snapshot(page: &Page<Document, TokioScheduler>) -> PageSnapshot {
    let mut rendered = HashMap::new();
    for id in regions(page.effects()) {
        match page.surface().outer_html(id.as_str()) {
            Ok(Some(html)) => {
                rendered.insert(id.to_string(), html);
            }
            Ok(None) => tracing::warn!(region = %id, "Missing page region"),
            Err(e) => tracing::error!(region = %id, error = %e, "Failed to render page region"),
        }
    }
    PageSnapshot {
        regions: rendered,
        totals: page.compute_totals(),
    }
}
