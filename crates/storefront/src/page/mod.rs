//! The page controller.
//!
//! [`Page`] owns the cart and every piece of page state, and is the only thing
//! that mutates the surface. Each [`UiEvent`] is handled to completion before
//! the next one; timers come back as [`UiEvent::Timer`], or through
//! [`Page::fire`] when they run on tokio.
//!
//! # Modules
//!
//! - `layout` - the dynamic elements of the landing page
//! - `cart` - cart operations, display refresh and the cart modal
//! - `effects` - particles, counters, navbar, anchors and the hero video

mod cart;
mod effects;
pub mod layout;

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use sunleaf_core::{Cart, CurrencyCode, Notification};

use crate::config::EffectsConfig;
use crate::effects::CounterAnimation;
use crate::host::{ElementId, Scheduler, Surface, Task, TimerHandle};
use crate::notifications::NotificationPresenter;
use crate::scheduler::{Fired, ManualScheduler, TokioScheduler};

pub use self::layout::{ids, landing_document, regions};

/// Something the host reported.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// The page finished loading in a viewport this wide.
    Loaded { viewport_width: u32 },
    /// The window scrolled to `scroll_y`.
    Scrolled { scroll_y: u32 },
    /// An observed element crossed a visibility threshold.
    SectionVisible { target: ElementId, ratio: f64 },
    /// An in-page anchor was clicked. `offset_top` is absent when the anchor
    /// target does not exist.
    AnchorClicked { offset_top: Option<u32> },
    AddToCart { name: String, unit_price: Decimal },
    RemoveFromCart { index: usize },
    OpenCart,
    CloseCart,
    Checkout,
    ContactSubmitted,
    /// A scheduled timer fired.
    Timer(Task),
}

/// Last reported viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub scroll_y: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            scroll_y: 0,
        }
    }
}

#[derive(Debug, Default)]
struct Particles {
    timer: Option<TimerHandle>,
    cap: usize,
    next_id: u64,
}

#[derive(Debug)]
struct RunningCounter {
    element: ElementId,
    animation: CounterAnimation,
    timer: TimerHandle,
}

/// Controller for one landing page.
///
/// Generic over the display and the timers so that the same code runs
/// against the live document and in deterministic tests.
pub struct Page<S, T> {
    surface: S,
    scheduler: T,
    effects: EffectsConfig,
    cart: Cart,
    notifications: NotificationPresenter,
    viewport: Viewport,
    rng: StdRng,
    modal_timer: Option<TimerHandle>,
    particles: Particles,
    counters: Vec<Option<RunningCounter>>,
    observing_stats: bool,
}

impl<S: Surface, T: Scheduler> Page<S, T> {
    /// Create a controller with an empty cart priced in `currency`.
    pub fn new(surface: S, scheduler: T, effects: EffectsConfig, currency: CurrencyCode) -> Self {
        let notifications = NotificationPresenter::new(ids::NOTIFICATIONS, effects.notifications);
        Self {
            surface,
            scheduler,
            effects,
            cart: Cart::new(currency),
            notifications,
            viewport: Viewport::default(),
            rng: StdRng::from_rng(&mut rand::rng()),
            modal_timer: None,
            particles: Particles::default(),
            counters: Vec::new(),
            observing_stats: false,
        }
    }

    /// Use a fixed seed for particle randomness.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Handle one event to completion.
    pub fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::Loaded { viewport_width } => self.load(viewport_width),
            UiEvent::Scrolled { scroll_y } => self.scrolled(scroll_y),
            UiEvent::SectionVisible { target, ratio } => self.section_visible(&target, ratio),
            UiEvent::AnchorClicked { offset_top } => self.scroll_to_anchor(offset_top),
            UiEvent::AddToCart { name, unit_price } => {
                self.add_item(&name, unit_price);
            }
            UiEvent::RemoveFromCart { index } => {
                // Failures are already surfaced as a notification.
                let _ = self.remove_item(index);
            }
            UiEvent::OpenCart => self.open_cart(),
            UiEvent::CloseCart => self.close_cart(),
            UiEvent::Checkout => {
                let _ = self.checkout();
            }
            UiEvent::ContactSubmitted => self.submit_contact(),
            UiEvent::Timer(task) => self.run_task(task),
        }
    }

    /// Acknowledge a contact form submission.
    pub fn submit_contact(&mut self) {
        tracing::info!("Contact form submitted");
        self.notify(&Notification::message_received());
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub const fn effects(&self) -> &EffectsConfig {
        &self.effects
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub const fn scheduler(&self) -> &T {
        &self.scheduler
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::FadeNotification(id) => {
                self.notifications
                    .fade(&mut self.surface, &mut self.scheduler, id);
            }
            Task::RemoveNotification(id) => self.notifications.dismiss(&mut self.surface, &id),
            Task::SpawnParticle => self.spawn_particle(),
            Task::ExpireParticle(id) => {
                self.surface.remove(&id);
            }
            Task::CounterTick(position) => self.tick_counter(position),
            Task::RevealModal => self.reveal_modal(),
            Task::HideModal => self.hide_modal(),
        }
    }

    fn notify(&mut self, notification: &Notification) {
        self.notifications
            .notify(&mut self.surface, &mut self.scheduler, notification);
    }

    const fn is_mobile(&self) -> bool {
        self.effects.is_mobile(self.viewport.width)
    }
}

impl<S: Surface> Page<S, ManualScheduler> {
    /// Move the virtual clock forward by `by`, handling every timer that
    /// comes due on the way.
    pub fn advance(&mut self, by: Duration) {
        let deadline = self.scheduler.now() + by;
        while let Some(task) = self.scheduler.next_due(deadline) {
            self.run_task(task);
        }
    }
}

impl<S: Surface> Page<S, TokioScheduler> {
    /// Handle a timer delivery, unless its timer was cancelled after it fired.
    pub fn fire(&mut self, fired: Fired) {
        if self.scheduler.claim(fired.handle) {
            self.run_task(fired.task);
        } else {
            tracing::trace!(task = ?fired.task, "Dropped cancelled timer");
        }
    }
}
