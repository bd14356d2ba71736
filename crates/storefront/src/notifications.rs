//! Transient status pop-ups.
//!
//! A notification is appended to the notification region, starts fading after
//! the visible window and removes itself once the fade completes. There is no
//! queue: notifications shown close together overlap in insertion order.

use askama::Template;
use sunleaf_core::Notification;

use crate::config::NotificationTiming;
use crate::host::{Element, ElementId, Scheduler, Surface, Task};
use crate::render::NotificationTemplate;

/// Class added when a notification starts fading out.
pub const FADE_OUT_CLASS: &str = "fade-out";

/// Shows notifications and drives their lifetime.
#[derive(Debug)]
pub struct NotificationPresenter {
    container: ElementId,
    timing: NotificationTiming,
    next_id: u64,
}

impl NotificationPresenter {
    #[must_use]
    pub fn new(container: impl Into<ElementId>, timing: NotificationTiming) -> Self {
        Self {
            container: container.into(),
            timing,
            next_id: 0,
        }
    }

    /// Show `notification` and schedule its fade-out.
    pub fn notify(
        &mut self,
        surface: &mut impl Surface,
        scheduler: &mut impl Scheduler,
        notification: &Notification,
    ) {
        self.next_id += 1;
        let id = ElementId::new(format!("notification-{}", self.next_id));

        let element = Element::new("div", id.clone())
            .class("notification")
            .class(notification.kind.as_str());
        let element = match NotificationTemplate::from(notification).render() {
            Ok(html) => element.html(html),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render notification");
                element.text(notification.message.clone())
            }
        };

        surface.append(&self.container, element);
        scheduler.once(self.timing.visible, Task::FadeNotification(id));

        tracing::debug!(
            kind = %notification.kind,
            message = %notification.message,
            "Notification shown"
        );
    }

    /// Start the fade-out of a shown notification.
    pub fn fade(&self, surface: &mut impl Surface, scheduler: &mut impl Scheduler, id: ElementId) {
        if !surface.contains(&id) {
            return;
        }
        surface.add_class(&id, FADE_OUT_CLASS);
        scheduler.once(self.timing.fade, Task::RemoveNotification(id));
    }

    /// Take a notification off the surface.
    pub fn dismiss(&self, surface: &mut impl Surface, id: &ElementId) {
        surface.remove(id);
    }
}
