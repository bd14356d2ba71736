//! Host collaborators the page is driven through.
//!
//! The page controller never touches a browser directly. It mutates a
//! [`Surface`] (the display) and defers work through a [`Scheduler`] (the
//! timers). Expired timers hand their [`Task`] back to the controller.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Identifier of an element on the surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Element body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Content {
    #[default]
    Empty,
    /// Plain text, escaped when rendered.
    Text(String),
    /// Trusted markup produced by a template.
    Html(String),
}

/// A new element to place on the surface.
///
/// # Example
///
/// ```
/// use sunleaf_storefront::host::Element;
///
/// let particle = Element::new("div", "particle-1")
///     .class("particle")
///     .style("bottom", "0px");
/// assert_eq!(particle.id.as_str(), "particle-1");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub id: ElementId,
    pub classes: Vec<String>,
    pub styles: BTreeMap<String, String>,
    pub attrs: BTreeMap<String, String>,
    pub content: Content,
}

impl Element {
    #[must_use]
    pub fn new(tag: &str, id: impl Into<ElementId>) -> Self {
        Self {
            tag: tag.to_string(),
            id: id.into(),
            classes: Vec::new(),
            styles: BTreeMap::new(),
            attrs: BTreeMap::new(),
            content: Content::Empty,
        }
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
        self
    }

    #[must_use]
    pub fn style(mut self, property: &str, value: impl Into<String>) -> Self {
        self.styles.insert(property.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.content = Content::Text(text.into());
        self
    }

    #[must_use]
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.content = Content::Html(html.into());
        self
    }
}

/// Options for visibility observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Fraction of the element that must be visible.
    pub threshold: f64,
    /// Pixels trimmed off the bottom of the viewport.
    pub root_margin_bottom_px: u32,
}

/// The display the page renders into.
///
/// Operations addressing an id that is not on the surface do nothing.
pub trait Surface {
    /// Append `element` as the last child of `parent`.
    fn append(&mut self, parent: &ElementId, element: Element);

    /// Remove an element and its children. Returns whether it existed.
    fn remove(&mut self, id: &ElementId) -> bool;

    fn contains(&self, id: &ElementId) -> bool;

    fn set_text(&mut self, id: &ElementId, text: &str);

    fn set_html(&mut self, id: &ElementId, html: String);

    fn add_class(&mut self, id: &ElementId, class: &str);

    fn remove_class(&mut self, id: &ElementId, class: &str);

    fn set_style(&mut self, id: &ElementId, property: &str, value: &str);

    /// Number of elements carrying `class`.
    fn count_class(&self, class: &str) -> usize;

    /// Ask the host to scroll the window to `top`.
    fn scroll_to(&mut self, top: u32);

    /// Start reporting visibility changes of `id`.
    fn observe(&mut self, id: &ElementId, observation: Observation);

    fn unobserve(&mut self, id: &ElementId);
}

/// Deferred work delivered back to the page when a timer fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Start the fade-out of a notification.
    FadeNotification(ElementId),
    /// Take a faded notification off the surface.
    RemoveNotification(ElementId),
    /// Particle interval tick.
    SpawnParticle,
    /// A particle reached the end of its lifetime.
    ExpireParticle(ElementId),
    /// Counter interval tick for the counter at this position.
    CounterTick(usize),
    /// Activate the cart modal transition.
    RevealModal,
    /// Hide the cart modal after its closing transition.
    HideModal,
}

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// The timer primitive.
pub trait Scheduler {
    /// Deliver `task` once after `delay`.
    fn once(&mut self, delay: Duration, task: Task) -> TimerHandle;

    /// Deliver `task` every `interval`, starting one interval from now.
    fn every(&mut self, interval: Duration, task: Task) -> TimerHandle;

    /// Stop a timer. Cancelling an expired or unknown handle does nothing.
    fn cancel(&mut self, handle: TimerHandle);
}
