//! Cosmetic page effects.
//!
//! Pure calculations only; the page controller applies the results to the
//! surface and the scheduler.

use std::ops::Range;
use std::time::Duration;

use rand::Rng;

use crate::config::{ParticleConfig, ScrollConfig};
use crate::host::{Element, ElementId};

/// Class shared by every particle element.
pub const PARTICLE_CLASS: &str = "particle";

/// Maximum number of particles on screen.
#[must_use]
pub const fn particle_cap(config: &ParticleConfig, mobile: bool) -> usize {
    if mobile {
        config.mobile_cap
    } else {
        config.desktop_cap
    }
}

/// Time between particle spawn attempts.
#[must_use]
pub const fn particle_interval(config: &ParticleConfig, mobile: bool) -> Duration {
    if mobile {
        config.mobile_interval
    } else {
        config.desktop_interval
    }
}

/// Randomized appearance of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleStyle {
    pub size_px: f64,
    pub left_px: f64,
    pub animation_secs: f64,
    pub delay_secs: f64,
}

impl ParticleStyle {
    /// Roll a particle for a viewport `viewport_width` pixels wide.
    pub fn random(
        rng: &mut impl Rng,
        config: &ParticleConfig,
        viewport_width: u32,
        mobile: bool,
    ) -> Self {
        let size_range = if mobile {
            &config.mobile_size_px
        } else {
            &config.desktop_size_px
        };
        Self {
            size_px: sample(rng, size_range),
            left_px: sample(rng, &(0.0..f64::from(viewport_width))),
            animation_secs: sample(rng, &config.animation_secs),
            delay_secs: sample(rng, &config.delay_secs),
        }
    }

    /// The element for this particle, anchored to the bottom of its container.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Element {
        let size = format!("{:.2}px", self.size_px);
        Element::new("div", id)
            .class(PARTICLE_CLASS)
            .style("width", size.clone())
            .style("height", size)
            .style("left", format!("{:.2}px", self.left_px))
            .style("bottom", "0px")
            .style("animation-duration", format!("{:.2}s", self.animation_secs))
            .style("animation-delay", format!("{:.2}s", self.delay_secs))
    }
}

/// Uniform sample from `range`, or its start when the range is empty.
fn sample(rng: &mut impl Rng, range: &Range<f64>) -> f64 {
    if range.is_empty() {
        range.start
    } else {
        rng.random_range(range.clone())
    }
}

/// One displayed counter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterFrame {
    pub value: u32,
    pub finished: bool,
}

/// Linear count from 0 to a target in fixed ticks.
///
/// The count takes `duration / tick` steps (at least one). After `n` steps
/// the displayed value is `floor(target * n / steps)`, so the last step shows
/// the target exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterAnimation {
    target: u32,
    steps: u64,
    elapsed: u64,
}

impl CounterAnimation {
    #[must_use]
    pub fn new(target: u32, duration: Duration, tick: Duration) -> Self {
        let steps = duration
            .as_nanos()
            .checked_div(tick.as_nanos())
            .and_then(|steps| u64::try_from(steps).ok())
            .unwrap_or(1)
            .max(1);
        Self {
            target,
            steps,
            elapsed: 0,
        }
    }

    #[must_use]
    pub const fn target(&self) -> u32 {
        self.target
    }

    /// Advance one tick.
    pub fn tick(&mut self) -> CounterFrame {
        self.elapsed = (self.elapsed + 1).min(self.steps);
        // elapsed <= steps, so value <= target
        let value = u64::from(self.target) * self.elapsed / self.steps;
        let value = u32::try_from(value).unwrap_or(self.target);
        CounterFrame {
            value,
            finished: value >= self.target,
        }
    }
}

/// Whether the navbar shows its scrolled style at `scroll_y`.
#[must_use]
pub const fn navbar_scrolled(config: &ScrollConfig, scroll_y: u32) -> bool {
    scroll_y > config.navbar_threshold_px
}

/// Window position that brings an anchor target at `offset_top` into view
/// below the fixed navbar.
#[must_use]
pub const fn anchor_scroll_top(config: &ScrollConfig, offset_top: u32, mobile: bool) -> u32 {
    let offset = if mobile {
        config.anchor_offset_mobile_px
    } else {
        config.anchor_offset_desktop_px
    };
    offset_top.saturating_sub(offset)
}
