//! Page load, scrolling and the decorative effects.

use super::layout::ids;
use super::{Page, RunningCounter};
use crate::effects::{
    CounterAnimation, PARTICLE_CLASS, ParticleStyle, anchor_scroll_top, navbar_scrolled,
    particle_cap, particle_interval,
};
use crate::host::{ElementId, Observation, Scheduler, Surface, Task};

/// Class the navbar carries once the page is scrolled.
pub const NAVBAR_SCROLLED_CLASS: &str = "scrolled";

impl<S: Surface, T: Scheduler> Page<S, T> {
    /// Initialize the page for a viewport `viewport_width` pixels wide.
    ///
    /// Restarts the particle timer, refreshes the cart, re-arms the stats
    /// observation and dims the hero video on mobile.
    pub(super) fn load(&mut self, viewport_width: u32) {
        self.viewport.width = viewport_width;
        let mobile = self.is_mobile();
        tracing::debug!(viewport_width, mobile, "Page loaded");

        self.start_particles();
        self.refresh_cart();
        self.observe_stats();

        if mobile {
            let opacity = self.effects.mobile_video_opacity.to_string();
            self.surface
                .set_style(&ElementId::from(ids::HERO_VIDEO), "opacity", &opacity);
        }
    }

    pub(super) fn scrolled(&mut self, scroll_y: u32) {
        self.viewport.scroll_y = scroll_y;
        let navbar = ElementId::from(ids::NAVBAR);
        if navbar_scrolled(&self.effects.scroll, scroll_y) {
            self.surface.add_class(&navbar, NAVBAR_SCROLLED_CLASS);
        } else {
            self.surface.remove_class(&navbar, NAVBAR_SCROLLED_CLASS);
        }
    }

    pub(super) fn scroll_to_anchor(&mut self, offset_top: Option<u32>) {
        let Some(offset_top) = offset_top else {
            return;
        };
        let top = anchor_scroll_top(&self.effects.scroll, offset_top, self.is_mobile());
        self.surface.scroll_to(top);
    }

    fn start_particles(&mut self) {
        if let Some(timer) = self.particles.timer.take() {
            self.scheduler.cancel(timer);
        }
        let mobile = self.is_mobile();
        self.particles.cap = particle_cap(&self.effects.particles, mobile);
        let interval = particle_interval(&self.effects.particles, mobile);
        self.particles.timer = Some(self.scheduler.every(interval, Task::SpawnParticle));
    }

    pub(super) fn spawn_particle(&mut self) {
        if self.surface.count_class(PARTICLE_CLASS) >= self.particles.cap {
            return;
        }
        let mobile = self.is_mobile();
        let particle = ParticleStyle::random(
            &mut self.rng,
            &self.effects.particles,
            self.viewport.width,
            mobile,
        );
        self.particles.next_id += 1;
        let id = ElementId::new(format!("particle-{}", self.particles.next_id));

        self.surface
            .append(&ElementId::from(ids::PARTICLES), particle.element(id.clone()));
        self.scheduler
            .once(self.effects.particles.lifetime, Task::ExpireParticle(id));
    }

    fn observe_stats(&mut self) {
        for running in self.counters.drain(..).flatten() {
            self.scheduler.cancel(running.timer);
        }
        for counter in &self.effects.counters.targets {
            self.surface
                .set_text(&ElementId::from(counter.element_id.as_str()), "0");
        }

        let observation = Observation {
            threshold: self.effects.counters.threshold,
            root_margin_bottom_px: self.effects.counters.root_margin_bottom_px,
        };
        self.surface
            .observe(&ElementId::from(ids::STATS), observation);
        self.observing_stats = true;
    }

    pub(super) fn section_visible(&mut self, target: &ElementId, ratio: f64) {
        if !self.observing_stats
            || target.as_str() != ids::STATS
            || ratio < self.effects.counters.threshold
        {
            return;
        }
        self.observing_stats = false;
        self.surface.unobserve(target);
        tracing::debug!(ratio, "Stats section visible, starting counters");

        let config = &self.effects.counters;
        self.counters = config
            .targets
            .iter()
            .enumerate()
            .map(|(position, counter)| {
                Some(RunningCounter {
                    element: ElementId::from(counter.element_id.as_str()),
                    animation: CounterAnimation::new(counter.target, config.duration, config.tick),
                    timer: self.scheduler.every(config.tick, Task::CounterTick(position)),
                })
            })
            .collect();
    }

    pub(super) fn tick_counter(&mut self, position: usize) {
        let Some(slot) = self.counters.get_mut(position) else {
            return;
        };
        let Some(running) = slot.as_mut() else {
            return;
        };

        let frame = running.animation.tick();
        self.surface
            .set_text(&running.element, &frame.value.to_string());
        if frame.finished {
            self.scheduler.cancel(running.timer);
            *slot = None;
        }
    }
}
