use std::sync::Arc;
use std::time::Duration;

use super::broadcaster::{Broadcaster, DisplaySurface, SurfaceId};
use super::color::{HueSource, TrailColor};
use super::cursor::CursorSource;
use super::rotator::ColorRotator;
use super::sampler::CursorSampler;
use super::slot::EventSlot;
use crate::math::ScreenPoint;

/// What one sampling tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Sampling is switched off, nothing was read
    Disabled,
    /// The cursor could not be read, tick dropped
    NoSample,
    Broadcast {
        sample: ScreenPoint,
        color: TrailColor,
        delivered: usize,
    },
}

/// Sampling domain: CursorSampler -> ColorRotator -> Broadcaster, run in
/// order on every tick. Takes `&mut self`, so ticks cannot overlap.
pub struct SamplingPipeline<S: CursorSource, H: HueSource> {
    sampler: CursorSampler<S>,
    rotator: ColorRotator<H>,
    broadcaster: Broadcaster,
}

impl<S: CursorSource, H: HueSource> SamplingPipeline<S, H> {
    pub fn new(sampler: CursorSampler<S>, rotator: ColorRotator<H>) -> Self {
        Self {
            sampler,
            rotator,
            broadcaster: Broadcaster::new(),
        }
    }

    pub fn tick(&mut self, now: Duration) -> TickOutcome {
        if !self.sampler.is_enabled() {
            return TickOutcome::Disabled;
        }

        let Some(sample) = self.sampler.sample() else {
            return TickOutcome::NoSample;
        };

        let color = self.rotator.observe(sample, now);
        let delivered = self.broadcaster.broadcast(sample, color);

        TickOutcome::Broadcast {
            sample,
            color,
            delivered,
        }
    }

    pub fn register_surface(&mut self, surface: DisplaySurface, slot: &Arc<EventSlot>) {
        self.broadcaster.register(surface, slot);
    }

    pub fn unregister_surface(&mut self, id: SurfaceId) -> bool {
        self.broadcaster.unregister(id)
    }

    pub fn surface_count(&self) -> usize {
        self.broadcaster.len()
    }

    pub fn is_enabled(&self) -> bool {
        self.sampler.is_enabled()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.sampler.set_enabled(enabled);
    }

    pub fn toggle(&mut self) -> bool {
        self.sampler.toggle()
    }

    pub fn color(&self) -> TrailColor {
        self.rotator.color()
    }

    pub fn cursor_source_mut(&mut self) -> &mut S {
        self.sampler.source_mut()
    }
}
