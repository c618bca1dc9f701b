use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};

use super::color::TrailColor;
use super::slot::EventSlot;
use crate::math::ScreenPoint;

/// Identifies one overlay surface for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

/// One connected display as the broadcaster sees it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySurface {
    pub id: SurfaceId,
    /// Global position of the surface's top-left corner
    pub bounds_origin: ScreenPoint,
}

impl DisplaySurface {
    pub fn new(id: SurfaceId, bounds_origin: ScreenPoint) -> Self {
        Self { id, bounds_origin }
    }

    /// Global point in this surface's coordinate space
    pub fn to_local(&self, global: ScreenPoint) -> ScreenPoint {
        global - self.bounds_origin
    }
}

/// Position and color for one renderer, in surface-local coordinates.
/// Serializes as `{"x": .., "y": .., "color": "hsl(..)"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderEvent {
    pub x: f32,
    pub y: f32,
    pub color: TrailColor,
}

impl RenderEvent {
    pub fn position(&self) -> ScreenPoint {
        ScreenPoint::new(self.x, self.y)
    }
}

struct Target {
    surface: DisplaySurface,
    slot: Weak<EventSlot>,
}

/// Fans one global sample out to every registered surface.
///
/// Holds only weak references: once a surface's renderer drops its slot
/// the surface is skipped and forgotten, without affecting the others.
#[derive(Default)]
pub struct Broadcaster {
    targets: Vec<Target>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire a surface to its renderer's slot. Re-registering an id replaces it.
    pub fn register(&mut self, surface: DisplaySurface, slot: &Arc<EventSlot>) {
        self.unregister(surface.id);
        self.targets.push(Target {
            surface,
            slot: Arc::downgrade(slot),
        });
    }

    /// Returns false if the id was not registered
    pub fn unregister(&mut self, id: SurfaceId) -> bool {
        let before = self.targets.len();
        self.targets.retain(|t| t.surface.id != id);
        self.targets.len() != before
    }

    /// Deliver `sample` with `color` to every live surface.
    /// Returns how many surfaces received it.
    pub fn broadcast(&mut self, sample: ScreenPoint, color: TrailColor) -> usize {
        let mut delivered = 0;

        self.targets.retain(|target| {
            let Some(slot) = target.slot.upgrade() else {
                return false;
            };

            let local = target.surface.to_local(sample);
            slot.publish(RenderEvent {
                x: local.x,
                y: local.y,
                color,
            });
            delivered += 1;
            true
        });

        delivered
    }

    /// Registered surfaces, including any not yet found dead
    pub fn surfaces(&self) -> impl Iterator<Item = &DisplaySurface> {
        self.targets.iter().map(|t| &t.surface)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
