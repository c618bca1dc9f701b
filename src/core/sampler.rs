use super::cursor::CursorSource;
use crate::math::ScreenPoint;

/// Gated reader of the global cursor position
#[derive(Debug)]
pub struct CursorSampler<S: CursorSource> {
    source: S,
    enabled: bool,
}

impl<S: CursorSource> CursorSampler<S> {
    pub fn new(source: S, enabled: bool) -> Self {
        Self { source, enabled }
    }

    /// Read one sample. `None` when disabled (the source is not touched)
    /// or when the source cannot report a position this tick.
    pub fn sample(&mut self) -> Option<ScreenPoint> {
        if !self.enabled {
            return None;
        }
        self.source.position()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Flip the gate, returns the new state
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
