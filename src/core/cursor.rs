use glam::Vec2;
#[cfg(not(target_os = "windows"))]
use log::warn;

use crate::math::ScreenPoint;

/// Reads the global cursor position
pub trait CursorSource {
    /// Current position in global display space, `None` if unreadable right now
    fn position(&mut self) -> Option<ScreenPoint>;
}

/// Cursor position reconstructed from window and device events.
///
/// Absolute fixes come from `CursorMoved` on any overlay (local position
/// plus that window's origin); raw motion deltas keep it moving while the
/// pointer is over something else. Reports nothing until the first fix.
#[derive(Debug, Clone, Default)]
pub struct TrackedCursor {
    position: Option<ScreenPoint>,
}

impl TrackedCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absolute fix from a window-local cursor event
    pub fn observe_local(&mut self, window_origin: ScreenPoint, local: ScreenPoint) {
        self.position = Some(window_origin + local);
    }

    /// Relative device motion; ignored until an absolute fix exists
    pub fn observe_motion(&mut self, dx: f64, dy: f64) {
        if let Some(position) = self.position.as_mut() {
            *position += Vec2::new(dx as f32, dy as f32);
        }
    }
}

impl CursorSource for TrackedCursor {
    fn position(&mut self) -> Option<ScreenPoint> {
        self.position
    }
}

#[cfg(target_os = "windows")]
mod win32 {
    use windows::Win32::Foundation::POINT;
    use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

    use super::CursorSource;
    use crate::math::ScreenPoint;

    /// Polls `GetCursorPos`
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Win32CursorSource;

    impl CursorSource for Win32CursorSource {
        fn position(&mut self) -> Option<ScreenPoint> {
            let mut point = POINT::default();
            unsafe { GetCursorPos(&mut point) }.ok()?;
            Some(ScreenPoint::new(point.x as f32, point.y as f32))
        }
    }
}

#[cfg(target_os = "windows")]
pub use win32::Win32CursorSource;

#[cfg(not(target_os = "windows"))]
mod pointer {
    use device_query::{DeviceQuery, DeviceState};

    use super::CursorSource;
    use crate::math::ScreenPoint;

    /// Queries the desktop pointer directly (X11 on Linux, CoreGraphics on macOS)
    pub struct PointerCursorSource {
        state: DeviceState,
    }

    impl PointerCursorSource {
        /// `None` without an X display or, on macOS, without accessibility access
        pub fn connect() -> Option<Self> {
            DeviceState::checked_new().map(|state| Self { state })
        }
    }

    impl CursorSource for PointerCursorSource {
        fn position(&mut self) -> Option<ScreenPoint> {
            let (x, y) = self.state.get_mouse().coords;
            Some(ScreenPoint::new(x as f32, y as f32))
        }
    }

    impl std::fmt::Debug for PointerCursorSource {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("PointerCursorSource")
        }
    }
}

#[cfg(not(target_os = "windows"))]
pub use pointer::PointerCursorSource;

/// Best available cursor source for the current platform
#[derive(Debug)]
pub enum PlatformCursor {
    #[cfg(target_os = "windows")]
    Win32(Win32CursorSource),
    #[cfg(not(target_os = "windows"))]
    Pointer(PointerCursorSource),
    Tracked(TrackedCursor),
}

impl PlatformCursor {
    pub fn detect() -> Self {
        #[cfg(target_os = "windows")]
        {
            Self::Win32(Win32CursorSource)
        }
        #[cfg(not(target_os = "windows"))]
        {
            Self::from_pointer(PointerCursorSource::connect())
        }
    }

    /// Poll the pointer when it can be read, otherwise track window events
    #[cfg(not(target_os = "windows"))]
    pub fn from_pointer(pointer: Option<PointerCursorSource>) -> Self {
        match pointer {
            Some(source) => Self::Pointer(source),
            None => {
                warn!("cannot query the pointer; following overlay events instead");
                Self::Tracked(TrackedCursor::new())
            }
        }
    }

    /// Event-fed tracker, when the platform source is unavailable
    pub fn tracked_mut(&mut self) -> Option<&mut TrackedCursor> {
        match self {
            Self::Tracked(tracked) => Some(tracked),
            #[cfg(target_os = "windows")]
            Self::Win32(_) => None,
            #[cfg(not(target_os = "windows"))]
            Self::Pointer(_) => None,
        }
    }
}

impl CursorSource for PlatformCursor {
    fn position(&mut self) -> Option<ScreenPoint> {
        match self {
            #[cfg(target_os = "windows")]
            Self::Win32(source) => source.position(),
            #[cfg(not(target_os = "windows"))]
            Self::Pointer(source) => source.position(),
            Self::Tracked(source) => source.position(),
        }
    }
}
