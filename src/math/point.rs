use glam::Vec2;

/// A position in display space. Global or surface-local depending on context.
pub type ScreenPoint = Vec2;

/// One step of the one-pole exponential filter: `(1 - k) * current + k * target`.
pub fn smooth_toward(current: ScreenPoint, target: ScreenPoint, k: f32) -> ScreenPoint {
    current * (1.0 - k) + target * k
}

/// Split `from -> to` into `ceil(len / step)` equal steps and yield the end of each.
///
/// The last point is `to` itself, never `from + (to - from) * 1.0`, so it
/// lands on the target bit-for-bit.
pub fn segment_points(
    from: ScreenPoint,
    to: ScreenPoint,
    step: f32,
) -> impl Iterator<Item = ScreenPoint> {
    let delta = to - from;
    let steps = (delta.length() / step).ceil() as usize;

    (0..steps).map(move |i| {
        if i + 1 == steps {
            to
        } else {
            from + delta * ((i + 1) as f32 / steps as f32)
        }
    })
}
