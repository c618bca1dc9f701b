use std::time::Duration;

use log::debug;

use super::color::{HueSource, TrailColor};
use super::config::SamplerConfig;
use crate::math::ScreenPoint;

/// Where the cursor last moved and when
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub last_point: ScreenPoint,
    pub last_move: Duration,
}

/// Everything the rotator owns between ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatorState {
    pub motion: MotionState,
    pub color: TrailColor,
}

/// Rotation rule parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationRule {
    pub idle_threshold: Duration,
    pub saturation: f32,
    pub lightness: f32,
}

impl RotationRule {
    pub fn fresh_color(&self, hues: &mut dyn HueSource) -> TrailColor {
        TrailColor::new(hues.next_hue(), self.saturation, self.lightness)
    }
}

impl From<&SamplerConfig> for RotationRule {
    fn from(config: &SamplerConfig) -> Self {
        Self {
            idle_threshold: config.idle_threshold(),
            saturation: config.saturation,
            lightness: config.lightness,
        }
    }
}

/// Advance rotator state by one sample.
///
/// No movement leaves the state untouched. Movement updates the motion
/// record, and draws a new hue only when it resumes after more than the
/// idle threshold, so each stroke gets one color.
pub fn rotate(
    state: RotatorState,
    sample: ScreenPoint,
    now: Duration,
    rule: &RotationRule,
    hues: &mut dyn HueSource,
) -> RotatorState {
    let distance = sample.distance(state.motion.last_point);
    if distance == 0.0 {
        return state;
    }

    let idle = now.saturating_sub(state.motion.last_move);
    let color = if idle > rule.idle_threshold {
        rule.fresh_color(hues)
    } else {
        state.color
    };

    RotatorState {
        motion: MotionState {
            last_point: sample,
            last_move: now,
        },
        color,
    }
}

/// Single-writer owner of the current trail color
pub struct ColorRotator<H: HueSource> {
    rule: RotationRule,
    hues: H,
    color: TrailColor,
    /// `None` until the first real sample seeds the motion record
    motion: Option<MotionState>,
}

impl<H: HueSource> ColorRotator<H> {
    /// Picks the starting color immediately
    pub fn new(rule: RotationRule, mut hues: H) -> Self {
        let color = rule.fresh_color(&mut hues);
        Self {
            rule,
            hues,
            color,
            motion: None,
        }
    }

    /// Feed one sample and return the color to broadcast with it.
    /// The first sample only seeds the motion record.
    pub fn observe(&mut self, sample: ScreenPoint, now: Duration) -> TrailColor {
        let Some(motion) = self.motion else {
            self.motion = Some(MotionState {
                last_point: sample,
                last_move: now,
            });
            return self.color;
        };

        let previous = RotatorState {
            motion,
            color: self.color,
        };
        let next = rotate(previous, sample, now, &self.rule, &mut self.hues);

        if next.color != previous.color {
            debug!("trail color rotated to {}", next.color);
        }

        self.motion = Some(next.motion);
        self.color = next.color;
        self.color
    }

    pub fn color(&self) -> TrailColor {
        self.color
    }

    pub fn motion(&self) -> Option<MotionState> {
        self.motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    struct Scripted(Vec<f32>);

    impl HueSource for Scripted {
        fn next_hue(&mut self) -> f32 {
            self.0.remove(0)
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn rule() -> RotationRule {
        RotationRule::from(&SamplerConfig::default())
    }

    fn state_at(x: f32, y: f32, last_move: Duration, hue: f32) -> RotatorState {
        RotatorState {
            motion: MotionState {
                last_point: Vec2::new(x, y),
                last_move,
            },
            color: TrailColor::new(hue, 100.0, 50.0),
        }
    }

    #[test]
    fn stationary_sample_changes_nothing() {
        let state = state_at(10.0, 10.0, ms(0), 40.0);
        let next = rotate(state, Vec2::new(10.0, 10.0), ms(5_000), &rule(), &mut Scripted(vec![]));
        assert_eq!(next, state);
    }

    #[test]
    fn movement_after_idle_draws_new_hue() {
        let state = state_at(0.0, 0.0, ms(0), 40.0);
        let next = rotate(state, Vec2::new(3.0, 4.0), ms(201), &rule(), &mut Scripted(vec![300.0]));

        assert_eq!(next.color.hue(), 300.0);
        assert_eq!(next.motion.last_point, Vec2::new(3.0, 4.0));
        assert_eq!(next.motion.last_move, ms(201));
    }

    #[test]
    fn movement_at_threshold_keeps_color() {
        let state = state_at(0.0, 0.0, ms(0), 40.0);
        let next = rotate(state, Vec2::new(1.0, 0.0), ms(200), &rule(), &mut Scripted(vec![]));

        assert_eq!(next.color.hue(), 40.0);
        assert_eq!(next.motion.last_move, ms(200));
    }

    #[test]
    fn rotator_seeds_from_first_sample() {
        let mut rotator = ColorRotator::new(rule(), Scripted(vec![10.0, 20.0]));
        assert_eq!(rotator.motion(), None);

        // Far from the origin and long after start: still no spurious rotation
        let color = rotator.observe(Vec2::new(800.0, 600.0), ms(10_000));
        assert_eq!(color.hue(), 10.0);
        assert_eq!(
            rotator.motion(),
            Some(MotionState {
                last_point: Vec2::new(800.0, 600.0),
                last_move: ms(10_000),
            })
        );
    }

    #[test]
    fn rotator_rotates_once_per_stroke() {
        let mut rotator = ColorRotator::new(rule(), Scripted(vec![10.0, 20.0, 30.0]));
        rotator.observe(Vec2::ZERO, ms(0));

        // Pause, then a stroke
        assert_eq!(rotator.observe(Vec2::new(1.0, 0.0), ms(500)).hue(), 20.0);
        assert_eq!(rotator.observe(Vec2::new(2.0, 0.0), ms(508)).hue(), 20.0);
        assert_eq!(rotator.observe(Vec2::new(3.0, 0.0), ms(516)).hue(), 20.0);

        // Standing still does not refresh the timestamp
        assert_eq!(rotator.observe(Vec2::new(3.0, 0.0), ms(700)).hue(), 20.0);
        assert_eq!(rotator.observe(Vec2::new(4.0, 0.0), ms(717)).hue(), 30.0);
    }
}
