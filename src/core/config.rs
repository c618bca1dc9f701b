use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Setup errors. Raised once at startup, never per tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("poll interval must be at least 1 ms")]
    ZeroPollInterval,
    #[error("smoothing factor must lie in (0, 1], got {0}")]
    Smoothing(f32),
    #[error("step size must be a positive finite number, got {0}")]
    StepSize(f32),
    #[error("minimum movement must be a non-negative finite number, got {0}")]
    MinMovement(f32),
    #[error("max particle age must be at least 1 tick")]
    ZeroMaxAge,
    #[error("base radius must be a positive finite number, got {0}")]
    BaseRadius(f32),
    #[error("glow multiplier must be a non-negative finite number, got {0}")]
    GlowMultiplier(f32),
    #[error("{name} must lie in [0, 100], got {value}")]
    Percentage { name: &'static str, value: f32 },
}

/// Sampling side: cursor polling and color rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplerConfig {
    pub poll_interval_ms: u64,
    /// Movement resuming after a pause longer than this picks a new hue
    pub idle_threshold_ms: u64,
    pub saturation: f32,
    pub lightness: f32,
}

impl SamplerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn idle_threshold(&self) -> Duration {
        Duration::from_millis(self.idle_threshold_ms)
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 8,
            idle_threshold_ms: 200,
            saturation: 100.0,
            lightness: 50.0,
        }
    }
}

/// Per-surface animation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RendererConfig {
    /// Ticks a particle lives before it is culled
    pub max_age: u32,
    pub base_radius: f32,
    /// Weight of the target in the exponential filter, lower = more lag
    pub smoothing: f32,
    /// Spacing between interpolated particles
    pub step_size: f32,
    /// Smoothed movement at or below this emits nothing
    pub min_movement: f32,
    pub glow_multiplier: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_age: 15,
            base_radius: 10.0,
            smoothing: 0.12,
            step_size: 2.0,
            min_movement: 1.0,
            glow_multiplier: 10.0,
        }
    }
}

/// Complete trail configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TrailConfig {
    pub sampler: SamplerConfig,
    pub renderer: RendererConfig,
}

impl TrailConfig {
    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.sampler;
        let r = &self.renderer;

        if s.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        for (name, value) in [("saturation", s.saturation), ("lightness", s.lightness)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::Percentage { name, value });
            }
        }

        if !(r.smoothing > 0.0 && r.smoothing <= 1.0) {
            return Err(ConfigError::Smoothing(r.smoothing));
        }
        if !(r.step_size.is_finite() && r.step_size > 0.0) {
            return Err(ConfigError::StepSize(r.step_size));
        }
        if !(r.min_movement.is_finite() && r.min_movement >= 0.0) {
            return Err(ConfigError::MinMovement(r.min_movement));
        }
        if r.max_age == 0 {
            return Err(ConfigError::ZeroMaxAge);
        }
        if !(r.base_radius.is_finite() && r.base_radius > 0.0) {
            return Err(ConfigError::BaseRadius(r.base_radius));
        }
        if !(r.glow_multiplier.is_finite() && r.glow_multiplier >= 0.0) {
            return Err(ConfigError::GlowMultiplier(r.glow_multiplier));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(TrailConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_durations() {
        let s = SamplerConfig::default();
        assert_eq!(s.poll_interval(), Duration::from_millis(8));
        assert_eq!(s.idle_threshold(), Duration::from_millis(200));
    }

    #[test]
    fn rejects_smoothing_outside_unit_interval() {
        for k in [0.0, -0.5, 1.01, f32::NAN] {
            let mut config = TrailConfig::default();
            config.renderer.smoothing = k;
            assert!(matches!(config.validate(), Err(ConfigError::Smoothing(_))));
        }

        let mut config = TrailConfig::default();
        config.renderer.smoothing = 1.0;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_non_positive_step_size() {
        for step in [0.0, -2.0, f32::INFINITY] {
            let mut config = TrailConfig::default();
            config.renderer.step_size = step;
            assert!(matches!(config.validate(), Err(ConfigError::StepSize(_))));
        }
    }

    #[test]
    fn rejects_zero_poll_interval_and_age() {
        let mut config = TrailConfig::default();
        config.sampler.poll_interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPollInterval));

        let mut config = TrailConfig::default();
        config.renderer.max_age = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxAge));
    }

    #[test]
    fn rejects_out_of_range_percentages() {
        let mut config = TrailConfig::default();
        config.sampler.lightness = 120.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::Percentage { name: "lightness", value: 120.0 })
        );
    }

    #[test]
    fn error_messages_name_the_value() {
        let err = ConfigError::StepSize(-1.0);
        assert_eq!(err.to_string(), "step size must be a positive finite number, got -1");
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(TrailConfig::default()).unwrap();
        assert_eq!(json["sampler"]["poll_interval_ms"], 8);
        assert_eq!(json["renderer"]["max_age"], 15);
    }
}
