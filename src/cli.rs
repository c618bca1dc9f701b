// cli.rs - Command-line interface configuration
use clap::Parser;

use crate::core::{RendererConfig, SamplerConfig, TrailConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "cursor-glow")]
#[command(about = "Glowing, color-cycling cursor trail on every display", long_about = None)]
pub struct Cli {
    /// Cursor sampling period in milliseconds
    #[arg(long, default_value_t = 8)]
    pub poll_interval_ms: u64,

    /// Pause (ms) after which renewed movement picks a new hue
    #[arg(long, default_value_t = 200)]
    pub idle_threshold_ms: u64,

    /// Trail saturation, percent
    #[arg(long, default_value_t = 100.0)]
    pub saturation: f32,

    /// Trail lightness, percent
    #[arg(long, default_value_t = 50.0)]
    pub lightness: f32,

    /// Frames a particle lives
    #[arg(long, default_value_t = 15)]
    pub max_age: u32,

    /// Radius of a newborn particle
    #[arg(long, default_value_t = 10.0)]
    pub base_radius: f32,

    /// Smoothing factor in (0, 1]; lower trails further behind
    #[arg(long, default_value_t = 0.12)]
    pub smoothing: f32,

    /// Distance between interpolated particles
    #[arg(long, default_value_t = 2.0)]
    pub step_size: f32,

    /// Smoothed movement at or below this emits nothing
    #[arg(long, default_value_t = 1.0)]
    pub min_movement: f32,

    /// Glow halo width relative to remaining life
    #[arg(long, default_value_t = 10.0)]
    pub glow_multiplier: f32,

    /// Start with sampling off and overlays hidden
    #[arg(long)]
    pub start_disabled: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    pub fn config(&self) -> TrailConfig {
        TrailConfig {
            sampler: SamplerConfig {
                poll_interval_ms: self.poll_interval_ms,
                idle_threshold_ms: self.idle_threshold_ms,
                saturation: self.saturation,
                lightness: self.lightness,
            },
            renderer: RendererConfig {
                max_age: self.max_age,
                base_radius: self.base_radius,
                smoothing: self.smoothing,
                step_size: self.step_size,
                min_movement: self.min_movement,
                glow_multiplier: self.glow_multiplier,
            },
        }
    }
}
