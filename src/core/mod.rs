pub mod broadcaster;
pub mod canvas;
pub mod clock;
pub mod color;
pub mod config;
pub mod cursor;
pub mod gpu_context;
pub mod pipeline;
pub mod rotator;
pub mod sampler;
pub mod slot;
pub mod surface_renderer;
pub mod timer;
pub mod trail;

pub use broadcaster::{Broadcaster, DisplaySurface, RenderEvent, SurfaceId};
pub use canvas::{Canvas, DrawOp};
pub use clock::Clock;
pub use color::{HueSource, ParseColorError, TrailColor, XorShiftHue};
pub use config::{ConfigError, RendererConfig, SamplerConfig, TrailConfig};
pub use cursor::{CursorSource, PlatformCursor, TrackedCursor};
pub use gpu_context::GpuContext;
pub use pipeline::{SamplingPipeline, TickOutcome};
pub use rotator::{rotate, ColorRotator, MotionState, RotationRule, RotatorState};
pub use sampler::CursorSampler;
pub use slot::EventSlot;
pub use surface_renderer::SurfaceRenderer;
pub use timer::{FixedInterval, Throttled};
pub use trail::{
    age_particles, emit_particles, particle_draw_op, particle_life, SmoothedCursor,
    TrailParticle, TrailRenderer, TrailState,
};
