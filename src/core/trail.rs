use super::broadcaster::RenderEvent;
use super::canvas::DrawOp;
use super::color::TrailColor;
use super::config::RendererConfig;
use crate::math::{segment_points, smooth_toward, ScreenPoint};

/// One decaying dot of the trail. Keeps the color it was born with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailParticle {
    pub position: ScreenPoint,
    pub age: u32,
    pub color: TrailColor,
}

/// Filtered cursor in surface-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedCursor {
    /// Latest delivered position
    pub target: ScreenPoint,
    /// Rendered position, gliding toward `target`
    pub current: ScreenPoint,
    /// Where particles were last emitted up to
    pub last_emitted: ScreenPoint,
}

impl SmoothedCursor {
    fn snapped(position: ScreenPoint) -> Self {
        Self {
            target: position,
            current: position,
            last_emitted: position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrailState {
    /// No event seen yet: frames run but nothing is drawn
    Uninitialized,
    /// Permanent once the first event arrives
    Active {
        cursor: SmoothedCursor,
        color: TrailColor,
    },
}

/// Per-surface animation: smoothing, particle emission, aging, drawing.
///
/// Owns its particles outright; nothing here is shared with other surfaces.
#[derive(Debug, Clone)]
pub struct TrailRenderer {
    config: RendererConfig,
    state: TrailState,
    particles: Vec<TrailParticle>,
}

impl TrailRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            state: TrailState::Uninitialized,
            particles: Vec::new(),
        }
    }

    /// Accept a delivered event. The first one snaps every position to it;
    /// later ones only move the target (last write wins).
    pub fn receive(&mut self, event: RenderEvent) {
        let position = event.position();
        self.state = match self.state {
            TrailState::Uninitialized => TrailState::Active {
                cursor: SmoothedCursor::snapped(position),
                color: event.color,
            },
            TrailState::Active { cursor, .. } => TrailState::Active {
                cursor: SmoothedCursor {
                    target: position,
                    ..cursor
                },
                color: event.color,
            },
        };
    }

    /// Pin the target to the rendered point. With no new events after this,
    /// `current` stays put and the trail fades where it is.
    pub fn hold(&mut self) {
        if let TrailState::Active { cursor, color } = self.state {
            self.state = TrailState::Active {
                cursor: SmoothedCursor {
                    target: cursor.current,
                    ..cursor
                },
                color,
            };
        }
    }

    /// Run one frame with the latest event, if one arrived since the last frame.
    /// Returns the draw list for this frame, starting with a transparent clear.
    pub fn step(&mut self, event: Option<RenderEvent>) -> Vec<DrawOp> {
        if let Some(event) = event {
            self.receive(event);
        }

        let mut ops = vec![DrawOp::Clear(0, 0, 0, 0)];

        let TrailState::Active { cursor, color } = self.state else {
            return ops;
        };

        let current = smooth_toward(cursor.current, cursor.target, self.config.smoothing);
        let emitted = emit_particles(cursor.last_emitted, current, color, &self.config);

        self.state = TrailState::Active {
            cursor: SmoothedCursor {
                target: cursor.target,
                current,
                last_emitted: current,
            },
            color,
        };

        let mut particles = std::mem::take(&mut self.particles);
        particles.extend(emitted);
        self.particles = age_particles(particles, self.config.max_age);

        ops.extend(
            self.particles
                .iter()
                .filter_map(|p| particle_draw_op(p, &self.config)),
        );
        ops
    }

    pub fn state(&self) -> TrailState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TrailState::Active { .. })
    }

    pub fn cursor(&self) -> Option<SmoothedCursor> {
        match self.state {
            TrailState::Active { cursor, .. } => Some(cursor),
            TrailState::Uninitialized => None,
        }
    }

    pub fn particles(&self) -> &[TrailParticle] {
        &self.particles
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }
}

/// Particles spaced along `from -> to`, none if the move is within the threshold
pub fn emit_particles(
    from: ScreenPoint,
    to: ScreenPoint,
    color: TrailColor,
    config: &RendererConfig,
) -> Vec<TrailParticle> {
    if from.distance(to) <= config.min_movement {
        return Vec::new();
    }

    segment_points(from, to, config.step_size)
        .map(|position| TrailParticle {
            position,
            age: 0,
            color,
        })
        .collect()
}

/// Next generation: every particle one tick older, those past `max_age` dropped
pub fn age_particles(particles: Vec<TrailParticle>, max_age: u32) -> Vec<TrailParticle> {
    particles
        .into_iter()
        .map(|p| TrailParticle { age: p.age + 1, ..p })
        .filter(|p| p.age <= max_age)
        .collect()
}

/// Remaining life in [0, 1]
pub fn particle_life(age: u32, max_age: u32) -> f32 {
    (1.0 - age as f32 / max_age as f32).clamp(0.0, 1.0)
}

/// Glow circle for a particle, `None` once it has shrunk to nothing
pub fn particle_draw_op(particle: &TrailParticle, config: &RendererConfig) -> Option<DrawOp> {
    let life = particle_life(particle.age, config.max_age);
    let radius = config.base_radius * life;
    if radius <= 0.0 {
        return None;
    }

    Some(DrawOp::GlowCircle {
        x: particle.position.x,
        y: particle.position.y,
        radius,
        color: particle.color.to_rgb8(),
        opacity: life,
        blur: config.glow_multiplier * life,
    })
}
