use cursor_glow::core::{DrawOp, RenderEvent, RendererConfig, TrailColor, TrailRenderer, TrailState};
use glam::Vec2;

fn red() -> TrailColor {
    TrailColor::new(0.0, 100.0, 50.0)
}

fn blue() -> TrailColor {
    TrailColor::new(240.0, 100.0, 50.0)
}

fn event(x: f32, y: f32, color: TrailColor) -> RenderEvent {
    RenderEvent { x, y, color }
}

/// Renderer that jumps straight to its target, so emission is easy to predict
fn unsmoothed() -> TrailRenderer {
    TrailRenderer::new(RendererConfig {
        smoothing: 1.0,
        ..RendererConfig::default()
    })
}

fn glow_count(ops: &[DrawOp]) -> usize {
    ops.iter()
        .filter(|op| matches!(op, DrawOp::GlowCircle { .. }))
        .count()
}

// ============================================================================
// State machine
// ============================================================================

#[test]
fn test_uninitialized_frames_draw_nothing() {
    let mut trail = TrailRenderer::new(RendererConfig::default());

    for _ in 0..30 {
        let ops = trail.step(None);
        assert_eq!(ops, vec![DrawOp::Clear(0, 0, 0, 0)]);
    }
    assert_eq!(trail.state(), TrailState::Uninitialized);
}

#[test]
fn test_first_event_activates_permanently() {
    let mut trail = TrailRenderer::new(RendererConfig::default());
    trail.step(Some(event(50.0, 60.0, red())));
    assert!(trail.is_active());

    // No further events: still active, nothing moves
    for _ in 0..100 {
        trail.step(None);
    }
    let cursor = trail.cursor().unwrap();
    assert!(trail.is_active());
    assert_eq!(cursor.current, Vec2::new(50.0, 60.0));
    assert_eq!(cursor.target, Vec2::new(50.0, 60.0));
}

#[test]
fn test_later_events_only_move_target() {
    let mut trail = TrailRenderer::new(RendererConfig::default());
    trail.step(Some(event(0.0, 0.0, red())));

    // Last write wins; with k = 0.12 the rendered point moves 12% of the way
    trail.step(Some(event(100.0, 0.0, red())));
    let cursor = trail.cursor().unwrap();
    assert_eq!(cursor.target, Vec2::new(100.0, 0.0));
    assert!((cursor.current.x - 12.0).abs() < 1e-4);
    assert_eq!(cursor.last_emitted, cursor.current);
}

// ============================================================================
// Emission and lifecycle
// ============================================================================

#[test]
fn test_emission_positions_are_deterministic() {
    let mut trail = unsmoothed();
    trail.step(Some(event(0.0, 0.0, red())));
    let ops = trail.step(Some(event(10.0, 0.0, red())));

    let positions: Vec<Vec2> = trail.particles().iter().map(|p| p.position).collect();
    assert_eq!(
        positions,
        vec![
            Vec2::new(2.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(6.0, 0.0),
            Vec2::new(8.0, 0.0),
            Vec2::new(10.0, 0.0),
        ]
    );

    // Last particle lands exactly on the rendered point
    assert_eq!(positions[4], trail.cursor().unwrap().current);
    assert_eq!(glow_count(&ops), 5);
    assert_eq!(ops[0], DrawOp::Clear(0, 0, 0, 0));
}

#[test]
fn test_particles_age_in_their_birth_frame() {
    let mut trail = unsmoothed();
    trail.step(Some(event(0.0, 0.0, red())));
    trail.step(Some(event(10.0, 0.0, red())));

    assert!(trail.particles().iter().all(|p| p.age == 1));
}

#[test]
fn test_particle_removed_when_age_becomes_sixteen() {
    let mut trail = unsmoothed();
    trail.step(Some(event(0.0, 0.0, red())));
    trail.step(Some(event(10.0, 0.0, red())));

    // Ages 2..=14 are drawn
    for expected_age in 2..=14 {
        let ops = trail.step(None);
        assert_eq!(trail.particles().len(), 5);
        assert!(trail.particles().iter().all(|p| p.age == expected_age));
        assert_eq!(glow_count(&ops), 5);
    }

    // Age 15: still alive, radius 0, not drawn
    let ops = trail.step(None);
    assert_eq!(trail.particles().len(), 5);
    assert!(trail.particles().iter().all(|p| p.age == 15));
    assert_eq!(glow_count(&ops), 0);

    // Age 16: gone
    trail.step(None);
    assert!(trail.particles().is_empty());
}

#[test]
fn test_particles_keep_birth_color() {
    let mut trail = unsmoothed();
    trail.step(Some(event(0.0, 0.0, red())));
    trail.step(Some(event(10.0, 0.0, red())));
    let ops = trail.step(Some(event(20.0, 0.0, blue())));

    let colors: Vec<TrailColor> = trail.particles().iter().map(|p| p.color).collect();
    assert_eq!(colors.len(), 10);
    assert!(colors[..5].iter().all(|c| *c == red()));
    assert!(colors[5..].iter().all(|c| *c == blue()));

    let drawn: Vec<[u8; 3]> = ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::GlowCircle { color, .. } => Some(*color),
            DrawOp::Clear(..) => None,
        })
        .collect();
    assert_eq!(drawn[0], [255, 0, 0]);
    assert_eq!(drawn[9], [0, 0, 255]);
}

#[test]
fn test_older_particles_draw_smaller_and_fainter() {
    let mut trail = unsmoothed();
    trail.step(Some(event(0.0, 0.0, red())));
    trail.step(Some(event(2.0, 0.0, red())));
    trail.step(None);
    let ops = trail.step(Some(event(4.0, 0.0, red())));

    let circles: Vec<(f32, f32)> = ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::GlowCircle { radius, opacity, .. } => Some((*radius, *opacity)),
            DrawOp::Clear(..) => None,
        })
        .collect();

    assert_eq!(circles.len(), 2);
    assert!(circles[0].0 < circles[1].0);
    assert!(circles[0].1 < circles[1].1);
}

// ============================================================================
// Smoothing
// ============================================================================

#[test]
fn test_smoothing_converges_without_overshoot() {
    let mut trail = TrailRenderer::new(RendererConfig::default());
    trail.step(Some(event(0.0, 0.0, red())));
    trail.step(Some(event(100.0, 0.0, red())));

    let target = Vec2::new(100.0, 0.0);
    let mut previous = target.distance(trail.cursor().unwrap().current);
    let mut ticks = 1;

    while previous > 1.0 {
        trail.step(None);
        ticks += 1;
        let cursor = trail.cursor().unwrap();
        let distance = target.distance(cursor.current);

        assert!(distance < previous, "distance must shrink every tick");
        assert!(cursor.current.x <= 100.0 + 1e-3, "no overshoot");
        assert_eq!(cursor.current.y, 0.0);
        previous = distance;
    }

    // 100 * 0.88^n < 1 first holds at n = 37
    assert_eq!(ticks, 37);
}

#[test]
fn test_no_resnap_after_pause() {
    let mut trail = TrailRenderer::new(RendererConfig::default());
    trail.step(Some(event(0.0, 0.0, red())));

    for _ in 0..200 {
        trail.step(None);
    }

    trail.step(Some(event(100.0, 0.0, red())));
    let cursor = trail.cursor().unwrap();
    assert!((cursor.current.x - 12.0).abs() < 1e-4);
}

#[test]
fn test_without_events_particle_count_strictly_decreases() {
    let mut trail = unsmoothed();
    trail.step(Some(event(0.0, 0.0, red())));

    // Steady motion: two particles per frame
    for i in 1..=20 {
        trail.step(Some(event(4.0 * i as f32, 0.0, red())));
    }
    assert_eq!(trail.particles().len(), 30);

    // Sampling off: nothing new arrives
    let mut previous = trail.particles().len();
    while previous > 0 {
        trail.step(None);
        let count = trail.particles().len();
        assert!(count < previous);
        previous = count;
    }

    // Stays blank afterwards
    for _ in 0..5 {
        let ops = trail.step(None);
        assert_eq!(ops, vec![DrawOp::Clear(0, 0, 0, 0)]);
    }
}

#[test]
fn test_held_trail_fades_in_place_at_default_smoothing() {
    let mut trail = TrailRenderer::new(RendererConfig::default());
    trail.step(Some(event(0.0, 0.0, red())));

    // Fast stroke: the rendered point lags well behind the cursor
    for i in 1..=20 {
        trail.step(Some(event(40.0 * i as f32, 0.0, red())));
    }
    let cursor = trail.cursor().unwrap();
    assert!(cursor.current.distance(cursor.target) > 100.0);

    // Sampling stops
    trail.hold();
    let held_at = trail.cursor().unwrap().current;

    let mut previous = trail.particles().len();
    let mut frames = 0;
    while previous > 0 {
        trail.step(None);
        frames += 1;

        let count = trail.particles().len();
        assert!(count < previous, "count went from {previous} to {count}");
        assert!(trail.cursor().unwrap().current.distance(held_at) < 1e-3);
        previous = count;
    }

    // One cohort per moving frame, the oldest dies each frame
    assert_eq!(frames, 15);
}

#[test]
fn test_resume_after_hold_glides_from_held_point() {
    let mut trail = TrailRenderer::new(RendererConfig::default());
    trail.step(Some(event(0.0, 0.0, red())));
    trail.step(Some(event(100.0, 0.0, red())));
    trail.hold();
    for _ in 0..20 {
        trail.step(None);
    }

    let held_x = trail.cursor().unwrap().current.x;
    trail.step(Some(event(500.0, 0.0, red())));

    let expected = held_x * 0.88 + 500.0 * 0.12;
    assert!((trail.cursor().unwrap().current.x - expected).abs() < 1e-2);
}
