// Host-side tests for the per-frame simulation: clock clamping, ambient
// motion, damping convergence and frame scheduling.

use card_core::*;
use glam::{DVec2, DVec3};

fn plain_card() -> (Card, ManualScheduler) {
    let sched = ManualScheduler::new();
    let card = Card::new(CardConfig::default(), Box::new(sched.clone()));
    (card, sched)
}

fn ambient_card(intensity: f64) -> (Card, ManualScheduler) {
    let sched = ManualScheduler::new();
    let config = CardConfig {
        intensity,
        ..CardConfig::default()
    }
    .with_ambient_offset(0.0);
    let card = Card::new(config, Box::new(sched.clone()));
    (card, sched)
}

#[test]
fn frame_time_is_always_clamped() {
    let steps = [-1000.0, -1.0, 0.0, 1.0, 15.9, 16.0, 20.0, 32.0, 33.0, 5000.0, f64::INFINITY];
    for step in steps {
        let dt = frame_time(Some(1000.0), 1000.0 + step);
        assert!((MIN_FRAME_TIME..=MAX_FRAME_TIME).contains(&dt), "step {step} -> {dt}");
    }
    assert_eq!(frame_time(Some(0.0), f64::NAN), MIN_FRAME_TIME);
    assert_eq!(frame_time(None, 123456.0), MIN_FRAME_TIME);
    assert_eq!(frame_time(Some(100.0), 120.0), 20.0);
}

#[test]
fn ambient_path_matches_closed_form_for_ten_ticks() {
    let (mut card, _sched) = ambient_card(10.0);
    card.visibility_changed(true);
    assert!(card.simulation().playing());

    for n in 1..=10u32 {
        card.tick(5000.0 + 16.0 * n as f64);
        let phase = (16.0 * n as f64) * 0.0001 + 0.0;
        let l = 100.0 * (phase * 3.542 + 1234.5).cos();
        let expected = DVec3::new((phase * 0.5).cos() * l, (phase * 2.0).sin() * l, -800.0);
        assert_eq!(card.simulation().look_target(), expected, "tick {n}");
        assert_eq!(card.simulation().last_frame_time(), 16.0);
    }
}

#[test]
fn ambient_phase_only_accumulates_while_playing() {
    let (mut card, _sched) = ambient_card(10.0);
    card.tick(0.0);
    card.tick(16.0);
    assert_eq!(card.simulation().ambient_phase(), 0.0);

    card.visibility_changed(true);
    card.tick(100.0);
    card.tick(132.0);
    assert_eq!(card.simulation().ambient_phase(), 16.0 + 32.0);
}

#[test]
fn look_point_and_zoom_converge_monotonically() {
    let (mut card, _sched) = plain_card();
    card.geometry_changed(Rect::new(0.0, 0.0, 200.0, 200.0));
    card.pointer_enter();
    card.pointer_move(DVec2::new(150.0, 100.0));
    assert_eq!(card.simulation().look_target(), DVec3::new(50.0, 0.0, -800.0));

    let mut prev_diff = card.simulation().look_differential();
    let mut prev_zoom_gap = (card.simulation().zoom() - card.simulation().center().z).abs();
    for i in 0..120 {
        card.tick(i as f64 * 16.0);
        let diff = card.simulation().look_differential();
        let gap = (card.simulation().zoom() - card.simulation().center().z).abs();
        assert!(diff <= prev_diff, "look differential grew at tick {i}");
        assert!(gap <= prev_zoom_gap, "zoom gap grew at tick {i}");
        prev_diff = diff;
        prev_zoom_gap = gap;
    }
    assert!(card.simulation().look_differential() <= LOOK_DIFFERENTIAL_THRESHOLD);
    assert_eq!(card.simulation().center().z, DEFAULT_ZOOM_SIZE);
}

#[test]
fn damping_stops_below_threshold() {
    let (mut card, _sched) = plain_card();
    card.pointer_enter();
    card.simulation_mut()
        .set_look_point(&[1.0, 0.0, -800.0])
        .expect("valid point");
    card.pointer_move(DVec2::ZERO);
    // target (0,0,-800) is within sqrt(2) of the look point: nothing moves
    card.tick(0.0);
    assert_eq!(card.simulation().look_point(), DVec3::new(1.0, 0.0, -800.0));
}

#[test]
fn start_requests_a_single_continuation() {
    let (mut card, sched) = plain_card();
    card.start();
    card.start();
    assert_eq!(sched.requested(), 1);
    assert!(card.simulation().frame_pending());

    // enter while already playing does not add a second request
    card.pointer_enter();
    assert_eq!(sched.requested(), 1);

    card.tick(16.0);
    assert_eq!(sched.requested(), 2);
    card.tick(32.0);
    assert_eq!(sched.requested(), 3);
}

#[test]
fn stop_lets_the_pending_tick_run_once_without_rescheduling() {
    let (mut card, sched) = plain_card();
    card.start();
    card.stop();
    assert!(card.simulation().frame_pending());

    let out = card.tick(16.0);
    assert!(matches!(out.last(), Some(SurfaceCommand::Render { .. })));
    assert_eq!(sched.requested(), 1);
    assert!(!card.simulation().frame_pending());
}

#[test]
fn restart_resets_the_frame_clock() {
    let (mut card, _sched) = plain_card();
    card.start();
    card.tick(0.0);
    card.tick(20.0);
    assert_eq!(card.simulation().last_frame_time(), 20.0);
    card.stop();
    card.tick(40.0);
    card.start();
    // long pause would clamp to 32; a restart measures from scratch
    card.tick(10_000.0);
    assert_eq!(card.simulation().last_frame_time(), MIN_FRAME_TIME);
}

#[test]
fn setters_reject_malformed_input_and_keep_previous_value() {
    let (mut card, _sched) = plain_card();
    let sim = card.simulation_mut();

    assert!(sim.set_zoom(12.0).is_ok());
    assert_eq!(sim.set_zoom(f64::NAN), Err(CardError::NonFinite("zoom")));
    assert_eq!(sim.zoom(), 12.0);

    assert_eq!(sim.set_center(&[1.0, 2.0]), Err(CardError::InvalidPoint(2)));
    assert_eq!(sim.center(), DEFAULT_CENTER);

    assert!(sim.set_look_target(&[0.0, f64::NAN, 0.0]).is_err());
    assert_eq!(sim.look_target(), DEFAULT_LOOK);

    assert!(sim.set_look_target(&[3.0, 4.0, -800.0]).is_ok());
    assert_eq!(sim.look_differential(), 25.0);
    assert!(sim.set_look_point(&[3.0, 4.0, -800.0]).is_ok());
    assert_eq!(sim.look_differential(), 0.0);
}

#[test]
fn nan_timestamp_is_ignored() {
    let (mut card, _sched) = plain_card();
    card.start();
    card.tick(0.0);
    card.tick(f64::NAN);
    card.tick(24.0);
    assert_eq!(card.simulation().last_frame_time(), 24.0);
}

#[test]
fn render_emits_matrix_for_current_points() {
    let (mut card, _sched) = plain_card();
    let out = card.tick(0.0);

    // idle drive moves the target, then one damping step of 2/16
    let target = ambient_look_target(0.0, 0.0, DEFAULT_INTENSITY, DEFAULT_LOOK.z);
    let factor = DAMPING_NUMERATOR / MIN_FRAME_TIME;
    let look = DEFAULT_LOOK + (target - DEFAULT_LOOK) * factor;
    assert_eq!(card.simulation().look_point(), look);

    match out.last() {
        Some(SurfaceCommand::Render { matrix, gradient }) => {
            assert_eq!(
                matrix3d_css(matrix),
                matrix3d_css(&target_to(DEFAULT_CENTER, look, WORLD_UP))
            );
            assert_eq!(*gradient, Gradient::from_look_point(look));
        }
        other => panic!("expected render, got {other:?}"),
    }
}

#[test]
fn reset_writes_the_identity_transform() {
    let (mut card, _sched) = plain_card();
    let out = card.destroy();
    assert_eq!(out.first(), Some(&SurfaceCommand::Reset));
    assert_eq!(
        matrix3d_css(&glam::DMat4::IDENTITY),
        "matrix3d(1,0,0,0,0,1,0,0,0,0,1,0,0,0,0,1)"
    );
}

#[test]
fn destroy_cancels_pending_frame() {
    let (mut card, sched) = plain_card();
    card.start();
    let out = card.destroy();
    assert_eq!(sched.cancelled(), 1);
    assert!(!card.simulation().playing());
    assert!(!card.simulation().frame_pending());
    assert_eq!(out.as_slice(), &[SurfaceCommand::Reset]);
}
