// Host-side tests for pointer, layout and visibility handling.

use card_core::*;
use glam::{DVec2, DVec3};

fn card_with(config: CardConfig) -> (Card, ManualScheduler) {
    let sched = ManualScheduler::new();
    let card = Card::new(config, Box::new(sched.clone()));
    (card, sched)
}

#[test]
fn pointer_at_axis_centers_look_target() {
    let (mut card, _sched) = card_with(CardConfig::default());
    card.geometry_changed(Rect::new(100.0, 100.0, 200.0, 300.0));
    assert_eq!(card.simulation().geometry().axis, DVec2::new(200.0, 250.0));

    card.simulation_mut()
        .set_look_point(&[30.0, -40.0, -800.0])
        .expect("valid point");
    card.pointer_enter();
    card.pointer_move(DVec2::new(200.0, 250.0));

    let target = card.simulation().look_target();
    assert_eq!((target.x, target.y), (0.0, 0.0));
    assert_eq!(target.z, -800.0);
    // differential is the squared magnitude of the previous look point offset
    assert_eq!(card.simulation().look_differential(), 30.0 * 30.0 + 40.0 * 40.0);
}

#[test]
fn pointer_move_is_ignored_until_pointer_enters() {
    let (mut card, _sched) = card_with(CardConfig::default());
    card.pointer_move(DVec2::new(500.0, 500.0));
    assert_eq!(card.simulation().look_target(), DEFAULT_LOOK);

    card.pointer_enter();
    card.pointer_move(DVec2::new(f64::NAN, 1.0));
    assert_eq!(card.simulation().look_target(), DEFAULT_LOOK);
    card.pointer_move(DVec2::new(-20.0, 15.0));
    assert_eq!(card.simulation().look_target(), DVec3::new(-20.0, 15.0, -800.0));
}

#[test]
fn enter_and_leave_drive_playback_without_ambient() {
    let config = CardConfig {
        zoom_size: 55.0,
        ..CardConfig::default()
    };
    let (mut card, sched) = card_with(config);

    let out = card.pointer_enter();
    assert_eq!(out.as_slice(), &[SurfaceCommand::Hover(true)]);
    assert!(card.simulation().pointer_controlled());
    assert!(card.simulation().playing());
    assert_eq!(card.simulation().zoom(), 55.0);
    assert_eq!(sched.requested(), 1);

    let out = card.pointer_leave();
    assert_eq!(
        out.as_slice(),
        &[
            SurfaceCommand::Hover(false),
            SurfaceCommand::ScheduleReset {
                delay_ms: RESET_DELAY_MS
            },
        ]
    );
    assert!(!card.simulation().pointer_controlled());
    assert!(!card.simulation().playing());
    assert_eq!(card.simulation().zoom(), 0.0);

    // the frame requested while hovering still renders once
    card.tick(16.0);
    assert_eq!(sched.requested(), 1);
    assert_eq!(card.resolve_reset(), Some(SurfaceCommand::Reset));
}

#[test]
fn reset_is_skipped_when_pointer_returns_before_it_fires() {
    let (mut card, _sched) = card_with(CardConfig::default());
    card.pointer_enter();
    card.pointer_leave();
    card.pointer_enter();
    assert_eq!(card.resolve_reset(), None);
}

#[test]
fn ambient_cards_keep_playing_through_hover() {
    let (mut card, _sched) = card_with(CardConfig::default().with_ambient_offset(2.5));
    assert!(card.simulation().ambient());
    assert_eq!(card.simulation().ambient_offset(), 2.5);

    // hover alone does not start an ambient card; visibility does
    card.pointer_enter();
    assert!(!card.simulation().playing());
    card.visibility_changed(true);
    assert!(card.simulation().playing());

    let out = card.pointer_leave();
    assert_eq!(out.as_slice(), &[SurfaceCommand::Hover(false)]);
    assert!(card.simulation().playing());

    card.visibility_changed(false);
    assert!(!card.simulation().playing());
}

#[test]
fn visibility_is_ignored_without_ambient() {
    let (mut card, sched) = card_with(CardConfig::default().with_ambient_offset(-1.0));
    assert!(!card.simulation().ambient());
    card.visibility_changed(true);
    assert!(!card.simulation().playing());
    assert_eq!(sched.requested(), 0);
    assert!(card.simulation().visible());
}

#[test]
fn geometry_tracks_latest_rect() {
    let (mut card, _sched) = card_with(CardConfig::default());
    card.geometry_changed(Rect::new(10.0, 20.0, 100.0, 50.0));
    card.geometry_changed(Rect::new(-5.0, 300.0, 80.0, 120.0));
    let g = card.simulation().geometry();
    assert_eq!(g.position, DVec2::new(-5.0, 300.0));
    assert_eq!(g.size, DVec2::new(80.0, 120.0));
    assert_eq!(g.axis, DVec2::new(35.0, 360.0));
}

#[test]
fn debouncer_fires_once_after_quiet_period() {
    let mut d = Debouncer::default();
    assert_eq!(d.interval(), GEOMETRY_DEBOUNCE_MS);
    assert!(!d.due(0.0));

    // a storm of scroll events keeps pushing the deadline out
    for t in [0.0, 100.0, 200.0] {
        assert_eq!(d.signal(t), GEOMETRY_DEBOUNCE_MS);
    }
    assert!(!d.due(450.0));
    assert!(d.due(500.0));
    assert!(!d.due(900.0));
    assert!(!d.is_pending());

    d.signal(1000.0);
    assert!(d.take());
    assert!(!d.take());
}

#[test]
fn pointer_arbiter_serializes_claims() {
    let arbiter = PointerArbiter::new();
    let shared = arbiter.clone();
    assert!(arbiter.try_claim(7));
    assert!(arbiter.try_claim(7));
    assert!(!shared.try_claim(8));
    shared.release(8);
    assert_eq!(arbiter.claimed(), Some(7));
    shared.release(7);
    assert_eq!(arbiter.claimed(), None);
    assert!(shared.try_claim(8));
    assert!(arbiter.holds(8));
}

#[test]
fn config_reads_attributes_and_falls_back_on_bad_values() {
    let attrs = [
        ("zoom-size", "60"),
        ("intensity", "abc"),
        ("ambient-offset", "0.25"),
        ("debug", ""),
        ("enlarge", "false"),
    ];
    let cfg = CardConfig::from_lookup(|name| {
        attrs
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.to_string())
    });
    assert_eq!(cfg.zoom_size, 60.0);
    assert_eq!(cfg.intensity, DEFAULT_INTENSITY);
    assert_eq!(cfg.ambient_offset, Some(0.25));
    assert!(cfg.debug);
    assert!(!cfg.enlarge);

    let cfg = CardConfig::from_lookup(|name| (name == "ambient-offset").then(|| "-3".to_string()));
    assert!(!cfg.ambient_enabled());

    assert_eq!(
        parse_flag("debug", "maybe"),
        Err(CardError::InvalidOption {
            name: "debug",
            value: "maybe".to_string()
        })
    );
    assert!(parse_number("intensity", "NaN").is_err());
}
