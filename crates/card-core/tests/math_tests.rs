// Host-side tests for the look-at construction, vector helpers and easing.

use card_core::*;
use glam::{DMat4, DVec3};

fn columns(m: &DMat4) -> [DVec3; 3] {
    [
        m.x_axis.truncate(),
        m.y_axis.truncate(),
        m.z_axis.truncate(),
    ]
}

#[test]
fn target_to_rotation_is_orthonormal() {
    let cases = [
        (DVec3::new(0.0, 0.0, 40.0), DVec3::new(120.0, -35.0, -800.0)),
        (DVec3::new(0.0, 0.0, 0.0), DVec3::new(0.0, 0.0, -800.0)),
        (DVec3::new(3.0, -2.0, 9.0), DVec3::new(-400.0, 250.0, -10.0)),
    ];
    for (eye, target) in cases {
        let m = target_to(eye, target, WORLD_UP);
        let [r, u, f] = columns(&m);
        for axis in [r, u, f] {
            assert!((axis.length() - 1.0).abs() < 1e-9, "axis not unit: {axis:?}");
        }
        assert!(r.dot(u).abs() < 1e-9);
        assert!(r.dot(f).abs() < 1e-9);
        assert!(u.dot(f).abs() < 1e-9);
    }
}

#[test]
fn target_to_translation_is_eye_and_w_row_is_homogeneous() {
    let eye = DVec3::new(4.0, 5.0, 40.0);
    let m = target_to(eye, DVec3::new(10.0, 20.0, -800.0), WORLD_UP);
    let a = m.to_cols_array();
    assert_eq!(a[3], 0.0);
    assert_eq!(a[7], 0.0);
    assert_eq!(a[11], 0.0);
    assert_eq!([a[12], a[13], a[14], a[15]], [4.0, 5.0, 40.0, 1.0]);
}

#[test]
fn resting_card_faces_the_viewer() {
    // Looking straight down -Z from the origin yields the identity rotation.
    let m = target_to(DEFAULT_CENTER, DEFAULT_LOOK, WORLD_UP);
    assert!(m.abs_diff_eq(DMat4::IDENTITY, 1e-12));
}

#[test]
fn degenerate_inputs_skip_normalization_instead_of_nan() {
    // eye == target: forward is zero, so every derived axis is zero too
    let p = DVec3::new(1.0, 2.0, 3.0);
    let m = target_to(p, p, WORLD_UP);
    assert!(!m.is_nan());
    let [r, u, f] = columns(&m);
    assert_eq!(f, DVec3::ZERO);
    assert_eq!(r, DVec3::ZERO);
    assert_eq!(u, DVec3::ZERO);

    // up parallel to forward: right collapses to zero but forward survives
    let m = target_to(DVec3::ZERO, DVec3::new(0.0, -10.0, 0.0), WORLD_UP);
    assert!(!m.is_nan());
    let [r, _, f] = columns(&m);
    assert_eq!(r, DVec3::ZERO);
    assert!((f - DVec3::Y).length() < 1e-12);
}

#[test]
fn look_at_rejects_short_or_nan_triples() {
    assert!(look_at(&[0.0, 0.0], &[0.0, 0.0, -800.0], &[0.0, 1.0, 0.0]).is_none());
    assert!(look_at(&[0.0, 0.0, 0.0], &[0.0, f64::NAN, -800.0], &[0.0, 1.0, 0.0]).is_none());
    assert!(look_at(&[0.0, 0.0, 0.0], &[0.0, 0.0, -800.0], &[]).is_none());
    // extra components are ignored
    let m = look_at(&[0.0, 0.0, 0.0, 9.0], &[0.0, 0.0, -800.0], &[0.0, 1.0, 0.0]);
    assert!(m.is_some());
}

#[test]
fn point3_reports_arity() {
    assert_eq!(point3(&[1.0]), Err(CardError::InvalidPoint(1)));
    assert_eq!(point3(&[1.0, 2.0, 3.0]), Ok(DVec3::new(1.0, 2.0, 3.0)));
}

#[test]
fn matrix3d_css_lists_sixteen_values_column_major() {
    let css = matrix3d_css(&DMat4::IDENTITY);
    assert_eq!(css, "matrix3d(1,0,0,0,0,1,0,0,0,0,1,0,0,0,0,1)");
}

#[test]
fn cubic_ease_hits_endpoints_and_is_continuous_at_midpoint() {
    let (b, c, d) = (10.0, 90.0, 1500.0);
    assert_eq!(ease_in_out_cubic(0.0, b, c, d), b);
    assert!((ease_in_out_cubic(d, b, c, d) - (b + c)).abs() < 1e-9);
    let mid = ease_in_out_cubic(d / 2.0, b, c, d);
    assert!((mid - (b + c / 2.0)).abs() < 1e-9);
    let before = ease_in_out_cubic(d / 2.0 - 1e-6, b, c, d);
    let after = ease_in_out_cubic(d / 2.0 + 1e-6, b, c, d);
    assert!((before - mid).abs() < 1e-6);
    assert!((after - mid).abs() < 1e-6);
}

#[test]
fn eases_are_monotonic_for_positive_delta() {
    let mut prev_cubic = f64::NEG_INFINITY;
    let mut prev_sine = f64::NEG_INFINITY;
    for i in 0..=100 {
        let t = i as f64 * 10.0;
        let cubic = ease_in_out_cubic(t, 0.0, 1.0, 1000.0);
        let sine = ease_in_out_sine(t, 0.0, 1.0, 1000.0);
        assert!(cubic >= prev_cubic);
        assert!(sine >= prev_sine);
        prev_cubic = cubic;
        prev_sine = sine;
    }
    assert!((ease_in_out_sine(1000.0, 0.0, 1.0, 1000.0) - 1.0).abs() < 1e-12);
    assert!((ease_in_out_sine(500.0, 0.0, 1.0, 1000.0) - 0.5).abs() < 1e-12);
}

#[test]
fn gradient_follows_look_point_polar_form() {
    let g = Gradient::from_look_point(DVec3::new(300.0, 400.0, -800.0));
    assert!((g.angle - (400.0f64.atan2(300.0) + std::f64::consts::FRAC_PI_2)).abs() < 1e-12);
    assert!((g.opacity - 1.0).abs() < 1e-12); // 500 * 0.002

    // at rest the opacity floors at 0.01
    let g = Gradient::from_look_point(DEFAULT_LOOK);
    assert_eq!(g.opacity, SHINE_MIN_OPACITY);
    assert!(g.css().starts_with("linear-gradient("));
    assert!(g.css().contains("rgba(255,255,255,0) 80%"));
}
