//! Penner-style easing over `(time, start, delta, duration)`.

use std::f64::consts::PI;

#[inline]
pub fn ease_in_out_cubic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let mut t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t * t + b;
    }
    t -= 2.0;
    c / 2.0 * (t * t * t + 2.0) + b
}

#[inline]
pub fn ease_in_out_sine(t: f64, b: f64, c: f64, d: f64) -> f64 {
    -c / 2.0 * ((PI * t / d).cos() - 1.0) + b
}
