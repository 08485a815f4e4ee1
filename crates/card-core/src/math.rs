//! Vector helpers and the look-at constructor used to tilt the card.
//!
//! Everything here is stateless. The look-at follows the "target to"
//! convention: the resulting matrix places an object at `eye` oriented so its
//! +Z axis points away from `target`, which is what a CSS `matrix3d` on the
//! transformer element needs.

use crate::error::{CardError, Result};
use glam::{DMat4, DVec3, DVec4};

/// Read a point from untyped input. Extra components are ignored.
pub fn point3(value: &[f64]) -> Result<DVec3> {
    if value.len() < 3 {
        return Err(CardError::InvalidPoint(value.len()));
    }
    if value[..3].iter().any(|c| c.is_nan()) {
        return Err(CardError::NonFinite("point component"));
    }
    Ok(DVec3::new(value[0], value[1], value[2]))
}

/// Normalize `v`, leaving zero-length vectors untouched.
#[inline]
pub fn normalize_or_keep(v: DVec3) -> DVec3 {
    let l = v.length_squared();
    if l > 0.0 {
        v * (1.0 / l.sqrt())
    } else {
        v
    }
}

/// Build the world matrix that makes something at `eye` look at `target`.
///
/// Columns are `[right, 0]`, `[up, 0]`, `[forward, 0]`, `[eye, 1]`. Degenerate
/// inputs (eye == target, or up parallel to forward) produce zero axes rather
/// than NaNs.
pub fn target_to(eye: DVec3, target: DVec3, up: DVec3) -> DMat4 {
    let forward = normalize_or_keep(eye - target);
    let right = normalize_or_keep(up.cross(forward));
    let true_up = forward.cross(right);
    DMat4::from_cols(
        right.extend(0.0),
        true_up.extend(0.0),
        forward.extend(0.0),
        DVec4::new(eye.x, eye.y, eye.z, 1.0),
    )
}

/// Untyped variant of [`target_to`]; `None` when any input is not a triple.
pub fn look_at(eye: &[f64], target: &[f64], up: &[f64]) -> Option<DMat4> {
    let eye = point3(eye).ok()?;
    let target = point3(target).ok()?;
    let up = point3(up).ok()?;
    Some(target_to(eye, target, up))
}

/// Serialize as a CSS `matrix3d(...)` in column-major order.
pub fn matrix3d_css(m: &DMat4) -> String {
    let parts: Vec<String> = m.to_cols_array().iter().map(|v| v.to_string()).collect();
    format!("matrix3d({})", parts.join(","))
}

/// Squared distance between two points.
#[inline]
pub fn distance_squared(a: DVec3, b: DVec3) -> f64 {
    (a - b).length_squared()
}
