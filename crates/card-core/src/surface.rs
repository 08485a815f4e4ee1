//! What the engine asks of the rendered surface.
//!
//! The engine never touches a DOM; every tick and every interaction returns a
//! small batch of [`SurfaceCommand`]s that a front-end applies in order.

use crate::constants::{SHINE_MIN_OPACITY, SHINE_OPACITY_PER_UNIT};
use glam::{DMat4, DVec2, DVec3};
use smallvec::SmallVec;
use std::f64::consts::FRAC_PI_2;

pub type Commands = SmallVec<[SurfaceCommand; 4]>;

/// Layout rectangle in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.left, self.top)
    }
    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }
    pub fn center(&self) -> DVec2 {
        self.position() + self.size() * 0.5
    }
}

/// Two-stop highlight described in polar form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gradient {
    /// Radians, CSS `linear-gradient` convention.
    pub angle: f64,
    pub opacity: f64,
}

impl Gradient {
    /// Derive the highlight from the current look point.
    pub fn from_look_point(look: DVec3) -> Self {
        let angle = look.y.atan2(look.x) + FRAC_PI_2;
        let len = look.x.hypot(look.y);
        Self {
            angle,
            opacity: (len * SHINE_OPACITY_PER_UNIT).abs().max(SHINE_MIN_OPACITY),
        }
    }

    pub fn css(&self) -> String {
        format!(
            "linear-gradient({}rad, rgba(255,255,255,{o}) 0%, rgba(255,255,255,{o}) 5%, rgba(255,255,255,0) 80%)",
            self.angle,
            o = self.opacity
        )
    }
}

/// Explicit on-screen placement used while a card is enlarged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Top-left corner in viewport coordinates.
    pub position: DVec2,
    /// Unscaled layout size of the card.
    pub size: DVec2,
    /// Scale applied about the top-left corner.
    pub scale: f64,
}

/// Lifecycle notifications fired when a tween settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Enlarged,
    Collapsed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCommand {
    /// Per-frame transform and highlight.
    Render { matrix: DMat4, gradient: Gradient },
    /// Identity transform, highlight cleared.
    Reset,
    /// Ask the front-end to call back after `delay_ms` to resolve a reset.
    ScheduleReset { delay_ms: f64 },
    Hover(bool),
    Place(Placement),
    ClearPlacement,
    LockScroll,
    UnlockScroll,
    InsertBackdrop,
    RemoveBackdrop,
    /// Attach (`true`) or detach the 3D depth styling on the transformer.
    Depth(bool),
    Notify(Lifecycle),
}
