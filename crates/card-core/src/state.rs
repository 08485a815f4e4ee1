//! Owned simulation state for a single card.
//!
//! Points coming from untyped input go through the validated setters, which
//! keep the previous value on rejection. The look differential is refreshed on
//! every change to either look point so the frame driver can test convergence
//! cheaply.

use crate::config::CardConfig;
use crate::constants::{DEFAULT_CENTER, DEFAULT_LOOK, MIN_FRAME_TIME};
use crate::error::{CardError, Result};
use crate::math::{distance_squared, point3};
use crate::surface::Rect;
use glam::{DVec2, DVec3};

/// Card placement in viewport coordinates, refreshed on resize/scroll.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportGeometry {
    pub position: DVec2,
    pub size: DVec2,
    /// Geometric center; pointer offsets are measured from here.
    pub axis: DVec2,
}

impl ViewportGeometry {
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            position: rect.position(),
            size: rect.size(),
            axis: rect.center(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Simulation {
    center: DVec3,
    look_target: DVec3,
    look_point: DVec3,
    zoom: f64,
    look_differential: f64,
    pub(crate) pointer_controlled: bool,
    pub(crate) ambient_phase: f64,
    pub(crate) last_frame_time: f64,
    pub(crate) previous_timestamp: Option<f64>,
    pub(crate) playing: bool,
    pub(crate) frame_pending: bool,
    ambient: bool,
    ambient_offset: f64,
    intensity: f64,
    pub(crate) visible: bool,
    geometry: ViewportGeometry,
}

impl Simulation {
    pub fn new(config: &CardConfig) -> Self {
        Self {
            center: DEFAULT_CENTER,
            look_target: DEFAULT_LOOK,
            look_point: DEFAULT_LOOK,
            zoom: 0.0,
            look_differential: 0.0,
            pointer_controlled: false,
            ambient_phase: 0.0,
            last_frame_time: MIN_FRAME_TIME,
            previous_timestamp: None,
            playing: false,
            frame_pending: false,
            ambient: config.ambient_enabled(),
            ambient_offset: config.ambient_offset.unwrap_or(0.0),
            intensity: config.intensity,
            visible: false,
            geometry: ViewportGeometry::default(),
        }
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }
    pub fn look_target(&self) -> DVec3 {
        self.look_target
    }
    pub fn look_point(&self) -> DVec3 {
        self.look_point
    }
    pub fn zoom(&self) -> f64 {
        self.zoom
    }
    pub fn look_differential(&self) -> f64 {
        self.look_differential
    }
    pub fn pointer_controlled(&self) -> bool {
        self.pointer_controlled
    }
    pub fn ambient_phase(&self) -> f64 {
        self.ambient_phase
    }
    pub fn last_frame_time(&self) -> f64 {
        self.last_frame_time
    }
    pub fn playing(&self) -> bool {
        self.playing
    }
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }
    pub fn ambient(&self) -> bool {
        self.ambient
    }
    pub fn ambient_offset(&self) -> f64 {
        self.ambient_offset
    }
    pub fn intensity(&self) -> f64 {
        self.intensity
    }
    pub fn visible(&self) -> bool {
        self.visible
    }
    pub fn geometry(&self) -> ViewportGeometry {
        self.geometry
    }

    pub fn set_center(&mut self, value: &[f64]) -> Result<()> {
        self.center = point3(value)?;
        Ok(())
    }

    pub fn set_look_target(&mut self, value: &[f64]) -> Result<()> {
        let p = point3(value)?;
        self.put_look_target(p);
        Ok(())
    }

    pub fn set_look_point(&mut self, value: &[f64]) -> Result<()> {
        let p = point3(value)?;
        self.put_look_point(p);
        Ok(())
    }

    pub fn set_zoom(&mut self, value: f64) -> Result<()> {
        if value.is_nan() {
            return Err(CardError::NonFinite("zoom"));
        }
        self.zoom = value;
        Ok(())
    }

    pub fn set_geometry(&mut self, geometry: ViewportGeometry) {
        self.geometry = geometry;
    }

    /// Toggle ambient mode without touching playback.
    pub fn set_ambient(&mut self, ambient: bool) {
        self.ambient = ambient;
    }

    pub(crate) fn put_look_target(&mut self, p: DVec3) {
        if p.is_nan() {
            return;
        }
        self.look_target = p;
        self.refresh_look_differential();
    }

    pub(crate) fn put_look_point(&mut self, p: DVec3) {
        if p.is_nan() {
            return;
        }
        self.look_point = p;
        self.refresh_look_differential();
    }

    pub(crate) fn put_center_z(&mut self, z: f64) {
        if !z.is_nan() {
            self.center.z = z;
        }
    }

    fn refresh_look_differential(&mut self) {
        self.look_differential = distance_squared(self.look_point, self.look_target);
    }

    /// Enter the playing state. Returns `true` on an actual transition, in
    /// which case the frame clock restarts.
    pub(crate) fn resume(&mut self) -> bool {
        if self.playing {
            return false;
        }
        self.playing = true;
        self.previous_timestamp = None;
        true
    }

    pub(crate) fn halt(&mut self) {
        self.playing = false;
    }
}
