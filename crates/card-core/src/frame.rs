//! Per-frame update of the simulation.
//!
//! A tick is split into the steps below so the enlarge extension can run
//! between the ambient drive and the damping pass:
//!
//! 1. [`Simulation::advance_clock`]: clamp the frame step, accumulate phase
//! 2. [`Simulation::drive_ambient`]: steer the look target along the idle path
//! 3. [`Simulation::settle`]: damp zoom depth and look point toward targets
//! 4. [`Simulation::render`]: look-at matrix and highlight gradient

use crate::constants::*;
use crate::math::target_to;
use crate::state::Simulation;
use crate::surface::Gradient;
use glam::{DMat4, DVec3};
use std::cell::Cell;
use std::rc::Rc;

/// "Next tick" capability handed to a card.
///
/// Implementations schedule exactly one callback per request; the card makes
/// sure it never has more than one outstanding.
pub trait FrameScheduler {
    fn request_frame(&mut self);
    /// Drop an outstanding request, if the platform allows it.
    fn cancel(&mut self) {}
}

/// Scheduler that only counts requests. The caller drives ticks with
/// synthetic timestamps.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    requested: Rc<Cell<usize>>,
    cancelled: Rc<Cell<usize>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn requested(&self) -> usize {
        self.requested.get()
    }
    pub fn cancelled(&self) -> usize {
        self.cancelled.get()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.requested.set(self.requested.get() + 1);
    }
    fn cancel(&mut self) {
        self.cancelled.set(self.cancelled.get() + 1);
    }
}

/// Frame step for a tick at `now`, clamped to `[MIN_FRAME_TIME, MAX_FRAME_TIME]`.
pub fn frame_time(previous: Option<f64>, now: f64) -> f64 {
    match previous {
        Some(prev) => {
            let step = now - prev;
            if step.is_nan() {
                MIN_FRAME_TIME
            } else {
                step.clamp(MIN_FRAME_TIME, MAX_FRAME_TIME)
            }
        }
        None => MIN_FRAME_TIME,
    }
}

/// Closed-form idle path of the look target for a given accumulated phase.
pub fn ambient_look_target(ambient_phase: f64, offset: f64, intensity: f64, z: f64) -> DVec3 {
    let phase = ambient_phase * AMBIENT_PHASE_SCALE + offset;
    let radius = intensity * AMBIENT_RADIUS_PER_INTENSITY;
    let l = radius * (phase * AMBIENT_MOD_FREQUENCY + AMBIENT_MOD_OFFSET).cos();
    DVec3::new(
        (phase * AMBIENT_X_FREQUENCY).cos() * l,
        (phase * AMBIENT_Y_FREQUENCY).sin() * l,
        z,
    )
}

impl Simulation {
    pub fn advance_clock(&mut self, timestamp: f64) {
        if timestamp.is_nan() {
            return;
        }
        self.last_frame_time = frame_time(self.previous_timestamp, timestamp);
        self.previous_timestamp = Some(timestamp);
        if self.playing {
            self.ambient_phase += self.last_frame_time;
        }
    }

    pub fn drive_ambient(&mut self) {
        if self.pointer_controlled {
            return;
        }
        let target = ambient_look_target(
            self.ambient_phase,
            self.ambient_offset(),
            self.intensity(),
            self.look_target().z,
        );
        self.put_look_target(target);
    }

    pub fn settle(&mut self) {
        let factor = DAMPING_NUMERATOR / self.last_frame_time;

        let z = self.center().z;
        let dz = self.zoom() - z;
        if dz.abs() > ZOOM_EPSILON {
            self.put_center_z(z + dz * factor);
        } else {
            self.put_center_z(self.zoom());
        }

        if self.look_differential() > LOOK_DIFFERENTIAL_THRESHOLD {
            let look = self.look_point();
            self.put_look_point(look + (self.look_target() - look) * factor);
        }
    }

    pub fn render(&self) -> (DMat4, Gradient) {
        let look = self.look_point();
        let matrix = target_to(self.center(), look, WORLD_UP);
        (matrix, Gradient::from_look_point(look))
    }
}
