//! Maps pointer, layout and visibility signals onto the simulation.
//!
//! Every handler mutates state synchronously; the effect shows up on the next
//! scheduled tick.

use crate::card::{Card, Extension};
use crate::constants::RESET_DELAY_MS;
use crate::state::ViewportGeometry;
use crate::surface::{Commands, Rect, SurfaceCommand};
use glam::{DVec2, DVec3};
use smallvec::smallvec;

impl<X: Extension> Card<X> {
    pub fn pointer_enter(&mut self) -> Commands {
        self.sim.pointer_controlled = true;
        if let Err(e) = self.sim.set_zoom(self.config.zoom_size) {
            log::debug!("[pointer] zoom rejected: {e}");
        }
        if !self.sim.ambient() {
            self.start();
        }
        smallvec![SurfaceCommand::Hover(true)]
    }

    /// Pointer position in viewport coordinates. Ignored unless the card is
    /// pointer-controlled.
    pub fn pointer_move(&mut self, pointer: DVec2) {
        if !self.sim.pointer_controlled {
            return;
        }
        if pointer.is_nan() {
            log::debug!("[pointer] ignoring NaN position");
            return;
        }
        let offset = pointer - self.sim.geometry().axis;
        let z = self.sim.look_target().z;
        self.sim.put_look_target(DVec3::new(offset.x, offset.y, z));
    }

    pub fn pointer_leave(&mut self) -> Commands {
        self.sim.pointer_controlled = false;
        if let Err(e) = self.sim.set_zoom(0.0) {
            log::debug!("[pointer] zoom rejected: {e}");
        }
        let mut out: Commands = smallvec![SurfaceCommand::Hover(false)];
        if !self.sim.ambient() {
            self.stop();
            out.push(SurfaceCommand::ScheduleReset {
                delay_ms: RESET_DELAY_MS,
            });
        }
        out
    }

    /// Called when a scheduled reset comes due. The reset only applies if
    /// nothing brought the card back to life in the meantime.
    pub fn resolve_reset(&mut self) -> Option<SurfaceCommand> {
        (!self.sim.pointer_controlled && !self.sim.playing()).then_some(SurfaceCommand::Reset)
    }

    /// Debounced layout change.
    pub fn geometry_changed(&mut self, rect: Rect) {
        let geometry = ViewportGeometry::from_rect(rect);
        log::debug!(
            "[geometry] pos=({:.1},{:.1}) size=({:.1},{:.1})",
            geometry.position.x,
            geometry.position.y,
            geometry.size.x,
            geometry.size.y
        );
        self.sim.set_geometry(geometry);
    }

    pub fn visibility_changed(&mut self, visible: bool) {
        self.sim.visible = visible;
        if !self.sim.ambient() {
            return;
        }
        if visible {
            self.start();
        } else {
            self.stop();
        }
    }
}
