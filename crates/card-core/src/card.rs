//! A single perspective card: simulation + scheduler + optional extension.

use crate::config::CardConfig;
use crate::frame::FrameScheduler;
use crate::state::Simulation;
use crate::surface::{Commands, SurfaceCommand};
use smallvec::smallvec;

/// Hook into the per-frame update.
///
/// `on_frame` runs after the ambient drive and before damping, so anything it
/// writes to the look target is honored in the same tick.
pub trait Extension {
    fn on_frame(&mut self, sim: &mut Simulation, timestamp: f64, out: &mut Commands);

    /// Keep requesting frames even when the simulation is not playing.
    fn is_animating(&self) -> bool {
        false
    }

    /// Undo any surface state the extension owns when the card is torn down.
    fn on_destroy(&mut self, _sim: &mut Simulation, _out: &mut Commands) {}
}

/// The plain tilt card: no extra behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct Plain;

impl Extension for Plain {
    fn on_frame(&mut self, _sim: &mut Simulation, _timestamp: f64, _out: &mut Commands) {}
}

pub struct Card<X: Extension = Plain> {
    pub(crate) sim: Simulation,
    pub(crate) config: CardConfig,
    pub(crate) ext: X,
    scheduler: Box<dyn FrameScheduler>,
}

impl Card<Plain> {
    pub fn new(config: CardConfig, scheduler: Box<dyn FrameScheduler>) -> Self {
        Self::with_extension(config, Plain, scheduler)
    }
}

impl<X: Extension> Card<X> {
    pub fn with_extension(config: CardConfig, ext: X, scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            sim: Simulation::new(&config),
            config,
            ext,
            scheduler,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }
    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }
    pub fn config(&self) -> &CardConfig {
        &self.config
    }
    pub fn extension(&self) -> &X {
        &self.ext
    }

    /// Start playing and schedule the first frame.
    pub fn start(&mut self) {
        if self.sim.resume() {
            log::debug!("[card] start");
            self.request_frame();
        }
    }

    /// Stop playing. An already requested frame still runs once but does not
    /// reschedule.
    pub fn stop(&mut self) {
        if self.sim.playing() {
            log::debug!("[card] stop");
        }
        self.sim.halt();
    }

    fn request_frame(&mut self) {
        if self.sim.frame_pending {
            return;
        }
        self.sim.frame_pending = true;
        self.scheduler.request_frame();
    }

    /// Advance one frame at `timestamp` (milliseconds, monotonic).
    pub fn tick(&mut self, timestamp: f64) -> Commands {
        self.sim.frame_pending = false;
        let mut out = Commands::new();

        self.sim.advance_clock(timestamp);
        self.sim.drive_ambient();
        self.ext.on_frame(&mut self.sim, timestamp, &mut out);
        self.sim.settle();

        let (matrix, gradient) = self.sim.render();
        log::trace!(
            "[frame] dt={} look=({:.2},{:.2},{:.2}) z={:.3}",
            self.sim.last_frame_time(),
            self.sim.look_point().x,
            self.sim.look_point().y,
            self.sim.look_point().z,
            self.sim.center().z
        );
        out.push(SurfaceCommand::Render { matrix, gradient });

        if self.sim.playing() || self.ext.is_animating() {
            self.request_frame();
        }
        out
    }

    /// Tear down: cancel any pending frame and stop.
    pub fn destroy(&mut self) -> Commands {
        if self.sim.frame_pending {
            self.scheduler.cancel();
            self.sim.frame_pending = false;
        }
        self.sim.halt();
        let mut out: Commands = smallvec![SurfaceCommand::Reset];
        self.ext.on_destroy(&mut self.sim, &mut out);
        out
    }
}
