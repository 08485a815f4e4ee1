//! Platform-free engine behind the perspective card.
//!
//! A [`Card`] owns a [`Simulation`] of a few 3D points and a zoom depth,
//! advances it once per display frame and answers with [`SurfaceCommand`]s.
//! Front-ends supply the clock (through [`FrameScheduler`] and tick
//! timestamps) and apply the commands to whatever they render on.

pub mod arbiter;
pub mod card;
pub mod config;
pub mod constants;
pub mod debounce;
pub mod easing;
pub mod error;
pub mod frame;
pub mod interaction;
pub mod math;
pub mod state;
pub mod surface;
pub mod tween;

pub use arbiter::*;
pub use card::*;
pub use config::*;
pub use constants::*;
pub use debounce::*;
pub use easing::*;
pub use error::CardError;
pub use frame::*;
pub use math::*;
pub use state::*;
pub use surface::*;
pub use tween::*;
