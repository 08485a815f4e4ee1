//! Enlarge/collapse overlay.
//!
//! `Enlarge` plugs into the card's frame hook. While a [`TweenSession`] is
//! active it eases the card's on-screen placement and sweeps the look target
//! through a half-turn so the card appears to flip on its way into (or out
//! of) the centered presentation.
//!
//! ```text
//! Idle --toggle--> Enlarging --done--> Enlarged --toggle--> Collapsing --done--> Idle
//! ```

use crate::arbiter::PointerArbiter;
use crate::card::{Card, Extension};
use crate::config::CardConfig;
use crate::constants::*;
use crate::easing::{ease_in_out_cubic, ease_in_out_sine};
use crate::frame::FrameScheduler;
use crate::state::Simulation;
use crate::surface::{Commands, Lifecycle, Placement, Rect, SurfaceCommand};
use glam::{DVec2, DVec3};
use std::f64::consts::{FRAC_PI_2, TAU};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TweenPhase {
    #[default]
    Idle,
    Enlarging,
    Enlarged,
    Collapsing,
}

/// What settles when a session finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Enlarged,
    Collapsed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TweenSession {
    pub elapsed: f64,
    pub duration: f64,
    pub start_position: DVec2,
    pub target_position: DVec2,
    pub start_scale: f64,
    pub target_scale: f64,
    /// Signed radians swept by the look rotation.
    pub rotation_amount: f64,
    /// Taken exactly once when the session finishes.
    pub on_complete: Option<Completion>,
}

impl TweenSession {
    pub fn position(&self) -> DVec2 {
        let delta = self.target_position - self.start_position;
        DVec2::new(
            ease_in_out_cubic(self.elapsed, self.start_position.x, delta.x, self.duration),
            ease_in_out_cubic(self.elapsed, self.start_position.y, delta.y, self.duration),
        )
    }

    pub fn scale(&self) -> f64 {
        ease_in_out_cubic(
            self.elapsed,
            self.start_scale,
            self.target_scale - self.start_scale,
            self.duration,
        )
    }

    /// Current look rotation in radians.
    pub fn rotation(&self) -> f64 {
        ease_in_out_sine(self.elapsed, FRAC_PI_2, self.rotation_amount, self.duration)
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Which viewport dimension limits the presentation scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    Width,
    Height,
}

/// Largest scale that keeps the card within `ENLARGE_VIEWPORT_FILL` of the
/// viewport while preserving its aspect ratio.
pub fn presentation_scale(card: DVec2, viewport: DVec2) -> (f64, Binding) {
    if card.x <= 0.0 || card.y <= 0.0 || viewport.y <= 0.0 {
        return (1.0, Binding::Height);
    }
    let screen_aspect = viewport.x / viewport.y;
    let card_aspect = card.x / card.y;
    if card_aspect > screen_aspect {
        (ENLARGE_VIEWPORT_FILL * viewport.x / card.x, Binding::Width)
    } else {
        (ENLARGE_VIEWPORT_FILL * viewport.y / card.y, Binding::Height)
    }
}

/// Card rectangle plus viewport size, sampled when a toggle happens.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub card: Rect,
    pub viewport: DVec2,
}

#[derive(Clone, Debug)]
pub struct Enlarge {
    phase: TweenPhase,
    session: Option<TweenSession>,
    size: DVec2,
    inline_position: DVec2,
    presented_position: DVec2,
    current_position: DVec2,
    current_scale: f64,
    cooldown_until: f64,
    prior_ambient: Option<bool>,
    arbiter: PointerArbiter,
    touched: Option<i32>,
}

impl Enlarge {
    pub fn new(arbiter: PointerArbiter) -> Self {
        Self {
            phase: TweenPhase::Idle,
            session: None,
            size: DVec2::ZERO,
            inline_position: DVec2::ZERO,
            presented_position: DVec2::ZERO,
            current_position: DVec2::ZERO,
            current_scale: 1.0,
            cooldown_until: f64::NEG_INFINITY,
            prior_ambient: None,
            arbiter,
            touched: None,
        }
    }

    pub fn phase(&self) -> TweenPhase {
        self.phase
    }
    pub fn is_enlarged(&self) -> bool {
        matches!(self.phase, TweenPhase::Enlarging | TweenPhase::Enlarged)
    }
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }
    pub fn session(&self) -> Option<&TweenSession> {
        self.session.as_ref()
    }
    pub fn current_position(&self) -> DVec2 {
        self.current_position
    }
    pub fn current_scale(&self) -> f64 {
        self.current_scale
    }
    pub fn cooldown_until(&self) -> f64 {
        self.cooldown_until
    }
    pub fn arbiter(&self) -> &PointerArbiter {
        &self.arbiter
    }

    /// Install a session unless one is already running.
    pub fn start_tween(&mut self, session: TweenSession) -> bool {
        if self.session.is_some() {
            log::debug!("[tween] session already active; ignoring");
            return false;
        }
        self.session = Some(session);
        true
    }

    fn placement(&self) -> Placement {
        Placement {
            position: self.current_position,
            size: self.size,
            scale: self.current_scale,
        }
    }

    fn complete(
        &mut self,
        completion: Completion,
        sim: &mut Simulation,
        timestamp: f64,
        out: &mut Commands,
    ) {
        if timestamp.is_finite() {
            self.cooldown_until = self.cooldown_until.max(timestamp + TOGGLE_COOLDOWN_MS);
        }
        match completion {
            Completion::Enlarged => {
                self.phase = TweenPhase::Enlarged;
                log::info!("[tween] enlarged");
                out.push(SurfaceCommand::Depth(false));
                out.push(SurfaceCommand::Notify(Lifecycle::Enlarged));
            }
            Completion::Collapsed => {
                self.phase = TweenPhase::Idle;
                log::info!("[tween] collapsed");
                out.push(SurfaceCommand::RemoveBackdrop);
                out.push(SurfaceCommand::UnlockScroll);
                out.push(SurfaceCommand::ClearPlacement);
                if let Some(ambient) = self.prior_ambient.take() {
                    sim.set_ambient(ambient);
                }
                let idles_on = sim.ambient() && sim.visible();
                if !sim.pointer_controlled() && !idles_on {
                    sim.halt();
                    out.push(SurfaceCommand::ScheduleReset {
                        delay_ms: RESET_DELAY_MS,
                    });
                }
                out.push(SurfaceCommand::Notify(Lifecycle::Collapsed));
            }
        }
    }
}

impl Extension for Enlarge {
    fn on_frame(&mut self, sim: &mut Simulation, timestamp: f64, out: &mut Commands) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.elapsed = (session.elapsed + sim.last_frame_time()).min(session.duration);

        let r = session.rotation();
        let y = sim.look_target().y;
        sim.put_look_target(DVec3::new(
            r.cos() * FLIP_LOOK_DISTANCE,
            y,
            r.sin() * FLIP_LOOK_DISTANCE,
        ));

        if session.finished() {
            self.current_position = session.target_position;
            self.current_scale = session.target_scale;
        } else {
            self.current_position = session.position();
            self.current_scale = session.scale();
        }
        out.push(SurfaceCommand::Place(self.placement()));

        if self.session.as_ref().is_some_and(TweenSession::finished) {
            let completion = self.session.take().and_then(|mut s| s.on_complete.take());
            if let Some(completion) = completion {
                self.complete(completion, sim, timestamp, out);
            }
        }
    }

    fn is_animating(&self) -> bool {
        self.session.is_some()
    }

    fn on_destroy(&mut self, sim: &mut Simulation, out: &mut Commands) {
        if let Some(id) = self.touched.take() {
            self.arbiter.release(id);
        }
        self.session = None;
        if self.phase != TweenPhase::Idle {
            self.phase = TweenPhase::Idle;
            out.push(SurfaceCommand::RemoveBackdrop);
            out.push(SurfaceCommand::UnlockScroll);
            out.push(SurfaceCommand::ClearPlacement);
            out.push(SurfaceCommand::Depth(true));
        }
        if let Some(ambient) = self.prior_ambient.take() {
            sim.set_ambient(ambient);
        }
    }
}

impl Card<Enlarge> {
    pub fn enlargeable(
        config: CardConfig,
        arbiter: PointerArbiter,
        scheduler: Box<dyn FrameScheduler>,
    ) -> Self {
        Self::with_extension(config, Enlarge::new(arbiter), scheduler)
    }

    pub fn tween_phase(&self) -> TweenPhase {
        self.ext.phase()
    }

    pub fn is_enlarged(&self) -> bool {
        self.ext.is_enlarged()
    }

    /// Flip between the inline and enlarged presentations.
    ///
    /// Ignored while a tween runs and during the cooldown that follows each
    /// toggle and each completed tween.
    pub fn toggle_enlarged(&mut self, now: f64, layout: Layout) -> Commands {
        if now.is_nan() {
            return Commands::new();
        }
        if self.ext.is_active() {
            log::debug!("[tween] toggle ignored: tween in progress");
            return Commands::new();
        }
        if now < self.ext.cooldown_until {
            log::debug!("[tween] toggle ignored: cooling down");
            return Commands::new();
        }
        let out = match self.ext.phase {
            TweenPhase::Idle => self.begin_enlarge(layout),
            TweenPhase::Enlarged => self.begin_collapse(),
            TweenPhase::Enlarging | TweenPhase::Collapsing => Commands::new(),
        };
        if !out.is_empty() {
            self.ext.cooldown_until = now + TOGGLE_COOLDOWN_MS;
        }
        out
    }

    fn begin_enlarge(&mut self, layout: Layout) -> Commands {
        let size = layout.card.size();
        let start = layout.card.position();
        let (scale, binding) = presentation_scale(size, layout.viewport);
        let target = (layout.viewport - size * scale) * 0.5;
        let session = TweenSession {
            elapsed: 0.0,
            duration: ENLARGE_DURATION_MS,
            start_position: start,
            target_position: target,
            start_scale: 1.0,
            target_scale: scale,
            rotation_amount: -TAU,
            on_complete: Some(Completion::Enlarged),
        };
        if !self.ext.start_tween(session) {
            return Commands::new();
        }
        log::info!("[tween] enlarging to scale {scale:.3} ({binding:?}-bound)");

        let ext = &mut self.ext;
        ext.phase = TweenPhase::Enlarging;
        ext.size = size;
        ext.inline_position = start;
        ext.presented_position = target;
        ext.current_position = start;
        ext.current_scale = 1.0;
        ext.prior_ambient = Some(self.sim.ambient());
        self.sim.set_ambient(true);
        self.start();

        let mut out = Commands::new();
        out.push(SurfaceCommand::LockScroll);
        out.push(SurfaceCommand::InsertBackdrop);
        out.push(SurfaceCommand::Place(self.ext.placement()));
        out
    }

    fn begin_collapse(&mut self) -> Commands {
        let session = TweenSession {
            elapsed: 0.0,
            duration: COLLAPSE_DURATION_MS,
            start_position: self.ext.presented_position,
            target_position: self.ext.inline_position,
            start_scale: self.ext.current_scale,
            target_scale: 1.0,
            rotation_amount: TAU,
            on_complete: Some(Completion::Collapsed),
        };
        if !self.ext.start_tween(session) {
            return Commands::new();
        }
        log::info!("[tween] collapsing");
        self.ext.phase = TweenPhase::Collapsing;
        self.start();

        let mut out = Commands::new();
        out.push(SurfaceCommand::Depth(true));
        out
    }

    /// Pointer-down on this card. Only one pointer may hold the page-wide
    /// claim at a time.
    pub fn pointer_down(&mut self, pointer_id: i32) {
        if self.ext.arbiter.try_claim(pointer_id) {
            self.ext.touched = Some(pointer_id);
        } else {
            log::debug!("[pointer] {pointer_id} refused: another pointer holds the claim");
        }
    }

    /// Pointer-up on this card. Toggles when it pairs with this card's
    /// pointer-down.
    pub fn pointer_up(&mut self, pointer_id: i32, now: f64, layout: Layout) -> Commands {
        if self.ext.touched != Some(pointer_id) {
            return Commands::new();
        }
        self.ext.touched = None;
        self.ext.arbiter.release(pointer_id);
        self.toggle_enlarged(now, layout)
    }

    /// Pointer released or cancelled anywhere; drops the claim without
    /// toggling.
    pub fn pointer_release(&mut self, pointer_id: i32) {
        if self.ext.touched == Some(pointer_id) {
            self.ext.touched = None;
            self.ext.arbiter.release(pointer_id);
        }
    }

    /// Escape key or backdrop click: collapse an enlarged card.
    pub fn cancel(&mut self, now: f64, layout: Layout) -> Commands {
        if self.ext.phase != TweenPhase::Enlarged {
            return Commands::new();
        }
        self.toggle_enlarged(now, layout)
    }
}
