//! Replays scripted card sessions on a synthetic clock and logs what a
//! front-end would apply. Run with `RUST_LOG=debug` (or `trace` for every
//! frame) to see the output.
//!
//! Usage: `card-sim [ambient|hover|enlarge|scroll|all]`

use anyhow::{bail, Result};
use card_core::{
    matrix3d_css, Card, CardConfig, Commands, Debouncer, Enlarge, Extension, Layout,
    ManualScheduler, PointerArbiter, Rect, SurfaceCommand, TweenPhase,
};
use glam::DVec2;

const FRAME_MS: f64 = 1000.0 / 60.0;
const CARD_RECT: Rect = Rect {
    left: 100.0,
    top: 100.0,
    width: 300.0,
    height: 420.0,
};
const VIEWPORT: DVec2 = DVec2::new(1280.0, 800.0);

/// Synthetic display clock.
struct Clock {
    now: f64,
}

impl Clock {
    fn new() -> Self {
        Self { now: 0.0 }
    }
    fn advance(&mut self, ms: f64) -> f64 {
        self.now += ms;
        self.now
    }
}

fn log_commands(label: &str, commands: &Commands) {
    for cmd in commands {
        match cmd {
            SurfaceCommand::Render { matrix, gradient } => log::trace!(
                "[{label}] transform: {} background: {}",
                matrix3d_css(matrix),
                gradient.css()
            ),
            other => log::debug!("[{label}] {:?}", other),
        }
    }
}

/// Tick while a frame is pending, up to `max_frames`. Returns frames run.
fn pump<X: Extension>(
    card: &mut Card<X>,
    clock: &mut Clock,
    label: &str,
    max_frames: usize,
) -> usize {
    let mut frames = 0;
    while card.simulation().frame_pending() && frames < max_frames {
        let out = card.tick(clock.advance(FRAME_MS));
        log_commands(label, &out);
        frames += 1;
    }
    frames
}

fn ambient() -> Result<()> {
    let scheduler = ManualScheduler::new();
    let config = CardConfig::default().with_ambient_offset(0.0);
    let mut card = Card::new(config, Box::new(scheduler.clone()));
    let mut clock = Clock::new();

    card.geometry_changed(CARD_RECT);
    card.visibility_changed(true);
    let frames = pump(&mut card, &mut clock, "ambient", 240);
    let sim = card.simulation();
    log::info!(
        "[ambient] {} frames, phase={:.1} look=({:.2},{:.2},{:.2}) requests={}",
        frames,
        sim.ambient_phase(),
        sim.look_point().x,
        sim.look_point().y,
        sim.look_point().z,
        scheduler.requested()
    );

    card.visibility_changed(false);
    let tail = pump(&mut card, &mut clock, "ambient", 10);
    if card.simulation().playing() {
        bail!("ambient card kept playing after leaving the viewport");
    }
    log::info!("[ambient] stopped after {} trailing frame(s)", tail);
    Ok(())
}

fn hover() -> Result<()> {
    let scheduler = ManualScheduler::new();
    let mut card = Card::new(CardConfig::default(), Box::new(scheduler.clone()));
    let mut clock = Clock::new();
    card.geometry_changed(CARD_RECT);

    log_commands("hover", &card.pointer_enter());
    // sweep the pointer from the top-left corner to the bottom-right one
    for step in 0..=60 {
        let t = step as f64 / 60.0;
        card.pointer_move(CARD_RECT.position() + CARD_RECT.size() * t);
        let out = card.tick(clock.advance(FRAME_MS));
        log_commands("hover", &out);
    }
    let sim = card.simulation();
    log::info!(
        "[hover] zoom z={:.3} look target=({:.1},{:.1})",
        sim.center().z,
        sim.look_target().x,
        sim.look_target().y
    );

    log_commands("hover", &card.pointer_leave());
    let frames = pump(&mut card, &mut clock, "hover", 600);
    clock.advance(card_core::RESET_DELAY_MS);
    if let Some(cmd) = card.resolve_reset() {
        log::debug!("[hover] {:?}", cmd);
    }
    log::info!(
        "[hover] settled in {} frames, differential={:.4}",
        frames,
        card.simulation().look_differential()
    );
    Ok(())
}

fn layout() -> Layout {
    Layout {
        card: CARD_RECT,
        viewport: VIEWPORT,
    }
}

fn run_tween(card: &mut Card<Enlarge>, clock: &mut Clock) -> usize {
    let mut frames = 0;
    while card.tween_phase() != TweenPhase::Idle && frames < 1000 {
        let out = card.tick(clock.advance(FRAME_MS));
        log_commands("enlarge", &out);
        frames += 1;
    }
    frames
}

fn enlarge() -> Result<()> {
    let scheduler = ManualScheduler::new();
    let arbiter = PointerArbiter::new();
    let mut card = Card::enlargeable(CardConfig::default(), arbiter, Box::new(scheduler));
    let mut clock = Clock::new();
    card.geometry_changed(CARD_RECT);

    card.pointer_down(1);
    let out = card.pointer_up(1, clock.now, layout());
    log_commands("enlarge", &out);
    let frames = run_tween(&mut card, &mut clock);
    if !card.is_enlarged() {
        bail!("card did not enlarge");
    }
    log::info!(
        "[enlarge] enlarged in {} frames, scale={:.3}",
        frames,
        card.extension().current_scale()
    );

    // inside the cooldown: ignored
    let ignored = card.toggle_enlarged(clock.now, layout());
    log::info!("[enlarge] toggle during cooldown -> {} command(s)", ignored.len());

    clock.advance(card_core::TOGGLE_COOLDOWN_MS);
    log_commands("enlarge", &card.cancel(clock.now, layout()));
    let frames = run_tween(&mut card, &mut clock);
    if card.is_enlarged() {
        bail!("card did not collapse");
    }
    log::info!("[enlarge] collapsed in {} frames", frames);
    Ok(())
}

fn scroll() -> Result<()> {
    let mut card = Card::new(CardConfig::default(), Box::new(ManualScheduler::new()));
    let mut debouncer = Debouncer::default();
    let mut clock = Clock::new();
    let mut measured = 0;

    // one scroll event per frame for a second, then quiet
    for frame in 0..120 {
        let now = clock.advance(FRAME_MS);
        if frame < 60 {
            debouncer.signal(now);
        }
        if debouncer.due(now) {
            let offset = frame as f64 * 4.0;
            card.geometry_changed(Rect::new(
                CARD_RECT.left,
                CARD_RECT.top - offset,
                CARD_RECT.width,
                CARD_RECT.height,
            ));
            measured += 1;
        }
    }
    log::info!(
        "[scroll] 60 scroll events -> {} measurement(s), top={:.1}",
        measured,
        card.simulation().geometry().position.y
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let which = std::env::args().nth(1).unwrap_or_else(|| "all".to_owned());
    match which.as_str() {
        "ambient" => ambient(),
        "hover" => hover(),
        "enlarge" => enlarge(),
        "scroll" => scroll(),
        "all" => {
            ambient()?;
            hover()?;
            enlarge()?;
            scroll()
        }
        other => bail!("unknown session {other:?}"),
    }
}
