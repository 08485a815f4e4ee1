//! A card bound to its DOM element.
//!
//! `Mounted` owns the engine, the elements it writes to, every listener and
//! timer it registered, and applies the engine's surface commands.

use crate::constants::*;
use crate::dom;
use crate::events::{self, Listener};
use crate::scheduler::{FrameCallback, RafScheduler};
use card_core::{
    matrix3d_css, Card, CardConfig, Commands, Debouncer, Enlarge, Lifecycle, Placement, Plain,
    PointerArbiter, SurfaceCommand,
};
use glam::{DMat4, DVec2};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub enum CardKind {
    Plain(Card<Plain>),
    Enlarge(Card<Enlarge>),
}

/// Run `$body` against whichever card variant `$m` holds.
macro_rules! with_card {
    ($m:expr, $c:ident => $body:expr) => {
        match &mut *$m.card.borrow_mut() {
            CardKind::Plain($c) => $body,
            CardKind::Enlarge($c) => $body,
        }
    };
}

pub struct Surface {
    pub element: web::HtmlElement,
    pub transformer: web::HtmlElement,
    pub shine: web::HtmlElement,
}

type ObserverParts = (
    web::IntersectionObserver,
    Closure<dyn FnMut(js_sys::Array, web::IntersectionObserver)>,
);

pub struct Mounted {
    pub id: u32,
    pub card: RefCell<CardKind>,
    pub surface: Surface,
    pub listeners: RefCell<Vec<Listener>>,
    pub observer: RefCell<Option<ObserverParts>>,
    move_listener: RefCell<Option<Listener>>,
    backdrop: RefCell<Option<(web::HtmlElement, Option<Listener>)>>,
    debouncer: RefCell<Debouncer>,
    debounce_timer: Cell<Option<i32>>,
    reset_timer: Cell<Option<i32>>,
    timer_callbacks: RefCell<Option<TimerCallbacks>>,
    frame_callback: FrameCallback,
}

struct TimerCallbacks {
    geometry: Closure<dyn FnMut()>,
    reset: Closure<dyn FnMut()>,
}

impl Mounted {
    pub fn mount(id: u32, element: web::HtmlElement, arbiter: &PointerArbiter) -> anyhow::Result<Rc<Self>> {
        let transformer = dom::required_child(&element, TRANSFORMER_SELECTOR)?;
        let shine = dom::required_child(&element, SHINE_SELECTOR)?;
        let config: CardConfig = dom::read_config(&element);
        if config.debug {
            log::set_max_level(log::LevelFilter::Debug);
        }

        let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
        let frame_handle = Rc::new(Cell::new(None));
        let scheduler = Box::new(RafScheduler::new(frame_callback.clone(), frame_handle.clone()));
        let card = if config.enlarge {
            CardKind::Enlarge(Card::enlargeable(config, arbiter.clone(), scheduler))
        } else {
            CardKind::Plain(Card::new(config, scheduler))
        };

        let m = Rc::new(Self {
            id,
            card: RefCell::new(card),
            surface: Surface {
                element,
                transformer,
                shine,
            },
            listeners: RefCell::new(Vec::new()),
            observer: RefCell::new(None),
            move_listener: RefCell::new(None),
            backdrop: RefCell::new(None),
            debouncer: RefCell::new(Debouncer::default()),
            debounce_timer: Cell::new(None),
            reset_timer: Cell::new(None),
            timer_callbacks: RefCell::new(None),
            frame_callback,
        });

        let weak = Rc::downgrade(&m);
        *m.frame_callback.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            frame_handle.set(None);
            if let Some(m) = weak.upgrade() {
                m.frame(ts);
            }
        }) as Box<dyn FnMut(f64)>));

        let weak_geometry = Rc::downgrade(&m);
        let weak_reset = Rc::downgrade(&m);
        *m.timer_callbacks.borrow_mut() = Some(TimerCallbacks {
            geometry: Closure::wrap(Box::new(move || {
                if let Some(m) = weak_geometry.upgrade() {
                    m.debounce_timer.set(None);
                    if m.debouncer.borrow_mut().take() {
                        m.measure();
                    }
                }
            }) as Box<dyn FnMut()>),
            reset: Closure::wrap(Box::new(move || {
                if let Some(m) = weak_reset.upgrade() {
                    m.reset_timer.set(None);
                    let reset = with_card!(m, c => c.resolve_reset());
                    if let Some(cmd) = reset {
                        m.apply(std::iter::once(cmd).collect());
                    }
                }
            }) as Box<dyn FnMut()>),
        });

        m.measure();
        events::wire_card_handlers(&m);
        let ambient = with_card!(m, c => c.config().ambient_enabled());
        if ambient {
            events::observe_visibility(&m);
        }
        log::info!("[mount] card {} mounted (enlarge={})", id, m.enlargeable());
        Ok(m)
    }

    pub fn enlargeable(&self) -> bool {
        matches!(*self.card.borrow(), CardKind::Enlarge(_))
    }

    fn frame(self: &Rc<Self>, ts: f64) {
        let out = with_card!(self, c => c.tick(ts));
        self.apply(out);
    }

    /// Read the current layout rectangle into the engine.
    fn measure(&self) {
        let rect = dom::element_rect(&self.surface.element);
        with_card!(self, c => c.geometry_changed(rect));
    }

    pub fn geometry_signal(&self) {
        let delay = self.debouncer.borrow_mut().signal(instant::now());
        let Some(w) = web::window() else {
            return;
        };
        if let Some(handle) = self.debounce_timer.take() {
            w.clear_timeout_with_handle(handle);
        }
        if let Some(cbs) = self.timer_callbacks.borrow().as_ref() {
            match w.set_timeout_with_callback_and_timeout_and_arguments_0(
                cbs.geometry.as_ref().unchecked_ref(),
                delay as i32,
            ) {
                Ok(handle) => self.debounce_timer.set(Some(handle)),
                Err(e) => log::error!("[geometry] timer failed: {:?}", e),
            }
        }
    }

    pub fn pointer_enter(self: &Rc<Self>) {
        let out = with_card!(self, c => c.pointer_enter());
        if self.move_listener.borrow().is_none() {
            *self.move_listener.borrow_mut() = events::attach_pointer_move(self);
        }
        self.apply(out);
    }

    pub fn pointer_leave(self: &Rc<Self>) {
        let out = with_card!(self, c => c.pointer_leave());
        if let Some(l) = self.move_listener.borrow_mut().take() {
            l.detach();
        }
        self.apply(out);
    }

    pub fn pointer_move(&self, pos: DVec2) {
        with_card!(self, c => c.pointer_move(pos));
    }

    pub fn visibility_changed(&self, visible: bool) {
        log::debug!("[card {}] visible={}", self.id, visible);
        with_card!(self, c => c.visibility_changed(visible));
    }

    pub fn pointer_down(&self, pointer_id: i32) {
        if let CardKind::Enlarge(c) = &mut *self.card.borrow_mut() {
            c.pointer_down(pointer_id);
        }
    }

    pub fn pointer_up(self: &Rc<Self>, pointer_id: i32) {
        let layout = dom::layout(&self.surface.element);
        let out = match &mut *self.card.borrow_mut() {
            CardKind::Enlarge(c) => c.pointer_up(pointer_id, instant::now(), layout),
            CardKind::Plain(_) => Commands::new(),
        };
        self.apply(out);
    }

    pub fn pointer_release(&self, pointer_id: i32) {
        if let CardKind::Enlarge(c) = &mut *self.card.borrow_mut() {
            c.pointer_release(pointer_id);
        }
    }

    pub fn cancel(self: &Rc<Self>) {
        let layout = dom::layout(&self.surface.element);
        let out = match &mut *self.card.borrow_mut() {
            CardKind::Enlarge(c) => c.cancel(instant::now(), layout),
            CardKind::Plain(_) => Commands::new(),
        };
        self.apply(out);
    }

    /// Apply engine output in order. Never called with the card borrowed.
    fn apply(self: &Rc<Self>, commands: Commands) {
        for cmd in commands {
            match cmd {
                SurfaceCommand::Render { matrix, gradient } => {
                    dom::set_style(&self.surface.transformer, "transform", &matrix3d_css(&matrix));
                    dom::set_style(&self.surface.shine, "background", &gradient.css());
                }
                SurfaceCommand::Reset => {
                    dom::set_style(
                        &self.surface.transformer,
                        "transform",
                        &matrix3d_css(&DMat4::IDENTITY),
                    );
                    dom::clear_style(&self.surface.shine, "background");
                }
                SurfaceCommand::ScheduleReset { delay_ms } => self.arm_reset(delay_ms),
                SurfaceCommand::Hover(on) => {
                    let cl = self.surface.element.class_list();
                    _ = if on {
                        cl.add_1(HOVER_CLASS)
                    } else {
                        cl.remove_1(HOVER_CLASS)
                    };
                }
                SurfaceCommand::Place(p) => self.place(p),
                SurfaceCommand::ClearPlacement => self.clear_placement(),
                SurfaceCommand::LockScroll => dom::set_scroll_locked(true),
                SurfaceCommand::UnlockScroll => dom::set_scroll_locked(false),
                SurfaceCommand::InsertBackdrop => self.insert_backdrop(),
                SurfaceCommand::RemoveBackdrop => self.remove_backdrop(),
                SurfaceCommand::Depth(attached) => dom::set_style(
                    &self.surface.transformer,
                    "transform-style",
                    if attached { "preserve-3d" } else { "flat" },
                ),
                SurfaceCommand::Notify(Lifecycle::Enlarged) => {
                    dom::dispatch(&self.surface.element, ENLARGED_EVENT, self.id)
                }
                SurfaceCommand::Notify(Lifecycle::Collapsed) => {
                    dom::dispatch(&self.surface.element, COLLAPSED_EVENT, self.id)
                }
            }
        }
    }

    fn arm_reset(&self, delay_ms: f64) {
        let Some(w) = web::window() else {
            return;
        };
        if let Some(handle) = self.reset_timer.take() {
            w.clear_timeout_with_handle(handle);
        }
        if let Some(cbs) = self.timer_callbacks.borrow().as_ref() {
            if let Ok(handle) = w.set_timeout_with_callback_and_timeout_and_arguments_0(
                cbs.reset.as_ref().unchecked_ref(),
                delay_ms as i32,
            ) {
                self.reset_timer.set(Some(handle));
            }
        }
    }

    fn place(&self, p: Placement) {
        let el = &self.surface.element;
        _ = el.class_list().add_1(ENLARGED_CLASS);
        dom::set_style(el, "position", "fixed");
        dom::set_style(el, "left", &format!("{}px", p.position.x));
        dom::set_style(el, "top", &format!("{}px", p.position.y));
        dom::set_style(el, "width", &format!("{}px", p.size.x));
        dom::set_style(el, "height", &format!("{}px", p.size.y));
        dom::set_style(el, "transform-origin", "0 0");
        dom::set_style(el, "transform", &format!("scale({})", p.scale));
        dom::set_style(el, "z-index", ENLARGED_Z_INDEX);
    }

    fn clear_placement(&self) {
        let el = &self.surface.element;
        _ = el.class_list().remove_1(ENLARGED_CLASS);
        for prop in [
            "position",
            "left",
            "top",
            "width",
            "height",
            "transform-origin",
            "transform",
            "z-index",
        ] {
            dom::clear_style(el, prop);
        }
    }

    fn insert_backdrop(self: &Rc<Self>) {
        if self.backdrop.borrow().is_some() {
            return;
        }
        if let Some(el) = dom::create_backdrop() {
            let click = events::attach_backdrop_click(self, &el);
            *self.backdrop.borrow_mut() = Some((el, click));
        }
    }

    fn remove_backdrop(&self) {
        if let Some((el, click)) = self.backdrop.borrow_mut().take() {
            if let Some(l) = click {
                l.detach();
            }
            el.remove();
        }
    }

    /// Detach everything and cancel outstanding work.
    pub fn teardown(self: &Rc<Self>) {
        let out = with_card!(self, c => c.destroy());
        self.apply(out);

        if let Some(w) = web::window() {
            for timer in [self.debounce_timer.take(), self.reset_timer.take()]
                .into_iter()
                .flatten()
            {
                w.clear_timeout_with_handle(timer);
            }
        }
        for l in self.listeners.borrow_mut().drain(..) {
            l.detach();
        }
        if let Some(l) = self.move_listener.borrow_mut().take() {
            l.detach();
        }
        if let Some((observer, _cb)) = self.observer.borrow_mut().take() {
            observer.disconnect();
        }
        self.timer_callbacks.borrow_mut().take();
        self.frame_callback.borrow_mut().take();
        log::info!("[mount] card {} destroyed", self.id);
    }
}
