use crate::constants::CANCEL_KEY;
use crate::mounted::Mounted;
use glam::DVec2;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// An attached DOM listener that can be detached again.
pub struct Listener {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl Listener {
    pub fn attach(
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> Option<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            Ok(()) => Some(Self {
                target: target.clone(),
                event,
                closure,
            }),
            Err(e) => {
                log::error!("[events] could not listen for {event}: {:?}", e);
                None
            }
        }
    }

    pub fn detach(&self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Build a handler that upgrades the weak card handle before running.
fn with_card(
    weak: &Weak<Mounted>,
    mut f: impl FnMut(&Rc<Mounted>, web::Event) + 'static,
) -> impl FnMut(web::Event) + 'static {
    let weak = weak.clone();
    move |ev| {
        if let Some(m) = weak.upgrade() {
            f(&m, ev);
        }
    }
}

#[inline]
fn pointer_client(ev: &web::Event) -> Option<(i32, DVec2)> {
    let pe = ev.dyn_ref::<web::PointerEvent>()?;
    Some((
        pe.pointer_id(),
        DVec2::new(pe.client_x() as f64, pe.client_y() as f64),
    ))
}

/// Hover, layout and (for enlargeable cards) press/cancel wiring.
pub fn wire_card_handlers(m: &Rc<Mounted>) {
    let weak = Rc::downgrade(m);
    let element: &web::EventTarget = m.surface.element.as_ref();
    let mut listeners = Vec::new();

    listeners.extend(Listener::attach(
        element,
        "pointerenter",
        with_card(&weak, |m, _| m.pointer_enter()),
    ));
    listeners.extend(Listener::attach(
        element,
        "pointerleave",
        with_card(&weak, |m, _| m.pointer_leave()),
    ));

    if let Some(window) = web::window() {
        let window: &web::EventTarget = window.as_ref();
        for event in ["resize", "scroll"] {
            listeners.extend(Listener::attach(
                window,
                event,
                with_card(&weak, |m, _| m.geometry_signal()),
            ));
        }

        if m.enlargeable() {
            listeners.extend(Listener::attach(
                element,
                "pointerdown",
                with_card(&weak, |m, ev| {
                    if let Some((id, _)) = pointer_client(&ev) {
                        m.pointer_down(id);
                    }
                }),
            ));
            listeners.extend(Listener::attach(
                element,
                "pointerup",
                with_card(&weak, |m, ev| {
                    if let Some((id, _)) = pointer_client(&ev) {
                        m.pointer_up(id);
                    }
                }),
            ));
            // released elsewhere: drop the claim without toggling
            for event in ["pointerup", "pointercancel"] {
                listeners.extend(Listener::attach(
                    window,
                    event,
                    with_card(&weak, |m, ev| {
                        if let Some((id, _)) = pointer_client(&ev) {
                            m.pointer_release(id);
                        }
                    }),
                ));
            }
            listeners.extend(Listener::attach(
                window,
                "keydown",
                with_card(&weak, |m, ev| {
                    if let Some(kev) = ev.dyn_ref::<web::KeyboardEvent>() {
                        if kev.key() == CANCEL_KEY {
                            m.cancel();
                        }
                    }
                }),
            ));
        }
    }

    m.listeners.borrow_mut().extend(listeners);
}

/// Pointer tracking is only attached while the card is pointer-controlled.
pub fn attach_pointer_move(m: &Rc<Mounted>) -> Option<Listener> {
    let window = web::window()?;
    let weak = Rc::downgrade(m);
    Listener::attach(
        window.as_ref(),
        "pointermove",
        with_card(&weak, |m, ev| {
            if let Some((_, pos)) = pointer_client(&ev) {
                m.pointer_move(pos);
            }
        }),
    )
}

pub fn attach_backdrop_click(m: &Rc<Mounted>, backdrop: &web::HtmlElement) -> Option<Listener> {
    let weak = Rc::downgrade(m);
    Listener::attach(
        backdrop.as_ref(),
        "click",
        with_card(&weak, |m, _| m.cancel()),
    )
}

/// Visibility observer toggling ambient playback.
pub fn observe_visibility(m: &Rc<Mounted>) {
    let weak = Rc::downgrade(m);
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _obs: web::IntersectionObserver| {
        let Some(m) = weak.upgrade() else {
            return;
        };
        for entry in entries.iter() {
            if let Ok(entry) = entry.dyn_into::<web::IntersectionObserverEntry>() {
                m.visibility_changed(entry.is_intersecting());
            }
        }
    }) as Box<dyn FnMut(js_sys::Array, web::IntersectionObserver)>);

    let init = web::IntersectionObserverInit::new();
    init.set_root_margin(crate::constants::VISIBILITY_ROOT_MARGIN);
    init.set_threshold(&crate::constants::VISIBILITY_THRESHOLD.into());
    match web::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
        Ok(observer) => {
            observer.observe(&m.surface.element);
            *m.observer.borrow_mut() = Some((observer, callback));
        }
        Err(e) => log::error!("[events] IntersectionObserver unavailable: {:?}", e),
    }
}
