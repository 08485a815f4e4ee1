use card_core::FrameScheduler;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame`-backed scheduler.
///
/// The callback slot is filled after the card is mounted, because the
/// callback needs a handle back to the mounted card.
pub struct RafScheduler {
    callback: FrameCallback,
    handle: Rc<Cell<Option<i32>>>,
}

impl RafScheduler {
    pub fn new(callback: FrameCallback, handle: Rc<Cell<Option<i32>>>) -> Self {
        Self { callback, handle }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) {
        let Some(w) = web::window() else {
            return;
        };
        let slot = self.callback.borrow();
        let Some(cb) = slot.as_ref() else {
            log::warn!("[raf] frame requested before callback was installed");
            return;
        };
        match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => self.handle.set(Some(id)),
            Err(e) => log::error!("[raf] request failed: {:?}", e),
        }
    }

    fn cancel(&mut self) {
        if let (Some(w), Some(id)) = (web::window(), self.handle.take()) {
            _ = w.cancel_animation_frame(id);
        }
    }
}
