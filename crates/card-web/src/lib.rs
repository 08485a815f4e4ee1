#![cfg(target_arch = "wasm32")]
//! Browser front-end: mounts perspective cards on DOM elements.
//!
//! Elements matching `[data-perspective-card]` are mounted on start. Script
//! callers can mount further elements with [`mount`] and tear them down with
//! [`CardHandle::destroy`] or [`destroy_all`].

mod constants;
mod dom;
mod events;
mod mounted;
mod scheduler;

use card_core::PointerArbiter;
use fnv::FnvHashMap;
use mounted::Mounted;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

thread_local! {
    static CARDS: RefCell<FnvHashMap<u32, Rc<Mounted>>> = RefCell::new(FnvHashMap::default());
    static NEXT_ID: Cell<u32> = const { Cell::new(1) };
    // One claim shared by every enlargeable card on the page
    static ARBITER: PointerArbiter = PointerArbiter::new();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("card-web starting");

    if let Err(e) = mount_all() {
        log::error!("auto-mount error: {:?}", e);
    }
    Ok(())
}

fn mount_all() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let nodes = document
        .query_selector_all(constants::AUTO_MOUNT_SELECTOR)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    for i in 0..nodes.length() {
        let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<web::HtmlElement>().ok()) else {
            continue;
        };
        if let Err(e) = mount_element(el) {
            log::warn!("[mount] skipped card: {e}");
        }
    }
    Ok(())
}

fn mount_element(element: web::HtmlElement) -> anyhow::Result<u32> {
    let id = NEXT_ID.with(|n| {
        let id = n.get();
        n.set(id.wrapping_add(1));
        id
    });
    let m = ARBITER.with(|arbiter| Mounted::mount(id, element, arbiter))?;
    CARDS.with(|cards| cards.borrow_mut().insert(id, m));
    Ok(id)
}

fn unmount(id: u32) -> bool {
    // Release the registry borrow before teardown dispatches anything
    let removed = CARDS.with(|cards| cards.borrow_mut().remove(&id));
    match removed {
        Some(m) => {
            m.teardown();
            true
        }
        None => false,
    }
}

/// Handle to a mounted card.
#[wasm_bindgen]
pub struct CardHandle {
    id: u32,
}

#[wasm_bindgen]
impl CardHandle {
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Detach the card. Returns false if it was already destroyed.
    pub fn destroy(&self) -> bool {
        unmount(self.id)
    }
}

/// Mount a card on `element`. The element needs `.card__transformer` and
/// `.card__shine` descendants.
#[wasm_bindgen]
pub fn mount(element: web::HtmlElement) -> Result<CardHandle, JsValue> {
    mount_element(element)
        .map(|id| CardHandle { id })
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Destroy every mounted card.
#[wasm_bindgen]
pub fn destroy_all() {
    let ids: Vec<u32> = CARDS.with(|cards| cards.borrow().keys().copied().collect());
    for id in ids {
        unmount(id);
    }
}
