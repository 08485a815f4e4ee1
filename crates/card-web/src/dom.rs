use crate::constants::*;
use card_core::{CardConfig, Layout, Rect};
use glam::DVec2;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Look up a required descendant; mounting fails without it.
pub fn required_child(root: &web::HtmlElement, selector: &str) -> anyhow::Result<web::HtmlElement> {
    root.query_selector(selector)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("missing {selector}"))?
        .dyn_into::<web::HtmlElement>()
        .map_err(|_| anyhow::anyhow!("{selector} is not an HTML element"))
}

/// Options come from `data-*` attributes, e.g. `data-zoom-size="60"`.
pub fn read_config(element: &web::HtmlElement) -> CardConfig {
    CardConfig::from_lookup(|name| element.get_attribute(&format!("data-{name}")))
}

pub fn element_rect(element: &web::HtmlElement) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.width(), r.height())
}

pub fn viewport_size() -> DVec2 {
    let Some(w) = web::window() else {
        return DVec2::ZERO;
    };
    let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    DVec2::new(width, height)
}

pub fn layout(element: &web::HtmlElement) -> Layout {
    Layout {
        card: element_rect(element),
        viewport: viewport_size(),
    }
}

#[inline]
pub fn set_style(element: &web::HtmlElement, property: &str, value: &str) {
    _ = element.style().set_property(property, value);
}

#[inline]
pub fn clear_style(element: &web::HtmlElement, property: &str) {
    _ = element.style().remove_property(property);
}

pub fn set_scroll_locked(locked: bool) {
    if let Some(body) = window_document().and_then(|d| d.body()) {
        if locked {
            set_style(&body, "overflow", "hidden");
        } else {
            clear_style(&body, "overflow");
        }
    }
}

/// Full-viewport layer behind an enlarged card.
pub fn create_backdrop() -> Option<web::HtmlElement> {
    let document = window_document()?;
    let el = document
        .create_element("div")
        .ok()?
        .dyn_into::<web::HtmlElement>()
        .ok()?;
    _ = el.class_list().add_1(BACKDROP_CLASS);
    set_style(&el, "position", "fixed");
    set_style(&el, "inset", "0");
    set_style(&el, "z-index", BACKDROP_Z_INDEX);
    document.body()?.append_child(&el).ok()?;
    Some(el)
}

pub fn dispatch(element: &web::HtmlElement, name: &str, card_id: u32) {
    let init = web::CustomEventInit::new();
    init.set_bubbles(true);
    init.set_detail(&card_id.into());
    match web::CustomEvent::new_with_event_init_dict(name, &init) {
        Ok(ev) => {
            _ = element.dispatch_event(&ev);
        }
        Err(e) => log::warn!("[dom] could not create {name}: {:?}", e),
    }
}
