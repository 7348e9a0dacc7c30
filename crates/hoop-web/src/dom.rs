use hoop_core::Viewport;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Resize the canvas backing store to its CSS size times devicePixelRatio and
/// report the resulting viewport.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> Viewport {
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let rect = canvas.get_bounding_client_rect();
    let w_px = ((rect.width() * dpr) as u32).max(1);
    let h_px = ((rect.height() * dpr) as u32).max(1);
    if canvas.width() != w_px || canvas.height() != h_px {
        canvas.set_width(w_px);
        canvas.set_height(h_px);
    }
    Viewport::new(w_px, h_px, dpr as f32)
}

/// Find an element by id, creating a `<div>` under `<body>` when missing.
pub fn ensure_div(document: &web::Document, id: &str, style: &str) -> Option<web::HtmlElement> {
    if let Some(el) = document.get_element_by_id(id) {
        return el.dyn_into::<web::HtmlElement>().ok();
    }
    let el = document.create_element("div").ok()?;
    el.set_id(id);
    let _ = el.set_attribute("style", style);
    let body = document.body()?;
    let _ = body.append_child(&el);
    log::debug!("[dom] created #{}", id);
    el.dyn_into::<web::HtmlElement>().ok()
}

#[inline]
pub fn set_style(el: &web::HtmlElement, prop: &str, value: &str) {
    let _ = el.style().set_property(prop, value);
}
