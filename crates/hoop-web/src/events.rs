use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use hoop_core::Sequencer;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::{FALLBACK_PAGE_PX, LINE_HEIGHT_PX};
use crate::dom;
use crate::frame::FrameContext;
use crate::input;

/// Wheel anywhere on the page drives the scroll tracks.
pub fn wire_wheel(window: &web::Window, seq: Rc<RefCell<Sequencer>>) {
    let closure = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        let page_px = web::window()
            .and_then(|w| w.inner_height().ok())
            .and_then(|h| h.as_f64())
            .map(|h| h as f32)
            .unwrap_or(FALLBACK_PAGE_PX);
        let delta = input::wheel_delta_px(ev.delta_y(), ev.delta_mode(), LINE_HEIGHT_PX, page_px);
        if delta != 0.0 {
            seq.borrow_mut().wheel(delta);
        }
    }) as Box<dyn FnMut(_)>);
    let _ = window.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Clicks on the canvas become pick rays from the current camera.
pub fn wire_click(canvas: &web::HtmlCanvasElement, seq: Rc<RefCell<Sequencer>>) {
    let canvas_click = canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let rect = canvas_click.get_bounding_client_rect();
        let Some(ndc) = input::client_to_ndc(
            Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ) else {
            return;
        };
        let mut seq = seq.borrow_mut();
        let ray = seq.camera().ray_from_ndc(ndc.x, ndc.y);
        if seq.click(&ray) {
            log::debug!("[input] click hit at {:?}", ndc);
        }
    }) as Box<dyn FnMut(_)>);
    let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Keep the canvas backing store and every stage's viewport in sync.
pub fn wire_resize(window: &web::Window, canvas: &web::HtmlCanvasElement, seq: Rc<RefCell<Sequencer>>) {
    let canvas_resize = canvas.clone();
    let closure = Closure::wrap(Box::new(move || {
        let viewport = dom::sync_canvas_backing_size(&canvas_resize);
        seq.borrow_mut().resize(viewport);
    }) as Box<dyn FnMut()>);
    let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Release GPU resources when the page goes away.
pub fn wire_teardown(window: &web::Window, frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let closure = Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().teardown();
    }) as Box<dyn FnMut()>);
    let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
    closure.forget();
}
