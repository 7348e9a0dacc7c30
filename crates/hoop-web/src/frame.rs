use std::cell::RefCell;
use std::rc::Rc;

use hoop_core::{Drawable, Sequencer, StageId};
use instant::Instant;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::MAX_FRAME_DT_SEC;
use crate::glass::GlassOverlay;
use crate::overlay::{CaptionLayer, GlassDom};
use crate::render;

pub struct FrameContext<'a> {
    pub seq: Rc<RefCell<Sequencer>>,
    pub gpu: Option<render::GpuState<'a>>,
    pub canvas: web::HtmlCanvasElement,

    pub captions: CaptionLayer,
    pub glass: Rc<RefCell<GlassOverlay>>,
    pub glass_dom: GlassDom,

    pub draws: Vec<Drawable>,
    pub last_instant: Instant,
    pub stopped: bool,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32().min(MAX_FRAME_DT_SEC);
        self.last_instant = now;
        if self.stopped {
            return;
        }

        let (camera, params) = {
            let mut seq = self.seq.borrow_mut();
            seq.update(dt_sec);
            let intro = seq.stage(StageId::Intro).track().progress();
            let style = self.glass.borrow_mut().advance(dt_sec, intro);
            self.glass_dom.apply(style);
            self.captions.sync(&seq);
            seq.drawables(&mut self.draws);
            (seq.camera().clone(), seq.post_params())
        };

        if let Some(g) = self.gpu.as_mut() {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            if let Err(e) = g.render(dt_sec, &camera, &self.draws, &params) {
                log::error!("render error: {:?}", e);
            }
        }
    }

    /// Stop the loop and release every model. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        let mut seq = self.seq.borrow_mut();
        match self.gpu.as_mut() {
            Some(g) => seq.dispose(g),
            None => seq.dispose(&mut render::NoGpu),
        }
        log::info!("[frame] torn down");
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let stopped = {
            let mut ctx = frame_ctx_tick.borrow_mut();
            ctx.frame();
            ctx.stopped
        };
        if !stopped {
            request_frame(&tick_clone);
        }
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
