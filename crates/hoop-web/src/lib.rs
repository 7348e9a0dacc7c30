#![cfg(target_arch = "wasm32")]
//! Browser frontend: DOM wiring, asset fetches and the WebGPU renderer
//! around `hoop_core::Sequencer`.

mod assets;
mod constants;
mod dom;
mod events;
mod frame;
mod glass;
mod input;
mod overlay;
mod render;
mod settings;

use std::cell::RefCell;
use std::rc::Rc;

use hoop_core::{ExperienceConfig, Sequencer, Topic};
use instant::Instant;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

use crate::constants::CANVAS_ID;
use crate::frame::FrameContext;
use crate::glass::GlassOverlay;
use crate::overlay::{CaptionLayer, GlassDom};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("hoop-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let mut config = ExperienceConfig::default();
    settings::apply_overrides(&mut config, |name| canvas.get_attribute(name));

    let viewport = dom::sync_canvas_backing_size(&canvas);
    let seq = Rc::new(RefCell::new(Sequencer::new(&config)));
    seq.borrow_mut().resize(viewport);

    // The glass overlay only cares about the intro's effects and the break.
    let glass = Rc::new(RefCell::new(GlassOverlay::default()));
    for topic in [Topic::EffectsChanged, Topic::GlassBreakComplete] {
        let glass = glass.clone();
        seq.borrow_mut()
            .bus_mut()
            .subscribe(topic, move |msg| glass.borrow_mut().on_message(msg));
    }

    let captions = CaptionLayer::build(&document, &seq.borrow());
    let glass_dom = GlassDom::find(&document);

    events::wire_wheel(&window, seq.clone());
    events::wire_click(&canvas, seq.clone());
    events::wire_resize(&window, &canvas, seq.clone());
    assets::spawn_loads(&config, &seq);

    let gpu = frame::init_gpu(&canvas).await;
    if gpu.is_none() {
        log::warn!("running without WebGPU; captions and overlays only");
    }

    let frame_ctx = Rc::new(RefCell::new(FrameContext {
        seq,
        gpu,
        canvas,
        captions,
        glass,
        glass_dom,
        draws: Vec::new(),
        last_instant: Instant::now(),
        stopped: false,
    }));
    events::wire_teardown(&window, frame_ctx.clone());
    frame::start_loop(frame_ctx);
    Ok(())
}
