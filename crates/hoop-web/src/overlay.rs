//! DOM layers drawn over the canvas: per-stage captions and the glass title.

use hoop_core::{CaptionRole, Sequencer, StageId};
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::{
    CAPTIONS_CONTAINER_ID, CAPTION_CLASS, CAPTION_OPACITY_EPSILON, CRACKS_CONTAINER_ID,
    GLASS_TITLE_SELECTOR,
};
use crate::dom;
use crate::glass::GlassStyle;

const CRACKS_STYLE: &str =
    "position:fixed;inset:0;pointer-events:none;opacity:0;z-index:5;background-repeat:no-repeat;background-size:cover";

struct CaptionNode {
    stage: StageId,
    index: usize,
    el: web::HtmlElement,
    shown: f32,
}

/// One heading element per stage caption, faded to the caption's opacity.
pub struct CaptionLayer {
    nodes: Vec<CaptionNode>,
}

impl CaptionLayer {
    pub fn build(document: &web::Document, seq: &Sequencer) -> Self {
        let parent: Option<web::Element> = document
            .get_element_by_id(CAPTIONS_CONTAINER_ID)
            .or_else(|| document.body().map(|b| b.unchecked_into()));
        let mut nodes = Vec::new();
        let Some(parent) = parent else {
            log::warn!("[captions] no container, captions disabled");
            return Self { nodes };
        };
        for stage in seq.stages() {
            for (index, caption) in stage.captions().iter().enumerate() {
                let tag = match caption.role {
                    CaptionRole::Title => "h2",
                    CaptionRole::Message => "h3",
                };
                let Ok(el) = document.create_element(tag) else {
                    continue;
                };
                el.set_class_name(CAPTION_CLASS);
                el.set_text_content(Some(caption.text));
                let _ = el.set_attribute("data-stage", stage.id().name());
                let _ = parent.append_child(&el);
                let Ok(el) = el.dyn_into::<web::HtmlElement>() else {
                    continue;
                };
                dom::set_style(&el, "opacity", "0");
                dom::set_style(&el, "visibility", "hidden");
                nodes.push(CaptionNode {
                    stage: stage.id(),
                    index,
                    el,
                    shown: 0.0,
                });
            }
        }
        log::info!("[captions] {} elements", nodes.len());
        Self { nodes }
    }

    /// Copy caption opacities onto their elements, skipping tiny changes.
    pub fn sync(&mut self, seq: &Sequencer) {
        for node in self.nodes.iter_mut() {
            let Some(caption) = seq.stage(node.stage).captions().get(node.index) else {
                continue;
            };
            let o = caption.opacity().clamp(0.0, 1.0);
            let diff = (o - node.shown).abs();
            // always land exactly on the end values
            if diff == 0.0 || (diff < CAPTION_OPACITY_EPSILON && o > 0.0 && o < 1.0) {
                continue;
            }
            node.shown = o;
            dom::set_style(&node.el, "opacity", &format!("{:.3}", o));
            dom::set_style(&node.el, "visibility", if o > 0.0 { "visible" } else { "hidden" });
        }
    }
}

/// The intro title and the crack overlay it shatters into.
pub struct GlassDom {
    title: Option<web::HtmlElement>,
    cracks: Option<web::HtmlElement>,
    last: Option<GlassStyle>,
}

impl GlassDom {
    pub fn find(document: &web::Document) -> Self {
        let title = document
            .query_selector(GLASS_TITLE_SELECTOR)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<web::HtmlElement>().ok());
        if title.is_none() {
            log::warn!("[glass] no {} element", GLASS_TITLE_SELECTOR);
        }
        let cracks = dom::ensure_div(document, CRACKS_CONTAINER_ID, CRACKS_STYLE);
        Self {
            title,
            cracks,
            last: None,
        }
    }

    pub fn apply(&mut self, style: GlassStyle) {
        if self.last == Some(style) {
            return;
        }
        self.last = Some(style);
        if let Some(title) = &self.title {
            dom::set_style(
                title,
                "transform",
                &format!("translate(-50%, -50%) scale({:.4})", style.title_scale),
            );
            dom::set_style(title, "opacity", &format!("{:.3}", style.title_opacity));
        }
        if let Some(cracks) = &self.cracks {
            dom::set_style(cracks, "opacity", &format!("{:.3}", style.cracks_opacity));
        }
    }
}
