use std::cell::RefCell;
use std::rc::Rc;

use hoop_core::{AssetError, ExperienceConfig, ModelAsset, Sequencer, StageId};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

fn fetch_error(path: &str, reason: impl Into<String>) -> AssetError {
    AssetError::Fetch {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// Fetch a `.glb` and validate its container.
pub async fn fetch_model(url: &str) -> Result<ModelAsset, AssetError> {
    let window = web::window().ok_or_else(|| fetch_error(url, "no window"))?;
    let resp_val = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| fetch_error(url, format!("{:?}", e)))?;
    let resp: web::Response = resp_val
        .dyn_into()
        .map_err(|e| fetch_error(url, format!("{:?}", e)))?;
    if !resp.ok() {
        return Err(fetch_error(url, format!("HTTP {}", resp.status())));
    }
    let buf = JsFuture::from(
        resp.array_buffer()
            .map_err(|e| fetch_error(url, format!("{:?}", e)))?,
    )
    .await
    .map_err(|e| fetch_error(url, format!("{:?}", e)))?;
    let bytes = js_sys::Uint8Array::new(&buf).to_vec();
    let name = url.rsplit('/').next().unwrap_or(url);
    ModelAsset::from_glb_bytes(name, &bytes)
}

/// Start one load per stage that names a model. Each result is handed to the
/// sequencer when it arrives, in whatever order the network delivers them.
pub fn spawn_loads(config: &ExperienceConfig, seq: &Rc<RefCell<Sequencer>>) {
    for id in StageId::ALL {
        let Some(url) = config.asset_url(id) else {
            continue;
        };
        let seq = seq.clone();
        spawn_local(async move {
            log::info!("[assets] loading {} for {}", url, id);
            let result = fetch_model(&url).await;
            if let Ok(asset) = &result {
                log::info!("[assets] {} ok ({} bytes)", url, asset.byte_len);
            }
            if let Some(handle) = seq.borrow_mut().attach_model(id, result) {
                log::debug!("[assets] {} bound to {:?}", id, handle);
            }
        });
    }
}
