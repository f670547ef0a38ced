#![cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
use web_sys as web;

mod audio;
mod bootstrap;
mod constants;
mod dom;
mod events;
mod geometry;
mod mounted;
mod observers;
mod scheduler;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("kinesis-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    bootstrap::scan(&document);
    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("no document body"))?;
    bootstrap::watch_document(&body)?;
    Ok(())
}

/// Mount containers added since the last scan and drop detached ones.
#[wasm_bindgen]
pub fn refresh() {
    bootstrap::prune();
    if let Some(document) = dom::window_document() {
        bootstrap::scan(&document);
    }
}

/// Start playback of an audio container. Returns `false` when `el` is not
/// a mounted audio container.
#[wasm_bindgen(js_name = playAudio)]
pub fn play_audio(el: &web::Element) -> bool {
    bootstrap::with_container(el, |m| m.play()).unwrap_or(false)
}

#[wasm_bindgen(js_name = stopAudio)]
pub fn stop_audio(el: &web::Element) -> bool {
    bootstrap::with_container(el, |m| m.stop()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn destroy(el: &web::Element) -> bool {
    bootstrap::destroy(el)
}

#[wasm_bindgen(js_name = destroyAll)]
pub fn destroy_all() {
    bootstrap::destroy_all();
}
