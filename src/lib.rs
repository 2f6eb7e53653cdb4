#![cfg(target_arch = "wasm32")]
//! Browser front-end: canvas, WebGPU renderer, pointer events and WebAudio
//! around a [`diorama_core::Stage`].

use diorama_core::{ModelSpec, SceneConfig, Stage, Typeface};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod fetch;
mod frame;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("diorama starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn load_config() -> SceneConfig {
    match fetch::fetch_text(constants::PRESET_URL).await {
        Ok(json) => match SceneConfig::from_json(&json) {
            Ok(cfg) => return cfg,
            Err(e) => log::error!("[config] {}: {e}", constants::PRESET_URL),
        },
        Err(e) => log::info!("[config] using built-in preset ({e})"),
    }
    SceneConfig::preset()
}

async fn load_typeface(stage: Rc<RefCell<Stage>>, config: Rc<SceneConfig>) {
    let face = match fetch::fetch_text(&config.font_url).await {
        Ok(json) => Typeface::from_json(&json),
        Err(e) => {
            log::error!("[font] {:?}", e);
            return;
        }
    };
    match face {
        Ok(face) => {
            let mut stage = stage.borrow_mut();
            stage.set_typeface(face);
            let buttons = stage.add_buttons(&config);
            log::info!("[stage] {} buttons", buttons.len());
        }
        Err(e) => log::error!("[font] {}: {e}", config.font_url),
    }
}

async fn load_model(stage: Rc<RefCell<Stage>>, spec: ModelSpec) {
    let bytes = match fetch::fetch_bytes(&spec.path).await {
        Ok(b) => b,
        Err(e) => {
            log::error!("[model] {:?}", e);
            return;
        }
    };
    if let Err(e) = stage.borrow_mut().load_model(&bytes, &spec) {
        log::error!("[model] {}: {e}", spec.path);
    }
}

fn init_audio(config: &SceneConfig) -> Option<web::AudioListener> {
    let music = config.music.as_ref()?;
    let audio_ctx = match web::AudioContext::new() {
        Ok(ctx) => ctx,
        Err(e) => {
            log::error!("[audio] AudioContext: {:?}", e);
            return None;
        }
    };
    if music.resume_on_gesture {
        audio::wire_resume_on_gesture(&audio_ctx);
    }
    if let Some(sound) = audio::load_music(&audio_ctx, music) {
        audio::wire_stop_on_pagehide(&sound);
    }
    Some(audio_ctx.listener())
}

async fn init() -> anyhow::Result<()> {
    let config = Rc::new(load_config().await);
    let canvas = dom::create_canvas(&config.container_id)?;
    dom::wire_canvas_resize(&canvas);

    let stage = Rc::new(RefCell::new(Stage::new(&config)));
    spawn_local(load_typeface(stage.clone(), config.clone()));
    for spec in config.models.iter().cloned() {
        spawn_local(load_model(stage.clone(), spec));
    }
    let listener = init_audio(&config);

    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        stage: stage.clone(),
    });
    events::wire_global_keydown(stage.clone());

    let gpu = frame::init_gpu(&canvas).await;
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        stage,
        canvas,
        gpu,
        listener,
        last_instant: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
