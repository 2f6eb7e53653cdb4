use crate::fetch;
use diorama_core::{Camera, MusicConfig};
use glam::Vec3;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

fn create_gain(audio_ctx: &web::AudioContext, value: f32, label: &str) -> Option<web::GainNode> {
    match web::GainNode::new(audio_ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Some(g)
        }
        Err(e) => {
            log::error!("{} GainNode error: {:?}", label, e);
            None
        }
    }
}

fn create_panner(audio_ctx: &web::AudioContext, cfg: &MusicConfig, pos: Vec3) -> Option<web::PannerNode> {
    let panner = web::PannerNode::new(audio_ctx)
        .map_err(|e| log::error!("PannerNode error: {:?}", e))
        .ok()?;
    panner.set_panning_model(web::PanningModelType::Hrtf);
    panner.set_distance_model(web::DistanceModelType::Inverse);
    panner.set_ref_distance(cfg.ref_distance as f64);
    panner.set_max_distance(cfg.max_distance as f64);
    panner.position_x().set_value(pos.x);
    panner.position_y().set_value(pos.y);
    panner.position_z().set_value(pos.z);
    Some(panner)
}

/// A looping background track. Returned before its bytes have arrived; the
/// source starts once decoding finishes.
#[derive(Clone)]
pub struct Sound {
    source: Rc<RefCell<Option<web::AudioBufferSourceNode>>>,
}

impl Sound {
    pub fn stop(&self) {
        if let Some(src) = self.source.borrow_mut().take() {
            _ = src.stop();
        }
    }
}

async fn decode(audio_ctx: &web::AudioContext, bytes: &[u8]) -> anyhow::Result<web::AudioBuffer> {
    let array = js_sys::Uint8Array::from(bytes);
    let promise = audio_ctx
        .decode_audio_data(&array.buffer())
        .map_err(|e| anyhow::anyhow!("decodeAudioData: {:?}", e))?;
    let decoded = JsFuture::from(promise)
        .await
        .map_err(|e| anyhow::anyhow!("decodeAudioData: {:?}", e))?;
    decoded
        .dyn_into::<web::AudioBuffer>()
        .map_err(|e| anyhow::anyhow!("decodeAudioData: {:?}", e))
}

/// Route a gain (and a panner when positioned) to the destination and start
/// fetching the track.
pub fn load_music(audio_ctx: &web::AudioContext, cfg: &MusicConfig) -> Option<Sound> {
    let gain = create_gain(audio_ctx, cfg.volume, "Music")?;
    let destination = audio_ctx.destination();
    match cfg.position.and_then(|p| create_panner(audio_ctx, cfg, p)) {
        Some(panner) => {
            _ = gain.connect_with_audio_node(&panner);
            _ = panner.connect_with_audio_node(&destination);
        }
        None => {
            _ = gain.connect_with_audio_node(&destination);
        }
    }

    let source: Rc<RefCell<Option<web::AudioBufferSourceNode>>> = Rc::new(RefCell::new(None));
    let sound = Sound {
        source: source.clone(),
    };

    let ctx = audio_ctx.clone();
    let cfg = cfg.clone();
    spawn_local(async move {
        let buffer = match fetch::fetch_bytes(&cfg.path).await {
            Ok(bytes) => match decode(&ctx, &bytes).await {
                Ok(b) => b,
                Err(e) => {
                    log::error!("[audio] {}: {:?}", cfg.path, e);
                    return;
                }
            },
            Err(e) => {
                log::error!("[audio] {:?}", e);
                return;
            }
        };
        let src = match ctx.create_buffer_source() {
            Ok(s) => s,
            Err(e) => {
                log::error!("[audio] AudioBufferSourceNode error: {:?}", e);
                return;
            }
        };
        src.set_buffer(Some(&buffer));
        src.set_loop(cfg.looped);
        _ = src.connect_with_audio_node(&gain);
        if cfg.autoplay {
            if let Err(e) = src.start() {
                log::error!("[audio] start: {:?}", e);
            }
        }
        log::info!(
            "[audio] {} ready ({:.1}s, loop={})",
            cfg.path,
            buffer.duration(),
            cfg.looped
        );
        *source.borrow_mut() = Some(src);
    });

    Some(sound)
}

/// Browsers start contexts suspended; resume on the first pointer or key gesture.
pub fn wire_resume_on_gesture(audio_ctx: &web::AudioContext) {
    let Some(window) = web::window() else {
        return;
    };
    let ctx = audio_ctx.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        if ctx.state() != web::AudioContextState::Running {
            _ = ctx.resume();
        }
    }) as Box<dyn FnMut(_)>);
    for event in ["pointerdown", "keydown"] {
        _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

/// Silence the track when the page is hidden for good (navigation or close).
pub fn wire_stop_on_pagehide(sound: &Sound) {
    let Some(window) = web::window() else {
        return;
    };
    let sound = sound.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        log::info!("[audio] pagehide, stopping music");
        sound.stop();
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn update_listener_to_camera(listener: &web::AudioListener, camera: &Camera) {
    let eye = camera.position;
    let fwd = camera.forward();
    let up = diorama_core::scene::euler_xyz(camera.rotation) * Vec3::Y;
    listener.set_position(eye.x as f64, eye.y as f64, eye.z as f64);
    _ = listener.set_orientation(
        fwd.x as f64,
        fwd.y as f64,
        fwd.z as f64,
        up.x as f64,
        up.y as f64,
        up.z as f64,
    );
}
