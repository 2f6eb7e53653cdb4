use crate::dom;
use crate::fetch;
use diorama_core::{ClickOutcome, NodeId, Ray, Stage, TextureData};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub stage: Rc<RefCell<Stage>>,
}

impl InputWiring {
    fn ray(&self, ev: &web::PointerEvent) -> Ray {
        let (x, y) = dom::pointer_ndc(ev, &self.canvas);
        self.stage.borrow().camera.ray_from_ndc(x, y)
    }
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointermove(&w);
    wire_pointerdown(&w);
    wire_pointerup(&w);
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let ray = w.ray(&ev);
        let hovered = w.stage.borrow_mut().pointer_move(&ray);
        dom::set_cursor(&w.canvas, hovered.is_some());
    }) as Box<dyn FnMut(_)>);
    _ = w
        .canvas
        .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let ray = w.ray(&ev);
        w.stage.borrow_mut().pointer_down(&ray);
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(w: &InputWiring) {
    let w = w.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let ray = w.ray(&ev);
        let outcome = w.stage.borrow_mut().pointer_up(&ray);
        handle_outcome(&w.stage, outcome);
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn handle_outcome(stage: &Rc<RefCell<Stage>>, outcome: ClickOutcome) {
    match outcome {
        ClickOutcome::OpenUrl(url) => dom::open_in_new_tab(&url),
        ClickOutcome::PanelOpened {
            button,
            image_url: Some(url),
            ..
        } => spawn_local(load_panel_image(stage.clone(), button, url)),
        _ => {}
    }
}

async fn load_panel_image(stage: Rc<RefCell<Stage>>, button: NodeId, url: String) {
    let texture = match fetch::fetch_bytes(&url).await {
        Ok(bytes) => TextureData::decode(&bytes),
        Err(e) => {
            log::error!("[panel] image {:?}", e);
            return;
        }
    };
    match texture {
        Ok(t) => {
            if stage.borrow_mut().attach_panel_image(button, t).is_some() {
                log::info!("[panel] image {url} attached");
            }
        }
        Err(e) => log::error!("[panel] image {url}: {e}"),
    }
}
