use diorama_core::Stage;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Escape closes the open panel, the same as its close button.
pub fn wire_global_keydown(stage: Rc<RefCell<Stage>>) {
    let Some(window) = web::window() else {
        return;
    };
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if ev.repeat() || ev.key() != "Escape" {
            return;
        }
        let closed = stage.borrow_mut().close_panel();
        if closed.is_some() {
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}
