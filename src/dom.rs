use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Create the drawing canvas at viewport size and append it to `#container_id`.
pub fn create_canvas(container_id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    let document = window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let container = document
        .get_element_by_id(container_id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", container_id))?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    sync_canvas_to_viewport(&canvas);
    container
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(canvas)
}

/// Size the canvas to the window: CSS size in CSS pixels, backing store in device pixels.
pub fn sync_canvas_to_viewport(canvas: &web::HtmlCanvasElement) {
    let Some(w) = web::window() else {
        return;
    };
    let css_w = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    let css_h = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    let dpr = w.device_pixel_ratio();
    let style = canvas.style();
    _ = style.set_property("width", &format!("{css_w}px"));
    _ = style.set_property("height", &format!("{css_h}px"));
    _ = style.set_property("display", "block");
    canvas.set_width(((css_w * dpr) as u32).max(1));
    canvas.set_height(((css_h * dpr) as u32).max(1));
}

pub fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        sync_canvas_to_viewport(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

/// Pointer position in normalized device coordinates (+y up).
pub fn pointer_ndc(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    let x = (ev.client_x() as f64 - rect.left()) / rect.width().max(1.0);
    let y = (ev.client_y() as f64 - rect.top()) / rect.height().max(1.0);
    ((x * 2.0 - 1.0) as f32, (1.0 - y * 2.0) as f32)
}

pub fn set_cursor(canvas: &web::HtmlCanvasElement, pointer: bool) {
    _ = canvas
        .style()
        .set_property("cursor", if pointer { "pointer" } else { "default" });
}

pub fn open_in_new_tab(url: &str) {
    if let Some(w) = web::window() {
        if let Err(e) = w.open_with_url_and_target(url, "_blank") {
            log::error!("[dom] window.open {url}: {:?}", e);
        }
    }
}
