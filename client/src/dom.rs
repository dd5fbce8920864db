use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, PointerEvent};

use inkpad_engine::{Point, Tool};

pub fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

/// Matches the backing store to the displayed size. Returns the size in CSS
/// pixels, which is also the coordinate space the overlay draws in.
pub fn fit_canvas(
    window: &web_sys::Window,
    canvas: &HtmlCanvasElement,
    ctx: &CanvasRenderingContext2d,
) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    let dpr = window.device_pixel_ratio();
    canvas.set_width((rect.width() * dpr) as u32);
    canvas.set_height((rect.height() * dpr) as u32);
    let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    (rect.width(), rect.height())
}

pub fn event_to_point(canvas: &HtmlCanvasElement, event: &PointerEvent) -> Option<Point> {
    let rect = canvas.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    Point::finite(
        event.client_x() as f64 - rect.left(),
        event.client_y() as f64 - rect.top(),
    )
}

/// Stops the page from highlighting text while a lasso is dragged across it.
pub fn set_text_selection(document: &Document, enabled: bool) {
    let Some(body) = document.body() else {
        return;
    };
    let style = body.style();
    if enabled {
        let _ = style.remove_property("user-select");
        let _ = style.remove_property("-webkit-user-select");
    } else {
        let _ = style.set_property("user-select", "none");
        let _ = style.set_property("-webkit-user-select", "none");
    }
}

pub fn set_canvas_cursor(canvas: &HtmlCanvasElement, tool: Tool) {
    let cursor = match tool {
        Tool::Pen => "crosshair",
        Tool::Select => "default",
        Tool::Erase(_) => "cell",
    };
    if let Ok(element) = canvas.clone().dyn_into::<HtmlElement>() {
        let _ = element.style().set_property("cursor", cursor);
    }
}
