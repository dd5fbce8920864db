use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::{mpsc, oneshot};
use futures::StreamExt;
use js_sys::Promise;
use tracing::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{
    CanvasRenderingContext2d, Document, Event, HtmlCanvasElement, KeyboardEvent, PointerEvent,
    Window,
};

use inkpad_engine::{
    Editor, EditorConfig, EditorError, EraserKind, FrameThrottle, InputEvent, KeyCommand, KeyInput,
    Point, Tool,
};

use crate::dom::{context_2d, event_to_point, fit_canvas, set_canvas_cursor, set_text_selection};
use crate::logging::init_logging;
use crate::render::draw_overlay;
use crate::state::{Command, View};
use crate::surface::JsSurface;

#[wasm_bindgen(start)]
pub fn run() {
    console_error_panic_hook::set_once();
    init_logging();
}

struct Overlay {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    config: EditorConfig,
    size: Cell<(f64, f64)>,
}

impl Overlay {
    fn fit(&self, window: &Window) {
        self.size.set(fit_canvas(window, &self.canvas, &self.ctx));
    }

    fn draw(&self, view: &View) {
        let (width, height) = self.size.get();
        draw_overlay(&self.ctx, width, height, view, &self.config);
    }
}

/// State shared between the JS-facing handle and its DOM listeners.
struct Shared {
    window: Window,
    document: Document,
    queue: mpsc::UnboundedSender<Command>,
    view: Rc<RefCell<View>>,
    overlay: Rc<Overlay>,
    tool: Cell<Tool>,
    throttle: RefCell<FrameThrottle>,
    attached: RefCell<Option<HtmlCanvasElement>>,
}

impl Shared {
    fn send(&self, command: Command) {
        if self.queue.unbounded_send(command).is_err() {
            warn!("editor task has stopped, dropping command");
        }
    }

    fn input(&self, event: InputEvent) {
        self.send(Command::Input(event));
    }

    /// Sends the point held back for the next animation frame, if any.
    fn flush_frame(&self) {
        let pending = self.throttle.borrow_mut().take();
        if let Some(point) = pending {
            self.input(InputEvent::PointerMove(point));
        }
    }

    fn set_tool(&self, tool: Tool) {
        self.flush_frame();
        self.tool.set(tool);
        set_canvas_cursor(&self.overlay.canvas, tool);
        if let Some(canvas) = self.attached.borrow().as_ref() {
            set_canvas_cursor(canvas, tool);
        }
        self.send(Command::SetTool(tool));
    }

    fn key_down(&self, key: String, ctrl: bool, shift: bool) -> bool {
        let input = KeyInput::new(key, ctrl, shift);
        let Some(command) = input.command() else {
            return false;
        };
        let consumed = {
            let view = self.view.borrow();
            match command {
                KeyCommand::Undo => view.can_undo,
                KeyCommand::Redo => view.can_redo,
                _ => view.selection.is_some(),
            }
        };
        if consumed {
            self.input(InputEvent::Key(input));
        }
        consumed
    }
}

fn pointer_down(shared: &Shared, point: Point) {
    if shared.tool.get() == Tool::Select {
        set_text_selection(&shared.document, false);
    }
    shared.input(InputEvent::PointerDown(point));
}

/// Area erasing rewrites every stroke it crosses, so its moves are coalesced
/// to one per animation frame. Other tools forward every move.
fn pointer_move(shared: &Rc<Shared>, point: Point) {
    if shared.tool.get() != Tool::Erase(EraserKind::Area) {
        shared.input(InputEvent::PointerMove(point));
        return;
    }
    if !shared.throttle.borrow_mut().offer(point) {
        return;
    }
    let frame_shared = Rc::clone(shared);
    let callback = Closure::once_into_js(move |_: f64| frame_shared.flush_frame());
    if shared
        .window
        .request_animation_frame(callback.unchecked_ref())
        .is_err()
    {
        shared.flush_frame();
    }
}

fn pointer_end(shared: &Shared, event: InputEvent) {
    shared.flush_frame();
    set_text_selection(&shared.document, true);
    shared.input(event);
}

fn report<T>(operation: &str, result: Result<T, EditorError>) {
    if let Err(error) = result {
        error!(%error, operation, "editor command failed");
    }
}

async fn run_editor(
    mut editor: Editor<JsSurface>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    view: Rc<RefCell<View>>,
    overlay: Rc<Overlay>,
) {
    while let Some(command) = commands.next().await {
        match command {
            // `dispatch` logs its own failures.
            Command::Input(event) => {
                let _ = editor.dispatch(event).await;
            }
            Command::SetTool(tool) => report("setTool", editor.set_tool(tool).await),
            Command::Undo(reply) => {
                let result = editor.undo().await;
                let done = matches!(result, Ok(true));
                report("undo", result);
                let _ = reply.send(done);
            }
            Command::Redo(reply) => {
                let result = editor.redo().await;
                let done = matches!(result, Ok(true));
                report("redo", result);
                let _ = reply.send(done);
            }
            Command::DeleteSelection => report("deleteSelection", editor.delete_selection().await),
            Command::Recolor(color) => {
                report("recolor", editor.recolor_selection(&color).await);
            }
            Command::RestyleWidth(width) => {
                report("restyleWidth", editor.restyle_selection_width(width).await);
            }
            Command::Snapshot => report("recordStroke", editor.record_external_change().await),
        }
        let current = View::capture(&editor);
        overlay.draw(&current);
        *view.borrow_mut() = current;
    }
    debug!("editor task finished");
}

fn reply_promise(reply: oneshot::Receiver<bool>) -> Promise {
    future_to_promise(async move { Ok(JsValue::from_bool(reply.await.unwrap_or(false))) })
}

/// Selection, erasing and transform editing on top of a page's drawing
/// library.
#[wasm_bindgen]
pub struct InkEditor {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl InkEditor {
    /// `surface` must provide `exportPaths()`, `loadPaths(paths)` and
    /// `clearCanvas()`. `overlay` is a canvas stacked above the drawing.
    #[wasm_bindgen(constructor)]
    pub fn new(
        surface: JsValue,
        overlay: HtmlCanvasElement,
        config: Option<String>,
    ) -> Result<InkEditor, JsValue> {
        let config = match config {
            Some(text) => {
                EditorConfig::from_json(&text).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => EditorConfig::default(),
        };
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Missing document"))?;
        let ctx = context_2d(&overlay)
            .ok_or_else(|| JsValue::from_str("Overlay canvas has no 2d context"))?;
        let surface = JsSurface::new(surface)?;

        let overlay = Rc::new(Overlay {
            canvas: overlay,
            ctx,
            config: config.clone(),
            size: Cell::new((0.0, 0.0)),
        });
        overlay.fit(&window);

        let view = Rc::new(RefCell::new(View::default()));
        let (queue, commands) = mpsc::unbounded();
        spawn_local(run_editor(
            Editor::new(surface, config),
            commands,
            view.clone(),
            overlay.clone(),
        ));

        let shared = Rc::new(Shared {
            window: window.clone(),
            document,
            queue,
            view,
            overlay,
            tool: Cell::new(Tool::Pen),
            throttle: RefCell::new(FrameThrottle::new()),
            attached: RefCell::new(None),
        });
        // Baseline so the first recorded stroke can be undone.
        shared.send(Command::Snapshot);

        {
            let resize_shared = shared.clone();
            let onresize = Closure::<dyn FnMut(Event)>::new(move |_| {
                resize_shared.overlay.fit(&resize_shared.window);
                resize_shared.overlay.draw(&resize_shared.view.borrow());
            });
            window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
            onresize.forget();
        }

        info!("ink editor ready");
        Ok(InkEditor { shared })
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&self, x: f64, y: f64) {
        if let Some(point) = Point::finite(x, y) {
            pointer_down(&self.shared, point);
        }
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f64, y: f64) {
        if let Some(point) = Point::finite(x, y) {
            pointer_move(&self.shared, point);
        }
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self) {
        pointer_end(&self.shared, InputEvent::PointerUp);
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&self) {
        pointer_end(&self.shared, InputEvent::PointerLeave);
    }

    /// Returns whether the key was handled, in which case the caller should
    /// prevent its default action.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&self, key: String, ctrl: bool, shift: bool) -> bool {
        self.shared.key_down(key, ctrl, shift)
    }

    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&self, name: &str) -> Result<(), JsValue> {
        let tool =
            Tool::from_name(name).ok_or_else(|| JsValue::from_str(&format!("Unknown tool: {name}")))?;
        self.shared.set_tool(tool);
        Ok(())
    }

    /// Resolves to `false` when there was nothing to undo.
    pub fn undo(&self) -> Promise {
        let (reply, done) = oneshot::channel();
        self.shared.send(Command::Undo(reply));
        reply_promise(done)
    }

    pub fn redo(&self) -> Promise {
        let (reply, done) = oneshot::channel();
        self.shared.send(Command::Redo(reply));
        reply_promise(done)
    }

    pub fn recolor(&self, color: String) {
        self.shared.send(Command::Recolor(color));
    }

    #[wasm_bindgen(js_name = restyleWidth)]
    pub fn restyle_width(&self, width: f64) {
        self.shared.send(Command::RestyleWidth(width));
    }

    #[wasm_bindgen(js_name = deleteSelection)]
    pub fn delete_selection(&self) {
        self.shared.send(Command::DeleteSelection);
    }

    /// Call after the drawing library finishes a stroke of its own.
    #[wasm_bindgen(js_name = recordStroke)]
    pub fn record_stroke(&self) {
        self.shared.send(Command::Snapshot);
    }

    /// Listens for pointer events on `canvas` and keys on the window, for
    /// pages that do not forward input themselves.
    pub fn attach(&self, canvas: HtmlCanvasElement) -> Result<(), JsValue> {
        set_canvas_cursor(&canvas, self.shared.tool.get());
        *self.shared.attached.borrow_mut() = Some(canvas.clone());

        {
            let shared = self.shared.clone();
            let canvas_cb = canvas.clone();
            let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
                if shared.tool.get() == Tool::Pen {
                    return;
                }
                let Some(point) = event_to_point(&canvas_cb, &event) else {
                    return;
                };
                let _ = canvas_cb.set_pointer_capture(event.pointer_id());
                event.prevent_default();
                pointer_down(&shared, point);
            });
            canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
            ondown.forget();
        }

        {
            let shared = self.shared.clone();
            let canvas_cb = canvas.clone();
            let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
                if shared.tool.get() == Tool::Pen {
                    return;
                }
                if let Some(point) = event_to_point(&canvas_cb, &event) {
                    pointer_move(&shared, point);
                }
            });
            canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
            onmove.forget();
        }

        {
            let shared = self.shared.clone();
            let canvas_cb = canvas.clone();
            let onup = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
                let _ = canvas_cb.release_pointer_capture(event.pointer_id());
                pointer_end(&shared, InputEvent::PointerUp);
            });
            canvas.add_event_listener_with_callback("pointerup", onup.as_ref().unchecked_ref())?;
            onup.forget();
        }

        for name in ["pointerleave", "pointercancel"] {
            let shared = self.shared.clone();
            let onleave = Closure::<dyn FnMut(PointerEvent)>::new(move |_: PointerEvent| {
                pointer_end(&shared, InputEvent::PointerLeave);
            });
            canvas.add_event_listener_with_callback(name, onleave.as_ref().unchecked_ref())?;
            onleave.forget();
        }

        {
            let shared = self.shared.clone();
            let onkeydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                let ctrl = event.ctrl_key() || event.meta_key();
                if shared.key_down(event.key(), ctrl, event.shift_key()) {
                    event.prevent_default();
                }
            });
            self.shared
                .window
                .add_event_listener_with_callback("keydown", onkeydown.as_ref().unchecked_ref())?;
            onkeydown.forget();
        }

        Ok(())
    }
}
