use futures::channel::oneshot;

use inkpad_engine::{BBox, CanvasSurface, Editor, InputEvent, Point, Tool};

/// Work for the editor task. Everything that touches the surface goes through
/// this queue.
pub enum Command {
    Input(InputEvent),
    SetTool(Tool),
    Undo(oneshot::Sender<bool>),
    Redo(oneshot::Sender<bool>),
    DeleteSelection,
    Recolor(String),
    RestyleWidth(f64),
    Snapshot,
}

/// What the overlay and the synchronous key handler need to know, copied out
/// of the editor after every command.
#[derive(Clone, Debug, Default)]
pub struct View {
    pub lasso: Vec<Point>,
    pub selection: Option<BBox>,
    pub eraser: Option<(Point, f64)>,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl View {
    pub fn capture<S: CanvasSurface>(editor: &Editor<S>) -> Self {
        Self {
            lasso: editor.lasso_points().to_vec(),
            selection: editor.selection().map(|selection| selection.bbox),
            eraser: editor.eraser_preview(),
            can_undo: editor.history().can_undo(),
            can_redo: editor.history().can_redo(),
        }
    }
}
