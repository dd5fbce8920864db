use inkpad_shared::Point;

use crate::eraser::EraserKind;
use crate::history::TransformSession;
use crate::lasso::LassoPolygon;
use crate::transform::TransformGesture;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    /// Pointer input belongs to the drawing surface.
    Pen,
    Select,
    Erase(EraserKind),
}

impl Tool {
    pub fn from_name(name: &str) -> Option<Tool> {
        match name {
            "pen" | "draw" => Some(Tool::Pen),
            "select" | "lasso" => Some(Tool::Select),
            "erase" | "eraser" | "stroke-eraser" => Some(Tool::Erase(EraserKind::Stroke)),
            "area-eraser" | "area-erase" => Some(Tool::Erase(EraserKind::Area)),
            _ => None,
        }
    }
}

/// What the pointer is doing right now.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Lassoing(LassoPolygon),
    Erasing {
        kind: EraserKind,
        erased: bool,
    },
    Transforming {
        gesture: TransformGesture,
        session: TransformSession,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool, shift: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
            shift,
        }
    }

    pub fn command(&self) -> Option<KeyCommand> {
        if !self.ctrl {
            return match self.key.as_str() {
                "Delete" | "Backspace" => Some(KeyCommand::DeleteSelection),
                "Escape" => Some(KeyCommand::ClearSelection),
                _ => None,
            };
        }
        match self.key.as_str() {
            "ArrowLeft" | "ArrowRight" | "ArrowUp" | "ArrowDown" => {
                Some(KeyCommand::Nudge(self.key.clone()))
            }
            key if key.eq_ignore_ascii_case("z") && self.shift => Some(KeyCommand::Redo),
            key if key.eq_ignore_ascii_case("z") => Some(KeyCommand::Undo),
            key if key.eq_ignore_ascii_case("y") => Some(KeyCommand::Redo),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Undo,
    Redo,
    DeleteSelection,
    ClearSelection,
    /// Arrow key name, rotated or scaled by the configured nudge.
    Nudge(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    PointerLeave,
    Key(KeyInput),
}
