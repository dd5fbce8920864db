//! Selection, erasing and transform editing for vector strokes held by an
//! external drawing surface.
//!
//! The surface owns the strokes; the engine reads them with
//! [`CanvasSurface::export_paths`] and writes the full list back after each
//! change. [`Editor`] drives everything from pointer and key events.

pub mod config;
pub mod editor;
pub mod editors;
pub mod eraser;
pub mod error;
pub mod geometry;
pub mod history;
pub mod lasso;
pub mod state;
pub mod surface;
pub mod throttle;
pub mod transform;

pub use config::EditorConfig;
pub use editor::Editor;
pub use eraser::EraserKind;
pub use error::{ConfigError, EditorError, SurfaceError};
pub use history::{History, TransformSession};
pub use lasso::{LassoPolygon, Selection};
pub use state::{Gesture, InputEvent, KeyCommand, KeyInput, Tool};
pub use surface::{commit, decode_export, CanvasSurface, MemorySurface, SurfaceCall, SurfaceOp};
pub use throttle::FrameThrottle;
pub use transform::{TransformGesture, TransformMode, TransformStep};

pub use inkpad_shared::{BBox, Bounds, ExportedPaths, PathRecord, PathShape, Point};
