use std::mem;

use inkpad_shared::{PathRecord, Point};
use tracing::{debug, error, warn};

use crate::config::EditorConfig;
use crate::editors::{
    compute_selection_bbox, delete_selected_paths, recolor_selected_paths,
    restyle_width_selected_paths,
};
use crate::error::EditorError;
use crate::eraser::{erase_partial_paths_near, erase_paths_near, EraserKind};
use crate::history::{History, TransformSession};
use crate::lasso::{finalize_lasso, LassoPolygon, Selection};
use crate::state::{Gesture, InputEvent, KeyCommand, KeyInput, Tool};
use crate::surface::{commit, CanvasSurface};
use crate::transform::{hit_test, nudge_step, TransformGesture, TransformMode, TransformStep};

#[derive(Clone, Copy)]
enum Direction {
    Back,
    Forward,
}

/// Selection, erasing, transforms and history over one drawing surface.
///
/// Every input goes through [`Editor::dispatch`]; calls are awaited one at a
/// time, so the surface never sees interleaved reads and writes.
pub struct Editor<S: CanvasSurface> {
    surface: S,
    config: EditorConfig,
    history: History,
    selection: Option<Selection>,
    gesture: Gesture,
    tool: Tool,
    eraser_preview: Option<Point>,
}

impl<S: CanvasSurface> Editor<S> {
    pub fn new(surface: S, config: EditorConfig) -> Self {
        let history = History::new(config.history_limit);
        Self {
            surface,
            config,
            history,
            selection: None,
            gesture: Gesture::Idle,
            tool: Tool::Pen,
            eraser_preview: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn lasso_points(&self) -> &[Point] {
        match &self.gesture {
            Gesture::Lassoing(lasso) => lasso.points(),
            _ => &[],
        }
    }

    /// Center and radius of the eraser cursor, for drawing feedback only.
    pub fn eraser_preview(&self) -> Option<(Point, f64)> {
        let Tool::Erase(kind) = self.tool else {
            return None;
        };
        let radius = match kind {
            EraserKind::Stroke => self.config.stroke_erase_threshold,
            EraserKind::Area => self.config.area_erase_radius,
        };
        self.eraser_preview.map(|center| (center, radius))
    }

    /// Handles one input event. Returns whether the path list changed.
    ///
    /// Surface failures are logged here and the gesture is ended; the surface
    /// and history keep their last good state.
    pub async fn dispatch(&mut self, event: InputEvent) -> Result<bool, EditorError> {
        let result = match event {
            InputEvent::PointerDown(point) => self.pointer_down(point).await,
            InputEvent::PointerMove(point) => self.pointer_move(point).await,
            InputEvent::PointerUp => self.end_gesture().await,
            InputEvent::PointerLeave => {
                self.eraser_preview = None;
                self.end_gesture().await
            }
            InputEvent::Key(input) => self.key(input).await,
        };
        if let Err(error) = &result {
            error!(%error, "editor operation aborted");
            if let Err(error) = self.end_gesture().await {
                warn!(%error, "could not close gesture after failure");
            }
            self.gesture = Gesture::Idle;
        }
        result
    }

    pub async fn set_tool(&mut self, tool: Tool) -> Result<(), EditorError> {
        if self.tool == tool {
            return Ok(());
        }
        self.end_gesture().await?;
        if tool != Tool::Select {
            self.selection = None;
        }
        self.eraser_preview = None;
        debug!(?tool, "tool changed");
        self.tool = tool;
        Ok(())
    }

    async fn pointer_down(&mut self, point: Point) -> Result<bool, EditorError> {
        match self.tool {
            Tool::Pen => Ok(false),
            Tool::Select => {
                self.end_gesture().await?;
                let hit = self
                    .selection
                    .as_ref()
                    .and_then(|selection| hit_test(&selection.bbox, point, &self.config));
                match hit {
                    Some(mode) => self.begin_transform(mode, point).await,
                    None => {
                        self.gesture = Gesture::Lassoing(LassoPolygon::start(point));
                        debug!("lasso started");
                        Ok(false)
                    }
                }
            }
            Tool::Erase(kind) => {
                self.end_gesture().await?;
                self.selection = None;
                self.eraser_preview = Some(point);
                self.gesture = Gesture::Erasing {
                    kind,
                    erased: false,
                };
                self.erase_at(point).await
            }
        }
    }

    async fn pointer_move(&mut self, point: Point) -> Result<bool, EditorError> {
        if matches!(self.tool, Tool::Erase(_)) {
            self.eraser_preview = Some(point);
        }
        match &mut self.gesture {
            Gesture::Idle => Ok(false),
            Gesture::Lassoing(lasso) => {
                lasso.push(point);
                Ok(false)
            }
            Gesture::Erasing { .. } => self.erase_at(point).await,
            Gesture::Transforming { gesture, .. } => {
                let Some(step) = gesture.update(point, &self.config) else {
                    return Ok(false);
                };
                let changed = self.apply_step(step).await?;
                if changed {
                    if let Gesture::Transforming { session, .. } = &mut self.gesture {
                        session.mark_moved();
                    }
                }
                Ok(changed)
            }
        }
    }

    /// Finishes whatever gesture is in progress: a lasso selects, an erase
    /// drag or a transform records its single snapshot.
    async fn end_gesture(&mut self) -> Result<bool, EditorError> {
        match mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Lassoing(lasso) => {
                let paths = self.surface.export_paths().await?;
                if let Some(result) = finalize_lasso(lasso, &paths, self.config.min_lasso_area) {
                    debug!(
                        selected = result.selection.as_ref().map_or(0, |s| s.indices.len()),
                        "lasso finished"
                    );
                    self.selection = result.selection;
                }
            }
            Gesture::Erasing { erased, .. } => {
                if erased {
                    self.snapshot().await?;
                }
            }
            Gesture::Transforming { session, .. } => {
                if session.finish(&mut self.history) {
                    self.snapshot().await?;
                    debug!("transform session closed");
                }
            }
        }
        Ok(false)
    }

    async fn begin_transform(&mut self, mode: TransformMode, point: Point) -> Result<bool, EditorError> {
        let Some(selection) = self.selection.as_ref() else {
            return Ok(false);
        };
        let gesture = TransformGesture::begin(mode, &selection.bbox, point);
        let paths = self.surface.export_paths().await?;
        self.gesture = Gesture::Transforming {
            gesture,
            session: TransformSession::begin(&self.history, paths),
        };
        debug!(?mode, "transform session opened");
        Ok(false)
    }

    async fn erase_at(&mut self, point: Point) -> Result<bool, EditorError> {
        let Gesture::Erasing { kind, erased } = self.gesture else {
            return Ok(false);
        };
        let paths = self.surface.export_paths().await?;
        let updated = match kind {
            EraserKind::Stroke => {
                erase_paths_near(&paths, point.x, point.y, self.config.stroke_erase_threshold)
            }
            EraserKind::Area => {
                erase_partial_paths_near(&paths, point.x, point.y, self.config.area_erase_radius)
            }
        };
        let Some(updated) = updated else {
            return Ok(false);
        };
        if !erased && self.history.current() != Some(paths.as_slice()) {
            self.history.push(paths.clone());
        }
        commit(&self.surface, &paths, &updated).await?;
        debug!(before = paths.len(), after = updated.len(), ?kind, "erased");
        self.selection = None;
        self.gesture = Gesture::Erasing { kind, erased: true };
        Ok(true)
    }

    async fn key(&mut self, input: KeyInput) -> Result<bool, EditorError> {
        let Some(command) = input.command() else {
            return Ok(false);
        };
        match command {
            KeyCommand::Undo => self.undo().await,
            KeyCommand::Redo => self.redo().await,
            KeyCommand::DeleteSelection => self.delete_selection().await,
            KeyCommand::ClearSelection => {
                self.clear_selection().await?;
                Ok(false)
            }
            KeyCommand::Nudge(key) => self.nudge(&key).await,
        }
    }

    /// Applies one transform step to the selection and rewrites the surface.
    async fn apply_step(&mut self, step: TransformStep) -> Result<bool, EditorError> {
        let Some(selection) = self.selection.clone() else {
            return Ok(false);
        };
        let paths = self.surface.export_paths().await?;
        let updated = step.apply(&paths, &selection.indices);
        commit(&self.surface, &paths, &updated).await?;
        self.selection = step
            .bbox_after(&selection.bbox, &updated, &selection.indices)
            .map(|bbox| Selection {
                indices: selection.indices,
                bbox,
            });
        Ok(true)
    }

    async fn nudge(&mut self, key: &str) -> Result<bool, EditorError> {
        self.end_gesture().await?;
        let Some(step) = self
            .selection
            .as_ref()
            .and_then(|selection| nudge_step(key, &selection.bbox, &self.config))
        else {
            return Ok(false);
        };
        let paths = self.surface.export_paths().await?;
        let mut session = TransformSession::begin(&self.history, paths);
        let changed = self.apply_step(step).await?;
        if changed {
            session.mark_moved();
        }
        if session.finish(&mut self.history) {
            self.snapshot().await?;
        }
        Ok(changed)
    }

    pub async fn delete_selection(&mut self) -> Result<bool, EditorError> {
        self.end_gesture().await?;
        let Some(indices) = self.selection.as_ref().map(|s| s.indices.clone()) else {
            return Ok(false);
        };
        let paths = self.record_baseline().await?;
        let updated = delete_selected_paths(&paths, &indices);
        commit(&self.surface, &paths, &updated).await?;
        self.selection = None;
        self.snapshot().await?;
        debug!(removed = paths.len() - updated.len(), "selection deleted");
        Ok(true)
    }

    pub async fn recolor_selection(&mut self, color: &str) -> Result<bool, EditorError> {
        self.restyle_selection(|paths, selection| {
            recolor_selected_paths(paths, &selection.indices, color)
        })
        .await
    }

    pub async fn restyle_selection_width(&mut self, width: f64) -> Result<bool, EditorError> {
        if !width.is_finite() || width <= 0.0 {
            return Ok(false);
        }
        self.restyle_selection(|paths, selection| {
            restyle_width_selected_paths(paths, &selection.indices, width)
        })
        .await
    }

    async fn restyle_selection<F>(&mut self, restyle: F) -> Result<bool, EditorError>
    where
        F: Fn(&[PathRecord], &Selection) -> Vec<PathRecord>,
    {
        self.end_gesture().await?;
        let Some(selection) = self.selection.clone() else {
            return Ok(false);
        };
        let paths = self.record_baseline().await?;
        let updated = restyle(&paths, &selection);
        commit(&self.surface, &paths, &updated).await?;
        self.selection = compute_selection_bbox(&updated, &selection.indices).map(|bbox| Selection {
            indices: selection.indices,
            bbox,
        });
        self.snapshot().await?;
        Ok(true)
    }

    pub async fn clear_selection(&mut self) -> Result<(), EditorError> {
        self.end_gesture().await?;
        self.selection = None;
        Ok(())
    }

    /// Steps back one snapshot. `false` when already at the oldest one, so the
    /// host can fall back to its own undo.
    pub async fn undo(&mut self) -> Result<bool, EditorError> {
        self.restore(Direction::Back).await
    }

    pub async fn redo(&mut self) -> Result<bool, EditorError> {
        self.restore(Direction::Forward).await
    }

    async fn restore(&mut self, direction: Direction) -> Result<bool, EditorError> {
        self.end_gesture().await?;
        let index = self.history.index();
        let target = match direction {
            Direction::Back => self.history.undo(),
            Direction::Forward => self.history.redo(),
        };
        let Some(target) = target.map(<[PathRecord]>::to_vec) else {
            return Ok(false);
        };
        let current = match self.surface.export_paths().await {
            Ok(current) => current,
            Err(error) => {
                self.history.revert_to(index);
                return Err(error.into());
            }
        };
        if let Err(error) = commit(&self.surface, &current, &target).await {
            self.history.revert_to(index);
            return Err(error.into());
        }
        self.selection = self.selection.take().and_then(|selection| {
            let indices = selection
                .indices
                .into_iter()
                .filter(|index| *index < target.len())
                .collect();
            compute_selection_bbox(&target, &indices).map(|bbox| Selection { indices, bbox })
        });
        debug!(index = self.history.index(), len = self.history.len(), "history restored");
        Ok(true)
    }

    /// Pushes the surface's current paths onto the history.
    pub async fn snapshot(&mut self) -> Result<(), EditorError> {
        let paths = self.surface.export_paths().await?;
        self.history.push(paths);
        Ok(())
    }

    /// Records a change made directly on the surface, such as a pen stroke.
    pub async fn record_external_change(&mut self) -> Result<(), EditorError> {
        self.snapshot().await
    }

    /// Makes sure the state about to be mutated is the current history entry,
    /// and returns it.
    async fn record_baseline(&mut self) -> Result<Vec<PathRecord>, EditorError> {
        let paths = self.surface.export_paths().await?;
        if self.history.current() != Some(paths.as_slice()) {
            self.history.push(paths.clone());
        }
        Ok(paths)
    }
}
