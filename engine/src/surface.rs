use std::cell::RefCell;

use async_trait::async_trait;
use inkpad_shared::{ExportedPaths, PathRecord};
use tracing::{error, warn};

use crate::error::SurfaceError;

/// The drawing surface that owns the rendered strokes.
///
/// The engine only ever reads the complete list and writes a complete list
/// back; there is no partial update.
#[async_trait(?Send)]
pub trait CanvasSurface {
    async fn export_paths(&self) -> Result<Vec<PathRecord>, SurfaceError>;
    async fn load_paths(&self, paths: &[PathRecord]) -> Result<(), SurfaceError>;
    async fn clear_canvas(&self) -> Result<(), SurfaceError>;
}

/// Parses whatever `exportPaths()` resolved to.
pub fn decode_export(value: serde_json::Value) -> Result<Vec<PathRecord>, SurfaceError> {
    serde_json::from_value::<ExportedPaths>(value)
        .map(ExportedPaths::into_records)
        .map_err(|e| SurfaceError::Decode(e.to_string()))
}

/// Replaces the surface content with `paths`.
///
/// If loading fails after the clear went through, `previous` is loaded back so
/// the surface is not left empty.
pub async fn commit<S>(
    surface: &S,
    previous: &[PathRecord],
    paths: &[PathRecord],
) -> Result<(), SurfaceError>
where
    S: CanvasSurface + ?Sized,
{
    surface.clear_canvas().await?;
    if let Err(load_error) = surface.load_paths(paths).await {
        warn!(%load_error, "loadPaths failed after clear, restoring previous paths");
        if let Err(restore_error) = surface.load_paths(previous).await {
            error!(%restore_error, "could not restore previous paths");
        }
        return Err(load_error);
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceOp {
    Export,
    Load,
    Clear,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    Export,
    Load(usize),
    Clear,
}

/// In-memory surface for native hosts and tests. Records every call and can
/// be told to fail upcoming operations.
#[derive(Debug, Default)]
pub struct MemorySurface {
    paths: RefCell<Vec<PathRecord>>,
    calls: RefCell<Vec<SurfaceCall>>,
    failures: RefCell<Vec<SurfaceOp>>,
}

impl MemorySurface {
    pub fn new(paths: Vec<PathRecord>) -> Self {
        Self {
            paths: RefCell::new(paths),
            ..Self::default()
        }
    }

    pub fn paths(&self) -> Vec<PathRecord> {
        self.paths.borrow().clone()
    }

    /// Simulates a stroke drawn directly on the surface.
    pub fn push_path(&self, path: PathRecord) {
        self.paths.borrow_mut().push(path);
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.borrow().clone()
    }

    pub fn fail_next(&self, op: SurfaceOp) {
        self.failures.borrow_mut().push(op);
    }

    fn take_failure(&self, op: SurfaceOp) -> bool {
        let mut failures = self.failures.borrow_mut();
        if let Some(position) = failures.iter().position(|pending| *pending == op) {
            failures.remove(position);
            return true;
        }
        false
    }
}

#[async_trait(?Send)]
impl CanvasSurface for MemorySurface {
    async fn export_paths(&self) -> Result<Vec<PathRecord>, SurfaceError> {
        self.calls.borrow_mut().push(SurfaceCall::Export);
        if self.take_failure(SurfaceOp::Export) {
            return Err(SurfaceError::Export("injected failure".to_string()));
        }
        Ok(self.paths.borrow().clone())
    }

    async fn load_paths(&self, paths: &[PathRecord]) -> Result<(), SurfaceError> {
        self.calls.borrow_mut().push(SurfaceCall::Load(paths.len()));
        if self.take_failure(SurfaceOp::Load) {
            return Err(SurfaceError::Load("injected failure".to_string()));
        }
        self.paths.borrow_mut().extend(paths.iter().cloned());
        Ok(())
    }

    async fn clear_canvas(&self) -> Result<(), SurfaceError> {
        self.calls.borrow_mut().push(SurfaceCall::Clear);
        if self.take_failure(SurfaceOp::Clear) {
            return Err(SurfaceError::Clear("injected failure".to_string()));
        }
        self.paths.borrow_mut().clear();
        Ok(())
    }
}
