use inkpad_shared::PathRecord;

/// Linear undo/redo stack of whole path-list snapshots.
///
/// Once a snapshot exists `index` always points at the current one; entries
/// after it are redo history and are dropped by the next `push`.
#[derive(Clone, Debug)]
pub struct History {
    snapshots: Vec<Vec<PathRecord>>,
    index: usize,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            index: 0,
            limit: limit.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&[PathRecord]> {
        self.snapshots.get(self.index).map(Vec::as_slice)
    }

    pub fn push(&mut self, snapshot: Vec<PathRecord>) {
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.index + 1);
        }
        self.snapshots.push(snapshot);
        if self.snapshots.len() > self.limit {
            let overflow = self.snapshots.len() - self.limit;
            self.snapshots.drain(0..overflow);
        }
        self.index = self.snapshots.len() - 1;
    }

    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty() && self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.snapshots.is_empty() && self.index + 1 < self.snapshots.len()
    }

    /// Steps back and returns the snapshot to restore.
    pub fn undo(&mut self) -> Option<&[PathRecord]> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.current()
    }

    pub fn redo(&mut self) -> Option<&[PathRecord]> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.current()
    }

    /// Moves the cursor back without restoring, used when restoring failed.
    pub(crate) fn revert_to(&mut self, index: usize) {
        if index < self.snapshots.len() {
            self.index = index;
        }
    }
}

/// Bracket around one continuous drag/resize/rotate gesture.
///
/// `begin` holds on to the pre-gesture paths when history does not already
/// end with them. Frames rewrite the surface without touching history, and
/// `finish` pushes the held baseline only if some frame moved something.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformSession {
    baseline: Option<Vec<PathRecord>>,
    moved: bool,
}

impl TransformSession {
    pub fn begin(history: &History, paths: Vec<PathRecord>) -> Self {
        let baseline = (history.current() != Some(paths.as_slice())).then_some(paths);
        Self {
            baseline,
            moved: false,
        }
    }

    pub fn mark_moved(&mut self) {
        self.moved = true;
    }

    /// Closes the session. Returns whether the caller owes a snapshot of the
    /// final state.
    pub fn finish(self, history: &mut History) -> bool {
        if !self.moved {
            return false;
        }
        if let Some(baseline) = self.baseline {
            history.push(baseline);
        }
        true
    }
}
