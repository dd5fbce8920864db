use inkpad_shared::Point;

/// Coalesces pointer moves into at most one pass per animation frame.
///
/// `offer` keeps only the newest point; it asks the caller to schedule a frame
/// only when none is already in flight.
#[derive(Clone, Debug, Default)]
pub struct FrameThrottle {
    latest: Option<Point>,
    scheduled: bool,
}

impl FrameThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when a frame callback must be requested.
    pub fn offer(&mut self, point: Point) -> bool {
        self.latest = Some(point);
        if self.scheduled {
            return false;
        }
        self.scheduled = true;
        true
    }

    /// Called from the frame callback.
    pub fn take(&mut self) -> Option<Point> {
        self.scheduled = false;
        self.latest.take()
    }
}
