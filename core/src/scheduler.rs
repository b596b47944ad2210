#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FrameState {
    #[default]
    Idle,
    Scheduled,
}

/// Tracks whether an animation frame is pending. The host asks for a frame
/// only when `request` returns true, and reports back through `finish_frame`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameScheduler {
    state: FrameState,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn is_scheduled(&self) -> bool {
        self.state == FrameState::Scheduled
    }

    pub fn request(&mut self) -> bool {
        match self.state {
            FrameState::Idle => {
                self.state = FrameState::Scheduled;
                true
            }
            FrameState::Scheduled => false,
        }
    }

    /// Called after a frame ran. Re-arms iff there is continuing work;
    /// returns whether another frame is wanted.
    pub fn finish_frame(&mut self, has_work: bool) -> bool {
        self.state = FrameState::Idle;
        if has_work {
            self.request()
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.state = FrameState::Idle;
    }
}

/// One-shot deadline in host milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Deadline {
    due_ms: Option<f64>,
}

impl Deadline {
    pub fn arm(&mut self, due_ms: f64) {
        self.due_ms = Some(due_ms);
    }

    pub fn due_ms(&self) -> Option<f64> {
        self.due_ms
    }

    pub fn is_armed(&self) -> bool {
        self.due_ms.is_some()
    }

    /// Fires at most once: true the first time `now_ms` reaches the deadline.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.due_ms {
            Some(due) if now_ms >= due => {
                self.due_ms = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_only_reports_the_first_transition() {
        let mut scheduler = FrameScheduler::new();
        assert!(scheduler.request());
        assert!(!scheduler.request());
        assert_eq!(scheduler.state(), FrameState::Scheduled);
    }

    #[test]
    fn finish_frame_rearms_only_with_work() {
        let mut scheduler = FrameScheduler::new();
        scheduler.request();
        assert!(scheduler.finish_frame(true));
        assert!(scheduler.is_scheduled());
        assert!(!scheduler.finish_frame(false));
        assert_eq!(scheduler.state(), FrameState::Idle);
        assert!(scheduler.request());
    }

    #[test]
    fn deadline_fires_once() {
        let mut deadline = Deadline::default();
        deadline.arm(100.0);
        assert!(!deadline.poll(99.0));
        assert!(deadline.poll(100.0));
        assert!(!deadline.poll(200.0));
        assert!(!deadline.is_armed());
    }
}
