use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag that asks a `RunLoop` to stop before its next frame.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Decides whether another frame should run. Frames are atomic: cancelling
/// mid-frame takes effect at the next `tick`.
#[derive(Debug)]
pub struct RunLoop {
    token: CancellationToken,
    frame_budget: Option<u64>,
    frames_run: u64,
}

impl RunLoop {
    pub fn new(token: CancellationToken) -> Self {
        RunLoop {
            token,
            frame_budget: None,
            frames_run: 0,
        }
    }

    /// Stops the loop on its own after `budget` frames.
    pub fn with_frame_budget(mut self, budget: Option<u64>) -> Self {
        self.frame_budget = budget;
        self
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    pub fn is_live(&self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        match self.frame_budget {
            Some(budget) => self.frames_run < budget,
            None => true,
        }
    }

    /// Runs `frame` once if the loop is still live, and reports whether it ran.
    pub fn tick<F: FnOnce()>(&mut self, frame: F) -> bool {
        if !self.is_live() {
            return false;
        }
        frame();
        self.frames_run += 1;
        true
    }

    /// Keeps calling `frame` until cancelled or out of budget. Without a budget
    /// this only returns once something cancels the token.
    pub fn run<F: FnMut()>(&mut self, mut frame: F) -> u64 {
        while self.tick(&mut frame) {}
        self.frames_run
    }
}
