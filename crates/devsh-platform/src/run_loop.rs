//! Run-loop control flag.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::services::RunLoop;

/// A [`RunLoop`] that is just an atomic "keep going" flag. The owner polls
/// [`RunLoop::is_running`] between lines.
#[derive(Debug)]
pub struct FlagRunLoop {
    running: AtomicBool,
}

impl FlagRunLoop {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
        }
    }
}

impl Default for FlagRunLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RunLoop for FlagRunLoop {
    fn stop(&self) {
        log::debug!("run loop: stop requested");
        self.running.store(false, Ordering::SeqCst);
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
