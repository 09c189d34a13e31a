//! Cooperative cancellation.
//!
//! The interrupt handler only flips a flag. Prompts and the batch loop poll
//! it between steps, so a commit that has started always runs to completion.

use crate::error::{Result, TagfixError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Yield point: fails with `UserInterrupt` once cancelled.
    pub fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(TagfixError::UserInterrupt)
        } else {
            Ok(())
        }
    }

    /// Route SIGINT / Ctrl-C into this token.
    pub fn install_interrupt_handler(&self) -> std::result::Result<(), ctrlc::Error> {
        let token = self.clone();
        ctrlc::set_handler(move || {
            log::info!("Interrupt received");
            token.cancel();
        })
    }
}
