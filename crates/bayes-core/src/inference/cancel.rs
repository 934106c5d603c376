use crate::error::InferenceError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Query-scoped abort flag shared between a caller and a running engine.
///
/// Cloning yields a handle to the same flag. Engines poll it periodically and return
/// [`InferenceError::Cancelled`], dropping their local accumulators.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub(crate) fn check(&self) -> Result<(), InferenceError> {
        if self.is_cancelled() {
            Err(InferenceError::Cancelled)
        } else {
            Ok(())
        }
    }
}
