use tracing::debug;

use crate::traits::LoadingIndicator;

/// Loading indicator that logs transitions to the console.
pub struct ConsoleLoadingIndicator;

impl ConsoleLoadingIndicator {
    /// Create a new console loading indicator.
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleLoadingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingIndicator for ConsoleLoadingIndicator {
    fn start(&self) {
        debug!("balance refresh started");
    }

    fn done(&self) {
        debug!("balance refresh done");
    }
}
