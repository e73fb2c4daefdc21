use std::sync::Arc;

use crate::traits::LoadingIndicator;

/// Fans loading transitions out to multiple indicators.
pub struct CompositeLoadingIndicator {
    indicators: Vec<Arc<dyn LoadingIndicator>>,
}

impl CompositeLoadingIndicator {
    /// Create an empty composite indicator.
    pub fn new() -> Self {
        Self { indicators: Vec::new() }
    }

    /// Add an indicator to the composite.
    pub fn add(mut self, indicator: Arc<dyn LoadingIndicator>) -> Self {
        self.indicators.push(indicator);
        self
    }
}

impl Default for CompositeLoadingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingIndicator for CompositeLoadingIndicator {
    fn start(&self) {
        for indicator in &self.indicators {
            indicator.start();
        }
    }

    fn done(&self) {
        for indicator in &self.indicators {
            indicator.done();
        }
    }
}
