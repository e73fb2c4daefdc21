//! Loading state and invalidation-nonce coordination.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::models::BalanceSnapshot;
use crate::traits::LoadingIndicator;

/// Tracks in-flight refreshes, drives the process-wide loading indicator and
/// owns the invalidation nonce.
///
/// Multiple refreshes may overlap; the indicator is signalled only on the
/// idle-to-loading and loading-to-idle transitions. Each [`LoadingGuard`]
/// settles its refresh on drop, so `done` fires even when a refresh is torn
/// down mid-fetch.
pub struct LoadingCoordinator {
    indicator: Arc<dyn LoadingIndicator>,
    in_flight: AtomicUsize,
    nonce: AtomicU64,
}

impl LoadingCoordinator {
    /// Create a coordinator signalling the given indicator.
    pub fn new(indicator: Arc<dyn LoadingIndicator>) -> Self {
        Self {
            indicator,
            in_flight: AtomicUsize::new(0),
            nonce: AtomicU64::new(0),
        }
    }

    /// Enter the loading state for one refresh.
    pub fn begin(self: &Arc<Self>) -> LoadingGuard {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            self.indicator.start();
        }
        LoadingGuard { coordinator: Arc::clone(self) }
    }

    /// Whether any refresh is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Current invalidation nonce.
    pub fn nonce(&self) -> u64 {
        self.nonce.load(Ordering::SeqCst)
    }

    /// Record the outcome of a completed refresh.
    ///
    /// A refresh that settles with an empty snapshot bumps the nonce so
    /// consumers keyed on snapshot identity still observe a change
    /// (distinguishes "legitimately empty" from "never loaded").
    pub fn note_refresh_outcome(&self, snapshot: &BalanceSnapshot) {
        if snapshot.is_empty() {
            let nonce = self.nonce.fetch_add(1, Ordering::SeqCst) + 1;
            debug!(nonce, "refresh settled without balance data");
        }
    }
}

/// RAII handle for one in-flight refresh.
pub struct LoadingGuard {
    coordinator: Arc<LoadingCoordinator>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if self.coordinator.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.coordinator.indicator.done();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, BalanceEntry};

    #[derive(Default)]
    struct CountingIndicator {
        starts: AtomicUsize,
        dones: AtomicUsize,
    }

    impl LoadingIndicator for CountingIndicator {
        fn start(&self) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn done(&self) {
            self.dones.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn overlapping_refreshes_signal_one_transition() {
        let indicator = Arc::new(CountingIndicator::default());
        let coordinator = Arc::new(LoadingCoordinator::new(indicator.clone()));

        let g1 = coordinator.begin();
        let g2 = coordinator.begin();
        assert!(coordinator.is_loading());
        assert_eq!(indicator.starts.load(Ordering::SeqCst), 1);

        drop(g1);
        assert!(coordinator.is_loading());
        assert_eq!(indicator.dones.load(Ordering::SeqCst), 0);

        drop(g2);
        assert!(!coordinator.is_loading());
        assert_eq!(indicator.dones.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn nonce_bumps_only_on_empty_outcome() {
        let coordinator =
            Arc::new(LoadingCoordinator::new(Arc::new(CountingIndicator::default())));
        assert_eq!(coordinator.nonce(), 0);

        coordinator.note_refresh_outcome(&BalanceSnapshot::new());
        assert_eq!(coordinator.nonce(), 1);

        let mut snapshot = BalanceSnapshot::new();
        snapshot.insert(Address::new([1; 20]), BalanceEntry::new(1, 18, 0.0));
        coordinator.note_refresh_outcome(&snapshot);
        assert_eq!(coordinator.nonce(), 1);
    }
}
