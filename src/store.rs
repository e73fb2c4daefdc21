//! Balance snapshot store with per-chain, per-token recency sequencing.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::models::{Address, BalanceSnapshot};
use crate::traits::BalanceSource;

/// Per-chain balance state.
///
/// `applied` records, for each token, the sequence number of the request
/// whose response last wrote that entry. A response is only applied when its
/// sequence is at least as new, so a slow response to an old request can
/// never overwrite a newer result (recency wins, not completion order).
#[derive(Debug, Default)]
struct ChainBalances {
    entries: BalanceSnapshot,
    applied: HashMap<Address, u64>,
    last_full_seq: u64,
    /// Responses older than this are dropped outright; raised when the
    /// snapshot is cleared so fetches still in flight for a disconnected
    /// account cannot resurrect its balances.
    floor_seq: u64,
    last_refresh: Option<DateTime<Utc>>,
}

impl ChainBalances {
    fn apply(&mut self, requested: &[Address], mut fetched: BalanceSnapshot, seq: u64) {
        if seq < self.floor_seq {
            debug!(seq, floor = self.floor_seq, "discarding response from before snapshot clear");
            return;
        }
        for token in requested {
            let Some(entry) = fetched.remove(token) else {
                // Soft failure: token missing from the response keeps its
                // previous value (or stays absent).
                continue;
            };
            let last = self.applied.get(token).copied().unwrap_or(0);
            if seq >= last {
                self.entries.insert(*token, entry);
                self.applied.insert(*token, seq);
            } else {
                debug!(token = %token, seq, last, "discarding stale balance response");
            }
        }
    }
}

/// Holds the balance snapshot per chain and serializes updates to it.
///
/// Fetches run outside the lock; results are applied under one lock
/// acquisition, so callers never observe a half-written snapshot. Storage is
/// keyed by chain id, so a response belonging to a chain the user has since
/// left lands in that chain's map and never leaks into the active one.
pub struct BalanceStore {
    source: Arc<dyn BalanceSource>,
    chains: Mutex<HashMap<u64, ChainBalances>>,
    next_seq: AtomicU64,
}

impl BalanceStore {
    /// Create a store backed by the given fetch capability.
    pub fn new(source: Arc<dyn BalanceSource>) -> Self {
        Self {
            source,
            chains: Mutex::new(HashMap::new()),
            next_seq: AtomicU64::new(1),
        }
    }

    /// Current snapshot for a chain (empty if never refreshed).
    pub async fn current(&self, chain_id: u64) -> BalanceSnapshot {
        let chains = self.chains.lock().await;
        chains.get(&chain_id).map(|c| c.entries.clone()).unwrap_or_default()
    }

    /// When the snapshot for a chain was last refreshed.
    pub async fn last_refresh(&self, chain_id: u64) -> Option<DateTime<Utc>> {
        let chains = self.chains.lock().await;
        chains.get(&chain_id).and_then(|c| c.last_refresh)
    }

    /// Drop every entry for a chain, returning the (empty) snapshot.
    ///
    /// Used when the account disconnects: the old account's balances must
    /// not survive, and responses still in flight for it are fenced out via
    /// the sequence floor.
    pub async fn clear(&self, chain_id: u64) -> BalanceSnapshot {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let mut chains = self.chains.lock().await;
        let chain = chains.entry(chain_id).or_default();
        chain.entries.clear();
        chain.applied.clear();
        chain.last_full_seq = seq;
        chain.floor_seq = seq;
        chain.last_refresh = Some(Utc::now());
        chain.entries.clone()
    }

    /// Re-fetch every token in `tokens` and replace the chain's snapshot.
    ///
    /// After this resolves the snapshot contains exactly the requested
    /// tokens (minus soft failures that were never present); entries for
    /// tokens outside the set are dropped. A full refresh superseded by a
    /// newer full refresh on the same chain is discarded wholesale.
    pub async fn refresh_all(
        &self,
        chain_id: u64,
        account: Address,
        tokens: &[Address],
        prices: &HashMap<Address, f64>,
    ) -> BalanceSnapshot {
        let requested = dedupe(tokens);
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let fetched = self.fetch(chain_id, account, &requested, prices).await;

        let mut chains = self.chains.lock().await;
        let chain = chains.entry(chain_id).or_default();

        if seq < chain.last_full_seq {
            debug!(chain_id, seq, "discarding superseded full refresh");
            return chain.entries.clone();
        }
        chain.last_full_seq = seq;

        if let Some(fetched) = fetched {
            chain.apply(&requested, fetched, seq);
        }

        // Full-replacement invariant: drop stale entries for tokens no
        // longer in the universe, unless a newer request wrote them.
        let requested_set: HashSet<Address> = requested.iter().copied().collect();
        let stale: Vec<Address> = chain
            .entries
            .keys()
            .filter(|addr| {
                !requested_set.contains(*addr)
                    && chain.applied.get(*addr).copied().unwrap_or(0) <= seq
            })
            .copied()
            .collect();
        for addr in stale {
            chain.entries.remove(&addr);
            chain.applied.remove(&addr);
        }

        chain.last_refresh = Some(Utc::now());
        chain.entries.clone()
    }

    /// Re-fetch only the given subset and merge it into the snapshot.
    ///
    /// Entries outside the subset are left untouched. Returns the full
    /// post-merge snapshot.
    pub async fn refresh_some(
        &self,
        chain_id: u64,
        account: Address,
        tokens: &[Address],
        prices: &HashMap<Address, f64>,
    ) -> BalanceSnapshot {
        let requested = dedupe(tokens);
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let fetched = self.fetch(chain_id, account, &requested, prices).await;

        let mut chains = self.chains.lock().await;
        let chain = chains.entry(chain_id).or_default();
        if let Some(fetched) = fetched {
            chain.apply(&requested, fetched, seq);
        }
        chain.last_refresh = Some(Utc::now());
        chain.entries.clone()
    }

    async fn fetch(
        &self,
        chain_id: u64,
        account: Address,
        tokens: &[Address],
        prices: &HashMap<Address, f64>,
    ) -> Option<BalanceSnapshot> {
        if tokens.is_empty() {
            return Some(BalanceSnapshot::new());
        }
        match self.source.fetch_balances(chain_id, account, tokens, prices).await {
            Ok(fetched) => Some(fetched),
            Err(e) => {
                // Transient failure: keep previous entries, still resolve.
                warn!(chain_id, error = %e, "balance fetch failed, keeping previous entries");
                None
            }
        }
    }
}

fn dedupe(tokens: &[Address]) -> Vec<Address> {
    let mut seen = HashSet::with_capacity(tokens.len());
    tokens.iter().copied().filter(|t| seen.insert(*t)).collect()
}
