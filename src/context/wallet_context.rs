use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info};

use crate::aggregate::cumulated_value_in_vaults;
use crate::coordinator::LoadingCoordinator;
use crate::models::{Address, BalanceSnapshot, VaultCatalog};
use crate::store::BalanceStore;
use crate::traits::{BalanceSource, LoadingIndicator};
use crate::universe::resolve_token_universe;

/// The composed wallet state published to consumers.
///
/// A new value is sent only when at least one constituent changed, so
/// subscribers can treat every received value as a real update. `version`
/// increments on every accepted write, including replacement with an empty
/// snapshot; `nonce` increments only when a refresh settles without balance
/// data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletView {
    pub balances: BalanceSnapshot,
    pub cumulated_value_in_vaults: f64,
    pub is_loading: bool,
    pub nonce: u64,
    pub version: u64,
}

/// Mutable inputs the context reconciles: connected chain/account and the
/// vault catalog, plus the universe resolved from the catalog.
struct WalletState {
    chain_id: u64,
    account: Option<Address>,
    catalog: VaultCatalog,
    universe: Vec<Address>,
}

/// Orchestrates balance refreshes and distributes the composed wallet state.
///
/// Reconciles three independently-changing inputs (chain/account, vault
/// catalog, balance feed) into one coherent [`WalletView`] published over a
/// watch channel. Consumers must treat received views as read-only.
pub struct WalletContext {
    store: BalanceStore,
    coordinator: Arc<LoadingCoordinator>,
    state: Mutex<WalletState>,
    view_tx: watch::Sender<WalletView>,
}

impl WalletContext {
    /// Create a context for a chain, backed by the injected fetch capability
    /// and loading indicator. The catalog starts out loading and no account
    /// is connected.
    pub fn new(
        chain_id: u64,
        source: Arc<dyn BalanceSource>,
        indicator: Arc<dyn LoadingIndicator>,
    ) -> Self {
        let catalog = VaultCatalog { is_loading: true, ..VaultCatalog::default() };
        let universe = resolve_token_universe(&catalog);
        let (view_tx, _) = watch::channel(WalletView { is_loading: true, ..WalletView::default() });
        Self {
            store: BalanceStore::new(source),
            coordinator: Arc::new(LoadingCoordinator::new(indicator)),
            state: Mutex::new(WalletState { chain_id, account: None, catalog, universe }),
            view_tx,
        }
    }

    /// Subscribe to published wallet views.
    pub fn subscribe(&self) -> watch::Receiver<WalletView> {
        self.view_tx.subscribe()
    }

    /// The most recently published view.
    pub fn view(&self) -> WalletView {
        self.view_tx.borrow().clone()
    }

    /// Connect or disconnect the account.
    ///
    /// Connecting triggers a full refresh. Disconnecting replaces the
    /// chain's snapshot with an empty one (which counts as an empty refresh
    /// outcome and bumps the nonce) so the old account's balances are never
    /// shown.
    pub async fn set_account(&self, account: Option<Address>) -> BalanceSnapshot {
        let chain_id = {
            let mut state = self.state.lock().await;
            if state.account == account {
                return self.store.current(state.chain_id).await;
            }
            state.account = account;
            match account {
                Some(account) => info!(%account, "account connected"),
                None => info!("account disconnected"),
            }
            state.chain_id
        };
        match account {
            Some(_) => self.refresh(None).await,
            None => {
                let snapshot = self.store.clear(chain_id).await;
                self.coordinator.note_refresh_outcome(&snapshot);
                self.publish().await;
                snapshot
            }
        }
    }

    /// Switch the active chain. Triggers a full refresh for the new chain;
    /// responses still pending for the previous chain stay scoped to it.
    pub async fn set_chain(&self, chain_id: u64) -> BalanceSnapshot {
        {
            let mut state = self.state.lock().await;
            if state.chain_id == chain_id {
                return self.store.current(chain_id).await;
            }
            info!(from = state.chain_id, to = chain_id, "switching chain");
            state.chain_id = chain_id;
        }
        self.refresh(None).await
    }

    /// Apply a new vault catalog from the catalog provider.
    ///
    /// Re-resolves the token universe; a full refresh runs only when the
    /// universe actually changed, otherwise the view is just republished
    /// (prices or the catalog loading flag may have moved the aggregate).
    pub async fn update_catalog(&self, catalog: VaultCatalog) -> BalanceSnapshot {
        let universe_changed = {
            let mut state = self.state.lock().await;
            let universe = resolve_token_universe(&catalog);
            state.catalog = catalog;
            if universe == state.universe {
                false
            } else {
                debug!(tokens = universe.len(), "token universe changed");
                state.universe = universe;
                true
            }
        };
        if universe_changed {
            self.refresh(None).await
        } else {
            self.publish().await;
            let state = self.state.lock().await;
            self.store.current(state.chain_id).await
        }
    }

    /// Refresh balances and return the resulting snapshot.
    ///
    /// With `tokens` given, only that subset is re-fetched and merged; with
    /// `None` the whole universe is re-fetched and stale entries dropped.
    /// Calling this before an account is connected is a no-op that returns
    /// the current (possibly empty) snapshot.
    pub async fn refresh(&self, tokens: Option<&[Address]>) -> BalanceSnapshot {
        let (chain_id, account, prices, universe) = {
            let state = self.state.lock().await;
            let Some(account) = state.account else {
                // Still republish so the view reflects the idle coordinator
                // and the current catalog instead of staying stuck loading.
                let chain_id = state.chain_id;
                drop(state);
                self.publish().await;
                return self.store.current(chain_id).await;
            };
            (
                state.chain_id,
                account,
                state.catalog.prices.clone(),
                state.universe.clone(),
            )
        };

        let guard = self.coordinator.begin();
        self.publish().await;

        let snapshot = match tokens {
            Some(subset) => self.store.refresh_some(chain_id, account, subset, &prices).await,
            None => self.store.refresh_all(chain_id, account, &universe, &prices).await,
        };

        self.coordinator.note_refresh_outcome(&snapshot);
        drop(guard);
        self.publish().await;
        snapshot
    }

    /// Recompose the view from the current constituents and send it to
    /// subscribers iff something changed.
    async fn publish(&self) {
        let (balances, catalog) = {
            let state = self.state.lock().await;
            (self.store.current(state.chain_id).await, state.catalog.clone())
        };
        let is_loading = self.coordinator.is_loading();
        let cumulated = cumulated_value_in_vaults(&catalog, &balances, is_loading);
        let nonce = self.coordinator.nonce();

        self.view_tx.send_if_modified(|view| {
            let changed = view.balances != balances
                || view.cumulated_value_in_vaults != cumulated
                || view.is_loading != is_loading
                || view.nonce != nonce;
            if changed {
                view.balances = balances;
                view.cumulated_value_in_vaults = cumulated;
                view.is_loading = is_loading;
                view.nonce = nonce;
                view.version += 1;
            }
            changed
        });
    }
}
