//! End-to-end scenarios: chain switches racing in-flight refreshes, and
//! loading indicator pairing across a full connect/refresh flow.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{oneshot, Notify};

use vault_wallet::models::{
    Address, BalanceEntry, BalanceSnapshot, VaultCatalog, VaultCatalogEntry,
};
use vault_wallet::traits::{BalanceSource, LoadingIndicator};
use vault_wallet::{StaticBalanceSource, WalletContext};

fn addr(n: u8) -> Address {
    Address::new([n; 20])
}

const ACCOUNT: Address = Address::new([0x77; 20]);

fn catalog_with_vault(vault: Address, underlying: Address) -> VaultCatalog {
    let mut catalog = VaultCatalog::default();
    catalog.vaults.insert(
        vault,
        VaultCatalogEntry { address: vault, token: underlying, name: None },
    );
    catalog
}

fn snapshot_of(entries: &[(Address, f64)]) -> BalanceSnapshot {
    entries
        .iter()
        .map(|&(token, normalized)| {
            (
                token,
                BalanceEntry { raw: 1, normalized, decimals: 18, normalized_value: normalized },
            )
        })
        .collect()
}

/// Balance source that serves scripted responses, each held back until its
/// gate fires, so the test controls completion order.
struct ScriptedSource {
    calls: Mutex<VecDeque<(oneshot::Receiver<()>, BalanceSnapshot)>>,
    started: AtomicUsize,
    notify: Notify,
}

impl ScriptedSource {
    fn new() -> Self {
        Self {
            calls: Mutex::new(VecDeque::new()),
            started: AtomicUsize::new(0),
            notify: Notify::new(),
        }
    }

    fn push(&self, result: BalanceSnapshot) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().unwrap().push_back((rx, result));
        tx
    }

    async fn wait_for_calls(&self, n: usize) {
        loop {
            let notified = self.notify.notified();
            if self.started.load(Ordering::SeqCst) >= n {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl BalanceSource for ScriptedSource {
    async fn fetch_balances(
        &self,
        _chain_id: u64,
        _account: Address,
        _tokens: &[Address],
        _prices: &HashMap<Address, f64>,
    ) -> anyhow::Result<BalanceSnapshot> {
        let (gate, result) = self
            .calls
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted fetch call");
        self.started.fetch_add(1, Ordering::SeqCst);
        self.notify.notify_waiters();
        let _ = gate.await;
        Ok(result)
    }
}

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

struct NoopIndicator;

impl LoadingIndicator for NoopIndicator {
    fn start(&self) {}
    fn done(&self) {}
}

#[tokio::test]
async fn pending_refresh_for_old_chain_never_populates_new_chain() {
    let vault = addr(0xa);
    let underlying = addr(0xb);
    let source = Arc::new(ScriptedSource::new());
    let ctx = Arc::new(WalletContext::new(1, source.clone(), Arc::new(NoopIndicator)));

    ctx.update_catalog(catalog_with_vault(vault, underlying)).await;

    // Chain 1 refresh hangs; chain 10 refresh completes first.
    let gate_chain_1 = source.push(snapshot_of(&[(vault, 1.0)]));
    let gate_chain_10 = source.push(snapshot_of(&[(underlying, 2.0)]));

    let ctx_connect = ctx.clone();
    let connect = tokio::spawn(async move { ctx_connect.set_account(Some(ACCOUNT)).await });
    source.wait_for_calls(1).await;

    let ctx_switch = ctx.clone();
    let switch = tokio::spawn(async move { ctx_switch.set_chain(10).await });
    source.wait_for_calls(2).await;

    gate_chain_10.send(()).unwrap();
    let chain_10 = switch.await.unwrap();
    assert!(chain_10.contains_key(&underlying));
    assert!(!chain_10.contains_key(&vault));

    // The late chain-1 response lands in the chain-1 snapshot only.
    gate_chain_1.send(()).unwrap();
    let chain_1 = connect.await.unwrap();
    assert!(chain_1.contains_key(&vault));

    let view = ctx.view();
    assert!(!view.balances.contains_key(&vault));
    assert!(view.balances.contains_key(&underlying));
}

#[tokio::test]
async fn refreshes_pair_indicator_transitions() {
    let vault = addr(0xa);
    let underlying = addr(0xb);
    let indicator = Arc::new(CountingIndicator::default());
    let source = StaticBalanceSource::new();
    source.set_balance(1, ACCOUNT, vault, 1_000_000, 6);
    source.set_balance(1, ACCOUNT, underlying, 2_000_000, 6);
    let ctx = WalletContext::new(1, Arc::new(source), indicator.clone());

    ctx.update_catalog(catalog_with_vault(vault, underlying)).await;
    ctx.set_account(Some(ACCOUNT)).await;
    ctx.refresh(Some(&[vault])).await;

    // One start/done pair per settled refresh, none left dangling.
    assert_eq!(indicator.starts.load(Ordering::SeqCst), 2);
    assert_eq!(indicator.dones.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn max_action_refreshes_single_token() {
    let vault = addr(0xa);
    let underlying = addr(0xb);
    let source = Arc::new(StaticBalanceSource::new());
    source.set_balance(1, ACCOUNT, vault, 1_000_000, 6);
    source.set_balance(1, ACCOUNT, underlying, 2_000_000, 6);
    let ctx = WalletContext::new(1, source.clone(), Arc::new(NoopIndicator));

    ctx.update_catalog(catalog_with_vault(vault, underlying)).await;
    ctx.set_account(Some(ACCOUNT)).await;

    // User hits "Max" after a deposit changed the underlying balance.
    source.set_balance(1, ACCOUNT, underlying, 9_000_000, 6);
    let after = ctx.refresh(Some(&[underlying])).await;

    assert_eq!(after[&underlying].normalized, 9.0);
    assert_eq!(after[&vault].normalized, 1.0);
}
