//! Aggregate value derivation over the balance snapshot.

use crate::models::{BalanceSnapshot, VaultCatalog};

/// Sum of `normalized_value` over snapshot entries that are a vault's own
/// share token.
///
/// Returns 0 while either the catalog or the balances are still loading, so
/// a partially fetched snapshot never shows up as a misleadingly low total.
/// Underlying deposit tokens and the native asset are excluded. No rounding
/// or currency conversion happens here.
pub fn cumulated_value_in_vaults(
    catalog: &VaultCatalog,
    balances: &BalanceSnapshot,
    balances_loading: bool,
) -> f64 {
    if catalog.is_loading || balances_loading {
        return 0.0;
    }

    balances
        .iter()
        .filter(|(address, _)| catalog.vault(address).is_some())
        .map(|(_, entry)| entry.normalized_value)
        .sum()
}
