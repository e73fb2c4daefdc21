//! Token universe resolution: which tokens need balances tracked.

use crate::models::{Address, VaultCatalog, NATIVE_TOKEN_ADDRESS};

/// Derive the token addresses to track from the vault catalog.
///
/// While the catalog is loading this returns an empty list so that no
/// speculative fetch happens. Otherwise each vault contributes its own share
/// token and its underlying deposit token, and the chain's native asset
/// placeholder is appended last. Duplicates are allowed here; the store
/// de-duplicates before fetching.
///
/// Pure and side-effect free, so callers may recompute it on every input
/// change and compare the output to decide whether a refetch is needed.
pub fn resolve_token_universe(catalog: &VaultCatalog) -> Vec<Address> {
    if catalog.is_loading {
        return Vec::new();
    }

    let mut tokens = Vec::with_capacity(catalog.vaults.len() * 2 + 1);
    for vault in catalog.vaults.values() {
        tokens.push(vault.address);
        tokens.push(vault.token);
    }
    tokens.push(NATIVE_TOKEN_ADDRESS);
    tokens
}
