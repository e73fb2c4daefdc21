use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::address::Address;

/// Mapping from token address to balance data for the active chain/account.
pub type BalanceSnapshot = HashMap<Address, BalanceEntry>;

/// Balance data for one token on the active chain/account.
///
/// Entries are replaced wholesale on refresh, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceEntry {
    /// Raw integer amount as reported on chain.
    pub raw: u128,
    /// Human-readable quantity: raw / 10^decimals.
    pub normalized: f64,
    pub decimals: u8,
    /// Normalized amount priced in the upstream denomination.
    pub normalized_value: f64,
}

impl BalanceEntry {
    /// Build an entry from a raw amount, its decimals and a unit price.
    pub fn new(raw: u128, decimals: u8, price: f64) -> Self {
        let normalized = raw as f64 / 10f64.powi(decimals as i32);
        Self {
            raw,
            normalized,
            decimals,
            normalized_value: normalized * price,
        }
    }

    /// Check for a zero raw amount.
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }
}
