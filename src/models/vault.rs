use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::address::Address;

/// One vault in the catalog.
///
/// The universe resolver reads only the two addresses: the vault's own share
/// token and the underlying token deposited into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultCatalogEntry {
    /// Address of the vault's own (share) token.
    pub address: Address,
    /// Address of the underlying deposit token.
    pub token: Address,
    pub name: Option<String>,
}

/// Read-only input from the vault catalog provider.
///
/// `vaults` is keyed by the vault's own token address. `prices` maps token
/// addresses to prices in a consistent upstream denomination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultCatalog {
    #[serde(default)]
    pub vaults: HashMap<Address, VaultCatalogEntry>,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default)]
    pub prices: HashMap<Address, f64>,
}

impl VaultCatalog {
    /// Look up a vault by its own token address.
    pub fn vault(&self, address: &Address) -> Option<&VaultCatalogEntry> {
        self.vaults.get(address)
    }

    /// Price for a token, 0 when unknown.
    pub fn price(&self, address: &Address) -> f64 {
        self.prices.get(address).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_by_vault_token_address() {
        let vault = Address::new([0xa; 20]);
        let underlying = Address::new([0xb; 20]);
        let mut catalog = VaultCatalog::default();
        catalog.vaults.insert(
            vault,
            VaultCatalogEntry { address: vault, token: underlying, name: None },
        );
        catalog.prices.insert(vault, 1.08);

        assert!(catalog.vault(&vault).is_some());
        assert!(catalog.vault(&underlying).is_none());
        assert_eq!(catalog.price(&vault), 1.08);
        assert_eq!(catalog.price(&underlying), 0.0);
    }
}
