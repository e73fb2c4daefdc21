//! Data models for the vault wallet

pub mod address;
pub mod balance;
pub mod vault;

// Re-export for convenience
pub use address::{Address, NATIVE_TOKEN_ADDRESS};
pub use balance::{BalanceEntry, BalanceSnapshot};
pub use vault::{VaultCatalog, VaultCatalogEntry};
