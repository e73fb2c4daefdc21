//! Vault Wallet Library
//!
//! Balance aggregation and refresh orchestration for a DeFi vault wallet
//! view: resolves the set of tokens worth tracking from the vault catalog,
//! keeps a per-chain balance snapshot consistent across full and partial
//! refreshes, derives the cumulated value deposited in vaults, and publishes
//! the composed state to any number of consumers.

// Public modules - these are the API surface
pub mod models;
pub mod traits;
pub mod providers;
pub mod handlers;
pub mod universe;
pub mod aggregate;
pub mod store;
pub mod coordinator;
pub mod context;
pub mod utils;

// Re-export commonly used items for easier access
pub use models::{
    address::{Address, NATIVE_TOKEN_ADDRESS},
    balance::{BalanceEntry, BalanceSnapshot},
    vault::{VaultCatalog, VaultCatalogEntry},
};
pub use traits::{balance_source::BalanceSource, loading_indicator::LoadingIndicator};
pub use providers::static_source::StaticBalanceSource;
pub use handlers::{composite::CompositeLoadingIndicator, console::ConsoleLoadingIndicator};
pub use universe::resolve_token_universe;
pub use aggregate::cumulated_value_in_vaults;
pub use store::BalanceStore;
pub use coordinator::{LoadingCoordinator, LoadingGuard};
pub use context::wallet_context::{WalletContext, WalletView};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for library functions
pub type Result<T> = std::result::Result<T, anyhow::Error>;
