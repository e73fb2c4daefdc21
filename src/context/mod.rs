//! Wallet context: refresh orchestration and state distribution.

pub mod wallet_context;

pub use wallet_context::{WalletContext, WalletView};
