//! Core traits for the vault wallet

pub mod balance_source;
pub mod loading_indicator;

// Re-export for convenience
pub use balance_source::BalanceSource;
pub use loading_indicator::LoadingIndicator;
