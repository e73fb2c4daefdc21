//! Balance source implementations

pub mod static_source;

pub use static_source::StaticBalanceSource;
