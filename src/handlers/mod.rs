//! Loading indicator implementations

pub mod console;
pub mod composite;

pub use console::ConsoleLoadingIndicator;
pub use composite::CompositeLoadingIndicator;
