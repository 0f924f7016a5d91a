mod backend;
mod store;

pub use backend::*;
pub use store::*;

/// Slot the transaction snapshot lives under.
pub const STORAGE_KEY: &str = "budgetApp.transactions";
