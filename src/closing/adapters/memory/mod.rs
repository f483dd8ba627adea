//! In-memory adapter for closing workflow tests and single-process hosts.

mod store;

pub use store::InMemoryClosingStore;
