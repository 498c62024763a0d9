//! In-process repository implementations
//!
//! Used when no database is configured and throughout the test suites.

mod store;

pub use store::MemoryStore;
