//! # meet-db
//!
//! Persistence layer implementing the repository traits of `meet-core`.
//!
//! ## Overview
//!
//! Two interchangeable backends:
//!
//! - [`MemoryStore`]: DashMap-backed, used when no database is configured
//! - `Pg*Repository`: PostgreSQL via SQLx, tables created by [`ensure_schema`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meet_db::{create_pool, ensure_schema, PgCandidateRepository, PoolConfig};
//!
//! async fn example(url: &str) -> Result<(), sqlx::Error> {
//!     let pool = create_pool(&PoolConfig::new(url)).await?;
//!     ensure_schema(&pool).await?;
//!     let candidates = PgCandidateRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, ensure_schema, PgPool, PoolConfig};
pub use repositories::{
    PgCandidateRepository, PgMeetingRepository, PgMessageRepository, PgSelectionRepository,
    PgVoteRepository,
};
