//! # Murmur Repository
//!
//! Data access for the Murmur social API.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn PostRepository>   (repository trait)
//! PgPostRepository               (SQLx / PostgreSQL)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! PostgreSQL
//! ```
//!
//! With the `test-util` feature, [`InMemoryStore`] implements every trait
//! against process memory.

pub mod pool;
pub mod postgres;
pub mod traits;

#[cfg(any(test, feature = "test-util"))]
pub mod memory;

pub use pool::*;
pub use postgres::*;
pub use traits::*;

#[cfg(any(test, feature = "test-util"))]
pub use memory::InMemoryStore;
