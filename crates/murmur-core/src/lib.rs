//! # Murmur Core
//!
//! Core types, domain model, and error definitions shared by every layer of
//! the Murmur social API: typed identifiers, the unified error type, request
//! validation helpers, and the entities that flow between the repository,
//! service, and REST layers.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod telemetry;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use validation::*;

// Marker bound for injectable components
pub use shaku::Interface;
