//! # Murmur REST
//!
//! HTTP surface of the Murmur social API, built on Axum.
//!
//! Every route under `/api/v1` except registration and login passes the
//! session middleware, which verifies the bearer token and consults the
//! revocation registry before any handler runs.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
