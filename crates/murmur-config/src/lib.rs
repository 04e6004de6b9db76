//! # Murmur Config
//!
//! Layered configuration for the Murmur API server: TOML files, a `.env`
//! file, and `MURMUR__SECTION__KEY` environment variables, validated as a
//! whole before startup continues.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
