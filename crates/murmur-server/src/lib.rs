//! # Murmur Server Library
//!
//! Wiring for the server binary: the component graph that turns a loaded
//! configuration into services, and the startup log output.

pub mod di;
pub mod startup;
