//! # Murmur Domain
//!
//! Entities and read models for accounts, profiles, posts, and the derived
//! notification feed.

pub mod account;
pub mod email;
pub mod notification;
pub mod post;
pub mod profile;

pub use account::*;
pub use email::*;
pub use notification::*;
pub use post::*;
pub use profile::*;
