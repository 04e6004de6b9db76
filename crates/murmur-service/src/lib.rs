//! # Murmur Service
//!
//! Business logic for the Murmur social API, plus the three pieces that
//! sit between the handlers and the stores:
//!
//! - [`revocation`]: the session denylist consulted on every request
//! - [`cache::ReadThroughCache`]: read-through entity caching with
//!   invalidation on write
//! - [`NotificationService`]: the merged unread feed

pub mod auth_service;
pub mod cache;
pub mod dto;
pub mod follow_service;
pub mod r#impl;
pub mod metrics;
pub mod notification_service;
pub mod post_service;
pub mod profile_service;
pub mod revocation;

#[cfg(test)]
mod test_support;

pub use auth_service::*;
pub use cache::*;
pub use dto::*;
pub use follow_service::*;
pub use notification_service::*;
pub use post_service::*;
pub use profile_service::*;
pub use r#impl::*;
pub use revocation::*;
