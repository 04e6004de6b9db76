//! Application state for Axum handlers.

use murmur_repository::DatabasePoolInterface;
use murmur_service::{AuthService, FollowService, NotificationService, PostService, ProfileService};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub profile_service: Arc<dyn ProfileService>,
    pub follow_service: Arc<dyn FollowService>,
    pub post_service: Arc<dyn PostService>,
    pub notification_service: Arc<dyn NotificationService>,
    /// Probed by the readiness endpoint.
    pub database: Arc<dyn DatabasePoolInterface>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
