//! Notification controller.

use crate::{
    extractors::AuthenticatedUser,
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{extract::State, routing::get, Router};
use murmur_core::Notification;
use tracing::debug;

/// Creates the notification router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(unread))
}

/// Unread notifications, newest first.
async fn unread(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult<Vec<Notification>> {
    debug!("Unread notifications for {}", user.account_id);

    let notifications = state.notification_service.get_unread(user.account_id).await?;
    ok(notifications)
}
