//! Profile and follow controller.

use crate::{
    controllers::parse_id,
    extractors::{AuthenticatedUser, ValidatedJson},
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};
use murmur_core::{AccountId, Profile, ProfileSummary};
use murmur_service::{MessageResponse, UpdateProfileRequest};
use tracing::debug;

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_own_profile).patch(update_profile))
        .route("/me/followers", get(followers))
        .route("/me/following", get(following))
        .route("/:id", get(get_profile))
        .route("/:id/follow", post(follow).delete(unfollow))
}

/// Get the caller's profile.
async fn get_own_profile(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult<Profile> {
    debug!("Get own profile: {}", user.account_id);

    let profile = state.profile_service.get_profile(user.account_id).await?;
    ok(profile)
}

/// Get any profile by account ID.
async fn get_profile(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Profile> {
    let id: AccountId = parse_id("account", &id)?;
    debug!("Get profile: {}", id);

    let profile = state.profile_service.get_profile(id).await?;
    ok(profile)
}

/// Partially update the caller's profile.
async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<MessageResponse> {
    debug!("Update profile: {}", user.account_id);

    state.profile_service.update_profile(user.account_id, request).await?;
    ok(MessageResponse::new("Profile updated successfully"))
}

/// Follow an account.
async fn follow(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    let target: AccountId = parse_id("account", &id)?;

    state.follow_service.follow(user.account_id, target).await?;
    ok(MessageResponse::new("Followed"))
}

/// Unfollow an account.
async fn unfollow(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    let target: AccountId = parse_id("account", &id)?;

    state.follow_service.unfollow(user.account_id, target).await?;
    ok(MessageResponse::new("Unfollowed"))
}

/// Accounts following the caller.
async fn followers(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult<Vec<ProfileSummary>> {
    let followers = state.follow_service.followers(user.account_id).await?;
    ok(followers)
}

/// Accounts the caller follows.
async fn following(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult<Vec<ProfileSummary>> {
    let following = state.follow_service.following(user.account_id).await?;
    ok(following)
}
