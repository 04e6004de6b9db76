//! Authentication controller.

use crate::{
    extractors::{AuthenticatedUser, ValidatedJson},
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use murmur_service::{AccountResponse, LoginRequest, MessageResponse, RegisterRequest, TokenResponse};
use tracing::debug;

/// Routes reachable without a session.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Routes that need a session.
pub fn router() -> Router<AppState> {
    Router::new().route("/logout", post(logout))
}

/// Register a new account.
async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), AppError> {
    debug!("Registration request for: {}", request.email);

    let response = state.auth_service.register(request).await?;
    Ok(created(response))
}

/// Login with email and password.
async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<TokenResponse> {
    debug!("Login request for: {}", request.email);

    let response = state.auth_service.login(request).await?;
    ok(response)
}

/// Revoke the caller's session token.
async fn logout(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult<MessageResponse> {
    debug!("Logout request for: {}", user.account_id);

    state.auth_service.logout(&user.token, &user.claims).await?;
    ok(MessageResponse::new("Successfully logged out"))
}
