//! Post, like, and comment controller.

use crate::{
    controllers::parse_id,
    extractors::{AuthenticatedUser, ValidatedJson},
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use murmur_core::{Comment, CommentView, Post, PostDetail, PostFeedItem, PostId};
use murmur_service::{CreateCommentRequest, CreatePostRequest, MessageResponse};
use tracing::debug;

/// Creates the post router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(feed).post(create_post))
        .route("/:id", get(get_post_detail))
        .route("/:id/like", post(like_post).delete(unlike_post))
        .route("/:id/comments", get(list_comments).post(create_comment))
}

/// Posts from accounts the caller follows.
async fn feed(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult<Vec<PostFeedItem>> {
    debug!("Feed request: {}", user.account_id);

    let posts = state.post_service.feed(user.account_id).await?;
    ok(posts)
}

/// Create a post.
async fn create_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Post>>), AppError> {
    let post = state.post_service.create_post(user.account_id, request).await?;
    Ok(created(post))
}

/// Post detail with author, images, like count, and latest comments.
async fn get_post_detail(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<PostDetail> {
    let id: PostId = parse_id("post", &id)?;

    let detail = state.post_service.get_post_detail(id).await?;
    ok(detail)
}

/// Like a post.
async fn like_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    let id: PostId = parse_id("post", &id)?;

    state.post_service.like_post(user.account_id, id).await?;
    ok(MessageResponse::new("Post liked"))
}

/// Remove a like.
async fn unlike_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    let id: PostId = parse_id("post", &id)?;

    state.post_service.unlike_post(user.account_id, id).await?;
    ok(MessageResponse::new("Post unliked"))
}

/// Comment on a post.
async fn create_comment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Comment>>), AppError> {
    let id: PostId = parse_id("post", &id)?;

    let comment = state.post_service.create_comment(user.account_id, id, request).await?;
    Ok(created(comment))
}

/// All comments on a post, oldest first.
async fn list_comments(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Vec<CommentView>> {
    let id: PostId = parse_id("post", &id)?;

    let comments = state.post_service.list_comments(id).await?;
    ok(comments)
}
