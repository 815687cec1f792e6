//! Discussion board handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{Comment, Post, PostDetail, PostSummary, Reply};

use crate::error::AppResult;
use crate::extract::{parse_id, ApiJson};
use crate::middleware::CurrentUser;
use crate::services::{DiscussionService, LikeTarget};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

#[derive(Serialize)]
pub struct PostCreatedResponse {
    pub message: String,
    pub post: Post,
}

#[derive(Serialize)]
pub struct CommentAddedResponse {
    pub message: String,
    pub comment: Comment,
}

#[derive(Serialize)]
pub struct ReplyAddedResponse {
    pub message: String,
    pub reply: Reply,
}

#[derive(Serialize)]
pub struct LikeResponse {
    pub message: String,
    pub likes: usize,
}

/// List all posts
pub async fn list_posts(State(state): State<AppState>) -> AppResult<Json<Vec<PostSummary>>> {
    let posts = DiscussionService::new(state.db).list_posts().await?;
    Ok(Json(posts))
}

/// Get a post with its comments and replies
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PostDetail>> {
    let id = parse_id(&id, "Post")?;
    let post = DiscussionService::new(state.db).get_post(id).await?;
    Ok(Json(post))
}

/// Create a post
pub async fn create_post(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(body): ApiJson<CreatePostRequest>,
) -> AppResult<(StatusCode, Json<PostCreatedResponse>)> {
    let post = DiscussionService::new(state.db)
        .create_post(current_user.id(), &body.title, &body.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PostCreatedResponse {
            message: "Post created successfully".to_string(),
            post,
        }),
    ))
}

/// Comment on a post
pub async fn add_comment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(post_id): Path<String>,
    ApiJson(body): ApiJson<ContentRequest>,
) -> AppResult<(StatusCode, Json<CommentAddedResponse>)> {
    let post_id = parse_id(&post_id, "Post")?;
    let comment = DiscussionService::new(state.db)
        .add_comment(post_id, current_user.id(), &body.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentAddedResponse {
            message: "Comment added".to_string(),
            comment,
        }),
    ))
}

/// Delete a comment and its replies
pub async fn delete_comment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(comment_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let comment_id = parse_id(&comment_id, "Comment")?;
    DiscussionService::new(state.db)
        .delete_comment(comment_id, current_user.id())
        .await?;
    Ok(MessageResponse::new("Comment and its replies deleted successfully"))
}

/// Reply to a comment
pub async fn add_reply(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(comment_id): Path<String>,
    ApiJson(body): ApiJson<ContentRequest>,
) -> AppResult<(StatusCode, Json<ReplyAddedResponse>)> {
    let comment_id = parse_id(&comment_id, "Comment")?;
    let reply = DiscussionService::new(state.db)
        .add_reply(comment_id, current_user.id(), &body.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReplyAddedResponse {
            message: "Reply added successfully".to_string(),
            reply,
        }),
    ))
}

/// Delete a reply
pub async fn delete_reply(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((comment_id, reply_id)): Path<(String, String)>,
) -> AppResult<Json<MessageResponse>> {
    let comment_id = parse_id(&comment_id, "Comment")?;
    let reply_id = parse_id(&reply_id, "Reply")?;
    DiscussionService::new(state.db)
        .delete_reply(comment_id, reply_id, current_user.id())
        .await?;
    Ok(MessageResponse::new("Reply deleted successfully"))
}

async fn toggle_like(
    state: AppState,
    current_user: CurrentUser,
    target: LikeTarget,
    raw_id: &str,
) -> AppResult<Json<LikeResponse>> {
    let id = parse_id(raw_id, target_name(target))?;
    let update = DiscussionService::new(state.db)
        .toggle_like(target, id, current_user.id())
        .await?;

    Ok(Json(LikeResponse {
        message: "Like updated".to_string(),
        likes: update.likes,
    }))
}

fn target_name(target: LikeTarget) -> &'static str {
    match target {
        LikeTarget::Post => "Post",
        LikeTarget::Comment => "Comment",
        LikeTarget::Reply => "Reply",
    }
}

/// Like or unlike a post
pub async fn like_post(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<LikeResponse>> {
    toggle_like(state, current_user, LikeTarget::Post, &id).await
}

/// Like or unlike a comment
pub async fn like_comment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<LikeResponse>> {
    toggle_like(state, current_user, LikeTarget::Comment, &id).await
}

/// Like or unlike a reply
pub async fn like_reply(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<LikeResponse>> {
    toggle_like(state, current_user, LikeTarget::Reply, &id).await
}
