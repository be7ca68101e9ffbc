use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use crate::core::models::{
    parse_id, Comment, CreateCommentInput, CreatePostInput, Like, Post, User,
};
use crate::core::validate::ValidJson;
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, warn};

const POST_NOT_FOUND: &str = "Post not found";
const NOT_AUTHORIZED: &str = "User not authorized";

/// Malformed ids cannot name a post, so they read as "not found"
fn post_id(raw: &str) -> Result<String> {
    parse_id(raw).ok_or_else(|| Error::not_found(POST_NOT_FOUND))
}

async fn caller(state: &AppState, ctx: &Ctx) -> Result<User> {
    state
        .users
        .find_by_id(ctx.user_id())
        .await
        .ok_or_else(|| Error::not_found("User not found"))
}

/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    ctx: Ctx,
    ValidJson(req): ValidJson<CreatePostInput>,
) -> Result<Json<Post>> {
    info!("POST /api/posts - {}", ctx.user_id());

    let author = caller(&state, &ctx).await?;
    let post = state.posts.insert(Post::new(&author, &req.text)).await?;

    Ok(Json(post))
}

/// GET /api/posts
pub async fn list_posts(State(state): State<AppState>) -> Json<Vec<Post>> {
    info!("GET /api/posts");
    Json(state.posts.all().await)
}

/// GET /api/posts/:id
pub async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Post>> {
    info!("GET /api/posts/{}", id);

    let post = state
        .posts
        .find_by_id(&post_id(&id)?)
        .await
        .ok_or_else(|| Error::not_found(POST_NOT_FOUND))?;

    Ok(Json(post))
}

/// DELETE /api/posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<Json<&'static str>> {
    info!("DELETE /api/posts/{} - {}", id, ctx.user_id());

    let id = post_id(&id)?;
    let post = state
        .posts
        .find_by_id(&id)
        .await
        .ok_or_else(|| Error::not_found(POST_NOT_FOUND))?;

    if post.user != ctx.user_id() {
        warn!("User {} tried to delete post {} by {}", ctx.user_id(), id, post.user);
        return Err(Error::forbidden(NOT_AUTHORIZED));
    }

    state.posts.delete(&id).await?;
    Ok(Json("Post removed"))
}

/// PUT /api/posts/like/:id
pub async fn like_post(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<Json<Vec<Like>>> {
    info!("PUT /api/posts/like/{} - {}", id, ctx.user_id());

    let (post, ()) = state
        .posts
        .update(&post_id(&id)?, |post| {
            if post.like(ctx.user_id()) {
                Ok(())
            } else {
                Err(Error::bad_request("Post already liked"))
            }
        })
        .await?
        .ok_or_else(|| Error::not_found(POST_NOT_FOUND))?;

    Ok(Json(post.likes))
}

/// PUT /api/posts/unlike/:id
pub async fn unlike_post(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<Json<Vec<Like>>> {
    info!("PUT /api/posts/unlike/{} - {}", id, ctx.user_id());

    let (post, ()) = state
        .posts
        .update(&post_id(&id)?, |post| {
            if post.unlike(ctx.user_id()) {
                Ok(())
            } else {
                Err(Error::bad_request("Post not liked yet"))
            }
        })
        .await?
        .ok_or_else(|| Error::not_found(POST_NOT_FOUND))?;

    Ok(Json(post.likes))
}

/// POST /api/posts/comment/:id
pub async fn add_comment(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<CreateCommentInput>,
) -> Result<Json<Post>> {
    info!("POST /api/posts/comment/{} - {}", id, ctx.user_id());

    let id = post_id(&id)?;
    let author = caller(&state, &ctx).await?;
    let (post, ()) = state
        .posts
        .update(&id, |post| {
            post.add_comment(&author, &req.text);
            Ok::<_, Error>(())
        })
        .await?
        .ok_or_else(|| Error::not_found(POST_NOT_FOUND))?;

    Ok(Json(post))
}

/// DELETE /api/posts/comment/:id/:comment_id
///
/// Only the comment's author may remove it.
pub async fn delete_comment(
    State(state): State<AppState>,
    ctx: Ctx,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<Vec<Comment>>> {
    info!(
        "DELETE /api/posts/comment/{}/{} - {}",
        id,
        comment_id,
        ctx.user_id()
    );

    let comment_id = parse_id(&comment_id);
    let (post, _) = state
        .posts
        .update(&post_id(&id)?, |post| {
            let comment_id = comment_id.ok_or_else(|| Error::not_found("Comment not found"))?;
            let comment = post
                .comment(&comment_id)
                .ok_or_else(|| Error::not_found("Comment not found"))?;
            if comment.user != ctx.user_id() {
                return Err(Error::forbidden(NOT_AUTHORIZED));
            }
            post.remove_comment(&comment_id)
                .ok_or_else(|| Error::not_found("Comment not found"))
        })
        .await?
        .ok_or_else(|| Error::not_found(POST_NOT_FOUND))?;

    Ok(Json(post.comments))
}
