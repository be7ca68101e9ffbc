//! API Router
//!
//! Public routes and protected routes are built separately; the protected
//! half carries `mw_require_auth` as a route layer.

use crate::core::auth::handlers as auth_handlers;
use crate::core::auth::middleware::mw_require_auth;
use crate::core::AppState;
use crate::{posts, profile};
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/api/users", post(auth_handlers::register))
        .route("/api/auth", post(auth_handlers::login))
        .route("/api/profile", get(profile::list_profiles))
        .route("/api/profile/user/{user_id}", get(profile::get_by_user))
        .route("/api/posts/{id}", get(posts::get_post));

    let protected = Router::new()
        .route("/api/auth", get(auth_handlers::me))
        // Profiles
        .route(
            "/api/profile",
            post(profile::upsert_profile).delete(profile::delete_account),
        )
        .route("/api/profile/me", get(profile::get_me))
        .route(
            "/api/profile/experience",
            put(profile::add_experience).post(profile::add_experience),
        )
        .route(
            "/api/profile/experience/{exp_id}",
            delete(profile::delete_experience),
        )
        .route(
            "/api/profile/education",
            put(profile::add_education).post(profile::add_education),
        )
        .route(
            "/api/profile/education/{edu_id}",
            delete(profile::delete_education),
        )
        .route(
            "/api/profile/github/{username}",
            get(profile::get_github_profile),
        )
        // Posts
        .route(
            "/api/posts",
            get(posts::list_posts).post(posts::create_post),
        )
        .route("/api/posts/{id}", delete(posts::delete_post))
        .route("/api/posts/like/{id}", put(posts::like_post))
        .route("/api/posts/unlike/{id}", put(posts::unlike_post))
        .route(
            "/api/posts/comment/{id}",
            post(posts::add_comment).put(posts::add_comment),
        )
        .route(
            "/api/posts/comment/{id}/{comment_id}",
            delete(posts::delete_comment),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), mw_require_auth));

    public
        .merge(protected)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> &'static str {
    "Server running..."
}
