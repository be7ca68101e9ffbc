use crate::core::auth::normalize_email;
use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use crate::core::models::{LoginInput, UserInfo};
use crate::core::validate::ValidJson;
use axum::{extract::State, Json};
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// GET /api/auth
pub async fn me(State(state): State<AppState>, ctx: Ctx) -> Result<Json<UserInfo>> {
    info!("GET /api/auth - {}", ctx.user_id());

    let user = state
        .users
        .find_by_id(ctx.user_id())
        .await
        .ok_or_else(|| Error::not_found("User not found"))?;

    Ok(Json(user.into()))
}

/// POST /api/auth
///
/// Unknown email and wrong password fail identically.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginInput>,
) -> Result<Json<String>> {
    let email = normalize_email(&req.email);
    info!("POST /api/auth - {}", email);

    let Some(user) = state.users.find_by_email(&email).await else {
        warn!("[Auth] Login for unknown email {}", email);
        return Err(Error::bad_request(INVALID_CREDENTIALS));
    };

    if !state.auth.verify_password(&req.password, &user.password)? {
        warn!("[Auth] Failed login attempt for {}", email);
        return Err(Error::bad_request(INVALID_CREDENTIALS));
    }

    let token = state.auth.issue_token(&user.id)?;
    Ok(Json(token))
}
