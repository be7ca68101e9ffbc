use crate::core::auth::{gravatar_url, normalize_email};
use crate::core::config::AppState;
use crate::core::error::{Error, Result};
use crate::core::models::{new_id, RegisterInput, User};
use crate::core::validate::ValidJson;
use axum::{extract::State, Json};
use chrono::Utc;
use tracing::{info, warn};

/// POST /api/users
///
/// Registers an account and answers with a session token (a JSON string).
pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterInput>,
) -> Result<Json<String>> {
    let email = normalize_email(&req.email);
    info!("POST /api/users - {}", email);

    // cheap pre-check; the insert below is the authoritative one
    if state.users.find_by_email(&email).await.is_some() {
        warn!("Registration for existing email {}", email);
        return Err(Error::bad_request("User already exists"));
    }

    let user = User {
        id: new_id(),
        name: req.name.trim().to_string(),
        avatar: gravatar_url(&email),
        password: state.auth.hash_password(&req.password)?,
        email: email.clone(),
        date: Utc::now(),
    };
    let user_id = user.id.clone();

    if !state.users.create(user).await? {
        warn!("Registration for existing email {}", email);
        return Err(Error::bad_request("User already exists"));
    }

    let token = state.auth.issue_token(&user_id)?;
    Ok(Json(token))
}
