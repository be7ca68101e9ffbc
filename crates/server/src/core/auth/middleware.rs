use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

/// Header carrying the session token
pub const AUTH_HEADER: &str = "x-auth-token";

pub async fn mw_require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    debug!("MIDDLEWARE: require_auth");

    let token = match req.headers().get(AUTH_HEADER) {
        Some(h) => h
            .to_str()
            .map_err(|_| Error::Unauthorized("Token is not valid".to_string()))?,
        None => {
            return Err(Error::Unauthorized(
                "No token, authorization denied".to_string(),
            ))
        }
    };

    let claims = state.auth.verify_token(token.trim()).map_err(|e| {
        warn!("[Auth] Rejected token on {}: {}", req.uri().path(), e);
        Error::Unauthorized("Token is not valid".to_string())
    })?;

    req.extensions_mut().insert(Ctx::new(claims.user.id));

    Ok(next.run(req).await)
}
