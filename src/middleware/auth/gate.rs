//! Request gate: bearer token check in front of the whole router.
//!
//! Missing/non-bearer header → 401 plain text, present-but-invalid token → 403 JSON.
//! On success the verified principal is put into request extensions for handlers.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::Principal;
use crate::error::AppError;
use crate::services::auth::strip_bearer;
use crate::state::AppState;

/// The only path forwarded without a token.
pub const LOGIN_PATH: &str = "/api/login";

/// Wrap `router` (routes and fallback) with the gate.
///
/// ```ignore
/// let router = middleware::auth::gate::apply(routes, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, gate_middleware))
}

async fn gate_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if req.uri().path() == LOGIN_PATH {
        return Ok(next.run(req).await);
    }

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(strip_bearer)
        .ok_or_else(|| {
            tracing::debug!(path = %req.uri().path(), "no bearer token on request");
            AppError::MissingToken
        })?;

    let claims = match state.codec.parse(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                error = %err,
                path = %req.uri().path(),
                "JWT token rejected"
            );
            return Err(AppError::InvalidToken);
        }
    };

    tracing::info!(subject = %claims.subject, "JWT token valid");

    req.extensions_mut().insert(Principal::from(claims));

    Ok(next.run(req).await)
}
