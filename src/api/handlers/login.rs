/*
 * Responsibility
 * - POST /api/login
 * - DTO validation → LoginService → 201 + Authorization header (body なし)
 */
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::{api::dto::login::LoginRequest, error::AppError, state::AppState};

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_FAILED", msg))?;

    let token = state.login.login(&req.username, &req.password).await?;

    Ok((StatusCode::CREATED, [(header::AUTHORIZATION, token)]))
}
