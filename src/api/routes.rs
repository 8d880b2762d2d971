/*
 * Responsibility
 * - /api の URL 構造を定義
 * - role が必要な route には require_role (route_layer) を掛ける
 * - 認証 (request gate) は app 側で Router 全体に掛ける
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    login::login,
    pages::{admin_get, admin_page, user_page},
};
use crate::middleware::auth::require_role;
use crate::services::auth::Role;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/user", require_role(get(user_page), state, Role::User))
        .route("/admin", require_role(get(admin_page), state, Role::Admin))
        .route("/admin/get", get(admin_get))
}
