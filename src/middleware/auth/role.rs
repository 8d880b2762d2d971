//! Route-level role requirement.
//!
//! Re-reads the `Authorization` header and runs `RoleGuard::check`, so a route keeps its
//! role check even when mounted without the request gate.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::AppError;
use crate::services::auth::{Role, RoleGuard, RoleRequirement};
use crate::state::AppState;

#[derive(Clone)]
struct RoleLayerState {
    guard: RoleGuard,
    requirement: RoleRequirement,
}

/// Attach a single required role to `route`.
///
/// ```ignore
/// .route("/api/admin", require_role(get(admin_page), &state, Role::Admin))
/// ```
pub fn require_role(
    route: MethodRouter<AppState>,
    state: &AppState,
    role: Role,
) -> MethodRouter<AppState> {
    let layer_state = RoleLayerState {
        guard: state.guard.clone(),
        requirement: RoleRequirement::new(role),
    };

    route.route_layer(middleware::from_fn_with_state(layer_state, role_middleware))
}

async fn role_middleware(
    State(layer): State<RoleLayerState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    layer.guard.check(authorization, layer.requirement)?;

    Ok(next.run(req).await)
}
