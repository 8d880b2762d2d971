/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (request gate / role layer / http layers)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware;
use crate::repos::{InMemoryUserDirectory, UserDirectory, UserRow};
use crate::services::auth::{Role, build_token_codec};
use crate::services::credential::{Argon2Verifier, CredentialVerifier, PasswordError};
use crate::state::AppState;

/// Accounts created at startup when `SEED_DEMO_USERS` is on.
pub const DEMO_USERS: [(&str, Role); 3] = [
    ("홍길동", Role::Admin),
    ("이순신", Role::User),
    ("신시임당", Role::Admin),
];
pub const DEMO_PASSWORD: &str = "1234";

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,bearer_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics via tracing; stderr may be hidden depending on how we are launched.
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = middleware::http::apply(build_router(state), &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub async fn build_state(config: &Config) -> Result<AppState> {
    let codec = build_token_codec(config)?;

    let users = Arc::new(InMemoryUserDirectory::new());
    let verifier = Arc::new(Argon2Verifier::new());

    if config.seed_demo_users {
        seed_demo_users(users.as_ref(), verifier.as_ref()).await?;
    }

    Ok(AppState::new(codec, users, verifier))
}

pub async fn seed_demo_users(
    users: &dyn UserDirectory,
    verifier: &dyn CredentialVerifier,
) -> Result<(), PasswordError> {
    for (subject, role) in DEMO_USERS {
        users
            .save(UserRow {
                subject: subject.to_string(),
                password_hash: verifier.hash(DEMO_PASSWORD)?,
                role,
            })
            .await;
    }

    tracing::info!(count = DEMO_USERS.len(), "seeded demo users");
    Ok(())
}

/// All routes behind the request gate. HTTP layers are applied by the caller.
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .nest("/api", api::routes(&state))
        .fallback(|| async { AppError::NotFound });

    middleware::auth::gate::apply(router, state.clone()).with_state(state)
}
