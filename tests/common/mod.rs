#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use bearer_gate::{
    app::{build_router, seed_demo_users},
    repos::InMemoryUserDirectory,
    services::{
        auth::{FixedClock, Role, SigningKey, TokenCodec},
        credential::Argon2Verifier,
    },
    state::AppState,
};
use chrono::{TimeZone, Utc};
use tower::ServiceExt;

pub const SECRET: &[u8] = b"integration-test-secret-32-bytes!!";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub codec: Arc<TokenCodec>,
    pub clock: Arc<FixedClock>,
    pub users: Arc<InMemoryUserDirectory>,
}

impl TestApp {
    pub async fn new() -> Self {
        let clock = Arc::new(FixedClock::at(
            Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap(),
        ));
        let codec = Arc::new(TokenCodec::new(
            SigningKey::from_bytes(SECRET).unwrap(),
            clock.clone(),
        ));

        let users = Arc::new(InMemoryUserDirectory::new());
        let verifier = Arc::new(Argon2Verifier::with_params(1024, 1, 1).unwrap());
        seed_demo_users(users.as_ref(), verifier.as_ref())
            .await
            .unwrap();

        let state = AppState::new(codec.clone(), users.clone(), verifier);

        Self {
            router: build_router(state.clone()),
            state,
            codec,
            clock,
            users,
        }
    }

    /// `"Bearer <jwt>"` issued at the fixed clock's current time.
    pub fn bearer(&self, subject: &str, role: Role) -> String {
        self.codec.issue(subject, role, self.codec.now()).unwrap()
    }

    pub async fn get(&self, uri: &str, authorization: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        self.router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_json(&self, uri: &str, json: serde_json::Value) -> Response<Body> {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// In-memory sink for a `tracing_subscriber::fmt` subscriber.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        let buffer = self.clone();
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || buffer.clone())
            .finish()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
