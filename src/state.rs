/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Cheap to clone: everything inside is behind Arc
 */
use std::sync::Arc;

use crate::repos::UserDirectory;
use crate::services::auth::{RoleGuard, TokenCodec};
use crate::services::credential::CredentialVerifier;
use crate::services::login::LoginService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub codec: Arc<TokenCodec>,
    pub guard: RoleGuard,
    pub login: LoginService,
}

impl AppState {
    pub fn new(
        codec: Arc<TokenCodec>,
        users: Arc<dyn UserDirectory>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            guard: RoleGuard::new(codec.clone()),
            login: LoginService::new(users, verifier, codec.clone()),
            codec,
        }
    }
}
