use std::sync::Arc;

use tracing::{debug, info};

use crate::repos::UserDirectory;
use crate::services::auth::{TokenCodec, TokenError};
use crate::services::credential::CredentialVerifier;

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("user not found")]
    UserNotFound,
    #[error("password mismatch")]
    PasswordMismatch,
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Username/password login that ends in a freshly issued bearer token.
#[derive(Clone)]
pub struct LoginService {
    users: Arc<dyn UserDirectory>,
    verifier: Arc<dyn CredentialVerifier>,
    codec: Arc<TokenCodec>,
}

impl std::fmt::Debug for LoginService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginService")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl LoginService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        verifier: Arc<dyn CredentialVerifier>,
        codec: Arc<TokenCodec>,
    ) -> Self {
        Self {
            users,
            verifier,
            codec,
        }
    }

    /// Returns the header-ready token (`"Bearer <jwt>"`).
    pub async fn login(&self, username: &str, password: &str) -> Result<String, LoginError> {
        let user = self.users.find_by_subject(username).await.ok_or_else(|| {
            debug!(username = %username, "login for unknown user");
            LoginError::UserNotFound
        })?;

        if !self.verifier.matches(password, &user.password_hash) {
            debug!(username = %username, "login with wrong password");
            return Err(LoginError::PasswordMismatch);
        }

        let token = self
            .codec
            .issue(&user.subject, user.role, self.codec.now())?;

        info!(username = %user.subject, role = %user.role, "issued access token");
        Ok(token)
    }
}
