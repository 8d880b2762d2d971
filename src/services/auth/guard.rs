//! Declarative role check that any protected operation can run before its body.
//!
//! Independent of the HTTP request gate: the header shape is checked again here, so an
//! operation reached without the gate (internal call, test) is still protected.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use super::role::RoleRequirement;
use super::token_codec::{TokenCodec, strip_bearer};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// `Authorization` header missing or not a bearer credential.
    #[error("missing or malformed bearer credential")]
    Unauthenticated,
    #[error("insufficient role")]
    InsufficientRole,
}

#[derive(Debug, Clone)]
pub struct RoleGuard {
    codec: Arc<TokenCodec>,
}

impl RoleGuard {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// `authorization` is the raw `Authorization` header value, if any.
    pub fn check(
        &self,
        authorization: Option<&str>,
        requirement: RoleRequirement,
    ) -> Result<(), AuthError> {
        let token = authorization
            .and_then(strip_bearer)
            .ok_or(AuthError::Unauthenticated)?;

        if !self.codec.has_role(token, requirement.role) {
            warn!(required = %requirement.role, "role check rejected");
            return Err(AuthError::InsufficientRole);
        }

        debug!(required = %requirement.role, "role check passed");
        Ok(())
    }

    /// Run `operation` only after the check passes.
    pub async fn guard<F, Fut, T>(
        &self,
        authorization: Option<&str>,
        requirement: RoleRequirement,
        operation: F,
    ) -> Result<T, AuthError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.check(authorization, requirement)?;
        Ok(operation().await)
    }

    /// Wrap a synchronous operation so every call is checked first.
    ///
    /// ```ignore
    /// let admin_only = RoleRequirement::new(Role::Admin);
    /// let delete_user = guard.protect(admin_only, |id: u64| repo.delete(id));
    /// delete_user(Some("Bearer ..."), 42)?;
    /// ```
    pub fn protect<A, T, F>(
        &self,
        requirement: RoleRequirement,
        operation: F,
    ) -> impl Fn(Option<&str>, A) -> Result<T, AuthError>
    where
        F: Fn(A) -> T,
    {
        let guard = self.clone();
        move |authorization: Option<&str>, args: A| {
            guard.check(authorization, requirement)?;
            Ok(operation(args))
        }
    }
}
