/*
 * Responsibility
 * - Password hashing / comparison behind a small trait
 * - Callers only consume the pass/fail result; the algorithm (Argon2id) stays here
 */
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed")]
    HashingFailed,
    #[error("invalid argon2 parameters: {0}")]
    InvalidParams(String),
}

pub trait CredentialVerifier: Send + Sync {
    /// Hash `plaintext` into a self-describing (PHC) string.
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// `false` on mismatch and on an unreadable hash.
    fn matches(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2id with the crate's default cost unless built with [`Argon2Verifier::with_params`].
#[derive(Clone, Default)]
pub struct Argon2Verifier {
    argon2: Argon2<'static>,
}

impl Argon2Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom cost: memory in KiB, iteration count, lanes.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|_| PasswordError::HashingFailed)?;

        Ok(hash.to_string())
    }

    fn matches(&self, plaintext: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("stored password hash is not a valid PHC string");
            return false;
        };

        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}
