//! Factory: build the process-wide `TokenCodec` from application `Config`.
use std::sync::Arc;

use tracing::error;

use crate::config::{Config, ConfigError};
use crate::services::auth::{SigningKey, SystemClock, TokenCodec};

pub fn build_token_codec(config: &Config) -> Result<Arc<TokenCodec>, ConfigError> {
    let key = SigningKey::from_base64(&config.jwt_secret_key).map_err(|e| {
        error!(error = %e, "failed to load JWT signing key");
        ConfigError::Invalid("JWT_SECRET_KEY")
    })?;

    Ok(Arc::new(TokenCodec::new(key, Arc::new(SystemClock))))
}
