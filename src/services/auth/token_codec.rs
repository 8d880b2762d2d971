//! Access token issuance and verification (HS256 JWT).
//!
//! `TokenCodec` is the only component that holds the signing key. Everything else
//! (request gate, role guard, login) goes through it.
//!
//! Wire format: `header.claims.signature`, with claims
//! `{ sub, auth, iat, exp, jti }` where `auth` carries the role and the timestamps
//! are NumericDate seconds.

use std::{fmt, sync::Arc};

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

use super::clock::Clock;
use super::role::Role;

/// Scheme marker placed in front of issued tokens and expected on `Authorization`.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Fixed lifetime of every issued token.
pub const TOKEN_TTL_MINUTES: i64 = 60;

// HS256 needs at least 256 bits of key material.
const MIN_KEY_BYTES: usize = 32;

/// Strip the `Bearer ` marker from an `Authorization` header value.
pub fn strip_bearer(header_value: &str) -> Option<&str> {
    header_value.strip_prefix(BEARER_PREFIX)
}

#[derive(Debug, thiserror::Error)]
pub enum SigningKeyError {
    #[error("signing key is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("signing key must be at least 32 bytes, got {0}")]
    TooShort(usize),
}

/// HMAC secret used to sign and verify tokens.
///
/// Built once at startup; key material is never printed.
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    /// `encoded` is the standard (padded) base64 form of the secret.
    pub fn from_base64(encoded: &str) -> Result<Self, SigningKeyError> {
        let bytes = STANDARD.decode(encoded.trim())?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SigningKeyError> {
        if bytes.len() < MIN_KEY_BYTES {
            return Err(SigningKeyError::TooShort(bytes.len()));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        })
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Failure kinds surfaced by [`TokenCodec::parse`] and friends.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    MalformedToken,
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("unsupported token format: {0}")]
    UnsupportedFormat(String),
    #[error("empty or invalid claims: {0}")]
    EmptyOrInvalidClaims(String),
    #[error("failed to sign token")]
    Encoding(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    auth: String,
    iat: i64,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    jti: Option<String>,
}

/// Verified token contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub subject: String,
    /// Raw `auth` claim. Normally a single role name, but kept verbatim so that
    /// composite values still work with [`Claims::grants`].
    pub role: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub token_id: Option<String>,
}

impl Claims {
    /// Containment check: the role name only has to appear inside the claim.
    pub fn grants(&self, required: Role) -> bool {
        self.role.contains(required.as_str())
    }
}

#[derive(Clone)]
pub struct TokenCodec {
    key: SigningKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("key", &self.key)
            .field("ttl_minutes", &TOKEN_TTL_MINUTES)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(key: SigningKey, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock in `parse_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);

        Self {
            key,
            validation,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Issue a token for `subject`, valid from `now` for [`TOKEN_TTL_MINUTES`].
    ///
    /// Returns the header-ready form (`"Bearer <jwt>"`). Timestamps are stored with
    /// second precision, so `now` is truncated to the second.
    pub fn issue(
        &self,
        subject: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        if subject.trim().is_empty() {
            return Err(TokenError::EmptyOrInvalidClaims("sub".to_string()));
        }

        let issued_at = now.timestamp();
        let claims = TokenClaims {
            sub: subject.to_string(),
            auth: role.as_str().to_string(),
            iat: issued_at,
            exp: issued_at + Duration::minutes(TOKEN_TTL_MINUTES).num_seconds(),
            jti: Some(Uuid::new_v4().to_string()),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        let compact = jsonwebtoken::encode(&header, &claims, &self.key.encoding).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            TokenError::Encoding(e)
        })?;

        Ok(format!("{BEARER_PREFIX}{compact}"))
    }

    /// Verify `raw` (no `Bearer ` marker) against the key and the current clock.
    pub fn parse(&self, raw: &str) -> Result<Claims, TokenError> {
        self.parse_at(raw, self.clock.now())
    }

    pub fn parse_at(&self, raw: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let header = jsonwebtoken::decode_header(raw).map_err(|e| classify_header_error(&e))?;
        if header.alg != Algorithm::HS256 {
            return Err(TokenError::UnsupportedFormat(format!("{:?}", header.alg)));
        }

        let data = jsonwebtoken::decode::<TokenClaims>(raw, &self.key.decoding, &self.validation)
            .map_err(|e| classify_decode_error(raw, &e))?;
        let claims = data.claims;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::EmptyOrInvalidClaims("sub".to_string()));
        }
        if claims.auth.trim().is_empty() {
            return Err(TokenError::EmptyOrInvalidClaims("auth".to_string()));
        }

        let issued_at = DateTime::from_timestamp(claims.iat, 0)
            .ok_or_else(|| TokenError::EmptyOrInvalidClaims("iat".to_string()))?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| TokenError::EmptyOrInvalidClaims("exp".to_string()))?;
        if expires_at <= issued_at {
            return Err(TokenError::EmptyOrInvalidClaims("exp".to_string()));
        }

        if now >= expires_at {
            return Err(TokenError::Expired);
        }

        Ok(Claims {
            subject: claims.sub,
            role: claims.auth,
            issued_at,
            expires_at,
            token_id: claims.jti,
        })
    }

    pub fn extract_subject(&self, raw: &str) -> Result<String, TokenError> {
        self.parse(raw).map(|claims| claims.subject)
    }

    /// The role claim as a [`Role`]. Composite claims are not a single role and fail.
    pub fn extract_role(&self, raw: &str) -> Result<Role, TokenError> {
        let claims = self.parse(raw)?;
        claims
            .role
            .parse::<Role>()
            .map_err(|e| TokenError::EmptyOrInvalidClaims(e.to_string()))
    }

    /// Collapses every parse failure to `false`; the cause only goes to the log.
    pub fn is_valid(&self, raw: &str) -> bool {
        match self.parse(raw) {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "invalid JWT");
                false
            }
        }
    }

    pub fn has_role(&self, raw: &str, required: Role) -> bool {
        match self.parse(raw) {
            Ok(claims) => claims.grants(required),
            Err(err) => {
                warn!(error = %err, required = %required, "role check on invalid JWT");
                false
            }
        }
    }
}

fn classify_header_error(err: &jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        // Header decoded as JSON but names an algorithm/shape we do not know.
        ErrorKind::Json(e) if e.is_data() => {
            TokenError::UnsupportedFormat("unrecognized header".to_string())
        }
        ErrorKind::InvalidAlgorithmName | ErrorKind::MissingAlgorithm => {
            TokenError::UnsupportedFormat("unrecognized algorithm".to_string())
        }
        _ => TokenError::MalformedToken,
    }
}

fn classify_decode_error(raw: &str, err: &jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        ErrorKind::Base64(_) if only_signature_is_undecodable(raw) => TokenError::BadSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm => {
            TokenError::UnsupportedFormat("unrecognized algorithm".to_string())
        }
        ErrorKind::MissingRequiredClaim(claim) => TokenError::EmptyOrInvalidClaims(claim.clone()),
        ErrorKind::Json(e) if e.is_data() => TokenError::EmptyOrInvalidClaims(e.to_string()),
        ErrorKind::InvalidAudience => TokenError::EmptyOrInvalidClaims("aud".to_string()),
        ErrorKind::InvalidIssuer => TokenError::EmptyOrInvalidClaims("iss".to_string()),
        ErrorKind::InvalidSubject => TokenError::EmptyOrInvalidClaims("sub".to_string()),
        _ => TokenError::MalformedToken,
    }
}

// A signature segment edited into non-canonical base64 is still a signature that
// does not verify.
fn only_signature_is_undecodable(raw: &str) -> bool {
    let mut parts = raw.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(claims), Some(signature), None) => {
            URL_SAFE_NO_PAD.decode(header).is_ok()
                && URL_SAFE_NO_PAD.decode(claims).is_ok()
                && URL_SAFE_NO_PAD.decode(signature).is_err()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::clock::FixedClock;
    use chrono::TimeZone;
    use serde_json::json;

    const TEST_KEY: &[u8] = b"test-secret-key-for-jwt-testing-minimum-32-chars";

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap()
    }

    fn codec_at(now: DateTime<Utc>) -> (TokenCodec, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::at(now));
        let codec = TokenCodec::new(SigningKey::from_bytes(TEST_KEY).unwrap(), clock.clone());
        (codec, clock)
    }

    fn raw(token: &str) -> &str {
        strip_bearer(token).expect("issued tokens carry the bearer marker")
    }

    fn sign_custom(payload: serde_json::Value, alg: Algorithm) -> String {
        jsonwebtoken::encode(&Header::new(alg), &payload, &EncodingKey::from_secret(TEST_KEY))
            .unwrap()
    }

    #[test]
    fn issued_token_carries_bearer_marker_and_claims() {
        let (codec, _) = codec_at(start());
        let token = codec.issue("이순신", Role::User, start()).unwrap();
        assert!(token.starts_with("Bearer "));

        let claims = codec.parse(raw(&token)).unwrap();
        assert_eq!(claims.subject, "이순신");
        assert_eq!(claims.role, "USER");
        assert_eq!(claims.issued_at, start());
        assert_eq!(claims.expires_at, start() + Duration::minutes(60));
        assert!(claims.token_id.is_some());
    }

    #[test]
    fn token_is_valid_for_the_whole_ttl() {
        let (codec, clock) = codec_at(start());
        let token = codec.issue("홍길동", Role::Admin, start()).unwrap();

        for offset in [0, 1, 30 * 60, 60 * 60 - 1] {
            clock.set(start() + Duration::seconds(offset));
            let claims = codec.parse(raw(&token)).unwrap();
            assert_eq!(claims.subject, "홍길동");
            assert_eq!(codec.extract_role(raw(&token)).unwrap(), Role::Admin);
        }

        clock.set(start() + Duration::minutes(60) - Duration::milliseconds(1));
        assert!(codec.is_valid(raw(&token)));
    }

    #[test]
    fn token_expires_after_sixty_minutes() {
        let (codec, clock) = codec_at(start());
        let token = codec.issue("홍길동", Role::Admin, start()).unwrap();

        for offset in [60, 61, 24 * 60] {
            clock.set(start() + Duration::minutes(offset));
            assert!(matches!(codec.parse(raw(&token)), Err(TokenError::Expired)));
            assert!(matches!(
                codec.extract_subject(raw(&token)),
                Err(TokenError::Expired)
            ));
            assert!(!codec.is_valid(raw(&token)));
        }
    }

    #[test]
    fn tampered_signature_never_verifies() {
        let (codec, _) = codec_at(start());
        let token = codec.issue("이순신", Role::User, start()).unwrap();
        let raw = raw(&token);
        let sig_start = raw.rfind('.').unwrap() + 1;

        for i in sig_start..raw.len() {
            let original = raw.as_bytes()[i];
            let replacement = if original == b'A' { 'B' } else { 'A' };
            let mut tampered = raw.to_string();
            tampered.replace_range(i..i + 1, &replacement.to_string());

            let result = codec.parse(&tampered);
            assert!(
                matches!(result, Err(TokenError::BadSignature)),
                "byte {i} tampered: {result:?}"
            );
        }
    }

    #[test]
    fn token_from_another_key_has_bad_signature() {
        let (codec, clock) = codec_at(start());
        let other = TokenCodec::new(
            SigningKey::from_bytes(b"another-secret-key-that-is-also-32-bytes-long").unwrap(),
            clock,
        );
        let token = other.issue("이순신", Role::User, start()).unwrap();

        assert!(matches!(
            codec.parse(raw(&token)),
            Err(TokenError::BadSignature)
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        let (codec, _) = codec_at(start());
        for garbage in ["garbage", "", "a.b", "invalid.token.here", "a.b.c.d"] {
            assert!(
                matches!(codec.parse(garbage), Err(TokenError::MalformedToken)),
                "{garbage:?}"
            );
        }
    }

    #[test]
    fn other_algorithms_are_unsupported() {
        let (codec, _) = codec_at(start());
        let exp = (start() + Duration::minutes(10)).timestamp();
        let token = sign_custom(
            json!({ "sub": "이순신", "auth": "USER", "iat": start().timestamp(), "exp": exp }),
            Algorithm::HS512,
        );

        assert!(matches!(
            codec.parse(&token),
            Err(TokenError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn missing_or_empty_claims_are_rejected() {
        let (codec, _) = codec_at(start());
        let iat = start().timestamp();
        let exp = (start() + Duration::minutes(10)).timestamp();

        let payloads = [
            json!({ "sub": "이순신", "iat": iat, "exp": exp }),
            json!({ "auth": "USER", "iat": iat, "exp": exp }),
            json!({ "sub": "이순신", "auth": "USER", "iat": iat }),
            json!({ "sub": "", "auth": "USER", "iat": iat, "exp": exp }),
            json!({ "sub": "이순신", "auth": "", "iat": iat, "exp": exp }),
            json!({ "sub": "이순신", "auth": "USER", "iat": exp, "exp": iat }),
        ];

        for payload in payloads {
            let token = sign_custom(payload.clone(), Algorithm::HS256);
            assert!(
                matches!(
                    codec.parse(&token),
                    Err(TokenError::EmptyOrInvalidClaims(_))
                ),
                "{payload}"
            );
        }
    }

    #[test]
    fn unexpected_audience_is_a_claims_error() {
        let (codec, _) = codec_at(start());
        let iat = start().timestamp();
        let exp = (start() + Duration::minutes(10)).timestamp();
        let token = sign_custom(
            json!({ "sub": "이순신", "auth": "USER", "iat": iat, "exp": exp, "aud": "billing" }),
            Algorithm::HS256,
        );

        assert!(matches!(
            codec.parse(&token),
            Err(TokenError::EmptyOrInvalidClaims(claim)) if claim == "aud"
        ));
    }

    #[test]
    fn has_role_uses_containment() {
        let (codec, _) = codec_at(start());
        let admin = codec.issue("홍길동", Role::Admin, start()).unwrap();
        let user = codec.issue("이순신", Role::User, start()).unwrap();

        assert!(codec.has_role(raw(&admin), Role::Admin));
        assert!(!codec.has_role(raw(&admin), Role::User));
        assert!(codec.has_role(raw(&user), Role::User));
        assert!(!codec.has_role(raw(&user), Role::Admin));

        let exp = (start() + Duration::minutes(10)).timestamp();
        let composite = sign_custom(
            json!({ "sub": "신시임당", "auth": "USER,ADMIN", "iat": start().timestamp(), "exp": exp }),
            Algorithm::HS256,
        );
        assert!(codec.has_role(&composite, Role::Admin));
        assert!(codec.has_role(&composite, Role::User));
        assert!(matches!(
            codec.extract_role(&composite),
            Err(TokenError::EmptyOrInvalidClaims(_))
        ));
    }

    #[test]
    fn has_role_is_false_for_invalid_tokens() {
        let (codec, clock) = codec_at(start());
        let admin = codec.issue("홍길동", Role::Admin, start()).unwrap();

        assert!(!codec.has_role("garbage", Role::Admin));
        clock.set(start() + Duration::minutes(61));
        assert!(!codec.has_role(raw(&admin), Role::Admin));
    }

    #[test]
    fn tokens_issued_a_millisecond_apart_differ() {
        let (codec, clock) = codec_at(start());
        let first = codec.issue("이순신", Role::User, start()).unwrap();
        let second_at = start() + Duration::milliseconds(1);
        let second = codec.issue("이순신", Role::User, second_at).unwrap();

        assert_ne!(first, second);
        assert!(codec.is_valid(raw(&first)));
        assert!(codec.is_valid(raw(&second)));

        clock.set(start() + Duration::minutes(60));
        assert!(!codec.is_valid(raw(&first)));
        assert!(!codec.is_valid(raw(&second)));
    }

    #[test]
    fn empty_subject_is_not_issued() {
        let (codec, _) = codec_at(start());
        assert!(matches!(
            codec.issue("  ", Role::User, start()),
            Err(TokenError::EmptyOrInvalidClaims(_))
        ));
    }

    #[test]
    fn signing_key_requires_base64_and_length() {
        let short = STANDARD.encode([1u8; 16]);
        assert!(matches!(
            SigningKey::from_base64(&short),
            Err(SigningKeyError::TooShort(16))
        ));
        assert!(matches!(
            SigningKey::from_base64("not base64!"),
            Err(SigningKeyError::InvalidBase64(_))
        ));

        let key = SigningKey::from_base64(&STANDARD.encode([7u8; 32])).unwrap();
        assert_eq!(format!("{key:?}"), "SigningKey(<redacted>)");
    }
}
