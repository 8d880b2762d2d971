/*
 * Responsibility
 * - Handler から見える「認証済み主体」の型
 * - request gate が token を検証して extensions に格納し、handler はこの型だけを受け取る
 */
use crate::services::auth::Claims;

/// Identity and role taken from a verified token; lives only for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    /// Raw role claim as carried by the token.
    pub role: String,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.subject,
            role: claims.role,
        }
    }
}
