/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: request gate (全リクエスト) と role layer (route 単位)
 * - http: request-id / trace / body limit / timeout
 */
pub mod auth;
pub mod http;
