/*
 * Responsibility
 * - 権限別のデモ用リソース
 * - role check は routes 側の require_role で掛ける (handler 本体には書かない)
 */
use crate::api::extractors::PrincipalExtractor;

pub const USER_PAGE_MESSAGE: &str = "유저 페이지 리소스가 허가되었습니다.";
pub const ADMIN_PAGE_MESSAGE: &str = "어드민 페이지 리소스가 허가되었습니다.";

pub async fn user_page(PrincipalExtractor(principal): PrincipalExtractor) -> &'static str {
    tracing::debug!(subject = %principal.subject, "user page");
    USER_PAGE_MESSAGE
}

pub async fn admin_page(PrincipalExtractor(principal): PrincipalExtractor) -> &'static str {
    tracing::debug!(subject = %principal.subject, "admin page");
    ADMIN_PAGE_MESSAGE
}

/// Gate only, no role requirement.
pub async fn admin_get(PrincipalExtractor(principal): PrincipalExtractor) -> &'static str {
    tracing::info!(
        subject = %principal.subject,
        role = %principal.role,
        "admin get called"
    );
    ADMIN_PAGE_MESSAGE
}
