/*!
 * Authenticated principal extractor
 *
 * Responsibility:
 * - request gate が検証した主体 (Principal) を handler に提供する
 * - axum 依存は core に、型定義は types に分離する
 */

mod core;
mod types;

pub use core::PrincipalExtractor;
pub use types::Principal;
