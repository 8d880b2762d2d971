/*
 * Responsibility
 * - HTTP 境界 (DTO / extractor / handler / routes)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
