/*
 * Responsibility
 * - Library root: bearer token issuing/verification, request gate, role guard
 * - main.rs / tests/ only go through the modules exported here
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
