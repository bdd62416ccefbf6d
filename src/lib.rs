/// Process configuration from flags and environment variables.
pub mod config;
/// Database layer: open, migrate, todo CRUD.
pub mod db;
/// Data types: Todo and its writable input.
pub mod models;
/// Axum-based web server: REST routes and the GraphQL endpoint.
pub mod web;
