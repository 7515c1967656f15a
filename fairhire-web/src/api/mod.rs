//! HTTP API handlers for fairhire-web

pub mod auth;
pub mod candidates;
pub mod export;
pub mod health;
pub mod score;
pub mod ui;

pub use health::health_routes;
