//! Shared library for FairHire services
//!
//! Provides the common error type, configuration resolution, password
//! hashing, and the SQLite persistence layer (login audit, user credentials,
//! durable sessions).

pub mod auth;
pub mod config;
pub mod db;
pub mod error;

pub use config::Config;
pub use error::{Error, Result};
