//! Shared utilities, configuration, and error handling for Jobtrack
//!
//! This crate provides common functionality used across the application:
//! - Configuration management following 12-factor principles
//! - Error types and their HTML rendering
//! - Password hashing and random token helpers
//! - Tracing subscriber setup

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod logging;
pub mod pages;

pub use crypto::{hash_password, random_token, verify_password};
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use pages::render;
