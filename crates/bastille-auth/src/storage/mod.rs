//! Storage traits for OAuth2 credential data.
//!
//! This module defines storage interfaces for:
//!
//! - OAuth client registrations
//! - Token grants (authorization codes, access tokens, refresh tokens)
//!
//! # Implementations
//!
//! Storage implementations are provided in separate crates:
//!
//! - `bastille-auth-mongodb` - MongoDB storage backend
//! - `bastille-auth-memory` - in-memory storage backend

pub mod client;
pub mod token;

pub use client::ClientStorage;
pub use token::TokenStorage;
