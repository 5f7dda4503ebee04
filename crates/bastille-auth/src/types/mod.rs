//! Domain types for OAuth2 credential storage.
//!
//! [`Client`] and [`Token`] are the concrete records the storage traits
//! persist. [`ClientInfo`] and [`TokenInfo`] are the capability views the
//! surrounding OAuth2 protocol logic programs against; the stores only
//! extract the fields they need to compute physical layout and expirations
//! and treat the rest as an opaque serializable payload.

pub mod client;
pub mod token;

pub use client::{Client, ClientInfo};
pub use token::{Token, TokenInfo};
