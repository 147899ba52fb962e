//! # astral-auth
//!
//! Clerk-based authentication for Astral backend functions.
//!
//! Provides `Authorization` header parsing, JWKS session token validation
//! (`clerk-rs`), identity sources backed by Clerk or fixed claims, and the
//! [`IdentityGate`] that every authenticated function runs first.

pub mod bearer;
pub mod claims;
pub mod error;
pub mod gate;
pub mod jwks;
pub mod source;

pub use claims::SessionClaims;
pub use error::AuthError;
pub use gate::{GateError, IdentityGate};
pub use jwks::ClerkJwks;
pub use source::{ClerkSession, StaticIdentity};
