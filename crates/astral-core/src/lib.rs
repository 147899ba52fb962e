//! # astral-core
//!
//! Core types, ID prefixes, and error types for the Astral backend.
//!
//! This crate provides the foundational types shared across all Astral crates:
//! - Identity claims handed over by the authentication provider
//! - User records and the role hierarchy
//! - Plan and trial access resolution
//! - Meeting entities for the live-class function family
//! - The capability traits (`IdentitySource`, `UserDirectory`) the identity
//!   gate is built on
//! - Cross-cutting error types

pub mod access;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod meeting;
pub mod ports;
pub mod user;
