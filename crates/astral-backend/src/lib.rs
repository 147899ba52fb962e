//! # astral-backend
//!
//! The backend-function layer of Astral.
//!
//! [`Backend`] owns the process-wide resources (database handle, Clerk JWKS
//! cache) and hands out one [`Invocation`] per remote call. Every function in
//! [`functions`] resolves the caller through the identity gate before it
//! reads or writes anything. [`provisioning`] keeps the user table in step
//! with identity-provider events.

pub mod context;
pub mod error;
pub mod functions;
pub mod provisioning;
pub mod telemetry;

pub use context::{Backend, FunctionSettings, Invocation};
pub use error::BackendError;
pub use provisioning::EventOutcome;
