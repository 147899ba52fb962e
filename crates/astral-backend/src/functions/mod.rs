//! Backend function families.
//!
//! Each function takes an [`Invocation`](crate::context::Invocation) and runs
//! the identity gate before touching any domain data.

pub mod meetings;
pub mod users;
