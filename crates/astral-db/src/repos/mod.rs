//! Repository methods, implemented as `impl AstralDb` blocks per entity.

pub mod meeting;
pub mod user;
