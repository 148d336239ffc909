//! Cross-cutting HTTP middleware.

pub mod trace;
