//! Core domain primitives: ids and errors.

pub mod error;
pub mod id;
