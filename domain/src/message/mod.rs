//! Channel messages.

pub mod entities;
