//! Member entity.

pub mod entities;
