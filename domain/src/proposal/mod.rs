//! Commit proposals and votes.

pub mod entities;
pub mod vote;
