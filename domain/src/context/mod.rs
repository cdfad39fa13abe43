//! Canonical context (the ledger of ratified facts).

pub mod entities;
