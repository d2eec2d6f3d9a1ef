//! Domain types shared across Carlot crates.
//!
//! Pure types and validation rules with no framework dependencies, so any
//! layer of a service may use them.

pub mod car;
pub mod user;
