//! Test utilities for Carlot services.
//!
//! Provides session-token fixtures and ready-made callers.
//! Import in tests only — never in production code.

pub mod auth;
