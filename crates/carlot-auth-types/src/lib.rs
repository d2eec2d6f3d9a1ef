//! Session auth shared by Carlot services.
//!
//! Provides the session [`token::TokenService`], the bearer-token
//! [`bearer::authenticate`] middleware and the [`principal::Caller`] extractor
//! with its role guard.

pub mod bearer;
pub mod principal;
pub mod token;
