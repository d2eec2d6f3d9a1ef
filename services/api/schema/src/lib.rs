//! sea-orm entities for the Carlot API database.

pub mod cars;
pub mod users;
pub mod verification_codes;
