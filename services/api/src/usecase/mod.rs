pub mod cars;
pub mod identity;
pub mod login;
