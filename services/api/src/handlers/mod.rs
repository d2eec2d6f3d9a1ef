pub mod cars;
pub mod login;
