pub mod currency;
pub mod error;
