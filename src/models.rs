pub mod payload;
pub mod dashboard;
