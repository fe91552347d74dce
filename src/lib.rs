pub mod config;
pub mod error;
pub mod inventory;
pub mod quote;
pub mod schedule;
pub mod term;
pub mod validation;
