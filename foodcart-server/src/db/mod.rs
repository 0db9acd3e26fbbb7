//! Database access layer

pub mod catalog;
pub mod orders;
pub mod restaurants;
