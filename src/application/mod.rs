//! Application services layer.

pub mod error;
pub mod identity;
pub mod posts;
pub mod repos;
