//! Core domain model.

pub mod entities;
pub mod types;
