//! Read-only blog post API with a cached PluralKit system profile proxy.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
