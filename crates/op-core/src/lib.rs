//! # op-core
//!
//! Core types, traits, and utilities for OpenProject RS.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Result type aliases
//! - Core traits (Identifiable, ProjectScoped, UserContext)
//! - Configuration and administrative settings
//! - Translation lookup

pub mod config;
pub mod error;
pub mod i18n;
pub mod result;
pub mod traits;
pub mod types;

pub use error::*;
pub use result::*;
pub use traits::*;
pub use types::*;
