//! User model and related types
//!
//! Mirrors: app/models/user.rb and related files

pub mod model;

pub use model::*;
