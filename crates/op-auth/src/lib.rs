//! # op-auth
//!
//! Authorization for OpenProject RS.
//!
//! ## Features
//!
//! - The current user of a request with their project and global permissions
//! - The work package permission vocabulary checked by the API representers

pub mod permissions;

pub use permissions::{builtin, CurrentUser, Permission, PermissionScope};
