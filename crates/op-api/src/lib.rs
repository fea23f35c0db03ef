//! # op-api
//!
//! HAL+JSON representation layer of OpenProject API v3.
//!
//! Work packages render through three representers: the full entity view,
//! the writable form payload and the schema describing both. Custom fields
//! are resolved per work package when a representer is built.

pub mod context;
pub mod date_time_formatter;
pub mod error;
pub mod paths;
pub mod representers;
pub mod text_renderer;
pub mod work_package_schema;

#[cfg(test)]
mod test_support;

pub use context::RepresenterContext;
pub use error::ApiError;
pub use paths::ApiV3Paths;
pub use representers::{
    PayloadOptions, WorkPackagePayloadRepresenter, WorkPackageRepresenter, WorkPackageSchemaRepresenter,
};
pub use work_package_schema::WorkPackageSchema;
