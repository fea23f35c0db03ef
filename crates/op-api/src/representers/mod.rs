//! API Representers
//!
//! HAL+JSON representers for OpenProject API v3 compatibility.
//! These convert domain models to API response format and read request
//! bodies back into them.

pub mod activity;
pub mod category;
pub mod custom_field_injector;
pub mod hal;
pub mod links;
pub mod priority;
pub mod property;
pub mod relation;
pub mod schema;
pub mod status;
pub mod string_object;
pub mod user;
pub mod version;
pub mod work_package;
pub mod work_package_payload;
pub mod work_package_schema;

// Re-exports
pub use custom_field_injector::CustomFieldInjector;
pub use hal::{HalError, HalLink, HalLinks, HalResource};
pub use links::{LinkDescriptor, LinkTable, Representation};
pub use property::{PropertyDescriptor, PropertyList};
pub use schema::{AllowedValue, AllowedValues, PropertySchema, SchemaDefinition, SchemaOptions};
pub use work_package::WorkPackageRepresenter;
pub use work_package_payload::{PayloadOptions, WorkPackagePayloadRepresenter};
pub use work_package_schema::WorkPackageSchemaRepresenter;
