//! HAL+JSON Representers
//!
//! Implements Hypertext Application Language (HAL) format used by OpenProject API v3.
//! See: https://datatracker.ietf.org/doc/html/draft-kelly-json-hal-08

use op_core::{OpError, OpResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A HAL link
///
/// `href` is nullable: an attribute link of an unset association renders as
/// `{"href": null}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalLink {
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl HalLink {
    /// Create a simple link with just an href
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            title: None,
            method: None,
            media_type: None,
            templated: None,
            data: None,
        }
    }

    /// A link without target
    pub fn empty() -> Self {
        Self {
            href: None,
            title: None,
            method: None,
            media_type: None,
            templated: None,
            data: None,
        }
    }

    /// Create a link with title
    pub fn with_title(href: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(href).title(title)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add method to link
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Media type of the target, e.g. `text/html` for non API pages
    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Request body to send along
    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Collection of HAL links
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HalLinks(BTreeMap<String, HalLinkValue>);

/// A link value can be a single link or an array of links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HalLinkValue {
    Single(HalLink),
    Array(Vec<HalLink>),
}

impl HalLinks {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add a single link
    pub fn add(&mut self, rel: impl Into<String>, link: HalLink) {
        self.0.insert(rel.into(), HalLinkValue::Single(link));
    }

    /// Add multiple links for a relation
    pub fn add_array(&mut self, rel: impl Into<String>, links: Vec<HalLink>) {
        self.0.insert(rel.into(), HalLinkValue::Array(links));
    }

    /// Builder pattern: add single link
    pub fn with(mut self, rel: impl Into<String>, link: HalLink) -> Self {
        self.add(rel, link);
        self
    }

    /// Check if a relation exists
    pub fn has(&self, rel: &str) -> bool {
        self.0.contains_key(rel)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A HAL resource wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HalResource<T> {
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(flatten)]
    pub resource: T,
    #[serde(rename = "_links")]
    pub links: HalLinks,
}

impl<T: Serialize> HalResource<T> {
    /// Create a new HAL resource
    pub fn new(resource_type: impl Into<String>, resource: T) -> Self {
        Self {
            resource_type: Some(resource_type.into()),
            resource,
            links: HalLinks::new(),
        }
    }

    /// Add a link
    pub fn with_link(mut self, rel: impl Into<String>, link: HalLink) -> Self {
        self.links.add(rel, link);
        self
    }

    /// Add links
    pub fn with_links(mut self, links: HalLinks) -> Self {
        self.links = links;
        self
    }

    pub fn to_value(&self) -> OpResult<Value> {
        to_value(self)
    }
}

/// Serialize a representation into a JSON document
pub fn to_value<T: Serialize>(resource: T) -> OpResult<Value> {
    serde_json::to_value(resource).map_err(|e| OpError::Internal(e.to_string()))
}

/// Error response in HAL format
#[derive(Debug, Clone, Serialize)]
pub struct HalError {
    #[serde(rename = "_type")]
    pub error_type: String,
    #[serde(rename = "errorIdentifier")]
    pub error_identifier: String,
    pub message: String,
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<HalErrorEmbedded>,
}

/// Embedded error details
#[derive(Debug, Clone, Serialize)]
pub struct HalErrorEmbedded {
    pub details: HalErrorDetails,
}

/// Detailed error information
#[derive(Debug, Clone, Serialize)]
pub struct HalErrorDetails {
    pub attribute: String,
}

impl HalError {
    /// Create a simple error
    pub fn new(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_type: "Error".to_string(),
            error_identifier: format!("urn:openproject-org:api:v3:errors:{}", identifier.into()),
            message: message.into(),
            embedded: None,
        }
    }

    /// Attach the offending attribute
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.embedded = Some(HalErrorEmbedded {
            details: HalErrorDetails {
                attribute: attribute.into(),
            },
        });
        self
    }
}

/// Common HAL link relations
pub mod rels {
    pub const SELF: &str = "self";
    pub const SCHEMA: &str = "schema";
    pub const UPDATE: &str = "update";
    pub const UPDATE_IMMEDIATELY: &str = "updateImmediately";
    pub const DELETE: &str = "delete";
    pub const LOG_TIME: &str = "logTime";
    pub const DUPLICATE: &str = "duplicate";
    pub const MOVE: &str = "move";
    pub const AVAILABLE_WATCHERS: &str = "availableWatchers";
    pub const WATCH_CHANGES: &str = "watchChanges";
    pub const UNWATCH_CHANGES: &str = "unwatchChanges";
    pub const ADD_WATCHER: &str = "addWatcher";
    pub const REMOVE_WATCHER: &str = "removeWatcher";
    pub const ADD_RELATION: &str = "addRelation";
    pub const ADD_CHILD: &str = "addChild";
    pub const CHANGE_PARENT: &str = "changeParent";
    pub const ADD_COMMENT: &str = "addComment";
    pub const TIME_ENTRIES: &str = "timeEntries";
    pub const CHILDREN: &str = "children";
    pub const ALLOWED_VALUES: &str = "allowedValues";
}
