//! Hypermedia link tables
//!
//! Links are declared once per representer as a table of rel name, permission
//! gate, optional extra predicate and href/title/method builders. Rendering
//! walks the table and keeps only the links whose gate holds for the current
//! user. Attribute links can also carry a setter that turns a submitted href
//! back into a foreign key (used by the payload representer).

use op_core::traits::{Id, ProjectScoped};
use op_core::{OpError, OpResult};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use super::hal::{HalLink, HalLinks};
use super::property::{Condition, PropertyList};
use crate::context::RepresenterContext;

pub type HrefFn<M> = Arc<dyn Fn(&M, &RepresenterContext) -> OpResult<Option<String>> + Send + Sync>;
pub type ManyFn<M> = Arc<dyn Fn(&M, &RepresenterContext) -> OpResult<Vec<HalLink>> + Send + Sync>;
pub type TitleFn<M> = Arc<dyn Fn(&M, &RepresenterContext) -> OpResult<Option<String>> + Send + Sync>;
pub type DataFn<M> = Arc<dyn Fn(&M, &RepresenterContext) -> OpResult<Option<Value>> + Send + Sync>;
pub type LinkSetter<M> = Arc<dyn Fn(&mut M, Option<Id>, &RepresenterContext) -> OpResult<()> + Send + Sync>;

enum LinkTarget<M> {
    /// One link; `None` renders `{"href": null}`
    Href(HrefFn<M>),
    /// An array of links, omitted when empty
    Many(ManyFn<M>),
}

impl<M> Clone for LinkTarget<M> {
    fn clone(&self) -> Self {
        match self {
            Self::Href(f) => Self::Href(Arc::clone(f)),
            Self::Many(f) => Self::Many(Arc::clone(f)),
        }
    }
}

struct HrefSetter<M> {
    /// API collection the href must point into, e.g. `statuses`
    collection: &'static str,
    apply: LinkSetter<M>,
}

impl<M> Clone for HrefSetter<M> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection,
            apply: Arc::clone(&self.apply),
        }
    }
}

/// One row of a link table
pub struct LinkDescriptor<M> {
    rel: String,
    permission: Option<&'static str>,
    predicate: Option<Condition<M>>,
    target: LinkTarget<M>,
    method: Option<&'static str>,
    media_type: Option<&'static str>,
    templated: bool,
    title: Option<TitleFn<M>>,
    data: Option<DataFn<M>>,
    setter: Option<HrefSetter<M>>,
}

impl<M> Clone for LinkDescriptor<M> {
    fn clone(&self) -> Self {
        Self {
            rel: self.rel.clone(),
            permission: self.permission,
            predicate: self.predicate.clone(),
            target: self.target.clone(),
            method: self.method,
            media_type: self.media_type,
            templated: self.templated,
            title: self.title.clone(),
            data: self.data.clone(),
            setter: self.setter.clone(),
        }
    }
}

impl<M> LinkDescriptor<M> {
    pub fn new<H>(rel: impl Into<String>, href: H) -> Self
    where
        H: Fn(&M, &RepresenterContext) -> OpResult<Option<String>> + Send + Sync + 'static,
    {
        Self::with_target(rel, LinkTarget::Href(Arc::new(href)))
    }

    /// A rel rendering an array of links
    pub fn many<F>(rel: impl Into<String>, links: F) -> Self
    where
        F: Fn(&M, &RepresenterContext) -> OpResult<Vec<HalLink>> + Send + Sync + 'static,
    {
        Self::with_target(rel, LinkTarget::Many(Arc::new(links)))
    }

    fn with_target(rel: impl Into<String>, target: LinkTarget<M>) -> Self {
        Self {
            rel: rel.into(),
            permission: None,
            predicate: None,
            target,
            method: None,
            media_type: None,
            templated: false,
            title: None,
            data: None,
            setter: None,
        }
    }

    /// Only render when the current user holds `permission` in the project
    pub fn permission(mut self, permission: &'static str) -> Self {
        self.permission = Some(permission);
        self
    }

    /// Additional condition evaluated after the permission gate
    pub fn show_if<C>(mut self, predicate: C) -> Self
    where
        C: Fn(&M, &RepresenterContext) -> OpResult<bool> + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    pub fn method(mut self, method: &'static str) -> Self {
        self.method = Some(method);
        self
    }

    pub fn media_type(mut self, media_type: &'static str) -> Self {
        self.media_type = Some(media_type);
        self
    }

    pub fn templated(mut self) -> Self {
        self.templated = true;
        self
    }

    pub fn title<T>(mut self, title: T) -> Self
    where
        T: Fn(&M, &RepresenterContext) -> OpResult<Option<String>> + Send + Sync + 'static,
    {
        self.title = Some(Arc::new(title));
        self
    }

    pub fn data<D>(mut self, data: D) -> Self
    where
        D: Fn(&M, &RepresenterContext) -> OpResult<Option<Value>> + Send + Sync + 'static,
    {
        self.data = Some(Arc::new(data));
        self
    }

    /// Accept `{"href": ...}` for this rel when parsing; the href must point
    /// into `collection`, `null` clears the association
    pub fn setter<S>(mut self, collection: &'static str, apply: S) -> Self
    where
        S: Fn(&mut M, Option<Id>, &RepresenterContext) -> OpResult<()> + Send + Sync + 'static,
    {
        self.setter = Some(HrefSetter {
            collection,
            apply: Arc::new(apply),
        });
        self
    }

    pub fn rel(&self) -> &str {
        &self.rel
    }
}

impl<M: ProjectScoped> LinkDescriptor<M> {
    fn applies(&self, model: &M, context: &RepresenterContext) -> OpResult<bool> {
        if let Some(permission) = self.permission {
            if !context.current_user_allowed_to(permission, model) {
                debug!(rel = %self.rel, permission, "link suppressed");
                return Ok(false);
            }
        }
        match &self.predicate {
            Some(predicate) => predicate(model, context),
            None => Ok(true),
        }
    }

    fn decorate(&self, mut link: HalLink, model: &M, context: &RepresenterContext) -> OpResult<HalLink> {
        if let Some(title) = &self.title {
            link.title = title(model, context)?;
        }
        if let Some(method) = self.method {
            link = link.method(method);
        }
        if let Some(media_type) = self.media_type {
            link = link.media_type(media_type);
        }
        if self.templated {
            link.templated = Some(true);
        }
        if let Some(data) = &self.data {
            link.data = data(model, context)?;
        }
        Ok(link)
    }
}

/// Ordered link table; later rows replace earlier rows of the same rel
pub struct LinkTable<M> {
    descriptors: Vec<LinkDescriptor<M>>,
}

impl<M> Clone for LinkTable<M> {
    fn clone(&self) -> Self {
        Self {
            descriptors: self.descriptors.clone(),
        }
    }
}

impl<M> Default for LinkTable<M> {
    fn default() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }
}

impl<M> LinkTable<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, descriptor: LinkDescriptor<M>) {
        self.descriptors.retain(|d| d.rel != descriptor.rel);
        self.descriptors.push(descriptor);
    }

    pub fn with(mut self, descriptor: LinkDescriptor<M>) -> Self {
        self.push(descriptor);
        self
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn contains(&self, rel: &str) -> bool {
        self.descriptors.iter().any(|d| d.rel == rel)
    }
}

impl<M: ProjectScoped> LinkTable<M> {
    pub fn render(&self, model: &M, context: &RepresenterContext) -> OpResult<HalLinks> {
        let mut links = HalLinks::new();
        for descriptor in &self.descriptors {
            if !descriptor.applies(model, context)? {
                continue;
            }
            match &descriptor.target {
                LinkTarget::Href(href) => {
                    let link = match href(model, context)? {
                        Some(href) => HalLink::new(href),
                        None => HalLink::empty(),
                    };
                    links.add(descriptor.rel.clone(), descriptor.decorate(link, model, context)?);
                }
                LinkTarget::Many(many) => {
                    let items = many(model, context)?;
                    if !items.is_empty() {
                        links.add_array(descriptor.rel.clone(), items);
                    }
                }
            }
        }
        Ok(links)
    }

    /// Apply the hrefs of a submitted `_links` object to the model
    pub fn apply(
        &self,
        model: &mut M,
        links: &Map<String, Value>,
        context: &RepresenterContext,
    ) -> OpResult<()> {
        for descriptor in &self.descriptors {
            let Some(setter) = &descriptor.setter else {
                continue;
            };
            let Some(link) = links.get(&descriptor.rel) else {
                continue;
            };
            let id = match link.get("href") {
                Some(Value::String(href)) => {
                    Some(context.paths.parse_id(setter.collection, &descriptor.rel, href)?)
                }
                Some(Value::Null) => None,
                _ => {
                    return Err(OpError::invalid_format(
                        descriptor.rel.clone(),
                        "link object with href",
                        link.to_string(),
                    ))
                }
            };
            (setter.apply)(model, id, context)?;
        }
        Ok(())
    }
}

/// The full declarative shape of one representer: `_type`, properties,
/// links and embedded resources
pub struct Representation<M> {
    pub type_name: &'static str,
    pub properties: PropertyList<M>,
    pub links: LinkTable<M>,
    pub embedded: PropertyList<M>,
}

impl<M> Clone for Representation<M> {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name,
            properties: self.properties.clone(),
            links: self.links.clone(),
            embedded: self.embedded.clone(),
        }
    }
}

impl<M> Representation<M> {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            properties: PropertyList::new(),
            links: LinkTable::new(),
            embedded: PropertyList::new(),
        }
    }
}

impl<M: ProjectScoped> Representation<M> {
    /// Render into a HAL document; `_embedded` is left out when empty
    pub fn render(&self, model: &M, context: &RepresenterContext) -> OpResult<Value> {
        let mut document = Map::new();
        document.insert("_type".to_string(), Value::String(self.type_name.to_string()));
        self.properties.render_into(model, context, &mut document)?;

        let links = self.links.render(model, context)?;
        document.insert("_links".to_string(), super::hal::to_value(&links)?);

        let embedded = self.embedded.render(model, context)?;
        if !embedded.is_empty() {
            document.insert("_embedded".to_string(), Value::Object(embedded));
        }
        Ok(Value::Object(document))
    }
}
