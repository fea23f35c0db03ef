//! Property descriptors
//!
//! A representer is an ordered list of descriptors evaluated against the
//! represented object at render time. Each descriptor carries its own
//! accessor functions taking the object and the request context, so the set
//! of properties can be extended per call (custom fields) without touching
//! the shared base list.

use op_core::OpResult;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::context::RepresenterContext;

pub type Getter<M> = Arc<dyn Fn(&M, &RepresenterContext) -> OpResult<Value> + Send + Sync>;
pub type Setter<M> = Arc<dyn Fn(&mut M, &Value, &RepresenterContext) -> OpResult<()> + Send + Sync>;
pub type Condition<M> = Arc<dyn Fn(&M, &RepresenterContext) -> OpResult<bool> + Send + Sync>;

/// One serialized property
pub struct PropertyDescriptor<M> {
    name: String,
    getter: Getter<M>,
    setter: Option<Setter<M>>,
    render_nil: bool,
    condition: Option<Condition<M>>,
}

impl<M> Clone for PropertyDescriptor<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            getter: Arc::clone(&self.getter),
            setter: self.setter.clone(),
            render_nil: self.render_nil,
            condition: self.condition.clone(),
        }
    }
}

impl<M> PropertyDescriptor<M> {
    /// `name` is the wire name, e.g. `startDate`
    pub fn new<G>(name: impl Into<String>, getter: G) -> Self
    where
        G: Fn(&M, &RepresenterContext) -> OpResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            getter: Arc::new(getter),
            setter: None,
            render_nil: false,
            condition: None,
        }
    }

    /// Accept the property when parsing a document
    pub fn setter<S>(mut self, setter: S) -> Self
    where
        S: Fn(&mut M, &Value, &RepresenterContext) -> OpResult<()> + Send + Sync + 'static,
    {
        self.setter = Some(Arc::new(setter));
        self
    }

    /// Render `null` values instead of omitting the property
    pub fn render_nil(mut self) -> Self {
        self.render_nil = true;
        self
    }

    /// Only render (and parse) the property while `condition` holds
    pub fn show_if<C>(mut self, condition: C) -> Self
    where
        C: Fn(&M, &RepresenterContext) -> OpResult<bool> + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    fn applies(&self, model: &M, context: &RepresenterContext) -> OpResult<bool> {
        match &self.condition {
            Some(condition) => condition(model, context),
            None => Ok(true),
        }
    }
}

/// Ordered property descriptors; later entries replace earlier ones of the same name
pub struct PropertyList<M> {
    descriptors: Vec<PropertyDescriptor<M>>,
}

impl<M> Clone for PropertyList<M> {
    fn clone(&self) -> Self {
        Self {
            descriptors: self.descriptors.clone(),
        }
    }
}

impl<M> Default for PropertyList<M> {
    fn default() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }
}

impl<M> PropertyList<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, descriptor: PropertyDescriptor<M>) {
        self.descriptors.retain(|d| d.name != descriptor.name);
        self.descriptors.push(descriptor);
    }

    pub fn with(mut self, descriptor: PropertyDescriptor<M>) -> Self {
        self.push(descriptor);
        self
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.iter().any(|d| d.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|d| d.name.as_str())
    }

    /// Evaluate all getters into `target`
    pub fn render_into(
        &self,
        model: &M,
        context: &RepresenterContext,
        target: &mut Map<String, Value>,
    ) -> OpResult<()> {
        for descriptor in &self.descriptors {
            if !descriptor.applies(model, context)? {
                continue;
            }
            let value = (descriptor.getter)(model, context)?;
            if value.is_null() && !descriptor.render_nil {
                continue;
            }
            target.insert(descriptor.name.clone(), value);
        }
        Ok(())
    }

    pub fn render(&self, model: &M, context: &RepresenterContext) -> OpResult<Map<String, Value>> {
        let mut target = Map::new();
        self.render_into(model, context, &mut target)?;
        Ok(target)
    }

    /// Feed the writable properties present in `document` to their setters;
    /// unknown and read-only properties are ignored
    pub fn apply(
        &self,
        model: &mut M,
        document: &Map<String, Value>,
        context: &RepresenterContext,
    ) -> OpResult<()> {
        for descriptor in &self.descriptors {
            let Some(setter) = &descriptor.setter else {
                continue;
            };
            let Some(value) = document.get(&descriptor.name) else {
                continue;
            };
            if !descriptor.applies(model, context)? {
                continue;
            }
            setter(model, value, context)?;
        }
        Ok(())
    }
}

/// `start_date` -> `startDate`; a leading underscore is kept (`_type`)
pub fn camel_case(name: &str) -> String {
    let (prefix, rest) = match name.strip_prefix('_') {
        Some(rest) => ("_", rest),
        None => ("", name),
    };
    let mut out = String::from(prefix);
    let mut upper = false;
    for c in rest.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// `assigned_to` -> `AssignedTo`
pub fn upper_camel_case(name: &str) -> String {
    let lower = camel_case(name.trim_start_matches('_'));
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::context;
    use op_core::OpError;
    use serde_json::json;

    #[derive(Default)]
    struct Note {
        text: Option<String>,
        hidden: bool,
    }

    fn text_property() -> PropertyDescriptor<Note> {
        PropertyDescriptor::new("text", |note: &Note, _ctx: &RepresenterContext| {
            Ok(json!(note.text))
        })
        .setter(|note: &mut Note, value: &Value, _ctx: &RepresenterContext| {
            note.text = value.as_str().map(str::to_string);
            Ok(())
        })
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("start_date"), "startDate");
        assert_eq!(camel_case("_type"), "_type");
        assert_eq!(camel_case("lock_version"), "lockVersion");
        assert_eq!(upper_camel_case("assignee"), "Assignee");
        assert_eq!(upper_camel_case("assigned_to"), "AssignedTo");
    }

    #[test]
    fn test_nil_omitted_unless_render_nil() {
        let ctx = context();
        let note = Note::default();

        let plain = PropertyList::new().with(text_property());
        assert!(plain.render(&note, &ctx).unwrap().is_empty());

        let nil = PropertyList::new().with(text_property().render_nil());
        assert_eq!(nil.render(&note, &ctx).unwrap()["text"], Value::Null);
    }

    #[test]
    fn test_condition_hides_property() {
        let ctx = context();
        let list = PropertyList::new().with(
            text_property()
                .render_nil()
                .show_if(|note: &Note, _ctx: &RepresenterContext| Ok(!note.hidden)),
        );
        let note = Note {
            text: Some("x".into()),
            hidden: true,
        };
        assert!(!list.render(&note, &ctx).unwrap().contains_key("text"));
    }

    #[test]
    fn test_later_descriptor_replaces_earlier() {
        let list = PropertyList::new()
            .with(text_property())
            .with(PropertyDescriptor::new("text", |_: &Note, _: &RepresenterContext| {
                Ok(json!("override"))
            }));
        assert_eq!(list.len(), 1);
        assert!(!list.descriptors[0].is_writable());
    }

    #[test]
    fn test_apply_uses_setters_only() {
        let ctx = context();
        let list = PropertyList::new()
            .with(text_property())
            .with(PropertyDescriptor::new("readOnly", |_: &Note, _: &RepresenterContext| {
                Ok(Value::Null)
            }));

        let mut note = Note::default();
        let document = json!({ "text": "hello", "readOnly": 5, "unknown": true });
        list.apply(&mut note, document.as_object().unwrap(), &ctx)
            .unwrap();
        assert_eq!(note.text.as_deref(), Some("hello"));
    }

    #[test]
    fn test_getter_errors_propagate() {
        let ctx = context();
        let list = PropertyList::new().with(PropertyDescriptor::new(
            "broken",
            |_: &Note, _: &RepresenterContext| Err(OpError::Internal("boom".into())),
        ));
        assert!(list.render(&Note::default(), &ctx).is_err());
    }
}
