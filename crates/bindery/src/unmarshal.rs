//! Text to object graph.

use std::collections::HashSet;

use tracing::{debug, instrument, trace};

use crate::context::{BindingContext, CompiledPlan, PlannedProperty};
use crate::descriptor::{ItemKind, NullPolicy, TypeKey, ValueKind};
use crate::error::{BindError, Result};
use crate::marshal::join;
use crate::media::Presence;
use crate::node::{self, Members, Node};
use crate::value::{Bindable, BoundElement, Object, Value};

/// Reads documents of the context's media type back into objects.
///
/// Obtained from [`BindingContext::unmarshaller`]. Members of the input that no
/// property maps are ignored.
#[derive(Debug, Clone, Copy)]
pub struct Unmarshaller<'a> {
    context: &'a BindingContext,
}

impl<'a> Unmarshaller<'a> {
    pub(crate) fn new(context: &'a BindingContext) -> Self {
        Self { context }
    }

    pub fn unmarshal(&self, text: &str, type_key: impl Into<TypeKey>) -> Result<Object> {
        self.unmarshal_element(text, type_key).map(|element| element.value)
    }

    /// Unmarshals a document and returns it with the root name it was read
    /// under (empty for JSON without root inclusion).
    #[instrument(skip_all)]
    pub fn unmarshal_element(&self, text: &str, type_key: impl Into<TypeKey>) -> Result<BoundElement> {
        let type_key = type_key.into();
        let plan = self.context.resolve(&type_key)?;
        let adapter = self.context.adapter();
        debug!(media_type = %adapter.media_type(), type_key = %type_key, bytes = text.len(), "Unmarshalling");

        let document = adapter.parse(text)?;
        let value = self.read_object(&plan, document.body, "")?;
        Ok(BoundElement::new(document.root_name, value))
    }

    pub fn unmarshal_value<T: Bindable>(&self, text: &str) -> Result<T> {
        let object = self.unmarshal(text, T::bound_type().key)?;
        T::from_object(object)
    }

    fn read_object(&self, plan: &CompiledPlan, node: Node, path: &str) -> Result<Object> {
        let mut members = match node {
            Node::Object(members) => members,
            node if node.is_blank() => Members::new(),
            other => {
                let at = if path.is_empty() { plan.type_key.as_str() } else { path };
                return Err(BindError::mismatch(at, "object", other.kind_name()));
            }
        };

        let mut object = Object::new(plan.type_key.clone());
        for property in &plan.properties {
            let property_path = join(path, &property.name);
            let value = match find_container(&mut members, &property.containers, &property_path)? {
                Some(container) => self.read_property(container, property, &property_path)?,
                None => absent(property),
            };
            object.set(property.name.clone(), value);
        }

        let containers: HashSet<&str> = plan
            .properties
            .iter()
            .filter_map(|p| p.containers.first().map(String::as_str))
            .collect();
        for (name, _) in &members {
            if !containers.contains(name.as_str()) {
                trace!(type_key = %plan.type_key, member = %name, "Ignoring unmapped member");
            }
        }
        Ok(object)
    }

    fn read_property(
        &self,
        container: &mut Members,
        property: &PlannedProperty,
        path: &str,
    ) -> Result<Value> {
        if let ValueKind::Collection(item) = &property.kind {
            let presence = self
                .context
                .adapter()
                .take_collection(container, &property.leaf, property.wrapper.as_ref())
                .map_err(|shape| BindError::mismatch(path, shape.expected, shape.found))?;
            return match presence {
                Presence::Absent => Ok(absent(property)),
                Presence::Null => Ok(Value::Null),
                Presence::Items(nodes) => nodes
                    .into_iter()
                    .map(|n| self.read_item(item, n, path))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::List),
            };
        }

        let Some(found) = node::take_member(container, &property.leaf) else {
            return Ok(absent(property));
        };
        match (&property.kind, found) {
            (_, Node::Null) => Ok(Value::Null),
            (ValueKind::Scalar(kind), Node::Scalar(text)) => self
                .context
                .config()
                .converters
                .decode(&text.value, *kind)
                .map(Value::Scalar)
                .map_err(|e| e.at_property(path)),
            (ValueKind::Nested(key), found) => {
                let plan = self.context.resolve(key)?;
                self.read_object(&plan, found, path).map(Value::Object)
            }
            (kind, other) => Err(BindError::mismatch(path, kind.name(), other.kind_name())),
        }
    }

    fn read_item(&self, item: &ItemKind, node: Node, path: &str) -> Result<Value> {
        match (item, node) {
            (_, Node::Null) => Ok(Value::Null),
            (ItemKind::Scalar(kind), Node::Scalar(text)) => self
                .context
                .config()
                .converters
                .decode(&text.value, *kind)
                .map(Value::Scalar)
                .map_err(|e| e.at_property(path)),
            (ItemKind::Nested(key), node) => {
                let plan = self.context.resolve(key)?;
                self.read_object(&plan, node, path).map(Value::Object)
            }
            (ItemKind::Scalar(_), other) => Err(BindError::mismatch(path, "scalar", other.kind_name())),
        }
    }
}

/// The value of a property that is missing from the input.
fn absent(property: &PlannedProperty) -> Value {
    match property.null_policy {
        NullPolicy::EmitEmptyContainer => Value::List(Vec::new()),
        _ => Value::Null,
    }
}

/// Walks down to the members below `segments`. A missing or null container
/// yields `None`.
fn find_container<'m>(
    members: &'m mut Members,
    segments: &[String],
    path: &str,
) -> Result<Option<&'m mut Members>> {
    let Some((first, rest)) = segments.split_first() else {
        return Ok(Some(members));
    };
    let Some(idx) = members.iter().position(|(name, _)| name == first) else {
        return Ok(None);
    };
    let found = &mut members[idx].1;
    if found.is_blank() {
        *found = Node::empty_object();
    }
    match found {
        Node::Object(inner) => find_container(inner, rest, path),
        Node::Null => Ok(None),
        other => Err(BindError::mismatch(path, "object", other.kind_name())),
    }
}
