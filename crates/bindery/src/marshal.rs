//! Object graph to text.

use tracing::{debug, instrument};

use crate::context::{BindingContext, CompiledPlan, PlannedProperty};
use crate::descriptor::{ItemKind, NullPolicy, ValueKind};
use crate::error::{BindError, Result};
use crate::media::{CollectionNode, Document};
use crate::node::{self, Members, Node};
use crate::value::{Bindable, BoundElement, Object, Value};

/// Writes objects as documents of the context's media type.
///
/// Obtained from [`BindingContext::marshaller`]. Each call builds and drops its
/// own node tree; a failed call returns no output.
#[derive(Debug, Clone, Copy)]
pub struct Marshaller<'a> {
    context: &'a BindingContext,
}

impl<'a> Marshaller<'a> {
    pub(crate) fn new(context: &'a BindingContext) -> Self {
        Self { context }
    }

    /// Marshals an object under `root_name`.
    ///
    /// An empty root name falls back to the type's default root name. In JSON
    /// without root inclusion the name is not written at all.
    #[instrument(skip_all, fields(type_key = %object.type_key()))]
    pub fn marshal(&self, object: &Object, root_name: &str) -> Result<String> {
        let plan = self.context.resolve(object.type_key())?;
        let body = self.object_node(&plan, object, "")?;
        let root_name = if root_name.is_empty() {
            plan.root_name.clone()
        } else {
            root_name.to_string()
        };

        let adapter = self.context.adapter();
        debug!(media_type = %adapter.media_type(), root = %root_name, "Marshalling");
        adapter.render(Document {
            root_name,
            namespace: plan.namespace.clone(),
            body,
        })
    }

    pub fn marshal_value<T: Bindable>(&self, value: &T, root_name: &str) -> Result<String> {
        self.marshal(&value.to_object(), root_name)
    }

    pub fn marshal_element(&self, element: &BoundElement) -> Result<String> {
        self.marshal(&element.value, &element.name)
    }

    fn object_node(&self, plan: &CompiledPlan, object: &Object, path: &str) -> Result<Node> {
        let mut members = Members::new();
        for property in &plan.properties {
            let property_path = join(path, &property.name);
            let value = object.get(&property.name).unwrap_or(&Value::Null);
            self.place(&mut members, property, value, &property_path)?;
        }
        Ok(Node::Object(members))
    }

    fn place(
        &self,
        members: &mut Members,
        property: &PlannedProperty,
        value: &Value,
        path: &str,
    ) -> Result<()> {
        if let ValueKind::Collection(item) = &property.kind {
            let Some(collection) = self.collection_node(property, item, value, path)? else {
                return Ok(());
            };
            let container = container(members, property, path)?;
            return self
                .context
                .adapter()
                .place_collection(container, &property.leaf, property.wrapper.as_ref(), collection)
                .map_err(|shape| BindError::mismatch(path, shape.expected, shape.found));
        }

        let node = match (value, &property.kind) {
            (Value::Null, _) => match property.null_policy {
                NullPolicy::EmitNullMarker => Node::Null,
                _ => return Ok(()),
            },
            (Value::Scalar(scalar), ValueKind::Scalar(kind)) => {
                let text = self
                    .context
                    .config()
                    .converters
                    .encode(scalar, *kind)
                    .map_err(|e| e.at_property(path))?;
                Node::styled(text, kind.text_style())
            }
            (Value::Object(nested), ValueKind::Nested(key)) => {
                let plan = self.context.resolve(key)?;
                self.object_node(&plan, nested, path)?
            }
            (other, kind) => return Err(BindError::mismatch(path, kind.name(), other.kind_name())),
        };
        container(members, property, path)?.push((property.leaf.clone(), node));
        Ok(())
    }

    /// Returns `None` when nothing is written for the collection.
    fn collection_node(
        &self,
        property: &PlannedProperty,
        item: &ItemKind,
        value: &Value,
        path: &str,
    ) -> Result<Option<CollectionNode>> {
        let items: &[Value] = match value {
            Value::Null => match property.null_policy {
                NullPolicy::OmitIfNull => return Ok(None),
                NullPolicy::EmitNullMarker => return Ok(Some(CollectionNode::Null)),
                NullPolicy::EmitEmptyContainer => &[],
            },
            Value::List(items) => items,
            other => return Err(BindError::mismatch(path, "collection", other.kind_name())),
        };

        // Applies to policy-made empty containers as well as empty lists.
        if items.is_empty() && !self.writes_empty_collections() {
            return Ok(None);
        }

        let nodes = items
            .iter()
            .map(|item_value| self.item_node(item, item_value, path))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(CollectionNode::Items(nodes)))
    }

    fn item_node(&self, item: &ItemKind, value: &Value, path: &str) -> Result<Node> {
        match (item, value) {
            (_, Value::Null) => Ok(Node::Null),
            (ItemKind::Scalar(kind), Value::Scalar(scalar)) => {
                let text = self
                    .context
                    .config()
                    .converters
                    .encode(scalar, *kind)
                    .map_err(|e| e.at_property(path))?;
                Ok(Node::styled(text, kind.text_style()))
            }
            (ItemKind::Nested(key), Value::Object(nested)) => {
                let plan = self.context.resolve(key)?;
                self.object_node(&plan, nested, path)
            }
            (ItemKind::Scalar(_), other) => Err(BindError::mismatch(path, "scalar", other.kind_name())),
            (ItemKind::Nested(_), other) => Err(BindError::mismatch(path, "object", other.kind_name())),
        }
    }

    fn writes_empty_collections(&self) -> bool {
        let config = self.context.config();
        config.marshal_empty_collections || config.media_type == crate::config::MediaType::Xml
    }
}

fn container<'m>(
    members: &'m mut Members,
    property: &PlannedProperty,
    path: &str,
) -> Result<&'m mut Members> {
    node::container_mut(members, &property.containers)
        .ok_or_else(|| BindError::mismatch(path, "object", "scalar"))
}

pub(crate) fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}
