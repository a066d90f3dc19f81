//! JSON adapter on top of `serde_json`.
//!
//! Node trees map onto `serde_json::Value` one to one. Scalars carry a
//! [`TextStyle`] so that numbers and booleans are written bare; with the
//! `arbitrary_precision` feature a decimal such as `10.50` keeps its exact
//! text. Values that are not valid JSON numbers (`NaN`, `INF`) fall back to
//! strings.

use serde_json::{Map, Number, Value as JsonValue};
use tracing::trace;

use super::{CollectionNode, Document, MediaAdapter, Presence, ShapeMismatch};
use crate::config::{BindingConfig, MediaType};
use crate::descriptor::WrapperSpec;
use crate::error::{BindError, Location, Result};
use crate::node::{self, Members, Node, Text, TextStyle};

#[derive(Debug, Clone)]
pub struct JsonAdapter {
    include_root: bool,
    wrapper_as_array: bool,
    formatted: bool,
}

impl JsonAdapter {
    pub fn new(config: &BindingConfig) -> Self {
        Self {
            include_root: config.include_root,
            wrapper_as_array: config.wrapper_as_array,
            formatted: config.formatted_output,
        }
    }

    fn as_array(&self, wrapper: &WrapperSpec) -> bool {
        self.wrapper_as_array || wrapper.as_array
    }
}

impl MediaAdapter for JsonAdapter {
    fn media_type(&self) -> MediaType {
        MediaType::Json
    }

    fn render(&self, document: Document) -> Result<String> {
        let body = to_json(document.body);
        let value = if self.include_root {
            let mut map = Map::new();
            map.insert(document.root_name, body);
            JsonValue::Object(map)
        } else {
            body
        };

        let rendered = if self.formatted {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        rendered.map_err(|e| BindError::Render {
            media_type: MediaType::Json,
            message: e.to_string(),
        })
    }

    fn parse(&self, text: &str) -> Result<Document> {
        let value: JsonValue = serde_json::from_str(text).map_err(|e| BindError::Parse {
            media_type: MediaType::Json,
            location: Location::new(e.line(), e.column()),
            message: e.to_string(),
        })?;

        if !self.include_root {
            return Ok(Document {
                root_name: String::new(),
                namespace: None,
                body: from_json(value),
            });
        }

        let JsonValue::Object(map) = value else {
            return Err(root_error("expected an object holding the root member"));
        };
        let mut entries = map.into_iter();
        let Some((root_name, body)) = entries.next() else {
            return Err(root_error("missing root member"));
        };
        for (extra, _) in entries {
            trace!(member = %extra, "ignoring member next to the root");
        }
        Ok(Document {
            root_name,
            namespace: None,
            body: from_json(body),
        })
    }

    fn place_collection(
        &self,
        members: &mut Members,
        item_name: &str,
        wrapper: Option<&WrapperSpec>,
        collection: CollectionNode,
    ) -> std::result::Result<(), ShapeMismatch> {
        let array = match collection {
            CollectionNode::Null => Node::Null,
            CollectionNode::Items(items) => Node::Array(items),
        };
        match wrapper {
            None => members.push((item_name.to_string(), array)),
            Some(w) if self.as_array(w) || array == Node::Null => {
                members.push((w.name.clone(), array))
            }
            Some(w) => members.push((
                w.name.clone(),
                Node::Object(vec![(item_name.to_string(), array)]),
            )),
        }
        Ok(())
    }

    fn take_collection(
        &self,
        members: &mut Members,
        item_name: &str,
        wrapper: Option<&WrapperSpec>,
    ) -> std::result::Result<Presence, ShapeMismatch> {
        let name = wrapper.map(|w| w.name.as_str()).unwrap_or(item_name);
        let Some(found) = node::take_member(members, name) else {
            return Ok(Presence::Absent);
        };
        match (found, wrapper) {
            (Node::Null, _) => Ok(Presence::Null),
            (Node::Array(items), _) => Ok(Presence::Items(items)),
            // Either wrapper layout is accepted on input.
            (Node::Object(mut inner), Some(_)) => match node::take_member(&mut inner, item_name) {
                None => Ok(Presence::Items(Vec::new())),
                Some(Node::Null) => Ok(Presence::Null),
                Some(Node::Array(items)) => Ok(Presence::Items(items)),
                Some(other) => Err(ShapeMismatch::new("array", &other)),
            },
            (other, _) => Err(ShapeMismatch::new("array", &other)),
        }
    }
}

fn root_error(message: &str) -> BindError {
    BindError::Parse {
        media_type: MediaType::Json,
        location: Location::new(1, 1),
        message: message.to_string(),
    }
}

fn to_json(node: Node) -> JsonValue {
    match node {
        Node::Null => JsonValue::Null,
        Node::Scalar(Text { value, style }) => match style {
            TextStyle::Quoted => JsonValue::String(value),
            TextStyle::Boolean => match value.as_str() {
                "true" => JsonValue::Bool(true),
                "false" => JsonValue::Bool(false),
                _ => JsonValue::String(value),
            },
            TextStyle::Number => match value.parse::<Number>() {
                Ok(n) => JsonValue::Number(n),
                Err(_) => JsonValue::String(value),
            },
        },
        Node::Array(items) => JsonValue::Array(items.into_iter().map(to_json).collect()),
        Node::Object(members) => {
            let mut map = Map::new();
            for (name, member) in members {
                map.insert(name, to_json(member));
            }
            JsonValue::Object(map)
        }
    }
}

fn from_json(value: JsonValue) -> Node {
    match value {
        JsonValue::Null => Node::Null,
        JsonValue::Bool(b) => Node::styled(b.to_string(), TextStyle::Boolean),
        JsonValue::Number(n) => Node::styled(n.to_string(), TextStyle::Number),
        JsonValue::String(s) => Node::text(s),
        JsonValue::Array(items) => Node::Array(items.into_iter().map(from_json).collect()),
        JsonValue::Object(map) => Node::Object(map.into_iter().map(|(k, v)| (k, from_json(v))).collect()),
    }
}
