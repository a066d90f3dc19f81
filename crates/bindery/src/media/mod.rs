//! Media-type adapters.
//!
//! An adapter owns everything that differs between XML and JSON: how a
//! document's root is represented, how a collection is laid out (repeated
//! elements or an array), how a wrapper name applies, and how a node tree is
//! turned into text and back. The marshaller and unmarshaller only ever talk to
//! the [`MediaAdapter`] trait.
//!
//! ## Collection layout
//!
//! For a collection `item = ["a", "b"]` with wrapper `items`:
//!
//! | Media | Wrapper | Rendering |
//! |-------|---------|-----------|
//! | XML | none | `<item>a</item><item>b</item>` |
//! | XML | `items` | `<items><item>a</item><item>b</item></items>` |
//! | JSON | none | `"item": ["a", "b"]` |
//! | JSON | `items` | `"items": {"item": ["a", "b"]}` |
//! | JSON | `items`, as array | `"items": ["a", "b"]` |

use std::fmt;

use crate::config::{BindingConfig, MediaType};
use crate::descriptor::WrapperSpec;
use crate::error::Result;
use crate::node::{Members, Node};

mod json;
mod xml;

pub use json::JsonAdapter;
pub use xml::XmlAdapter;

/// A whole document: the root name plus the root object's node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Empty for a JSON document written without a root.
    pub root_name: String,
    /// XML default namespace of the root element.
    pub namespace: Option<String>,
    pub body: Node,
}

/// A collection value about to be placed in a node tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionNode {
    /// The collection itself is null and the null marker is written.
    Null,
    Items(Vec<Node>),
}

/// What an adapter found when reading a collection back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    Absent,
    Null,
    Items(Vec<Node>),
}

/// The node found where a collection was expected has the wrong shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMismatch {
    pub expected: &'static str,
    pub found: &'static str,
}

impl ShapeMismatch {
    fn new(expected: &'static str, found: &Node) -> Self {
        Self {
            expected,
            found: found.kind_name(),
        }
    }
}

pub trait MediaAdapter: fmt::Debug + Send + Sync {
    fn media_type(&self) -> MediaType;

    fn render(&self, document: Document) -> Result<String>;

    fn parse(&self, text: &str) -> Result<Document>;

    /// Adds a collection to `members`, laid out for this media type.
    ///
    /// Fails when the layout could not be read back as the same collection.
    fn place_collection(
        &self,
        members: &mut Members,
        item_name: &str,
        wrapper: Option<&WrapperSpec>,
        collection: CollectionNode,
    ) -> std::result::Result<(), ShapeMismatch>;

    /// Removes a collection from `members`, inverting [`place_collection`].
    ///
    /// [`place_collection`]: MediaAdapter::place_collection
    fn take_collection(
        &self,
        members: &mut Members,
        item_name: &str,
        wrapper: Option<&WrapperSpec>,
    ) -> std::result::Result<Presence, ShapeMismatch>;
}

/// Creates the adapter selected by a configuration.
pub fn adapter_for(config: &BindingConfig) -> Box<dyn MediaAdapter> {
    match config.media_type {
        MediaType::Xml => Box::new(XmlAdapter::new(config.formatted_output)),
        MediaType::Json => Box::new(JsonAdapter::new(config)),
    }
}
