//! XML adapter on top of `quick-xml`.
//!
//! ## Layout
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <root xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
//!   <name>Ada</name>
//!   <items>
//!     <item>SGVsbG8=</item>
//!     <item>V29ybGQ=</item>
//!   </items>
//!   <nothing xsi:nil="true"/>
//! </root>
//! ```
//!
//! The root element is always present. Collection items are repeated
//! elements, wrapped in a wrapper element when the property has one. The
//! `xsi` namespace is declared on the root only when a null marker is written.
//!
//! An empty wrapper element, or one holding only whitespace, reads back as an
//! empty collection. An unwrapped empty collection writes nothing at all and so
//! reads back as null. Null items are only written inside a wrapper, since an
//! unwrapped nil item would read back as a nil collection.

mod de;
mod ser;
mod utils;

use super::{CollectionNode, Document, MediaAdapter, Presence, ShapeMismatch};
use crate::config::MediaType;
use crate::descriptor::WrapperSpec;
use crate::error::Result;
use crate::node::{self, Members, Node};

#[derive(Debug, Clone, Default)]
pub struct XmlAdapter {
    formatted: bool,
}

impl XmlAdapter {
    pub fn new(formatted: bool) -> Self {
        Self { formatted }
    }
}

impl MediaAdapter for XmlAdapter {
    fn media_type(&self) -> MediaType {
        MediaType::Xml
    }

    fn render(&self, document: Document) -> Result<String> {
        ser::XmlWriter::new(self.formatted).write_document(document)
    }

    fn parse(&self, text: &str) -> Result<Document> {
        de::XmlParser::new(text).parse_document()
    }

    fn place_collection(
        &self,
        members: &mut Members,
        item_name: &str,
        wrapper: Option<&WrapperSpec>,
        collection: CollectionNode,
    ) -> std::result::Result<(), ShapeMismatch> {
        match (wrapper, collection) {
            (None, CollectionNode::Null) => members.push((item_name.to_string(), Node::Null)),
            // A nil item element is indistinguishable from a nil collection.
            (None, CollectionNode::Items(items)) if items.contains(&Node::Null) => {
                return Err(ShapeMismatch::new("non-null item", &Node::Null));
            }
            (None, CollectionNode::Items(items)) => {
                members.extend(items.into_iter().map(|item| (item_name.to_string(), item)))
            }
            (Some(w), CollectionNode::Null) => members.push((w.name.clone(), Node::Null)),
            (Some(w), CollectionNode::Items(items)) => members.push((
                w.name.clone(),
                Node::Object(
                    items
                        .into_iter()
                        .map(|item| (item_name.to_string(), item))
                        .collect(),
                ),
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
        let Some(wrapper) = wrapper else {
            let items = node::take_all(members, item_name);
            return Ok(match items.as_slice() {
                [] => Presence::Absent,
                [Node::Null] => Presence::Null,
                _ => Presence::Items(items),
            });
        };

        match node::take_member(members, &wrapper.name) {
            None => Ok(Presence::Absent),
            Some(Node::Null) => Ok(Presence::Null),
            Some(found) if found.is_blank() => Ok(Presence::Items(Vec::new())),
            Some(Node::Object(mut inner)) => Ok(Presence::Items(node::take_all(&mut inner, item_name))),
            Some(other) => Err(ShapeMismatch::new("wrapper element", &other)),
        }
    }
}
