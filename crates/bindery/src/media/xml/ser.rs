//! Node tree to XML text.
//!
//! Each object member becomes a child element named after the member; array
//! items become repeated elements with the array's name. Empty text and empty
//! objects are written as self-closing elements, null as `xsi:nil="true"`.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::utils::{NIL_ATTRIBUTE, XSI_NAMESPACE, XSI_PREFIX};
use crate::config::MediaType;
use crate::error::{BindError, Result};
use crate::media::Document;
use crate::node::Node;

pub(super) struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    pub(super) fn new(formatted: bool) -> Self {
        let writer = if formatted {
            Writer::new_with_indent(Vec::new(), b' ', 2)
        } else {
            Writer::new(Vec::new())
        };
        Self { writer }
    }

    pub(super) fn write_document(mut self, document: Document) -> Result<String> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new(document.root_name.as_str());
        if let Some(namespace) = &document.namespace {
            root.push_attribute(("xmlns", namespace.as_str()));
        }
        if document.body.contains_null() {
            let declaration = format!("xmlns:{}", XSI_PREFIX);
            root.push_attribute((declaration.as_str(), XSI_NAMESPACE));
        }
        self.write_element(root, &document.root_name, document.body)?;

        String::from_utf8(self.writer.into_inner()).map_err(render_error)
    }

    fn write_member(&mut self, name: &str, node: Node) -> Result<()> {
        match node {
            Node::Array(items) => {
                for item in items {
                    self.write_member(name, item)?;
                }
                Ok(())
            }
            node => self.write_element(BytesStart::new(name), name, node),
        }
    }

    fn write_element(&mut self, mut start: BytesStart<'_>, name: &str, node: Node) -> Result<()> {
        match node {
            Node::Null => {
                start.push_attribute((NIL_ATTRIBUTE, "true"));
                self.write(Event::Empty(start))
            }
            Node::Scalar(text) if text.value.is_empty() => self.write(Event::Empty(start)),
            Node::Scalar(text) => {
                self.write(Event::Start(start))?;
                self.write(Event::Text(BytesText::new(&text.value)))?;
                self.write(Event::End(BytesEnd::new(name)))
            }
            Node::Object(members) if members.is_empty() => self.write(Event::Empty(start)),
            Node::Object(members) => {
                self.write(Event::Start(start))?;
                for (member, child) in members {
                    self.write_member(&member, child)?;
                }
                self.write(Event::End(BytesEnd::new(name)))
            }
            Node::Array(_) => Err(BindError::Render {
                media_type: MediaType::Xml,
                message: format!("element {} cannot hold a bare array", name),
            }),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(render_error)
    }
}

fn render_error(e: impl std::fmt::Display) -> BindError {
    BindError::Render {
        media_type: MediaType::Xml,
        message: e.to_string(),
    }
}
