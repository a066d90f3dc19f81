//! XML text to node tree.
//!
//! The reader keeps a stack of open elements. When an element closes it
//! becomes:
//!
//! - `Node::Null` if it carries `xsi:nil="true"`
//! - `Node::Scalar` with its text if it has neither attributes nor children
//! - `Node::Object` otherwise, attributes first, then children in document
//!   order; the text of an element with attributes but no children is kept
//!   under the `value` member
//!
//! Namespace declarations and schema-instance attributes are dropped, and
//! element names are matched by local name. Schema-instance attributes are
//! recognized by namespace, so `xsi:nil` works under any bound prefix.

use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};

use super::utils::{self, TEXT_MEMBER};
use crate::config::MediaType;
use crate::error::{BindError, Location, Result};
use crate::media::Document;
use crate::node::{Members, Node, Text, TextStyle};

struct OpenElement {
    name: String,
    members: Members,
    attribute_count: usize,
    text: String,
    nil: bool,
}

impl OpenElement {
    fn close(self) -> std::result::Result<(String, Node), &'static str> {
        if self.nil {
            return Ok((self.name, Node::Null));
        }
        if self.members.is_empty() {
            return Ok((
                self.name,
                Node::Scalar(Text {
                    value: self.text,
                    style: TextStyle::Quoted,
                }),
            ));
        }

        let mut members = self.members;
        if !utils::is_whitespace(&self.text) {
            if members.len() > self.attribute_count {
                return Err("mixed text and element content is not supported");
            }
            members.push((TEXT_MEMBER.to_string(), Node::text(self.text)));
        }
        Ok((self.name, Node::Object(members)))
    }
}

pub(super) struct XmlParser<'a> {
    text: &'a str,
    reader: NsReader<&'a [u8]>,
    stack: Vec<OpenElement>,
    root: Option<(String, Node)>,
}

impl<'a> XmlParser<'a> {
    pub(super) fn new(text: &'a str) -> Self {
        Self {
            text,
            reader: NsReader::from_str(text),
            stack: Vec::new(),
            root: None,
        }
    }

    pub(super) fn parse_document(mut self) -> Result<Document> {
        loop {
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(e) => return Err(self.error(e.to_string())),
            };
            match event {
                Event::Start(start) => {
                    let element = self.open(&start)?;
                    self.stack.push(element);
                }
                Event::Empty(start) => {
                    let element = self.open(&start)?;
                    self.close(element)?;
                }
                Event::End(_) => {
                    let Some(element) = self.stack.pop() else {
                        return Err(self.error("unexpected closing tag"));
                    };
                    self.close(element)?;
                }
                Event::Text(text) => {
                    let raw = self.utf8(&text)?;
                    let unescaped =
                        quick_xml::escape::unescape(raw).map_err(|e| self.error(e.to_string()))?;
                    self.push_text(&unescaped)?;
                }
                Event::CData(data) => {
                    let raw = self.utf8(&data)?;
                    self.push_text(raw)?;
                }
                Event::GeneralRef(reference) => {
                    let name = self.utf8(&reference)?;
                    let Some(resolved) = utils::resolve_entity(name) else {
                        return Err(self.error(format!("unknown entity &{};", name)));
                    };
                    self.push_text(&resolved)?;
                }
                Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if !self.stack.is_empty() {
            return Err(self.error("unexpected end of document"));
        }
        let Some((root_name, body)) = self.root else {
            return Err(self.error("document has no root element"));
        };
        Ok(Document {
            root_name,
            namespace: None,
            body,
        })
    }

    fn open(&self, start: &BytesStart<'_>) -> Result<OpenElement> {
        if self.stack.is_empty() && self.root.is_some() {
            return Err(self.error("more than one root element"));
        }
        let name = self.utf8(start.local_name().as_ref())?.to_string();
        let mut element = OpenElement {
            name,
            members: Members::new(),
            attribute_count: 0,
            text: String::new(),
            nil: false,
        };

        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| self.error(e.to_string()))?;
            let key = attribute.key.as_ref();
            if utils::is_namespace_declaration(key) {
                continue;
            }
            let raw = self.utf8(&attribute.value)?;
            let value = quick_xml::escape::unescape(raw).map_err(|e| self.error(e.to_string()))?;
            let (namespace, local) = self.reader.resolve_attribute(attribute.key);
            if utils::is_schema_instance(&namespace) {
                if local.as_ref() == b"nil" {
                    element.nil = utils::is_nil_value(&value);
                }
                continue;
            }
            let local = self.utf8(local.as_ref())?.to_string();
            element.members.push((local, Node::text(value.into_owned())));
            element.attribute_count += 1;
        }
        Ok(element)
    }

    fn close(&mut self, element: OpenElement) -> Result<()> {
        let closed = element.close().map_err(|message| self.error(message))?;
        match self.stack.last_mut() {
            Some(parent) => parent.members.push(closed),
            None => self.root = Some(closed),
        }
        Ok(())
    }

    fn push_text(&mut self, text: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(element) => {
                element.text.push_str(text);
                Ok(())
            }
            None if utils::is_whitespace(text) => Ok(()),
            None => Err(self.error("text outside the root element")),
        }
    }

    fn utf8<'b>(&self, bytes: &'b [u8]) -> Result<&'b str> {
        std::str::from_utf8(bytes).map_err(|e| self.error(e.to_string()))
    }

    fn error(&self, message: impl Into<String>) -> BindError {
        let offset = self.reader.buffer_position() as usize;
        BindError::Parse {
            media_type: MediaType::Xml,
            location: Location::from_offset(self.text, offset),
            message: message.into(),
        }
    }
}
