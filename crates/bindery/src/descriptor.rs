//! Mapping descriptors.
//!
//! A [`BoundType`] lists the mapped properties of one type, in the order they
//! are written. Descriptors are plain data: they can be built in code, derived
//! from a [`Bindable`](crate::Bindable) impl, or loaded from a JSON descriptor
//! file through [`DescriptorSet`]. They are validated when a
//! [`BindingContext`](crate::BindingContext) is built, not here.
//!
//! A descriptor file looks like this:
//!
//! ```json
//! {
//!   "types": [
//!     {
//!       "key": "BinaryCollectionRoot",
//!       "properties": [
//!         {
//!           "name": "item",
//!           "kind": { "collection": { "scalar": "binary" } },
//!           "wrapper": { "name": "wrapper-items" }
//!         },
//!         {
//!           "name": "xmlPathItems",
//!           "kind": { "collection": { "scalar": "binary" } },
//!           "path": "xml-path/items",
//!           "null_policy": "emit_null_marker"
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::convert::ScalarKind;
use crate::error::{BindError, Result};

/// Stable identifier of a bound type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(String);

impl TypeKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TypeKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&TypeKey> for TypeKey {
    fn from(k: &TypeKey) -> Self {
        k.clone()
    }
}

/// What a property holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Scalar(ScalarKind),
    Collection(ItemKind),
    Nested(TypeKey),
}

impl ValueKind {
    pub fn is_collection(&self) -> bool {
        matches!(self, ValueKind::Collection(_))
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            ValueKind::Scalar(_) => "scalar",
            ValueKind::Collection(_) => "collection",
            ValueKind::Nested(_) => "object",
        }
    }
}

/// What each element of a collection holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Scalar(ScalarKind),
    Nested(TypeKey),
}

/// An intermediate container around a collection's elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapperSpec {
    pub name: String,

    /// In JSON, render the wrapper itself as the array instead of as an
    /// object holding the repeated items.
    #[serde(default)]
    pub as_array: bool,
}

impl WrapperSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            as_array: false,
        }
    }

    pub fn as_array(mut self) -> Self {
        self.as_array = true;
        self
    }
}

/// An address that places a property below nested containers.
///
/// Segments are separated by `/`; a path without `/` is split on `.`
/// instead. The last segment names the property's own element (the items, for
/// a collection), the others name the containers around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PathSpec {
    raw: String,
    segments: Vec<String>,
}

impl PathSpec {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let separator = if raw.contains('/') { '/' } else { '.' };
        let segments = raw.split(separator).map(str::to_string).collect();
        Self { raw, segments }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Containing segments (all but the last).
    pub fn containers(&self) -> &[String] {
        match self.segments.split_last() {
            Some((_, head)) => head,
            None => &[],
        }
    }

    pub fn leaf(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }
}

impl From<String> for PathSpec {
    fn from(raw: String) -> Self {
        PathSpec::parse(raw)
    }
}

impl From<&str> for PathSpec {
    fn from(raw: &str) -> Self {
        PathSpec::parse(raw)
    }
}

impl From<PathSpec> for String {
    fn from(path: PathSpec) -> Self {
        path.raw
    }
}

/// How a null value is written, and how an absent one is read back.
///
/// # Empty collections in XML
///
/// An unwrapped collection is written as repeated item elements, so an empty
/// one leaves no trace in XML and reads back the way an absent value does:
/// null under `OmitIfNull` and `EmitNullMarker`, empty under
/// `EmitEmptyContainer`. Give the property a [`WrapperSpec`] when null and
/// empty must stay distinct in XML; the wrapper element is written even when
/// the collection is empty. For the same reason, unwrapped XML collections
/// cannot hold null items. JSON keeps `[]`, `null` and absent apart in every
/// layout.
///
/// With `json.marshal-empty-collections` off, `EmitEmptyContainer` writes
/// nothing in JSON, and the absent member again reads back as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    /// Null values are left out of the output; absent input reads as null.
    #[default]
    OmitIfNull,
    /// Null values are written as an explicit null marker.
    EmitNullMarker,
    /// Null collections are written as empty ones; absent input reads as an
    /// empty collection. Only valid on collection properties.
    EmitEmptyContainer,
}

/// One mapped property of a bound type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMapping {
    pub name: String,
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<WrapperSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathSpec>,
    #[serde(default)]
    pub null_policy: NullPolicy,
}

impl PropertyMapping {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            wrapper: None,
            path: None,
            null_policy: NullPolicy::default(),
        }
    }

    pub fn scalar(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self::new(name, ValueKind::Scalar(kind))
    }

    pub fn collection(name: impl Into<String>, item: ItemKind) -> Self {
        Self::new(name, ValueKind::Collection(item))
    }

    pub fn nested(name: impl Into<String>, type_key: impl Into<TypeKey>) -> Self {
        Self::new(name, ValueKind::Nested(type_key.into()))
    }

    pub fn with_wrapper(mut self, wrapper: WrapperSpec) -> Self {
        self.wrapper = Some(wrapper);
        self
    }

    pub fn with_path(mut self, path: impl Into<PathSpec>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_null_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }

    /// The element name the value itself is written under.
    pub fn element_name(&self) -> &str {
        self.path.as_ref().map(PathSpec::leaf).unwrap_or(&self.name)
    }
}

/// The mapping descriptor of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundType {
    pub key: TypeKey,

    /// Root name used when the caller does not supply one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_name: Option<String>,

    /// XML namespace declared on the root element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default)]
    pub properties: Vec<PropertyMapping>,
}

impl BoundType {
    pub fn new(key: impl Into<TypeKey>) -> Self {
        Self {
            key: key.into(),
            root_name: None,
            namespace: None,
            properties: Vec::new(),
        }
    }

    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = Some(name.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_property(mut self, property: PropertyMapping) -> Self {
        self.properties.push(property);
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyMapping> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The explicit root name, or the type key's last segment with a
    /// lowercase first letter (`shop::OrderLine` becomes `orderLine`).
    pub fn default_root_name(&self) -> String {
        if let Some(name) = &self.root_name {
            return name.clone();
        }
        let key = self.key.as_str();
        let simple = key
            .rsplit(|c| c == '.' || c == ':')
            .next()
            .unwrap_or(key);
        let mut chars = simple.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// A set of descriptors, as loaded from a descriptor file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorSet {
    #[serde(default)]
    pub types: Vec<BoundType>,
}

impl DescriptorSet {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| BindError::Configuration {
            type_key: None,
            property: None,
            message: format!("invalid descriptor file: {}", e),
        })
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| BindError::Configuration {
            type_key: None,
            property: None,
            message: format!("cannot serialize descriptors: {}", e),
        })
    }

    pub fn get(&self, key: &str) -> Option<&BoundType> {
        self.types.iter().find(|t| t.key.as_str() == key)
    }
}
