//! Binding configuration.
//!
//! A [`BindingConfig`] selects the media type and the format-shaping options.
//! It can be built in code or deserialized from a properties object:
//!
//! | Property | Values | Default | Description |
//! |----------|--------|---------|-------------|
//! | `media-type` | `application/xml`, `application/json` | `application/xml` | Output format |
//! | `json.include-root` | bool | `true` | Nest the document under the root name |
//! | `json.wrapper-as-array-name` | bool | `false` | Render wrapped collections as arrays |
//! | `json.marshal-empty-collections` | bool | `true` | Write empty collections at all |
//! | `formatted-output` | bool | `false` | Pretty-print |
//!
//! # Example
//!
//! ```
//! use bindery::{BindingConfig, MediaType};
//!
//! let config = BindingConfig::from_properties(serde_json::json!({
//!     "media-type": "application/json",
//!     "json.include-root": false,
//!     "json.wrapper-as-array-name": true
//! }))?;
//! assert_eq!(config.media_type, MediaType::Json);
//! assert!(!config.include_root);
//! # Ok::<(), bindery::BindError>(())
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::convert::{ConverterRegistry, ScalarKind, ValueConverter};
use crate::descriptor::WrapperSpec;
use crate::error::{BindError, Result};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MediaType {
    #[default]
    #[serde(rename = "application/xml", alias = "xml", alias = "text/xml")]
    Xml,
    #[serde(rename = "application/json", alias = "json")]
    Json,
}

impl MediaType {
    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Xml => "application/xml",
            MediaType::Json => "application/json",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Xml => f.write_str("XML"),
            MediaType::Json => f.write_str("JSON"),
        }
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml" | "application/xml" | "text/xml" => Ok(MediaType::Xml),
            "json" | "application/json" => Ok(MediaType::Json),
            other => Err(format!("unsupported media type: {}", other)),
        }
    }
}

/// Format-shaping options for one binding context.
///
/// Immutable once handed to a [`BindingContext`](crate::BindingContext).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingConfig {
    #[serde(rename = "media-type", default)]
    pub media_type: MediaType,

    /// JSON only. Nest the document's members under the root name.
    #[serde(rename = "json.include-root", default = "default_true")]
    pub include_root: bool,

    /// JSON only. Render every wrapped collection as `"wrapper": [...]`.
    #[serde(rename = "json.wrapper-as-array-name", default)]
    pub wrapper_as_array: bool,

    /// JSON only. When false, empty collections are left out of the output.
    #[serde(rename = "json.marshal-empty-collections", default = "default_true")]
    pub marshal_empty_collections: bool,

    #[serde(rename = "formatted-output", default)]
    pub formatted_output: bool,

    #[serde(skip)]
    pub converters: ConverterRegistry,
}

fn default_true() -> bool {
    true
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            media_type: MediaType::default(),
            include_root: default_true(),
            wrapper_as_array: false,
            marshal_empty_collections: default_true(),
            formatted_output: false,
            converters: ConverterRegistry::default(),
        }
    }
}

impl BindingConfig {
    pub fn xml() -> Self {
        Self::default()
    }

    pub fn json() -> Self {
        Self {
            media_type: MediaType::Json,
            ..Self::default()
        }
    }

    /// Reads a configuration from a properties object.
    pub fn from_properties(properties: serde_json::Value) -> Result<Self> {
        serde_json::from_value(properties).map_err(|e| BindError::Configuration {
            type_key: None,
            property: None,
            message: format!("invalid binding properties: {}", e),
        })
    }

    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = media_type;
        self
    }

    pub fn with_include_root(mut self, include_root: bool) -> Self {
        self.include_root = include_root;
        self
    }

    pub fn with_wrapper_as_array(mut self, wrapper_as_array: bool) -> Self {
        self.wrapper_as_array = wrapper_as_array;
        self
    }

    pub fn with_marshal_empty_collections(mut self, marshal: bool) -> Self {
        self.marshal_empty_collections = marshal;
        self
    }

    pub fn with_formatted_output(mut self, formatted: bool) -> Self {
        self.formatted_output = formatted;
        self
    }

    /// Overrides the converter used for one scalar kind.
    pub fn with_converter(mut self, kind: ScalarKind, converter: Arc<dyn ValueConverter>) -> Self {
        self.converters.register(kind, converter);
        self
    }

    /// Whether a wrapped collection renders as a bare JSON array.
    pub fn wrapper_renders_as_array(&self, wrapper: &WrapperSpec) -> bool {
        self.media_type == MediaType::Json && (self.wrapper_as_array || wrapper.as_array)
    }
}
