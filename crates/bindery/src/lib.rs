//! # Bindery
//!
//! Descriptor-driven marshalling of typed object graphs to and from XML and
//! JSON.
//!
//! Types are described once as [`BoundType`]s (built in code, loaded from a
//! JSON descriptor file, or supplied by a [`Bindable`] impl). A
//! [`BindingContext`] validates the descriptors, picks a media adapter from
//! its [`BindingConfig`] and hands out [`Marshaller`] and [`Unmarshaller`]
//! views that share one plan cache.
//!
//! ## Architecture
//!
//! | Module | Role |
//! |--------|------|
//! | [`convert`] | Scalar values to and from text (`bindery-support` codecs) |
//! | [`descriptor`] | Mapping descriptors |
//! | [`config`] | Media type and format-shaping options |
//! | [`context`] | Validation, compiled plans, the plan cache |
//! | [`node`] | The media-agnostic tree passed to and from adapters |
//! | [`media`] | XML and JSON adapters |
//! | [`marshal`] / [`unmarshal`] | Descriptor-driven tree walks |
//!
//! ## Example
//!
//! ```
//! use bindery::{BindingConfig, BindingContext, BoundType, ItemKind, NullPolicy, Object,
//!     PropertyMapping, ScalarKind, Value};
//!
//! let descriptor = BoundType::new("Root").with_property(
//!     PropertyMapping::collection("items", ItemKind::Scalar(ScalarKind::Binary))
//!         .with_null_policy(NullPolicy::OmitIfNull),
//! );
//! let context = BindingContext::new([descriptor], BindingConfig::xml())?;
//!
//! let object = Object::new("Root").with("items", Value::list([b"Hello".to_vec()]));
//! let xml = context.marshaller().marshal(&object, "root")?;
//! assert_eq!(
//!     xml,
//!     r#"<?xml version="1.0" encoding="UTF-8"?><root><items>SGVsbG8=</items></root>"#
//! );
//! assert_eq!(context.unmarshaller().unmarshal(&xml, "Root")?, object);
//! # Ok::<(), bindery::BindError>(())
//! ```

pub mod config;
pub mod context;
pub mod convert;
pub mod descriptor;
pub mod error;
pub mod marshal;
pub mod media;
pub mod node;
pub mod unmarshal;
pub mod value;

pub use bindery_support::QName;
pub use config::{BindingConfig, MediaType};
pub use context::{BindingContext, BindingContextBuilder, CompiledPlan, PlannedProperty};
pub use convert::{Base64UrlConverter, ConverterRegistry, ScalarKind, StandardConverter, ValueConverter};
pub use descriptor::{
    BoundType, DescriptorSet, ItemKind, NullPolicy, PathSpec, PropertyMapping, TypeKey, ValueKind,
    WrapperSpec,
};
pub use error::{BindError, Location, Result};
pub use marshal::Marshaller;
pub use media::{Document, MediaAdapter};
pub use node::{Members, Node, Text, TextStyle};
pub use unmarshal::Unmarshaller;
pub use value::{Bindable, BoundElement, FromScalar, Object, Scalar, Value};
