//! The object graph the engine marshals and unmarshals.
//!
//! An [`Object`] is an instance of a bound type: a type key plus named field
//! values. Rust types join the engine by implementing [`Bindable`], which maps
//! them to and from an `Object`; the accessors on `Object` do the per-field
//! conversions and report shape errors with the offending property name.
//!
//! A field that is missing and a field holding [`Value::Null`] mean the same
//! thing: [`Object::set`] stores `Null` by removing the field, so two objects
//! that differ only in that respect compare equal.

use std::collections::BTreeMap;

use bindery_support::QName;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::descriptor::{BoundType, TypeKey};
use crate::error::{BindError, Result};

/// A primitive value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    /// Raw bytes; written as base64 or hex depending on the property's kind.
    Bytes(Vec<u8>),
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
    Time(NaiveTime),
    QName(QName),
}

impl Scalar {
    /// Short name of the variant, used in mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::String(_) => "string",
            Scalar::Boolean(_) => "boolean",
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Decimal(_) => "decimal",
            Scalar::Bytes(_) => "bytes",
            Scalar::DateTime(_) => "date-time",
            Scalar::Date(_) => "date",
            Scalar::Time(_) => "time",
            Scalar::QName(_) => "qname",
        }
    }
}

/// A field value inside an object graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Scalar(Scalar),
    List(Vec<Value>),
    Object(Object),
}

impl Value {
    /// Builds a list value from anything convertible into values.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Scalar(_) => "scalar",
            Value::List(_) => "collection",
            Value::Object(_) => "object",
        }
    }
}

impl From<Scalar> for Value {
    fn from(v: Scalar) -> Self {
        Value::Scalar(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Scalar(Scalar::String(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Scalar(Scalar::String(v.to_string()))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Scalar(Scalar::Boolean(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Scalar(Scalar::Integer(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(Scalar::Float(v))
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Scalar(Scalar::Decimal(v))
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Scalar(Scalar::Bytes(v))
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Scalar(Scalar::Bytes(v.to_vec()))
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::Scalar(Scalar::DateTime(v))
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Scalar(Scalar::Date(v))
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Scalar(Scalar::Time(v))
    }
}

impl From<QName> for Value {
    fn from(v: QName) -> Self {
        Value::Scalar(Scalar::QName(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Extracts a Rust value from a [`Scalar`].
pub trait FromScalar: Sized {
    const EXPECTED: &'static str;

    fn from_scalar(scalar: Scalar) -> Option<Self>;
}

macro_rules! impl_from_scalar {
    ($ty:ty, $variant:ident, $expected:literal) => {
        impl FromScalar for $ty {
            const EXPECTED: &'static str = $expected;

            fn from_scalar(scalar: Scalar) -> Option<Self> {
                match scalar {
                    Scalar::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_from_scalar!(String, String, "string");
impl_from_scalar!(bool, Boolean, "boolean");
impl_from_scalar!(Vec<u8>, Bytes, "bytes");
impl_from_scalar!(DateTime<FixedOffset>, DateTime, "date-time");
impl_from_scalar!(NaiveDate, Date, "date");
impl_from_scalar!(NaiveTime, Time, "time");
impl_from_scalar!(QName, QName, "qname");

impl FromScalar for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Integer(v) => Some(v),
            _ => None,
        }
    }
}

impl FromScalar for f64 {
    const EXPECTED: &'static str = "float";

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Float(v) => Some(v),
            Scalar::Integer(v) => Some(v as f64),
            _ => None,
        }
    }
}

impl FromScalar for Decimal {
    const EXPECTED: &'static str = "decimal";

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Decimal(v) => Some(v),
            Scalar::Integer(v) => Some(Decimal::from(v)),
            _ => None,
        }
    }
}

/// An instance of a bound type.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    type_key: TypeKey,
    fields: BTreeMap<String, Value>,
}

impl Object {
    pub fn new(type_key: impl Into<TypeKey>) -> Self {
        Self {
            type_key: type_key.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn type_key(&self) -> &TypeKey {
        &self.type_key
    }

    /// Sets a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a field. Setting [`Value::Null`] clears it.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        match value.into() {
            Value::Null => {
                self.fields.remove(&name);
            }
            value => {
                self.fields.insert(name, value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Removes and returns a field; a missing field yields [`Value::Null`].
    pub fn take(&mut self, name: &str) -> Value {
        self.fields.remove(name).unwrap_or_default()
    }

    pub fn is_null(&self, name: &str) -> bool {
        !self.fields.contains_key(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Takes a scalar field.
    pub fn take_scalar<T: FromScalar>(&mut self, name: &str) -> Result<Option<T>> {
        match self.take(name) {
            Value::Null => Ok(None),
            Value::Scalar(s) => {
                let found = s.type_name();
                T::from_scalar(s)
                    .map(Some)
                    .ok_or_else(|| BindError::mismatch(name, T::EXPECTED, found))
            }
            other => Err(BindError::mismatch(name, T::EXPECTED, other.kind_name())),
        }
    }

    /// Takes a collection of scalars. Null items are rejected.
    pub fn take_scalar_list<T: FromScalar>(&mut self, name: &str) -> Result<Option<Vec<T>>> {
        match self.take(name) {
            Value::Null => Ok(None),
            Value::List(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Scalar(s) => {
                        let found = s.type_name();
                        T::from_scalar(s).ok_or_else(|| BindError::mismatch(name, T::EXPECTED, found))
                    }
                    other => Err(BindError::mismatch(name, T::EXPECTED, other.kind_name())),
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            other => Err(BindError::mismatch(name, "collection", other.kind_name())),
        }
    }

    /// Takes a nested object and converts it with its [`Bindable`] impl.
    pub fn take_nested<T: Bindable>(&mut self, name: &str) -> Result<Option<T>> {
        match self.take(name) {
            Value::Null => Ok(None),
            Value::Object(o) => T::from_object(o).map(Some),
            other => Err(BindError::mismatch(name, "object", other.kind_name())),
        }
    }

    /// Takes a collection of nested objects.
    pub fn take_nested_list<T: Bindable>(&mut self, name: &str) -> Result<Option<Vec<T>>> {
        match self.take(name) {
            Value::Null => Ok(None),
            Value::List(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(o) => T::from_object(o),
                    other => Err(BindError::mismatch(name, "object", other.kind_name())),
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            other => Err(BindError::mismatch(name, "collection", other.kind_name())),
        }
    }
}

/// A Rust type that can be marshalled through a binding context.
///
/// # Example
///
/// ```
/// use bindery::{Bindable, BoundType, ItemKind, Object, PropertyMapping, Result, ScalarKind, Value};
///
/// #[derive(Debug, PartialEq)]
/// struct Root {
///     items: Option<Vec<String>>,
/// }
///
/// impl Bindable for Root {
///     fn bound_type() -> BoundType {
///         BoundType::new("Root").with_property(PropertyMapping::collection(
///             "items",
///             ItemKind::Scalar(ScalarKind::String),
///         ))
///     }
///
///     fn to_object(&self) -> Object {
///         Object::new("Root").with("items", self.items.clone().map(Value::list))
///     }
///
///     fn from_object(mut object: Object) -> Result<Self> {
///         Ok(Root {
///             items: object.take_scalar_list("items")?,
///         })
///     }
/// }
/// ```
pub trait Bindable: Sized {
    /// The mapping descriptor for this type.
    fn bound_type() -> BoundType;

    fn to_object(&self) -> Object;

    fn from_object(object: Object) -> Result<Self>;
}

/// An object together with the root name it was (or will be) written under.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundElement {
    /// Root element name; empty when a JSON document carries no root.
    pub name: String,
    pub value: Object,
}

impl BoundElement {
    pub fn new(name: impl Into<String>, value: Object) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
