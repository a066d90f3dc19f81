//! Binding contexts and compiled plans.
//!
//! A [`BindingContext`] is built once from a set of [`BoundType`]s and a
//! [`BindingConfig`]. Building validates every descriptor; afterwards the
//! context is read-only apart from its plan cache, and can be shared freely
//! between threads.
//!
//! # Example
//!
//! ```
//! use bindery::{BindingConfig, BindingContext, BoundType, ItemKind, Object, PropertyMapping,
//!     ScalarKind, Value, WrapperSpec};
//!
//! let root = BoundType::new("Root").with_property(
//!     PropertyMapping::collection("item", ItemKind::Scalar(ScalarKind::String))
//!         .with_wrapper(WrapperSpec::new("items")),
//! );
//! let context = BindingContext::builder()
//!     .bind(root)
//!     .config(BindingConfig::json().with_include_root(false).with_wrapper_as_array(true))
//!     .build()?;
//!
//! let object = Object::new("Root").with("item", Value::list(["a", "b"]));
//! let text = context.marshaller().marshal(&object, "root")?;
//! assert_eq!(text, r#"{"items":["a","b"]}"#);
//! assert_eq!(context.unmarshaller().unmarshal(&text, "Root")?, object);
//! # Ok::<(), bindery::BindError>(())
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::config::BindingConfig;
use crate::descriptor::{
    BoundType, DescriptorSet, ItemKind, NullPolicy, PropertyMapping, TypeKey, ValueKind,
    WrapperSpec,
};
use crate::error::{BindError, Result};
use crate::marshal::Marshaller;
use crate::media::{self, MediaAdapter};
use crate::unmarshal::Unmarshaller;
use crate::value::Bindable;

/// One property of a compiled plan, with its address resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedProperty {
    pub name: String,
    pub kind: ValueKind,
    /// Containing elements, outermost first.
    pub containers: Vec<String>,
    /// Name the value (or each collection item) is written under.
    pub leaf: String,
    pub wrapper: Option<WrapperSpec>,
    pub null_policy: NullPolicy,
}

impl PlannedProperty {
    fn compile(property: &PropertyMapping) -> Self {
        let (containers, leaf) = match &property.path {
            Some(path) => (path.containers().to_vec(), path.leaf().to_string()),
            None => (Vec::new(), property.name.clone()),
        };
        Self {
            name: property.name.clone(),
            kind: property.kind.clone(),
            containers,
            leaf,
            wrapper: property.wrapper.clone(),
            null_policy: property.null_policy,
        }
    }

    /// The member path this property occupies in the node tree.
    fn address(&self) -> Vec<&str> {
        let mut address: Vec<&str> = self.containers.iter().map(String::as_str).collect();
        match &self.wrapper {
            Some(wrapper) => address.push(&wrapper.name),
            None => address.push(&self.leaf),
        }
        address
    }
}

/// The traversal plan of one bound type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPlan {
    pub type_key: TypeKey,
    /// Root name used when the caller passes none.
    pub root_name: String,
    pub namespace: Option<String>,
    pub properties: Vec<PlannedProperty>,
}

impl CompiledPlan {
    pub fn compile(bound: &BoundType) -> Self {
        Self {
            type_key: bound.key.clone(),
            root_name: bound.default_root_name(),
            namespace: bound.namespace.clone(),
            properties: bound.properties.iter().map(PlannedProperty::compile).collect(),
        }
    }
}

/// Registered types, configuration and the plan cache.
#[derive(Debug)]
pub struct BindingContext {
    types: HashMap<TypeKey, BoundType>,
    config: BindingConfig,
    adapter: Box<dyn MediaAdapter>,
    plans: RwLock<HashMap<TypeKey, Arc<CompiledPlan>>>,
}

impl BindingContext {
    /// Validates the descriptors and builds a context.
    pub fn new(types: impl IntoIterator<Item = BoundType>, config: BindingConfig) -> Result<Self> {
        let mut registered = HashMap::new();
        for bound in types {
            if registered.contains_key(&bound.key) {
                return Err(BindError::configuration(&bound.key, "type bound more than once"));
            }
            registered.insert(bound.key.clone(), bound);
        }

        for bound in registered.values() {
            validate(bound, &registered)?;
        }

        debug!(
            types = registered.len(),
            media_type = %config.media_type,
            include_root = config.include_root,
            wrapper_as_array = config.wrapper_as_array,
            "Binding context created"
        );

        Ok(Self {
            adapter: media::adapter_for(&config),
            types: registered,
            config,
            plans: RwLock::new(HashMap::new()),
        })
    }

    pub fn builder() -> BindingContextBuilder {
        BindingContextBuilder::default()
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    pub fn bound_type(&self, key: &TypeKey) -> Option<&BoundType> {
        self.types.get(key)
    }

    pub fn bound_types(&self) -> impl Iterator<Item = &BoundType> {
        self.types.values()
    }

    /// Returns the compiled plan of a bound type, compiling it on first use.
    ///
    /// Concurrent callers racing on the same type all receive the plan that
    /// was inserted first.
    pub fn resolve(&self, key: &TypeKey) -> Result<Arc<CompiledPlan>> {
        if let Some(plan) = self.plans.read().get(key) {
            return Ok(Arc::clone(plan));
        }

        let bound = self.types.get(key).ok_or_else(|| BindError::UnknownType {
            type_key: key.clone(),
        })?;
        let compiled = Arc::new(CompiledPlan::compile(bound));
        trace!(type_key = %key, properties = compiled.properties.len(), "Compiled plan");

        let mut plans = self.plans.write();
        Ok(Arc::clone(plans.entry(key.clone()).or_insert(compiled)))
    }

    pub fn marshaller(&self) -> Marshaller<'_> {
        Marshaller::new(self)
    }

    pub fn unmarshaller(&self) -> Unmarshaller<'_> {
        Unmarshaller::new(self)
    }

    pub(crate) fn adapter(&self) -> &dyn MediaAdapter {
        self.adapter.as_ref()
    }
}

/// Builder for [`BindingContext`].
#[derive(Debug, Default)]
pub struct BindingContextBuilder {
    types: Vec<BoundType>,
    config: BindingConfig,
}

impl BindingContextBuilder {
    pub fn bind(mut self, bound: BoundType) -> Self {
        self.types.push(bound);
        self
    }

    /// Binds a Rust type through its [`Bindable`] impl.
    pub fn bind_type<T: Bindable>(self) -> Self {
        self.bind(T::bound_type())
    }

    pub fn bind_all(mut self, descriptors: DescriptorSet) -> Self {
        self.types.extend(descriptors.types);
        self
    }

    pub fn config(mut self, config: BindingConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the context, validating it first.
    pub fn build(self) -> Result<BindingContext> {
        BindingContext::new(self.types, self.config)
    }
}

fn validate(bound: &BoundType, registered: &HashMap<TypeKey, BoundType>) -> Result<()> {
    let key = &bound.key;
    let mut names = HashSet::new();

    for property in &bound.properties {
        let name = property.name.as_str();
        let fail = |message: &str| BindError::property_configuration(key, name, message);

        if name.is_empty() {
            return Err(BindError::configuration(key, "property with an empty name"));
        }
        if !names.insert(name) {
            return Err(fail("duplicate property name"));
        }

        if let Some(wrapper) = &property.wrapper {
            if !property.kind.is_collection() {
                return Err(fail(&format!(
                    "wrapper {:?} on a {} property; only collections can be wrapped",
                    wrapper.name,
                    property.kind.name()
                )));
            }
            if wrapper.name.trim().is_empty() {
                return Err(fail(if wrapper.as_array {
                    "wrapper rendered as array needs a non-empty name"
                } else {
                    "wrapper needs a non-empty name"
                }));
            }
        }

        if let Some(path) = &property.path {
            if path.segments().iter().any(|s| s.trim().is_empty()) {
                return Err(fail(&format!("path {:?} has an empty segment", path.as_str())));
            }
        }

        if property.null_policy == NullPolicy::EmitEmptyContainer && !property.kind.is_collection() {
            return Err(fail(&format!(
                "emit_empty_container is only valid on collections, not on a {} property",
                property.kind.name()
            )));
        }

        let nested = match &property.kind {
            ValueKind::Nested(target) | ValueKind::Collection(ItemKind::Nested(target)) => Some(target),
            _ => None,
        };
        if let Some(target) = nested {
            if !registered.contains_key(target) {
                return Err(fail(&format!("nested type {} is not bound", target)));
            }
        }
    }

    validate_addresses(bound)
}

/// Rejects properties that would write to the same place, or where one
/// property's value sits on another's container path.
fn validate_addresses(bound: &BoundType) -> Result<()> {
    let planned: Vec<PlannedProperty> = bound.properties.iter().map(PlannedProperty::compile).collect();
    for (i, a) in planned.iter().enumerate() {
        let address = a.address();
        for b in &planned[i + 1..] {
            let other = b.address();
            let clash = address == other
                || other.starts_with(&address[..])
                || address.starts_with(&other[..]);
            if clash {
                return Err(BindError::property_configuration(
                    &bound.key,
                    &b.name,
                    format!("address {} collides with property {}", other.join("/"), a.name),
                ));
            }
        }
    }
    Ok(())
}
