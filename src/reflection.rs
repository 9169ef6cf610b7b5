//! Constructor parameter discovery.
//!
//! The resolution engine never inspects types itself. It asks a
//! [`TypeReflector`] for the ordered parameter types of the type it is about
//! to build, then injects every parameter classified as a service.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use crate::service_type::{Injectable, ServiceType};

/// Non-service parameter kinds. The registry supplies a placeholder for these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Number,
    Boolean,
}

/// Descriptor for one constructor parameter.
#[derive(Clone, PartialEq, Eq)]
pub enum ParamType {
    /// A primitive value (placeholder when no handler supplies it)
    Primitive(Primitive),
    /// The generic "any object" type; carries no resolvable identity
    Object,
    /// A service type resolved through the scope
    Service(ServiceType),
}

impl ParamType {
    /// Service parameter of type `T`.
    pub fn service<T: Injectable>() -> Self {
        ParamType::Service(ServiceType::of::<T>())
    }

    /// True for primitives and the generic object type.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, ParamType::Service(_))
    }

    /// The service type, when this is a service parameter.
    pub fn service_type(&self) -> Option<&ServiceType> {
        match self {
            ParamType::Service(ty) => Some(ty),
            _ => None,
        }
    }
}

impl fmt::Debug for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Primitive(p) => write!(f, "{:?}", p),
            ParamType::Object => f.write_str("Object"),
            ParamType::Service(ty) => write!(f, "{:?}", ty),
        }
    }
}

/// Source of constructor parameter types.
///
/// `None` means "nothing known" and yields zero inferred parameters; the
/// engine keeps working, it just injects nothing positionally.
pub trait TypeReflector: Send + Sync {
    /// Ordered parameter descriptors for `ty`.
    fn parameters(&self, ty: &ServiceType) -> Option<Vec<ParamType>>;
}

/// Default reflector: reads [`Injectable::parameters`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclaredParameters;

impl TypeReflector for DeclaredParameters {
    fn parameters(&self, ty: &ServiceType) -> Option<Vec<ParamType>> {
        let declared = ty.declared_parameters();
        if declared.is_empty() {
            None
        } else {
            Some(declared)
        }
    }
}

/// Reflector that knows nothing, for fully explicit wiring.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReflection;

impl TypeReflector for NoReflection {
    fn parameters(&self, _ty: &ServiceType) -> Option<Vec<ParamType>> {
        None
    }
}

/// Reflector backed by an explicit manifest.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{ManifestReflector, ParamType, Primitive, ServiceType, TypeReflector};
/// # use ferrous_registry::{Args, DiResult, Injectable};
/// # struct Greeter;
/// # impl Injectable for Greeter {
/// #     fn construct(_args: &Args<'_>) -> DiResult<Self> { Ok(Greeter) }
/// # }
///
/// let manifest = ManifestReflector::new()
///     .with::<Greeter>(vec![ParamType::Primitive(Primitive::String)]);
///
/// let params = manifest.parameters(&ServiceType::of::<Greeter>()).unwrap();
/// assert_eq!(params, vec![ParamType::Primitive(Primitive::String)]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ManifestReflector {
    entries: HashMap<TypeId, Vec<ParamType>>,
    fallback_to_declared: bool,
}

impl ManifestReflector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the parameter list for `T`, replacing any previous entry.
    pub fn with<T: Injectable>(mut self, params: Vec<ParamType>) -> Self {
        self.entries.insert(TypeId::of::<T>(), params);
        self
    }

    /// Falls back to [`Injectable::parameters`] for types missing from the manifest.
    pub fn or_declared(mut self) -> Self {
        self.fallback_to_declared = true;
        self
    }
}

impl TypeReflector for ManifestReflector {
    fn parameters(&self, ty: &ServiceType) -> Option<Vec<ParamType>> {
        match self.entries.get(&ty.type_id()) {
            Some(params) => Some(params.clone()),
            None if self.fallback_to_declared => DeclaredParameters.parameters(ty),
            None => None,
        }
    }
}
