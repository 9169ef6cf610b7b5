//! Constructible service types.
//!
//! Rust has no runtime constructors, so a type becomes buildable by the
//! registry by implementing [`Injectable`]. [`ServiceType`] erases that
//! implementation into plain function pointers so it can be stored in
//! records, used as a registry key and passed around by value.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::container::Scope;
use crate::error::{DiError, DiResult};
use crate::reflection::ParamType;

/// Shared, type-erased service value.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Owned, type-erased service value that has not been shared yet.
pub type AnyBox = Box<dyn Any + Send + Sync>;

/// A type the registry knows how to build.
///
/// Only [`construct`](Injectable::construct) is required. The other hooks
/// opt a type into constructor reflection, property handlers and factory
/// methods.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Args, Container, DiResult, Injectable, ParamType, Resolver};
/// use std::sync::Arc;
///
/// struct Engine {
///     serial: &'static str,
/// }
///
/// impl Injectable for Engine {
///     fn construct(_args: &Args<'_>) -> DiResult<Self> {
///         Ok(Engine { serial: "A-123" })
///     }
/// }
///
/// struct Car {
///     engine: Arc<Engine>,
/// }
///
/// impl Injectable for Car {
///     fn construct(args: &Args<'_>) -> DiResult<Self> {
///         Ok(Car { engine: args.required::<Engine>(0)? })
///     }
///
///     fn parameters() -> Vec<ParamType> {
///         vec![ParamType::service::<Engine>()]
///     }
/// }
///
/// let container = Container::new();
/// let car = container.get_type::<Car>().unwrap();
/// assert_eq!(car.engine.serial, "A-123");
/// ```
pub trait Injectable: Any + Send + Sync + Sized {
    /// Builds an instance from resolved positional arguments.
    fn construct(args: &Args<'_>) -> DiResult<Self>;

    /// Declared constructor parameter types, read by [`DeclaredParameters`](crate::DeclaredParameters).
    fn parameters() -> Vec<ParamType> {
        Vec::new()
    }

    /// Receives the value produced by a property handler.
    fn assign_property(&mut self, name: &str, _value: AnyArc) -> DiResult<()> {
        Err(DiError::UnknownProperty {
            ty: std::any::type_name::<Self>(),
            property: name.to_string(),
        })
    }

    /// Runs a named factory method on a resolved instance.
    fn invoke(&self, method: &str, _args: &Args<'_>) -> DiResult<AnyBox> {
        Err(DiError::UnknownMethod {
            ty: std::any::type_name::<Self>(),
            method: method.to_string(),
        })
    }
}

type ConstructFn = fn(&Args<'_>) -> DiResult<AnyBox>;
type ParametersFn = fn() -> Vec<ParamType>;
type AssignFn = fn(&mut (dyn Any + Send + Sync), &str, AnyArc) -> DiResult<bool>;
type InvokeFn = fn(&AnyArc, &str, &Args<'_>) -> DiResult<AnyBox>;

/// Type-erased handle to an [`Injectable`] type.
///
/// Equality and hashing use the `TypeId` only.
#[derive(Clone, Copy)]
pub struct ServiceType {
    id: TypeId,
    name: &'static str,
    construct: ConstructFn,
    parameters: ParametersFn,
    assign: AssignFn,
    invoke: InvokeFn,
}

impl ServiceType {
    /// Handle for `T`.
    pub fn of<T: Injectable>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            construct: construct_erased::<T>,
            parameters: T::parameters,
            assign: assign_erased::<T>,
            invoke: invoke_erased::<T>,
        }
    }

    /// `TypeId` of the underlying type.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// `std::any::type_name` of the underlying type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Constructor parameters declared through [`Injectable::parameters`].
    pub fn declared_parameters(&self) -> Vec<ParamType> {
        (self.parameters)()
    }

    pub(crate) fn construct(&self, args: &Args<'_>) -> DiResult<AnyBox> {
        (self.construct)(args)
    }

    /// Returns `Ok(false)` when `instance` is not of this type.
    pub(crate) fn assign(
        &self,
        instance: &mut (dyn Any + Send + Sync),
        property: &str,
        value: AnyArc,
    ) -> DiResult<bool> {
        (self.assign)(instance, property, value)
    }

    pub(crate) fn invoke(&self, instance: &AnyArc, method: &str, args: &Args<'_>) -> DiResult<AnyBox> {
        (self.invoke)(instance, method, args)
    }
}

fn construct_erased<T: Injectable>(args: &Args<'_>) -> DiResult<AnyBox> {
    Ok(Box::new(T::construct(args)?))
}

fn assign_erased<T: Injectable>(
    instance: &mut (dyn Any + Send + Sync),
    property: &str,
    value: AnyArc,
) -> DiResult<bool> {
    match instance.downcast_mut::<T>() {
        Some(target) => {
            target.assign_property(property, value)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn invoke_erased<T: Injectable>(instance: &AnyArc, method: &str, args: &Args<'_>) -> DiResult<AnyBox> {
    let target = (**instance)
        .downcast_ref::<T>()
        .ok_or(DiError::TypeMismatch(std::any::type_name::<T>()))?;
    target.invoke(method, args)
}

impl PartialEq for ServiceType {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceType {}

impl Hash for ServiceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Positional arguments handed to constructors, factories and factory methods.
///
/// Constructor arguments keep placeholder slots (`None`) for parameters the
/// registry does not inject, so positions line up with the declared
/// parameter list. Factories receive only resolved values. The resolving
/// scope always travels along as the trailing argument.
pub struct Args<'a> {
    values: Vec<Option<AnyArc>>,
    scope: &'a Scope,
}

impl<'a> Args<'a> {
    pub(crate) fn new(values: Vec<Option<AnyArc>>, scope: &'a Scope) -> Self {
        Self { values, scope }
    }

    /// Number of positional slots, placeholders included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no positional slots.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value at `index`; `None` for placeholders and out-of-range positions.
    pub fn raw(&self, index: usize) -> Option<&AnyArc> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Typed value at `index`, `Ok(None)` if the slot is a placeholder.
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> DiResult<Option<Arc<T>>> {
        match self.raw(index) {
            Some(value) => value
                .clone()
                .downcast::<T>()
                .map(Some)
                .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>())),
            None => Ok(None),
        }
    }

    /// Typed value at `index`, failing if the slot is a placeholder.
    pub fn required<T: Any + Send + Sync>(&self, index: usize) -> DiResult<Arc<T>> {
        self.get::<T>(index)?.ok_or(DiError::MissingArgument {
            index,
            ty: std::any::type_name::<T>(),
        })
    }

    /// Cloned value at `index`, convenient for handler-supplied primitives.
    pub fn value<T: Any + Send + Sync + Clone>(&self, index: usize) -> DiResult<Option<T>> {
        Ok(self.get::<T>(index)?.map(|v| (*v).clone()))
    }

    /// Iterates the slots in order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&AnyArc>> {
        self.values.iter().map(Option::as_ref)
    }

    /// The scope performing the resolution.
    pub fn scope(&self) -> &'a Scope {
        self.scope
    }
}
