//! Scopes and the resolution algorithm.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::{ContainerShared, ScopeId};
use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::handler::Handler;
use crate::internal::{RegistryId, ResolutionGuard};
use crate::key::{Key, ServiceIdentifier};
use crate::metadata::{Factory, ServiceMetadata};
use crate::reflection::ParamType;
use crate::registration::{Registry, ServiceRecord};
use crate::service_type::{AnyArc, AnyBox, Args, ServiceType};
use crate::traits::ResolverCore;

/// One isolated registry of service records.
///
/// The default scope has no id. Named scopes come from
/// [`Container::of`](crate::Container::of); they inherit non-global records
/// from the default scope on first use and cache their own instances.
/// `Scope` is a cheap handle; clones refer to the same registry.
///
/// # Resolution order
///
/// 1. A global record in the default scope wins and is produced there
/// 2. This scope's own record
/// 3. A copy of the default scope's record, stored in this scope
/// 4. The first grouped record for the identifier
/// 5. A record synthesized from the identifier when it is a type
#[derive(Clone)]
pub struct Scope {
    id: Option<ScopeId>,
    registry: Arc<Registry>,
    shared: Arc<ContainerShared>,
}

impl Scope {
    pub(crate) fn new(id: Option<ScopeId>, registry: Arc<Registry>, shared: Arc<ContainerShared>) -> Self {
        Self { id, registry, shared }
    }

    /// `None` for the default scope.
    pub fn id(&self) -> Option<&ScopeId> {
        self.id.as_ref()
    }

    pub fn is_default(&self) -> bool {
        Arc::ptr_eq(&self.registry, &self.shared.default)
    }

    fn registry_id(&self) -> RegistryId {
        Arc::as_ptr(&self.registry) as RegistryId
    }

    fn default_scope(&self) -> Scope {
        Scope::new(None, self.shared.default.clone(), self.shared.clone())
    }

    /// True if this scope holds a single-value record for `id`.
    pub fn has(&self, id: impl Into<ServiceIdentifier>) -> bool {
        self.registry.contains_key(&id.into().key())
    }

    /// Resolves `id` to its value, producing and caching it on first use.
    pub fn get_any(&self, id: impl Into<ServiceIdentifier>) -> DiResult<AnyArc> {
        self.resolve(&id.into())
    }

    /// Values of every grouped record under `id`, in registration order.
    pub fn get_many_any(&self, id: impl Into<ServiceIdentifier>) -> DiResult<Vec<AnyArc>> {
        self.resolve_group(&id.into())
    }

    /// Stores `meta`: grouped when multiple, otherwise merged into the
    /// existing record for its id or inserted.
    pub fn set(&self, meta: ServiceMetadata) -> &Self {
        tracing::trace!(service = %meta.id(), scope = ?self.id, "set");
        self.registry.insert(meta);
        self
    }

    /// Stores a ready value under `id`. A type id also becomes the record's type.
    pub fn set_value<T: Any + Send + Sync>(&self, id: impl Into<ServiceIdentifier>, value: T) -> &Self {
        self.set_arc(id, Arc::new(value))
    }

    pub fn set_arc(&self, id: impl Into<ServiceIdentifier>, value: AnyArc) -> &Self {
        let mut meta = ServiceMetadata::for_id(id).value_arc(value);
        if let Some(ty) = meta.id.as_type().copied() {
            meta.ty = Some(ty);
        }
        self.set(meta)
    }

    pub fn set_all<I>(&self, records: I) -> &Self
    where
        I: IntoIterator<Item = ServiceMetadata>,
    {
        for meta in records {
            self.set(meta);
        }
        self
    }

    /// Deletes the single-value records of `ids`. Grouped records stay.
    pub fn remove<I, T>(&self, ids: I) -> &Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ServiceIdentifier>,
    {
        for id in ids {
            let id = id.into();
            if self.registry.remove(&id.key()) {
                tracing::trace!(service = %id, scope = ?self.id, "removed");
            }
        }
        self
    }

    /// Clears every single-value record. Grouped records stay.
    pub fn reset(&self) -> &Self {
        tracing::debug!(scope = ?self.id, services = self.registry.len(), "resetting scope");
        self.registry.clear();
        self
    }

    /// Snapshot of the records held by this scope.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.registry.snapshot().iter().map(ServiceDescriptor::from_metadata).collect()
    }

    pub(crate) fn resolve(&self, identifier: &ServiceIdentifier) -> DiResult<AnyArc> {
        let key = identifier.key();
        let inherited = if self.is_default() { None } else { self.shared.default.find(&key) };

        if let Some(record) = &inherited {
            if record.is_global() {
                return self.default_scope().service_value(identifier, Some(record.clone()));
            }
        }

        if let Some(record) = self.registry.find(&key) {
            return self.service_value(identifier, Some(record));
        }

        if let Some(record) = inherited {
            let copy = ServiceRecord::new(record.snapshot().without_value());
            let stored = self.registry.insert_if_absent(key.clone(), copy.clone());
            if !Arc::ptr_eq(&stored, &copy) {
                return self.service_value(identifier, Some(stored));
            }
            tracing::trace!(service = %identifier, scope = ?self.id, "inherited record from default scope");
            let produced = self.service_value(identifier, Some(copy.clone()));
            if produced.is_err() {
                self.registry.remove_if_same(&key, &copy);
            }
            return produced;
        }

        if let Some(record) = self.registry.first_grouped(&key) {
            return self.service_value(identifier, Some(record));
        }

        self.service_value(identifier, None)
    }

    fn resolve_group(&self, identifier: &ServiceIdentifier) -> DiResult<Vec<AnyArc>> {
        let records = self
            .registry
            .grouped(&identifier.key())
            .ok_or_else(|| DiError::ServiceNotFound(identifier.to_string()))?;

        records
            .into_iter()
            .map(|record| self.service_value(identifier, Some(record)))
            .collect()
    }

    /// Returns the record's cached value, or produces, caches and returns a new one.
    fn service_value(
        &self,
        identifier: &ServiceIdentifier,
        record: Option<Arc<ServiceRecord>>,
    ) -> DiResult<AnyArc> {
        let meta = match &record {
            Some(record) => {
                let meta = record.snapshot();
                if let Some(value) = meta.cached_value() {
                    return Ok(value.clone());
                }
                Some(meta)
            }
            None => None,
        };

        let buildable = meta
            .as_ref()
            .map_or(false, |m| m.get_type().is_some() || m.get_factory().is_some());
        if identifier.is_named() && !buildable {
            return Err(DiError::ServiceNotFound(identifier.to_string()));
        }

        let ty = meta
            .as_ref()
            .and_then(|m| m.get_type().or_else(|| m.id().as_type()).copied())
            .or_else(|| identifier.as_type().copied());

        let (record, meta) = match (record, meta) {
            (Some(record), Some(meta)) => (record, meta),
            _ => {
                let ty = ty.ok_or_else(|| DiError::MissingProvidedServiceType(identifier.to_string()))?;
                let record = self
                    .registry
                    .find_or_insert_with(Key::Type(ty), || ServiceMetadata::for_service_type(ty));
                let meta = record.snapshot();
                if let Some(value) = meta.cached_value() {
                    return Ok(value.clone());
                }
                tracing::trace!(service = ty.name(), scope = ?self.id, "synthesized record");
                (record, meta)
            }
        };

        let key = identifier.key();
        let options = &self.shared.options;
        let _guard = ResolutionGuard::enter(self.registry_id(), &key, options.detect_cycles, options.max_depth)?;

        // One producer per cached record; threads that waited take its value
        let production = (!meta.is_transient()).then(|| record.lock_production());
        let meta = if production.is_some() {
            let current = record.snapshot();
            if let Some(value) = current.cached_value() {
                return Ok(value.clone());
            }
            current
        } else {
            meta
        };

        let observers = &self.shared.observers;
        let started = if observers.has_observers() {
            observers.resolving(&key);
            Some(Instant::now())
        } else {
            None
        };

        let produced = self.produce(identifier, &meta, ty);
        if let Some(started) = started {
            match &produced {
                Ok(_) => observers.resolved(&key, started.elapsed()),
                Err(error) => observers.failed(&key, error),
            }
        }

        let value: AnyArc = Arc::from(produced?);
        tracing::trace!(service = %identifier, scope = ?self.id, transient = meta.is_transient(), "produced");
        Ok(record.cache(value))
    }

    /// Builds a new instance: parameters, then factory or constructor, then properties.
    fn produce(
        &self,
        identifier: &ServiceIdentifier,
        meta: &ServiceMetadata,
        ty: Option<ServiceType>,
    ) -> DiResult<AnyBox> {
        let handlers = match &ty {
            Some(ty) => self.shared.handlers.for_key(&Key::Type(*ty)),
            None => Vec::new(),
        };
        let params = match &ty {
            Some(ty) => self.shared.reflector.parameters(ty).unwrap_or_default(),
            None => Vec::new(),
        };
        let args = self.materialize_params(&params, &handlers)?;

        let mut instance = match meta.get_factory() {
            Some(Factory::Method { owner, method }) => {
                let factory = self.resolve(&ServiceIdentifier::Type(*owner))?;
                let args = Args::new(args.into_iter().flatten().map(Some).collect(), self);
                owner.invoke(&factory, method, &args)?
            }
            Some(Factory::Function(function)) => {
                let args = Args::new(args.into_iter().flatten().map(Some).collect(), self);
                function(&args)?
            }
            None => {
                let ty = ty.ok_or_else(|| DiError::MissingProvidedServiceType(identifier.to_string()))?;
                ty.construct(&Args::new(args, self))?
            }
        };

        if let Some(ty) = ty {
            for handler in &handlers {
                if let Some(name) = handler.property_name() {
                    let value = handler.provide(self)?;
                    if !ty.assign(&mut *instance, name, value)? {
                        tracing::trace!(property = name, service = ty.name(), "instance is not of the handler's type");
                    }
                }
            }
        }

        Ok(instance)
    }

    /// One slot per reflected parameter, extended to cover every parameter handler.
    ///
    /// Handlers win; service parameters are resolved through this scope;
    /// everything else is a `None` placeholder.
    fn materialize_params(&self, params: &[ParamType], handlers: &[Handler]) -> DiResult<Vec<Option<AnyArc>>> {
        let arity = handlers
            .iter()
            .filter_map(Handler::index)
            .map(|index| index + 1)
            .max()
            .unwrap_or(0)
            .max(params.len());

        let mut values = Vec::with_capacity(arity);
        for index in 0..arity {
            let value = match handlers.iter().find(|h| h.index() == Some(index)) {
                Some(handler) => Some(handler.provide(self)?),
                None => match params.get(index).and_then(ParamType::service_type) {
                    Some(dependency) => Some(self.resolve(&ServiceIdentifier::Type(*dependency))?),
                    None => None,
                },
            };
            values.push(value);
        }
        Ok(values)
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.registry, &other.registry)
    }
}

impl Eq for Scope {}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.id)
            .field("services", &self.registry.len())
            .field("grouped", &self.registry.grouped_len())
            .finish()
    }
}

impl ResolverCore for Scope {
    fn resolve_any(&self, id: &ServiceIdentifier) -> DiResult<AnyArc> {
        self.resolve(id)
    }

    fn resolve_many(&self, id: &ServiceIdentifier) -> DiResult<Vec<AnyArc>> {
        self.resolve_group(id)
    }

    fn contains(&self, id: &ServiceIdentifier) -> bool {
        self.registry.contains_key(&id.key())
    }
}
