use crate::{
    Converter, DefaultConverter, FactoryError, Module, Modules, Registration, TypeDescriptor,
    TypeHandle,
};
use fabrik_core::{Args, Class, IndexMap, Object, TypeKey, Value};
use itertools::Itertools;
use log::{debug, trace, warn};
use std::any::Any;
use std::fmt::{Display, Formatter};
use std::iter::once;
use std::sync::Arc;

type EntryId = usize;

/// A registered type and the constructor to use when it is built from a map.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistryEntry {
    descriptor: TypeDescriptor,
    dict_constructor: Option<String>,
}

impl RegistryEntry {
    pub fn new(descriptor: TypeDescriptor, dict_constructor: Option<String>) -> Self {
        RegistryEntry {
            descriptor,
            dict_constructor,
        }
    }

    #[inline]
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    #[inline]
    pub fn dict_constructor(&self) -> Option<&str> {
        self.dict_constructor.as_deref()
    }
}

/// Types an instance must belong to, directly or through a supertype.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AllowedTypes(Vec<TypeKey>);

impl From<TypeKey> for AllowedTypes {
    #[inline]
    fn from(value: TypeKey) -> Self {
        AllowedTypes(vec![value])
    }
}

impl From<Vec<TypeKey>> for AllowedTypes {
    #[inline]
    fn from(value: Vec<TypeKey>) -> Self {
        AllowedTypes(value)
    }
}

impl<const N: usize> From<[TypeKey; N]> for AllowedTypes {
    #[inline]
    fn from(value: [TypeKey; N]) -> Self {
        AllowedTypes(value.to_vec())
    }
}

impl Display for AllowedTypes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0.as_slice() {
            [single] => write!(f, "{single}"),
            keys => write!(f, "({})", keys.iter().join(", ")),
        }
    }
}

impl AllowedTypes {
    #[inline]
    pub fn of<T: Any>() -> Self {
        TypeKey::of::<T>().into()
    }

    pub fn with<T: Any>(mut self) -> Self {
        self.0.push(TypeKey::of::<T>());
        self
    }

    #[inline]
    pub fn keys(&self) -> &[TypeKey] {
        &self.0
    }

    pub fn permits(&self, object: &dyn Object) -> bool {
        self.0.iter().any(|k| object.is_instance_of(k))
    }

    /// True when the handle's type or one of its declared ancestors is allowed.
    pub fn admits(&self, handle: &TypeHandle) -> bool {
        self.0.iter().any(|k| handle.is_subtype_of(k))
    }
}

/// What tells two registered types apart. A deferred type is known by its path until its
/// module is loaded.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum TypeIdentity {
    Key(TypeKey),
    Path(String),
}

#[derive(Clone, Debug, Default)]
pub struct CreateOptions {
    pub allowed_types: Option<AllowedTypes>,
    pub constructor: Option<String>,
}

impl CreateOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allowed(mut self, allowed: impl Into<AllowedTypes>) -> Self {
        self.allowed_types = Some(allowed.into());
        self
    }

    pub fn constructor(mut self, name: impl Into<String>) -> Self {
        self.constructor = Some(name.into());
        self
    }
}

/// Registry of identifiers to types, and the machinery building instances from them.
///
/// Identifiers keep their insertion order. Aliases are plain identifiers sharing an entry, so
/// a lazy type resolved through one of them is resolved for all of them.
#[derive(Debug, Default)]
pub struct Factory {
    ids: IndexMap<String, EntryId>,
    entries: IndexMap<EntryId, RegistryEntry>,
    next_entry: EntryId,
    modules: Modules,
}

impl Factory {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn modules(&self) -> &Modules {
        &self.modules
    }

    #[inline]
    pub fn modules_mut(&mut self) -> &mut Modules {
        &mut self.modules
    }

    /// Makes the module at `path` available to lazy types; `init` runs on first import.
    pub fn declare_module<F>(&mut self, path: impl Into<String>, init: F)
    where
        F: Fn() -> Module + Send + Sync + 'static,
    {
        self.modules.declare(path, init)
    }

    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.insert(module);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub fn entry(&self, id: &str) -> Option<&RegistryEntry> {
        self.ids.get(id).and_then(|e| self.entries.get(e))
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.ids.keys().map(String::as_str)
    }

    /// Names of the registered types, each listed once.
    ///
    /// A deferred type whose module is loaded counts as the type it resolves to. One whose
    /// module has not been imported yet is listed under its path.
    pub fn registered_types(&self) -> Vec<String> {
        self.ids
            .values()
            .filter_map(|e| self.entries.get(e))
            .map(|entry| self.loaded_identity(&entry.descriptor))
            .unique_by(|(identity, _)| identity.clone())
            .map(|(_, name)| name)
            .collect()
    }

    pub fn register(
        &mut self,
        registration: impl Into<Registration>,
    ) -> Result<TypeDescriptor, FactoryError> {
        let Registration {
            mut descriptor,
            id,
            aliases,
            dict_constructor,
            overwrite,
            eager,
            unique_type,
        } = registration.into();

        if eager {
            if let TypeDescriptor::Deferred(lazy) = &descriptor {
                descriptor = self.modules.load(lazy)?.into();
            }
        }

        let id = match id.or_else(|| descriptor.identifier().map(str::to_string)) {
            Some(id) => id,
            None => {
                return Err(FactoryError::Configuration(format!(
                    "while registering {descriptor}: please declare a type identifier"
                )))
            }
        };

        let keys: Vec<String> = once(id).chain(aliases).collect();
        for (index, key) in keys.iter().enumerate() {
            if key.is_empty() {
                return Err(FactoryError::Configuration(format!(
                    "while registering {descriptor}: identifiers must be non-empty"
                )));
            }
            if keys[..index].contains(key) {
                return Err(FactoryError::KeyCollision(format!(
                    "'{key}' is given more than once"
                )));
            }
            if !overwrite {
                if let Some(existing) = self.entry(key) {
                    return Err(FactoryError::collision(key, &existing.descriptor.fullname()));
                }
            }
        }

        if unique_type {
            let identity = self.identify(&descriptor);
            let others: Vec<(String, TypeDescriptor)> = self
                .ids
                .iter()
                .filter(|(key, _)| !keys.contains(*key))
                .filter_map(|(key, e)| {
                    let entry = self.entries.get(e)?;
                    Some((key.clone(), entry.descriptor.clone()))
                })
                .collect();
            for (key, other) in others {
                if self.identify(&other) == identity {
                    return Err(FactoryError::KeyCollision(format!(
                        "{descriptor} is already registered as '{key}'"
                    )));
                }
            }
        }

        if let (TypeDescriptor::Direct(handle), Some(name)) = (&descriptor, &dict_constructor) {
            if !handle.has_constructor(name) {
                return Err(FactoryError::Configuration(format!(
                    "constructor '{}.{name}' does not exist",
                    handle.key().short_name()
                )));
            }
        }

        let entry = self.next_entry;
        self.next_entry += 1;
        self.entries.insert(
            entry,
            RegistryEntry::new(descriptor.clone(), dict_constructor),
        );
        debug!("registering {descriptor} as {}", keys.iter().join(", "));
        for key in keys {
            self.bind(key, entry);
        }
        Ok(descriptor)
    }

    /// Registers `T` under its own identifier and hands back its key, so registrations compose.
    pub fn register_type<T: Class>(&mut self) -> Result<TypeKey, FactoryError> {
        self.register(Registration::of::<T>())?;
        Ok(TypeKey::of::<T>())
    }

    /// Points `new` at the entry of `existing`.
    pub fn alias(
        &mut self,
        existing: &str,
        new: &str,
        overwrite: bool,
    ) -> Result<(), FactoryError> {
        let entry = *self.ids.get(existing).ok_or_else(|| {
            FactoryError::Lookup(format!(
                "cannot alias '{new}' to '{existing}': no type registered as '{existing}'"
            ))
        })?;
        if new.is_empty() {
            return Err(FactoryError::Configuration(
                "identifiers must be non-empty".to_string(),
            ));
        }
        if !overwrite {
            if let Some(current) = self.entry(new) {
                return Err(FactoryError::collision(new, &current.descriptor.fullname()));
            }
        }
        debug!("aliasing '{new}' to '{existing}'");
        self.bind(new.to_string(), entry);
        Ok(())
    }

    pub fn unregister(&mut self, id: &str) -> Result<RegistryEntry, FactoryError> {
        let entry = self
            .ids
            .shift_remove(id)
            .ok_or_else(|| FactoryError::unregistered(id))?;
        debug!("unregistering '{id}'");
        let removed = self
            .entries
            .get(&entry)
            .cloned()
            .ok_or_else(|| FactoryError::unregistered(id))?;
        self.release(entry);
        Ok(removed)
    }

    pub fn clear(&mut self) {
        debug!("clearing {} identifiers", self.ids.len());
        self.ids.clear();
        self.entries.clear();
    }

    /// Resolved handle for `id`, loading and memoizing a lazy type on first use.
    pub fn get_type(&mut self, id: &str) -> Result<Arc<TypeHandle>, FactoryError> {
        let entry = self
            .ids
            .get(id)
            .and_then(|e| self.entries.get_mut(e))
            .ok_or_else(|| FactoryError::unregistered(id))?;
        let lazy = match &entry.descriptor {
            TypeDescriptor::Direct(handle) => return Ok(handle.clone()),
            TypeDescriptor::Deferred(lazy) => lazy.clone(),
        };
        trace!("resolving '{id}' from {lazy}");
        let handle = self.modules.load(&lazy)?;
        entry.descriptor = TypeDescriptor::Direct(handle.clone());
        Ok(handle)
    }

    #[inline]
    pub fn create(&mut self, id: &str, args: Args) -> Result<Box<dyn Object>, FactoryError> {
        self.create_with(id, args, &CreateOptions::default())
    }

    pub fn create_with(
        &mut self,
        id: &str,
        args: Args,
        options: &CreateOptions,
    ) -> Result<Box<dyn Object>, FactoryError> {
        let handle = self.get_type(id)?;
        let object = handle.instantiate(options.constructor.as_deref(), args)?;
        if let Some(allowed) = &options.allowed_types {
            if !allowed.admits(&handle) && !allowed.permits(object.as_ref()) {
                return Err(FactoryError::Type(format!(
                    "'{id}' does not reference allowed type {allowed} or any of its subtypes"
                )));
            }
        }
        Ok(object)
    }

    /// Builds the object a map describes; any other value comes back as is.
    #[inline]
    pub fn convert(
        &mut self,
        value: Value,
        allowed_types: Option<&AllowedTypes>,
    ) -> Result<Value, FactoryError> {
        DefaultConverter.convert(self, value, allowed_types)
    }

    #[inline]
    pub fn convert_with<C: Converter + ?Sized>(
        &mut self,
        converter: &C,
        value: Value,
        allowed_types: Option<&AllowedTypes>,
    ) -> Result<Value, FactoryError> {
        converter.convert(self, value, allowed_types)
    }

    fn loaded_identity(&self, descriptor: &TypeDescriptor) -> (TypeIdentity, String) {
        let handle = match descriptor {
            TypeDescriptor::Direct(handle) => Some(handle),
            TypeDescriptor::Deferred(lazy) => self.modules.peek(lazy),
        };
        match handle {
            Some(handle) => (
                TypeIdentity::Key(handle.key()),
                handle.fullname().to_string(),
            ),
            None => (
                TypeIdentity::Path(descriptor.fullname()),
                descriptor.fullname(),
            ),
        }
    }

    /// Imports the module of a deferred type when it is declared, so the type compares by key.
    fn identify(&mut self, descriptor: &TypeDescriptor) -> TypeIdentity {
        if let TypeDescriptor::Deferred(lazy) = descriptor {
            if self.modules.contains(lazy.module()) {
                if let Err(e) = self.modules.load(lazy) {
                    trace!("{lazy} is compared by path: {e}");
                }
            }
        }
        self.loaded_identity(descriptor).0
    }

    fn bind(&mut self, key: String, entry: EntryId) {
        if let Some(previous) = self.ids.insert(key, entry) {
            if previous != entry {
                if let Some(old) = self.entries.get(&previous) {
                    warn!("overwriting identifier previously referencing {}", old.descriptor);
                }
                self.release(previous);
            }
        }
    }

    /// Drops an entry once no identifier references it.
    fn release(&mut self, entry: EntryId) {
        if !self.ids.values().any(|e| *e == entry) {
            self.entries.shift_remove(&entry);
        }
    }
}
