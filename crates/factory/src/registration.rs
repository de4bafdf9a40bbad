use crate::{FactoryError, LazyType, TypeDescriptor, TypeHandle};
use fabrik_core::Class;
use std::str::FromStr;
use std::sync::Arc;

/// Everything [`crate::Factory::register`] needs to add a type.
#[derive(Clone, Debug)]
pub struct Registration {
    pub(crate) descriptor: TypeDescriptor,
    pub(crate) id: Option<String>,
    pub(crate) aliases: Vec<String>,
    pub(crate) dict_constructor: Option<String>,
    pub(crate) overwrite: bool,
    pub(crate) eager: bool,
    pub(crate) unique_type: bool,
}

impl From<TypeDescriptor> for Registration {
    fn from(value: TypeDescriptor) -> Self {
        Registration {
            descriptor: value,
            id: None,
            aliases: Vec::new(),
            dict_constructor: None,
            overwrite: false,
            eager: false,
            unique_type: false,
        }
    }
}

impl Registration {
    #[inline]
    pub fn of<T: Class>() -> Self {
        TypeDescriptor::of::<T>().into()
    }

    #[inline]
    pub fn handle(handle: impl Into<Arc<TypeHandle>>) -> Self {
        TypeDescriptor::Direct(handle.into()).into()
    }

    #[inline]
    pub fn deferred(lazy: LazyType) -> Self {
        TypeDescriptor::Deferred(lazy).into()
    }

    /// Registers `pkg.mod.Type` without loading it.
    pub fn lazy(path: &str) -> Result<Self, FactoryError> {
        LazyType::from_str(path).map(Registration::deferred)
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Constructor used when building this type from a map.
    pub fn dict_constructor(mut self, name: impl Into<String>) -> Self {
        self.dict_constructor = Some(name.into());
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Load a lazy type now instead of on first use.
    pub fn eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }

    /// Refuse a type that is already registered under another identifier.
    pub fn unique_type(mut self, unique_type: bool) -> Self {
        self.unique_type = unique_type;
        self
    }

    #[inline]
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }
}
