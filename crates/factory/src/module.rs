use crate::{FactoryError, LazyType, TypeHandle};
use fabrik_core::{Class, IndexMap};
use log::debug;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Named table of type handles that lazy types are resolved against.
#[derive(Clone, Debug, Default)]
pub struct Module {
    path: String,
    exports: IndexMap<String, Arc<TypeHandle>>,
}

impl Module {
    pub fn new(path: impl Into<String>) -> Self {
        Module {
            path: path.into(),
            exports: IndexMap::default(),
        }
    }

    #[inline]
    pub fn export<T: Class>(self, attr: impl Into<String>) -> Self {
        self.export_handle(attr, TypeHandle::of::<T>())
    }

    pub fn export_handle(mut self, attr: impl Into<String>, handle: TypeHandle) -> Self {
        self.exports.insert(attr.into(), Arc::new(handle));
        self
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn get(&self, attr: &str) -> Option<&Arc<TypeHandle>> {
        self.exports.get(attr)
    }

    pub fn attrs(&self) -> impl Iterator<Item = &str> {
        self.exports.keys().map(String::as_str)
    }
}

type ModuleInit = Box<dyn Fn() -> Module + Send + Sync>;

enum ModuleSlot {
    Pending(ModuleInit),
    Loaded(Module),
}

/// Modules known to one factory. A declared module is built on its first import and kept.
#[derive(Default)]
pub struct Modules {
    slots: IndexMap<String, ModuleSlot>,
}

impl Debug for Modules {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.slots.iter().map(|(path, slot)| {
                let state = match slot {
                    ModuleSlot::Pending(_) => "pending",
                    ModuleSlot::Loaded(_) => "loaded",
                };
                (path, state)
            }))
            .finish()
    }
}

impl Modules {
    /// Replaces any module previously known under the same path.
    pub fn declare<F>(&mut self, path: impl Into<String>, init: F)
    where
        F: Fn() -> Module + Send + Sync + 'static,
    {
        self.slots
            .insert(path.into(), ModuleSlot::Pending(Box::new(init)));
    }

    pub fn insert(&mut self, module: Module) {
        self.slots
            .insert(module.path.clone(), ModuleSlot::Loaded(module));
    }

    #[inline]
    pub fn contains(&self, path: &str) -> bool {
        self.slots.contains_key(path)
    }

    #[inline]
    pub fn is_loaded(&self, path: &str) -> bool {
        matches!(self.slots.get(path), Some(ModuleSlot::Loaded(_)))
    }

    pub fn import(&mut self, path: &str) -> Result<&Module, FactoryError> {
        let slot = self
            .slots
            .get_mut(path)
            .ok_or_else(|| FactoryError::Resolution(format!("no module named '{path}'")))?;
        if let ModuleSlot::Pending(init) = &*slot {
            debug!("importing module {path}");
            let mut module = init();
            module.path = path.to_string();
            *slot = ModuleSlot::Loaded(module);
        }
        match slot {
            ModuleSlot::Loaded(module) => Ok(module),
            ModuleSlot::Pending(_) => Err(FactoryError::Resolution(format!(
                "module '{path}' could not be loaded"
            ))),
        }
    }

    /// Handle for `lazy` if its module is already loaded; never imports.
    pub fn peek(&self, lazy: &LazyType) -> Option<&Arc<TypeHandle>> {
        match self.slots.get(lazy.module()) {
            Some(ModuleSlot::Loaded(module)) => module.get(lazy.attr()),
            _ => None,
        }
    }

    pub fn load(&mut self, lazy: &LazyType) -> Result<Arc<TypeHandle>, FactoryError> {
        let module = self.import(lazy.module())?;
        module.get(lazy.attr()).cloned().ok_or_else(|| {
            FactoryError::Resolution(format!(
                "module '{}' has no attribute '{}'",
                lazy.module(),
                lazy.attr()
            ))
        })
    }
}
