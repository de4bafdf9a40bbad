use crate::FactoryError;
use fabrik_core::{Args, BoxError, Class, IndexMap, Object, TypeKey};
use log::trace;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

pub type Constructor =
    Arc<dyn Fn(Args) -> Result<Box<dyn Object>, BoxError> + Send + Sync + 'static>;

/// Runtime stand-in for a type: what it is, what it extends and how to build it.
#[derive(Clone)]
pub struct TypeHandle {
    key: TypeKey,
    identifier: Option<String>,
    ancestors: Vec<TypeKey>,
    constructor: Constructor,
    constructors: IndexMap<String, Constructor>,
}

impl Debug for TypeHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeHandle")
            .field("key", &self.key.name())
            .field("identifier", &self.identifier)
            .field("ancestors", &self.ancestors)
            .field("constructors", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

fn erase<T, F>(f: F) -> Constructor
where
    T: Object + 'static,
    F: Fn(Args) -> Result<T, BoxError> + Send + Sync + 'static,
{
    Arc::new(move |args| f(args).map(|t| Box::new(t) as Box<dyn Object>))
}

impl TypeHandle {
    /// Handle for a [`Class`], with its identifier, ancestors and named constructors.
    pub fn of<T: Class>() -> Self {
        let mut handle = TypeHandle {
            key: TypeKey::of::<T>(),
            identifier: T::TYPE_ID.map(str::to_string),
            ancestors: T::ancestors(),
            constructor: erase(T::construct),
            constructors: IndexMap::default(),
        };
        for (name, ctor) in T::constructors() {
            handle.constructors.insert(name.to_string(), erase(ctor));
        }
        handle
    }

    /// Handle built by hand around a single constructor.
    pub fn new<T, F>(constructor: F) -> Self
    where
        T: Object + 'static,
        F: Fn(Args) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        TypeHandle {
            key: TypeKey::of::<T>(),
            identifier: None,
            ancestors: Vec::new(),
            constructor: erase(constructor),
            constructors: IndexMap::default(),
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_ancestor(mut self, ancestor: TypeKey) -> Self {
        if !self.ancestors.contains(&ancestor) {
            self.ancestors.push(ancestor);
        }
        self
    }

    /// Adds a named constructor, which must build the same type as the default one.
    pub fn with_constructor<T, F>(
        mut self,
        name: impl Into<String>,
        constructor: F,
    ) -> Result<Self, FactoryError>
    where
        T: Object + 'static,
        F: Fn(Args) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let name = name.into();
        let built = TypeKey::of::<T>();
        if built != self.key {
            return Err(FactoryError::Configuration(format!(
                "constructor '{}.{name}' builds {built}",
                self.key.short_name()
            )));
        }
        self.constructors.insert(name, erase(constructor));
        Ok(self)
    }

    #[inline]
    pub fn key(&self) -> TypeKey {
        self.key
    }

    #[inline]
    pub fn fullname(&self) -> &'static str {
        self.key.name()
    }

    /// Conventional identifier, when the type declares one.
    #[inline]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    #[inline]
    pub fn ancestors(&self) -> &[TypeKey] {
        &self.ancestors
    }

    #[inline]
    pub fn has_constructor(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn constructor_names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn is_subtype_of(&self, key: &TypeKey) -> bool {
        self.key == *key || self.ancestors.contains(key)
    }

    /// Runs the default constructor, or the one registered as `name`.
    pub fn instantiate(
        &self,
        name: Option<&str>,
        args: Args,
    ) -> Result<Box<dyn Object>, FactoryError> {
        let constructor = match name {
            None => &self.constructor,
            Some(name) => self.constructors.get(name).ok_or_else(|| {
                FactoryError::Configuration(format!(
                    "constructor '{}.{name}' does not exist",
                    self.key.short_name()
                ))
            })?,
        };
        trace!(
            "constructing {} with {} ({} args)",
            self.key,
            name.unwrap_or("default constructor"),
            args.len()
        );
        (**constructor)(args).map_err(FactoryError::Construction)
    }
}

#[cfg(test)]
mod tests {
    use crate::{FactoryError, TypeHandle};
    use fabrik_core::{Args, ArgsError, BoxError, Object, TypeKey};
    use wasm_bindgen_test::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Sheep {
        age: i64,
    }

    impl Object for Sheep {
        fn type_key(&self) -> TypeKey {
            TypeKey::of::<Self>()
        }
    }

    fn sheep(args: Args) -> Result<Sheep, BoxError> {
        let [age] = args.take()?;
        match age {
            fabrik_core::Value::Int(age) => Ok(Sheep { age }),
            v => Err(ArgsError::Invalid(format!("age must be an Int, got {v}")).into()),
        }
    }

    fn handle() -> TypeHandle {
        TypeHandle::new(sheep)
            .with_identifier("sheep")
            .with_constructor("old", |_| Ok(Sheep { age: 15 }))
            .expect("builds a sheep")
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn default_constructor() {
        let o = handle()
            .instantiate(None, Args::new().arg(3))
            .expect("valid sheep");
        assert_eq!(o.downcast_ref::<Sheep>(), Some(&Sheep { age: 3 }));
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn named_constructor() {
        let h = handle();
        assert!(h.has_constructor("old"));
        let o = h.instantiate(Some("old"), Args::new()).expect("old sheep");
        assert_eq!(o.downcast_ref::<Sheep>(), Some(&Sheep { age: 15 }));
        assert!(matches!(
            h.instantiate(Some("young"), Args::new()),
            Err(FactoryError::Configuration(_))
        ));
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn named_constructor_must_build_same_type() {
        #[derive(Clone, Debug, PartialEq)]
        struct Goat;

        impl Object for Goat {
            fn type_key(&self) -> TypeKey {
                TypeKey::of::<Self>()
            }
        }

        let r = handle().with_constructor("goat", |_| Ok(Goat));
        let Err(FactoryError::Configuration(m)) = r else {
            panic!("a goat constructor was accepted for sheep");
        };
        assert!(m.contains("Sheep.goat") && m.contains("Goat"), "{m}");
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn constructor_errors_pass_through() {
        let e = handle()
            .instantiate(None, Args::new().arg("three"))
            .expect_err("age is not an int");
        let source = e.into_construction().expect("construction failure");
        assert!(matches!(
            source.downcast_ref::<ArgsError>(),
            Some(ArgsError::Invalid(_))
        ));
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn subtypes() {
        struct Animal;
        let h = handle().with_ancestor(TypeKey::of::<Animal>());
        assert_eq!(h.identifier(), Some("sheep"));
        assert!(h.is_subtype_of(&TypeKey::of::<Sheep>()));
        assert!(h.is_subtype_of(&TypeKey::of::<Animal>()));
        assert!(!h.is_subtype_of(&TypeKey::of::<String>()));
    }
}
