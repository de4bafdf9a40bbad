mod dyn_traits;

use crate::{Args, BoxError, TypeKey};
use dyn_clone::DynClone;
use std::fmt::Debug;

pub use dyn_traits::*;

/// An instance built by a factory.
pub trait Object: DynCompare + DynClone + Debug + Send + Sync {
    fn type_key(&self) -> TypeKey;

    /// Types this object can stand in for, beyond its own.
    fn supertypes(&self) -> Vec<TypeKey> {
        Vec::new()
    }

    fn is_instance_of(&self, key: &TypeKey) -> bool {
        self.type_key() == *key || self.supertypes().contains(key)
    }
}

dyn_clone::clone_trait_object!(Object);

impl PartialEq<dyn Object> for dyn Object {
    fn eq(&self, other: &Self) -> bool {
        self.as_dyn_compare() == other.as_dyn_compare()
    }
}

impl PartialEq<&Self> for Box<dyn Object> {
    fn eq(&self, other: &&Self) -> bool {
        <Self as PartialEq>::eq(self, *other)
    }
}

impl dyn Object {
    #[inline]
    pub fn is<T: Object>(&self) -> bool {
        <dyn Object as AsDynCompare>::as_any(self).is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        <dyn Object as AsDynCompare>::as_any(self).downcast_ref::<T>()
    }

    /// Hands the box back unchanged when it does not hold a `T`.
    pub fn downcast<T: Object>(self: Box<Self>) -> Result<Box<T>, Box<dyn Object>> {
        if !self.is::<T>() {
            return Err(self);
        }
        match <dyn Object as AsDynCompare>::into_any(self).downcast::<T>() {
            Ok(t) => Ok(t),
            Err(_) => unreachable!("type checked above"),
        }
    }
}

pub type ConstructorFn<T> = fn(Args) -> Result<T, BoxError>;

/// Static side of a registrable type: what a factory needs to know before any instance exists.
pub trait Class: Object + Sized {
    /// Conventional identifier used when registering without an explicit one.
    const TYPE_ID: Option<&'static str> = None;

    /// Every type an instance of `Self` satisfies in an allowed-types check.
    fn ancestors() -> Vec<TypeKey> {
        Vec::new()
    }

    fn construct(args: Args) -> Result<Self, BoxError>;

    /// Alternate constructors, selectable by name.
    fn constructors() -> Vec<(&'static str, ConstructorFn<Self>)> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Args, BoxError, Class, Object, TypeKey};
    use wasm_bindgen_test::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Sheep {
        wool: String,
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Lamb;

    impl Object for Sheep {
        fn type_key(&self) -> TypeKey {
            TypeKey::of::<Self>()
        }
    }

    impl Object for Lamb {
        fn type_key(&self) -> TypeKey {
            TypeKey::of::<Self>()
        }

        fn supertypes(&self) -> Vec<TypeKey> {
            <Self as Class>::ancestors()
        }
    }

    impl Class for Lamb {
        const TYPE_ID: Option<&'static str> = Some("lamb");

        fn ancestors() -> Vec<TypeKey> {
            vec![TypeKey::of::<Sheep>()]
        }

        fn construct(args: Args) -> Result<Self, BoxError> {
            args.expect_empty()?;
            Ok(Lamb)
        }
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn dyn_eq() {
        let a: Box<dyn Object> = Box::new(Sheep {
            wool: "lots".into(),
        });
        let b: Box<dyn Object> = Box::new(Sheep {
            wool: "lots".into(),
        });
        let c: Box<dyn Object> = Box::new(Lamb);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.clone(), b);
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn downcast() {
        let o: Box<dyn Object> = Box::new(Lamb);
        assert!(o.is::<Lamb>());
        assert!(!o.is::<Sheep>());
        assert_eq!(o.downcast_ref::<Lamb>(), Some(&Lamb));
        let o = o.downcast::<Sheep>().expect_err("lamb is not a sheep struct");
        assert_eq!(o.downcast::<Lamb>().ok().map(|b| *b), Some(Lamb));
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn instance_of_supertypes() {
        let o: Box<dyn Object> = Box::new(Lamb::construct(Args::new()).expect("no args"));
        assert!(o.is_instance_of(&TypeKey::of::<Lamb>()));
        assert!(o.is_instance_of(&TypeKey::of::<Sheep>()));
        let s = Sheep {
            wool: "some".into(),
        };
        assert!(!s.is_instance_of(&TypeKey::of::<Lamb>()));
    }
}
