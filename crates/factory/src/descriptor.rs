use crate::{LazyType, TypeHandle};
use fabrik_core::Class;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// A registered type: either at hand, or a path still to be loaded.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeDescriptor {
    Direct(Arc<TypeHandle>),
    Deferred(LazyType),
}

impl From<TypeHandle> for TypeDescriptor {
    #[inline]
    fn from(value: TypeHandle) -> Self {
        TypeDescriptor::Direct(Arc::new(value))
    }
}

impl From<Arc<TypeHandle>> for TypeDescriptor {
    #[inline]
    fn from(value: Arc<TypeHandle>) -> Self {
        TypeDescriptor::Direct(value)
    }
}

impl From<LazyType> for TypeDescriptor {
    #[inline]
    fn from(value: LazyType) -> Self {
        TypeDescriptor::Deferred(value)
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeDescriptor::Direct(h) => write!(f, "{}", h.fullname()),
            TypeDescriptor::Deferred(l) => write!(f, "{l} (deferred)"),
        }
    }
}

impl TypeDescriptor {
    #[inline]
    pub fn of<T: Class>() -> Self {
        TypeHandle::of::<T>().into()
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        matches!(self, TypeDescriptor::Direct(_))
    }

    #[inline]
    pub fn handle(&self) -> Option<&Arc<TypeHandle>> {
        match self {
            TypeDescriptor::Direct(h) => Some(h),
            TypeDescriptor::Deferred(_) => None,
        }
    }

    /// Deferred types expose no identifier until they are loaded.
    #[inline]
    pub fn identifier(&self) -> Option<&str> {
        self.handle().and_then(|h| h.identifier())
    }

    pub fn fullname(&self) -> String {
        match self {
            TypeDescriptor::Direct(h) => h.fullname().to_string(),
            TypeDescriptor::Deferred(l) => l.fullname(),
        }
    }
}
