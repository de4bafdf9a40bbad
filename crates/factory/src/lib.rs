mod convert;
mod descriptor;
mod error;
mod factory;
mod handle;
mod lazy;
mod module;
mod registration;

pub use convert::{Converter, DefaultConverter, NestedConverter};
pub use descriptor::TypeDescriptor;
pub use error::FactoryError;
pub use factory::{AllowedTypes, CreateOptions, Factory, RegistryEntry};
pub use handle::{Constructor, TypeHandle};
pub use lazy::LazyType;
pub use module::{Module, Modules};
pub use registration::Registration;
