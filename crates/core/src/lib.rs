mod args;
mod error;
mod macros;
mod traits;
mod types;
mod value;

pub type IndexMap<K, V> = indexmap::map::IndexMap<K, V, FxBuildHasher>;
pub type IndexSet<V> = indexmap::set::IndexSet<V, FxBuildHasher>;

/// Error type returned by constructors, kept opaque so the factory can hand it back untouched.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub use args::Args;
pub use error::ArgsError;
use fxhash::FxBuildHasher;
pub use traits::*;
pub use types::TypeKey;
pub use value::*;
