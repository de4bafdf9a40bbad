//! Register types under string identifiers, then build instances from arguments or from
//! configuration documents naming those identifiers.
//!
//! ```ignore
//! use fabrik::{Args, Factory, Object};
//!
//! #[derive(Clone, Debug, PartialEq, serde::Deserialize, Object)]
//! #[object(id = "sheep")]
//! struct Sheep {
//!     wool: String,
//! }
//!
//! let mut factory = Factory::new();
//! factory.register_type::<Sheep>()?;
//! let sheep = factory.create("sheep", Args::new().kwarg("wool", "lots"))?;
//! ```

pub mod global;

pub use fabrik_core::*;
pub use fabrik_derive::Object;
pub use fabrik_factory::*;
