use fabrik_core::BoxError;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum FactoryError {
    /// The request itself is malformed: missing identifier, type key or constructor.
    Configuration(String),
    /// Registering would replace an identifier without permission.
    KeyCollision(String),
    /// No entry for the identifier.
    Lookup(String),
    /// A lazy type could not be loaded.
    Resolution(String),
    /// The built object is outside the allowed types.
    Type(String),
    /// The constructor failed; the error is its own.
    Construction(BoxError),
}

impl Error for FactoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FactoryError::Construction(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl Display for FactoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FactoryError::Configuration(m) => write!(f, "Configuration Error: {m}"),
            FactoryError::KeyCollision(m) => write!(f, "Key Collision: {m}"),
            FactoryError::Lookup(m) => write!(f, "Lookup Error: {m}"),
            FactoryError::Resolution(m) => write!(f, "Resolution Error: {m}"),
            FactoryError::Type(m) => write!(f, "Type Error: {m}"),
            FactoryError::Construction(e) => write!(f, "{e}"),
        }
    }
}

impl FactoryError {
    pub fn unregistered(id: &str) -> Self {
        FactoryError::Lookup(format!("no type registered as '{id}'"))
    }

    pub fn collision(key: &str, existing: &str) -> Self {
        FactoryError::KeyCollision(format!("'{key}' is already used to reference '{existing}'"))
    }

    /// The constructor's own error, if this is a construction failure.
    pub fn into_construction(self) -> Result<BoxError, Self> {
        match self {
            FactoryError::Construction(e) => Ok(e),
            e => Err(e),
        }
    }
}
