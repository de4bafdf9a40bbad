use crate::FactoryError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Reference to a type by module path and attribute name, loaded on first use.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LazyType {
    module: String,
    attr: String,
}

impl LazyType {
    pub fn new(module: impl Into<String>, attr: impl Into<String>) -> Result<Self, FactoryError> {
        let module = module.into();
        let attr = attr.into();
        for (field, value) in [("module", &module), ("attr", &attr)] {
            if value.is_empty() {
                return Err(FactoryError::Configuration(format!(
                    "lazy type {field} must be non-empty"
                )));
            }
        }
        Ok(LazyType { module, attr })
    }

    #[inline]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[inline]
    pub fn attr(&self) -> &str {
        &self.attr
    }

    #[inline]
    pub fn fullname(&self) -> String {
        format!("{}.{}", self.module, self.attr)
    }
}

impl FromStr for LazyType {
    type Err = FactoryError;

    /// Splits `pkg.mod.Type` on its last dot; relative paths are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once('.') {
            Some((module, attr)) if !s.starts_with('.') => LazyType::new(module, attr),
            _ => Err(FactoryError::Configuration(format!(
                "'{s}' seems to specify a relative path, please use a fully qualified name"
            ))),
        }
    }
}

impl Display for LazyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.module, self.attr)
    }
}
