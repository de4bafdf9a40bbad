use crate::{ArgsError, IndexMap, Object, Value};
use log::trace;
use serde::de::DeserializeOwned;

/// Positional and keyword arguments passed to a constructor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    pub positional: Vec<Value>,
    pub keywords: IndexMap<String, Value>,
}

impl From<Vec<Value>> for Args {
    #[inline]
    fn from(value: Vec<Value>) -> Self {
        Args {
            positional: value,
            keywords: IndexMap::default(),
        }
    }
}

impl From<IndexMap<String, Value>> for Args {
    #[inline]
    fn from(value: IndexMap<String, Value>) -> Self {
        Args {
            positional: Vec::new(),
            keywords: value,
        }
    }
}

impl Args {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    #[inline]
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(name.into(), value.into());
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positional.len() + self.keywords.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }

    #[inline]
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keywords.get(name)
    }

    #[inline]
    pub fn take_keyword(&mut self, name: &str) -> Option<Value> {
        self.keywords.shift_remove(name)
    }

    /// Removes the keyword `name` and downcasts it to `T`.
    pub fn take_object<T: Object>(&mut self, name: &str) -> Result<T, ArgsError> {
        match self.take_keyword(name) {
            None => Err(ArgsError::Missing(name.to_string())),
            Some(v) => v.into_object::<T>().map_err(|v| {
                ArgsError::Invalid(format!(
                    "{name} must be a {}, got {}",
                    std::any::type_name::<T>(),
                    v.kind()
                ))
            }),
        }
    }

    pub fn expect_empty(&self) -> Result<(), ArgsError> {
        if let Some(k) = self.keywords.keys().next() {
            return Err(ArgsError::Unexpected(k.clone()));
        }
        if !self.positional.is_empty() {
            return Err(ArgsError::TooMany {
                expected: 0,
                got: self.positional.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn first(self) -> Result<Value, ArgsError> {
        let [first] = self.take()?;
        Ok(first)
    }

    /// Exactly `N` positional arguments; keywords are not accepted.
    pub fn take<const N: usize>(self) -> Result<[Value; N], ArgsError> {
        if let Some(k) = self.keywords.keys().next() {
            return Err(ArgsError::Unexpected(k.clone()));
        }
        let got = self.positional.len();
        if got > N {
            return Err(ArgsError::TooMany { expected: N, got });
        }
        match <[Value; N]>::try_from(self.positional) {
            Ok(values) => Ok(values),
            Err(_) => Err(ArgsError::Missing(format!(
                "expected {N} argument{}, got {got}",
                if N > 1 { "s" } else { "" }
            ))),
        }
    }

    /// Binds positional values to `fields` in order, merges the keywords and deserializes
    /// the result, so `#[serde(default)]` fields behave as keyword defaults.
    pub fn deserialize<T: DeserializeOwned>(self, fields: &[&str]) -> Result<T, ArgsError> {
        let got = self.positional.len();
        if got > fields.len() {
            return Err(ArgsError::TooMany {
                expected: fields.len(),
                got,
            });
        }

        let mut data = serde_json::Map::new();
        for (field, value) in fields.iter().zip(self.positional) {
            data.insert(field.to_string(), value.try_into()?);
        }
        for (name, value) in self.keywords {
            if !fields.contains(&name.as_str()) {
                return Err(ArgsError::Unexpected(name));
            }
            if data.contains_key(&name) {
                return Err(ArgsError::Duplicate(name));
            }
            data.insert(name, value.try_into()?);
        }

        trace!(
            "deserializing {} from {data:?}",
            std::any::type_name::<T>()
        );
        serde_json::from_value(serde_json::Value::Object(data))
            .map_err(|e| ArgsError::Invalid(e.to_string()))
    }
}
