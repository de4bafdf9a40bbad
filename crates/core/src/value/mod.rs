pub mod from;

use crate::{IndexMap, Object};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub use from::*;

/// Dynamic data handed to factories: configuration documents, constructor arguments and
/// the objects built from them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    #[serde(skip)]
    Object(Box<dyn Object>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(left), Value::Bool(right)) => left == right,
            (Value::Int(left), Value::Int(right)) => left == right,
            (Value::Float(left), Value::Float(right)) => left == right,
            (Value::Int(left), Value::Float(right)) | (Value::Float(right), Value::Int(left)) => {
                *left as f64 == *right
            }
            (Value::String(left), Value::String(right)) => left == right,
            (Value::List(left), Value::List(right)) => left == right,
            (Value::Map(left), Value::Map(right)) => left == right,
            (Value::Object(left), Value::Object(right)) => left == right,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s}"),
            Value::List(l) => write!(f, "[{}]", l.iter().join(",")),
            Value::Map(m) => write!(
                f,
                "{{{}}}",
                m.iter().map(|(k, v)| format!("{k} = {v}")).join(",")
            ),
            Value::Object(o) => write!(f, "{o:?}"),
        }
    }
}

impl Value {
    #[inline]
    pub fn object(value: impl Object + 'static) -> Self {
        Value::Object(Box::new(value))
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::None => "None",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Object(_) => "Object",
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    #[inline]
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&dyn Object> {
        match self {
            Value::Object(o) => Some(o.as_ref()),
            _ => None,
        }
    }

    /// Borrows the held object as a `T`, `None` for any other value.
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_object().and_then(|o| o.downcast_ref::<T>())
    }

    /// Takes the held object out as a `T`, handing the value back unchanged on mismatch.
    pub fn into_object<T: Object>(self) -> Result<T, Value> {
        match self {
            Value::Object(o) => o.downcast::<T>().map(|t| *t).map_err(Value::Object),
            v => Err(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{IndexMap, Object, TypeKey, Value};
    use pretty_assertions::assert_eq;
    use wasm_bindgen_test::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Sheep(String);

    impl Object for Sheep {
        fn type_key(&self) -> TypeKey {
            TypeKey::of::<Self>()
        }
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn deserialize_keeps_map_order() {
        let v: Value = serde_json::from_str(
            r#"{"type": "sheep", "wool": "lots", "age": 3, "tags": [1.5, null, true]}"#,
        )
        .expect("valid json");
        let Value::Map(m) = v else {
            panic!("expected a map");
        };
        assert_eq!(
            m.keys().cloned().collect::<Vec<_>>(),
            vec!["type", "wool", "age", "tags"]
        );
        assert_eq!(m["age"], Value::Int(3));
        assert_eq!(
            m["tags"],
            Value::List(vec![Value::Float(1.5), Value::None, Value::Bool(true)])
        );
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn serialize_round_trips_data() {
        let mut m = IndexMap::default();
        m.insert("wool".to_string(), Value::from("lots"));
        m.insert("age".to_string(), Value::from(3));
        let s = serde_json::to_string(&Value::Map(m)).expect("serializable");
        assert_eq!(s, r#"{"wool":"lots","age":3}"#);
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn objects_are_not_serialized() {
        assert!(serde_json::to_string(&Value::object(Sheep("a".into()))).is_err());
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn object_equality_and_extraction() {
        let v = Value::object(Sheep("lots".into()));
        assert_eq!(v, Value::object(Sheep("lots".into())));
        assert_ne!(v, Value::object(Sheep("some".into())));
        assert_eq!(v.downcast_ref::<Sheep>(), Some(&Sheep("lots".into())));
        assert_eq!(v.into_object::<Sheep>(), Ok(Sheep("lots".into())));
        assert_eq!(Value::from(1).into_object::<Sheep>(), Err(Value::Int(1)));
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn display() {
        let v = Value::List(vec![1.into(), "a".into(), Value::None]);
        assert_eq!(v.to_string(), "[1,a,none]");
    }
}
