use crate::{impl_from, impl_from_cast, ArgsError, IndexMap, Object, Value};

impl_from! {
    bool, Value, Value::Bool;
    i64, Value, Value::Int;
    f64, Value, Value::Float;
    String, Value, Value::String;
    Box<dyn Object>, Value, Value::Object;
}

impl_from_cast! {
    i32 as i64, Value, Value::Int;
    u32 as i64, Value, Value::Int;
    usize as i64, Value, Value::Int;
    f32 as f64, Value, Value::Float;
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        match value {
            None => Value::None,
            Some(v) => v.into(),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    #[inline]
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(|v| v.into()).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> From<IndexMap<K, V>> for Value {
    #[inline]
    fn from(value: IndexMap<K, V>) -> Self {
        Value::Map(
            value
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Value {
    #[inline]
    fn from(value: [(K, V); N]) -> Self {
        Value::Map(
            value
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(a) => Value::List(a.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(o) => {
                Value::Map(o.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = ArgsError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let v = match value {
            Value::None => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => match serde_json::Number::from_f64(f) {
                None => return Err(ArgsError::Invalid(format!("{f} is not a finite number"))),
                Some(n) => serde_json::Value::Number(n),
            },
            Value::String(s) => serde_json::Value::String(s),
            Value::List(l) => serde_json::Value::Array(
                l.into_iter()
                    .map(serde_json::Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Map(m) => serde_json::Value::Object(
                m.into_iter()
                    .map(|(k, v)| serde_json::Value::try_from(v).map(|v| (k, v)))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(o) => {
                return Err(ArgsError::Invalid(format!(
                    "{o:?} is an object and cannot be read as plain data"
                )))
            }
        };
        Ok(v)
    }
}
