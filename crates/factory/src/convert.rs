use crate::{AllowedTypes, CreateOptions, Factory, FactoryError};
use fabrik_core::{Args, IndexMap, Value};

/// Turns configuration values into objects through a [`Factory`].
///
/// Each step is a hook: override `type_key` to read another entry, `directive` to change which
/// values describe an object, or `arguments` to preprocess the remaining entries.
pub trait Converter {
    /// Map entry holding the type identifier.
    fn type_key(&self) -> &str {
        "type"
    }

    /// The map describing an object, or the value handed back untouched.
    fn directive(&self, value: Value) -> Result<IndexMap<String, Value>, Value> {
        match value {
            Value::Map(map) => Ok(map),
            value => Err(value),
        }
    }

    /// Splits the type identifier from the constructor keywords.
    fn extract(
        &self,
        mut map: IndexMap<String, Value>,
    ) -> Result<(String, IndexMap<String, Value>), FactoryError> {
        let key = self.type_key();
        match map.shift_remove(key) {
            Some(Value::String(id)) => Ok((id, map)),
            Some(v) => Err(FactoryError::Configuration(format!(
                "'{key}' must be a type identifier, got {}",
                v.kind()
            ))),
            None => Err(FactoryError::Configuration(format!(
                "cannot convert {} to an object: missing '{key}' entry",
                Value::Map(map)
            ))),
        }
    }

    fn arguments(
        &self,
        _factory: &mut Factory,
        kwargs: IndexMap<String, Value>,
    ) -> Result<Args, FactoryError> {
        Ok(Args::from(kwargs))
    }

    fn convert(
        &self,
        factory: &mut Factory,
        value: Value,
        allowed_types: Option<&AllowedTypes>,
    ) -> Result<Value, FactoryError> {
        let map = match self.directive(value) {
            Ok(map) => map,
            Err(value) => return passthrough(value, allowed_types),
        };
        let (id, kwargs) = self.extract(map)?;
        let constructor = factory
            .entry(&id)
            .ok_or_else(|| FactoryError::unregistered(&id))?
            .dict_constructor()
            .map(str::to_string);
        let args = self.arguments(factory, kwargs)?;
        let options = CreateOptions {
            allowed_types: allowed_types.cloned(),
            constructor,
        };
        factory.create_with(&id, args, &options).map(Value::Object)
    }
}

/// Values that are not maps go through unchanged, unless they must be an allowed object.
fn passthrough(value: Value, allowed_types: Option<&AllowedTypes>) -> Result<Value, FactoryError> {
    let Some(allowed) = allowed_types else {
        return Ok(value);
    };
    let permitted = matches!(&value, Value::Object(o) if allowed.permits(o.as_ref()));
    if permitted {
        return Ok(value);
    }
    let kind = match &value {
        Value::Object(o) => o.type_key().short_name().to_string(),
        v => v.kind().to_string(),
    };
    Err(FactoryError::Type(format!("{kind} is not an instance of {allowed}")))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultConverter;

impl Converter for DefaultConverter {}

/// Also converts keyword values that are themselves object maps, at any depth.
#[derive(Clone, Copy, Debug, Default)]
pub struct NestedConverter;

impl NestedConverter {
    fn convert_nested(&self, factory: &mut Factory, value: Value) -> Result<Value, FactoryError> {
        match value {
            Value::List(values) => values
                .into_iter()
                .map(|v| self.convert_nested(factory, v))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Value::Map(map) if map.contains_key(self.type_key()) => {
                self.convert(factory, Value::Map(map), None)
            }
            Value::Map(map) => map
                .into_iter()
                .map(|(k, v)| self.convert_nested(factory, v).map(|v| (k, v)))
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(Value::Map),
            value => Ok(value),
        }
    }
}

impl Converter for NestedConverter {
    fn arguments(
        &self,
        factory: &mut Factory,
        kwargs: IndexMap<String, Value>,
    ) -> Result<Args, FactoryError> {
        kwargs
            .into_iter()
            .map(|(k, v)| self.convert_nested(factory, v).map(|v| (k, v)))
            .collect::<Result<IndexMap<_, _>, _>>()
            .map(Args::from)
    }
}

#[cfg(test)]
mod tests {
    use crate::{AllowedTypes, Converter, Factory, FactoryError, NestedConverter, Registration};
    use fabrik_core::{Args, BoxError, Class, IndexMap, Object, TypeKey, Value};
    use pretty_assertions::assert_eq;
    use wasm_bindgen_test::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Pen {
        animals: Vec<Value>,
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Goat {
        name: String,
    }

    impl Object for Pen {
        fn type_key(&self) -> TypeKey {
            TypeKey::of::<Self>()
        }
    }

    impl Class for Pen {
        const TYPE_ID: Option<&'static str> = Some("pen");

        fn construct(mut args: Args) -> Result<Self, BoxError> {
            let animals = match args.take_keyword("animals") {
                Some(Value::List(animals)) => animals,
                None => Vec::new(),
                Some(v) => return Err(format!("animals must be a List, got {v}").into()),
            };
            args.expect_empty()?;
            Ok(Pen { animals })
        }
    }

    impl Object for Goat {
        fn type_key(&self) -> TypeKey {
            TypeKey::of::<Self>()
        }
    }

    impl Class for Goat {
        const TYPE_ID: Option<&'static str> = Some("goat");

        fn construct(mut args: Args) -> Result<Self, BoxError> {
            let name = match args.take_keyword("name") {
                Some(Value::String(name)) => name,
                _ => "billy".to_string(),
            };
            args.expect_empty()?;
            Ok(Goat { name })
        }

        fn constructors() -> Vec<(&'static str, fabrik_core::ConstructorFn<Self>)> {
            vec![("kid", |_| Ok(Goat { name: "kid".into() }))]
        }
    }

    struct ClassConverter;

    impl Converter for ClassConverter {
        fn type_key(&self) -> &str {
            "class"
        }
    }

    fn factory() -> Factory {
        let mut factory = Factory::new();
        factory.register_type::<Pen>().expect("pen");
        factory.register_type::<Goat>().expect("goat");
        factory
    }

    fn map(entries: impl IntoIterator<Item = (&'static str, Value)>) -> Value {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<IndexMap<_, _>>(),
        )
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn convert_map() {
        let mut factory = factory();
        let v = factory
            .convert(map([("type", "goat".into()), ("name", "Gruff".into())]), None)
            .expect("goat");
        assert_eq!(
            v.downcast_ref::<Goat>(),
            Some(&Goat {
                name: "Gruff".into()
            })
        );
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn convert_requires_type_entry() {
        let mut factory = factory();
        let r = factory.convert(map([("name", "Gruff".into())]), None);
        assert!(matches!(r, Err(FactoryError::Configuration(_))), "{r:?}");
        let r = factory.convert(map([("type", 3.into())]), None);
        assert!(matches!(r, Err(FactoryError::Configuration(_))), "{r:?}");
        let r = factory.convert(map([("type", "cow".into())]), None);
        assert!(matches!(r, Err(FactoryError::Lookup(_))), "{r:?}");
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn convert_uses_dict_constructor() {
        let mut factory = Factory::new();
        factory
            .register(Registration::of::<Goat>().dict_constructor("kid"))
            .expect("kid exists");
        let v = factory
            .convert(map([("type", "goat".into())]), None)
            .expect("goat");
        assert_eq!(
            v.downcast_ref::<Goat>(),
            Some(&Goat { name: "kid".into() })
        );
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn convert_allowed_types() {
        let mut factory = factory();
        let allowed = AllowedTypes::of::<Goat>();
        let r = factory.convert(map([("type", "pen".into())]), Some(&allowed));
        assert!(matches!(r, Err(FactoryError::Type(_))), "{r:?}");

        let goat = Value::object(Goat {
            name: "Gruff".into(),
        });
        assert_eq!(
            factory.convert(goat.clone(), Some(&allowed)).expect("a goat"),
            goat
        );
        let r = factory.convert(Value::from(1), Some(&allowed));
        assert!(matches!(r, Err(FactoryError::Type(_))), "{r:?}");
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn custom_type_key() {
        let mut factory = factory();
        let v = factory
            .convert_with(&ClassConverter, map([("class", "goat".into())]), None)
            .expect("goat");
        assert!(v.downcast_ref::<Goat>().is_some());
        let r = factory.convert_with(&ClassConverter, map([("type", "goat".into())]), None);
        assert!(matches!(r, Err(FactoryError::Configuration(_))), "{r:?}");
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn nested_conversion() {
        let mut factory = factory();
        let animals = Value::List(vec![
            map([("type", "goat".into())]),
            map([("name", "not an object".into())]),
            1.into(),
        ]);
        let config = map([("type", "pen".into()), ("animals", animals)]);

        let r = factory.convert(config.clone(), None).expect("plain maps pass");
        let pen = r.downcast_ref::<Pen>().expect("pen");
        assert!(pen.animals[0].is_map());

        let r = factory
            .convert_with(&NestedConverter, config, None)
            .expect("nested goat");
        let pen = r.downcast_ref::<Pen>().expect("pen");
        assert_eq!(
            pen.animals,
            vec![
                Value::object(Goat {
                    name: "billy".into()
                }),
                map([("name", "not an object".into())]),
                Value::from(1),
            ]
        );
    }
}
