//! Resolution entry point.
//!
//! [`Mocks::resolve`] is what an execution engine calls for every field. The
//! field is read off the source object first; only when that yields nothing
//! does the engine fall back to generators and synthesis.

use crate::error::MockError;
use crate::mocks::Mocks;
use crate::synthesize::{type_key, Scope};
use crate::value::{Args, FieldInfo, MockContext, MockObject, MockValue};
use mock_core::{Record, TypeDefinition, Value};
use rand::rngs::StdRng;
use tracing::{debug, trace};

/// Outcome of reading a field off its source object.
#[derive(Debug)]
enum DefaultResolution {
    /// The source supplied the field
    Value(MockValue),
    /// The source has no value; synthesize one
    Defer,
}

impl Mocks {
    /// Resolve one field of `source`.
    ///
    /// `source` may be a reference, a plain record, a resolution-time object,
    /// or null for a root operation.
    pub fn resolve(
        &mut self,
        source: &MockValue,
        args: &Args,
        info: &FieldInfo,
    ) -> Result<MockValue, MockError> {
        let source = self.source_object(source, info)?;
        let record_id = self.get_id(&source);
        let mut rng = self.rng(&info.rng_key(record_id.as_deref()));

        if let DefaultResolution::Value(value) = self.default_resolution(&source, args, info, &mut rng)? {
            return Ok(value);
        }

        if self.schema.is_root_type(&info.parent_type) {
            if let Some(value) = self.root_field(&source, args, info, &mut rng)? {
                debug!("Root generator supplied {}.{}", info.parent_type, info.field_name);
                let source = source.with(info.field_name.clone(), value);
                return self.resolve(&MockValue::Object(source), args, info);
            }
        }

        // Without an id nothing can be persisted, so remember the value itself.
        let memo = record_id.is_none().then(|| memo_key(args, info));
        if let Some(value) = memo.as_ref().and_then(|key| self.synthesized.get(key)) {
            trace!("Reusing {}.{} synthesized earlier", info.parent_type, info.field_name);
            return Ok(value.clone());
        }

        let value = match self.type_generator_field(&source, record_id.as_deref(), args, info)? {
            Some(value) => value,
            None => {
                let scope = Scope {
                    source: &source,
                    args,
                    info,
                };
                self.mock_from_type(&info.return_type, &scope, &mut rng, true)?
            }
        };

        self.persist(record_id.as_deref(), args, info, &value);
        if let Some(key) = memo {
            self.synthesized.insert(key, value.clone());
        }
        Ok(value)
    }

    /// Synthesize (or read) one field of a stored record outside any query.
    pub fn resolve_field(
        &mut self,
        type_name: &str,
        id: &str,
        field: &str,
    ) -> Result<MockValue, MockError> {
        let return_type = self.schema.get_field(type_name, field)?.field_type.clone();
        let reference = self
            .lookup_ref(type_name, id)
            .ok_or_else(|| MockError::UnresolvedReference {
                type_name: type_name.to_string(),
                id: id.to_string(),
            })?;

        let info = FieldInfo::new(reference.type_name.clone(), field, return_type);
        self.resolve(&MockValue::from(reference), &Args::new(), &info)
    }

    /// Concrete type of a resolved abstract value: a reference's type or the
    /// `__typename` hint.
    pub fn resolve_type(&self, value: &MockValue) -> Option<String> {
        match value {
            MockValue::Value(Value::Ref(reference)) => Some(reference.type_name.clone()),
            MockValue::Value(Value::Object(record)) => record
                .get("__typename")
                .and_then(Value::as_str)
                .map(str::to_string),
            MockValue::Object(object) => object.typename().map(str::to_string),
            _ => None,
        }
    }

    fn source_object(&self, source: &MockValue, info: &FieldInfo) -> Result<MockObject, MockError> {
        match source {
            MockValue::Value(Value::Ref(reference)) => self
                .get_ref(reference)
                .cloned()
                .map(MockObject::from)
                .ok_or_else(|| MockError::UnresolvedReference {
                    type_name: reference.type_name.clone(),
                    id: reference.id.clone(),
                }),
            MockValue::Value(Value::Object(record)) => Ok(MockObject::from(record.clone())),
            MockValue::Value(Value::Null) => Ok(MockObject::new()),
            MockValue::Object(object) => Ok(object.clone()),
            other => Err(MockError::InvalidGeneratorOutput {
                type_name: info.parent_type.clone(),
                reason: format!("cannot resolve fields on {other:?}"),
            }),
        }
    }

    /// Read the field off its source, calling it when it is a resolver.
    fn default_resolution(
        &mut self,
        source: &MockObject,
        args: &Args,
        info: &FieldInfo,
        rng: &mut StdRng,
    ) -> Result<DefaultResolution, MockError> {
        let resolver = match source.get(&info.field_name) {
            None => return Ok(DefaultResolution::Defer),
            Some(MockValue::Resolver(resolver)) => resolver.clone(),
            Some(MockValue::Value(value)) if self.is_interface_field(info) => {
                let target = info.return_type.named_type();
                return Ok(DefaultResolution::Value(self.relink(target, value).into()));
            }
            Some(value) => return Ok(DefaultResolution::Value(value.clone())),
        };

        let mut ctx = MockContext {
            mocks: self,
            source,
            args,
            info,
            rng,
        };
        match resolver.call(&mut ctx)? {
            MockValue::Resolver(_) => Err(MockError::InvalidGeneratorOutput {
                type_name: info.parent_type.clone(),
                reason: format!("field \"{}\" resolved to another resolver", info.field_name),
            }),
            value => Ok(DefaultResolution::Value(value)),
        }
    }

    /// Value the root type's generator supplies for this field, if any.
    fn root_field(
        &mut self,
        source: &MockObject,
        args: &Args,
        info: &FieldInfo,
        rng: &mut StdRng,
    ) -> Result<Option<MockValue>, MockError> {
        let Some(generator) = self.generators.get(&info.parent_type).cloned() else {
            return Ok(None);
        };

        let scope = Scope { source, args, info };
        let mut output = self.call_type_generator(&info.parent_type, &generator, &scope, rng)?;
        Ok(output.remove(&info.field_name))
    }

    /// Value the parent type's generator supplies for this field, if any.
    ///
    /// The generator runs with the type-level seed; a deferred field it
    /// returns runs with the field-level seed.
    fn type_generator_field(
        &mut self,
        source: &MockObject,
        record_id: Option<&str>,
        args: &Args,
        info: &FieldInfo,
    ) -> Result<Option<MockValue>, MockError> {
        let type_name = info.parent_type.as_str();
        if self.schema.is_root_type(type_name) {
            return Ok(None);
        }
        let Some(generator) = self.generators.get(type_name).cloned() else {
            return Ok(None);
        };

        let scope = Scope { source, args, info };
        let mut type_rng = self.rng(&type_key(type_name, record_id));
        let mut output = self.call_type_generator(type_name, &generator, &scope, &mut type_rng)?;

        let Some(value) = output.remove(&info.field_name) else {
            return Ok(None);
        };
        let MockValue::Resolver(resolver) = value else {
            return Ok(Some(value));
        };

        let mut field_rng = self.rng(&info.rng_key(record_id));
        let mut ctx = MockContext {
            mocks: self,
            source,
            args,
            info,
            rng: &mut field_rng,
        };
        resolver.call(&mut ctx).map(Some)
    }

    /// Write a synthesized plain value back onto its stored record so later
    /// reads see the same value.
    fn persist(&mut self, record_id: Option<&str>, args: &Args, info: &FieldInfo, value: &MockValue) {
        let Some(id) = record_id else {
            return;
        };
        if !args.is_empty() || info.field_name == self.options.id_field {
            return;
        }
        if !self.store.contains(&info.parent_type, id) || self.is_relationship(info) {
            return;
        }
        let Some(plain) = value.to_plain() else {
            return;
        };
        if plain.is_null() || contains_object(&plain) {
            return;
        }

        trace!("Persisting {}.{} on {id}", info.parent_type, info.field_name);
        self.store.put(
            &info.parent_type,
            id,
            Record::new().with(info.field_name.clone(), plain),
            false,
        );
    }

    /// Look up keys stored on an interface-typed field before any
    /// implementor held them. Keys that still match nothing read as null.
    fn relink(&self, target: &str, value: &Value) -> Value {
        match value {
            Value::String(key) => self
                .lookup_ref(target, key)
                .map(Value::Ref)
                .unwrap_or(Value::Null),
            Value::List(items) => Value::List(items.iter().map(|item| self.relink(target, item)).collect()),
            other => other.clone(),
        }
    }

    fn is_interface_field(&self, info: &FieldInfo) -> bool {
        matches!(
                self.schema.get_type(info.return_type.named_type()),
                Ok(TypeDefinition::Interface { .. })
            )
    }

    fn is_relationship(&self, info: &FieldInfo) -> bool {
        let named = info.return_type.named_type();
        self.related_key(named, &info.parent_type).is_some() || self.schema.is_connection_type(named)
    }
}

fn memo_key(args: &Args, info: &FieldInfo) -> String {
    format!("{}{args:?}", info.rng_key(None))
}

fn contains_object(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::List(items) => items.iter().any(contains_object),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base;
    use crate::resolvers::{related, RelatedOptions};
    use crate::value::Resolver;
    use mock_core::{Reference, SchemaDefinition};

    const SCHEMA: &str = r#"
query: Query
types:
  - kind: object
    name: Query
    fields:
      - name: hero
        type: Person
      - name: greeting
        type: String
  - kind: object
    name: Person
    fields:
      - name: id
        type: ID!
      - name: name
        type: String
      - name: height
        type: Int
      - name: friends
        type: "[Person]"
      - name: ships
        type: "[Ship]"
  - kind: object
    name: Ship
    fields:
      - name: id
        type: ID!
      - name: pilot
        type: Person
"#;

    fn mocks() -> Mocks {
        Mocks::new(SchemaDefinition::from_yaml(SCHEMA).unwrap())
    }

    fn person_field(field: &str, ty: &str) -> FieldInfo {
        FieldInfo::new("Person", field, ty.parse().unwrap())
    }

    #[test]
    fn test_default_resolution_wins() {
        let mut mocks = mocks();
        let luke = mocks
            .add_example("Person", Record::new().with("id", "p1").with("name", "Luke"))
            .unwrap();

        let value = mocks
            .resolve(&MockValue::from(luke), &Args::new(), &person_field("name", "String"))
            .unwrap();
        assert_eq!(value.to_plain(), Some(Value::from("Luke")));
    }

    #[test]
    fn test_synthesized_value_is_stable_and_persisted() {
        let mut mocks = mocks();
        let luke = mocks.add_example("Person", Record::new().with("id", "p1")).unwrap();
        let info = person_field("height", "Int");

        let first = mocks.resolve(&MockValue::from(luke.clone()), &Args::new(), &info).unwrap();
        let second = mocks.resolve(&MockValue::from(luke), &Args::new(), &info).unwrap();

        assert_eq!(first.to_plain(), second.to_plain());
        assert_eq!(
            mocks.get("Person", "p1").unwrap().get("height"),
            first.to_plain().as_ref()
        );
    }

    #[test]
    fn test_resolver_fields_are_called() {
        let mut mocks = mocks();
        let source = MockObject::new()
            .with("id", "p9")
            .with("name", Resolver::new(|ctx| Ok(MockValue::from(ctx.info.field_name.to_uppercase()))));

        let value = mocks
            .resolve(&MockValue::Object(source), &Args::new(), &person_field("name", "String"))
            .unwrap();
        assert_eq!(value.to_plain(), Some(Value::from("NAME")));
    }

    #[test]
    fn test_type_generator_supplies_missing_fields() {
        let mut mocks = mocks();
        mocks
            .mock(
                "Person",
                Resolver::constant(
                    MockObject::new()
                        .with("name", "Generated")
                        .with("height", base::int()),
                ),
            )
            .unwrap();
        let leia = mocks
            .add_example("Person", Record::new().with("id", "p2").with("name", "Leia"))
            .unwrap();

        let name = mocks
            .resolve(&MockValue::from(leia.clone()), &Args::new(), &person_field("name", "String"))
            .unwrap();
        assert_eq!(name.to_plain(), Some(Value::from("Leia")));

        let height = mocks
            .resolve(&MockValue::from(leia), &Args::new(), &person_field("height", "Int"))
            .unwrap();
        assert!(height.to_plain().and_then(|v| v.as_i64()).is_some());
    }

    #[test]
    fn test_root_generator() {
        let mut mocks = mocks();
        mocks
            .mock(
                "Query",
                Resolver::constant(MockObject::new().with("greeting", "hello there")),
            )
            .unwrap();

        let info = FieldInfo::new("Query", "greeting", "String".parse().unwrap());
        let value = mocks.resolve(&MockValue::null(), &Args::new(), &info).unwrap();
        assert_eq!(value.to_plain(), Some(Value::from("hello there")));
    }

    #[test]
    fn test_back_reference_round_trip() {
        let mut mocks = mocks();
        mocks.add_example("Person", Record::new().with("id", "p1")).unwrap();
        mocks
            .add_example("Ship", Record::new().with("id", "s1").with("pilot", "p1"))
            .unwrap();
        mocks.add_example("Ship", Record::new().with("id", "s2")).unwrap();

        let value = mocks.resolve_field("Person", "p1", "ships").unwrap();
        let ids: Vec<String> = value
            .into_items()
            .unwrap()
            .iter()
            .map(|v| v.as_reference().unwrap().id.clone())
            .collect();
        assert_eq!(ids, vec!["s1"]);

        // relationship lists are not copied onto the record
        assert!(mocks.get("Person", "p1").unwrap().get("ships").is_none());
    }

    #[test]
    fn test_related_resolver_in_generator() {
        let mut mocks = mocks();
        mocks
            .mock(
                "Person",
                Resolver::constant(
                    MockObject::new().with("ships", related(RelatedOptions::new("pilot"))),
                ),
            )
            .unwrap();
        mocks
            .add_example("Ship", Record::new().with("id", "s1").with("pilot", "p1"))
            .unwrap();

        let value = mocks.resolve_field("Person", "p1", "ships").unwrap();
        assert_eq!(value.into_items().map(|items| items.len()), Some(1));
    }

    #[test]
    fn test_id_less_source_reuses_synthesized_value() {
        let mut mocks = mocks();
        let info = FieldInfo::new("Query", "hero", "Person".parse().unwrap());

        let first = mocks.resolve(&MockValue::null(), &Args::new(), &info).unwrap();
        for id in ["p1", "p2", "p3"] {
            mocks.add_example("Person", Record::new().with("id", id)).unwrap();
        }
        let second = mocks.resolve(&MockValue::null(), &Args::new(), &info).unwrap();

        assert!(matches!(first, MockValue::Object(ref object) if object.is_empty()));
        assert!(matches!(second, MockValue::Object(ref object) if object.is_empty()));
        assert!(mocks.synthesized.contains_key(&memo_key(&Args::new(), &info)));
    }

    #[test]
    fn test_interface_key_resolves_once_implementor_exists() {
        let mut mocks = Mocks::new(
            SchemaDefinition::from_yaml(
                r#"
query: Query
types:
  - kind: object
    name: Query
    fields:
      - name: ship
        type: Ship
  - kind: interface
    name: Pilot
    fields:
      - name: id
        type: ID!
  - kind: object
    name: Droid
    interfaces: [Pilot]
    fields:
      - name: id
        type: ID!
  - kind: object
    name: Ship
    fields:
      - name: id
        type: ID!
      - name: pilot
        type: Pilot
"#,
            )
            .unwrap(),
        );
        mocks
            .add_example("Ship", Record::new().with("id", "s1").with("pilot", "d1"))
            .unwrap();
        let info = FieldInfo::new("Ship", "pilot", "Pilot".parse().unwrap());
        let ship = MockValue::from(Reference::new("Ship", "s1"));

        assert!(mocks.resolve(&ship, &Args::new(), &info).unwrap().is_null());

        mocks.add_example("Droid", Record::new().with("id", "d1")).unwrap();
        let pilot = mocks.resolve(&ship, &Args::new(), &info).unwrap();
        assert_eq!(pilot.as_reference(), Some(&Reference::new("Droid", "d1")));
        assert_eq!(mocks.related_key("Ship", "Droid"), Some("pilot"));
    }

    #[test]
    fn test_unresolved_reference() {
        let mut mocks = mocks();
        let result = mocks.resolve(
            &MockValue::from(Reference::new("Person", "ghost")),
            &Args::new(),
            &person_field("name", "String"),
        );
        assert!(matches!(result, Err(MockError::UnresolvedReference { .. })));
    }

    #[test]
    fn test_resolve_type() {
        let mocks = mocks();
        assert_eq!(
            mocks.resolve_type(&MockValue::from(Reference::new("Ship", "s1"))),
            Some("Ship".to_string())
        );
        assert_eq!(
            mocks.resolve_type(&MockValue::Object(MockObject::new().with("__typename", "Person"))),
            Some("Person".to_string())
        );
        assert_eq!(mocks.resolve_type(&MockValue::from("Person")), None);
    }
}
