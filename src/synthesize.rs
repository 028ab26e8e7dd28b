//! Type-driven value synthesis.
//!
//! [`Mocks::mock_from_type`] fabricates a value for a declared field type,
//! dispatching on the type's shape in a fixed order: list, connection, scalar,
//! abstract, enum, object. Relationship-aware cases are answered from the
//! store through the inferred foreign keys; everything else is sampled or
//! freshly generated with the seeded generator handed in by the caller.

use crate::error::MockError;
use crate::mocks::{value_key, Mocks};
use crate::relay::generate_connection_from_array;
use crate::resolvers::{related_refs, RelatedOptions};
use crate::value::{Args, FieldInfo, MockContext, MockObject, MockValue, Resolver};
use mock_core::{is_meta_field, Reference, TypeDefinition, TypeRef, Value};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

/// The field a value is being synthesized for.
pub(crate) struct Scope<'a> {
    pub source: &'a MockObject,
    pub args: &'a Args,
    pub info: &'a FieldInfo,
}

/// Seeded-generator key for a type-level generator call.
pub(crate) fn type_key(type_name: &str, record_id: Option<&str>) -> String {
    match record_id {
        Some(id) => format!("{type_name}:{id}"),
        None => type_name.to_string(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Mocks {
    /// Invoke a generator for the field in `scope`.
    pub(crate) fn call_generator(
        &mut self,
        generator: &Resolver,
        scope: &Scope<'_>,
        rng: &mut StdRng,
    ) -> Result<MockValue, MockError> {
        let mut ctx = MockContext {
            mocks: self,
            source: scope.source,
            args: scope.args,
            info: scope.info,
            rng,
        };
        generator.call(&mut ctx)
    }

    /// Invoke an object type's generator and check what it returned.
    pub(crate) fn call_type_generator(
        &mut self,
        type_name: &str,
        generator: &Resolver,
        scope: &Scope<'_>,
        rng: &mut StdRng,
    ) -> Result<MockObject, MockError> {
        let object = match self.call_generator(generator, scope, rng)? {
            MockValue::Object(object) => object,
            MockValue::Value(Value::Object(record)) => record.into(),
            MockValue::Value(Value::Null) => MockObject::new(),
            other => {
                return Err(MockError::InvalidGeneratorOutput {
                    type_name: type_name.to_string(),
                    reason: format!("expected an object, got {other:?}"),
                })
            }
        };
        self.check_generator_fields(type_name, &object)?;
        Ok(object)
    }

    fn check_generator_fields(&self, type_name: &str, object: &MockObject) -> Result<(), MockError> {
        let invalid = object
            .keys()
            .find(|key| {
                *key != "__typename"
                    && !is_meta_field(key)
                    && !self.schema.is_field(type_name, key)
            });

        match invalid {
            Some(field) => Err(MockError::InvalidGeneratorField {
                type_name: type_name.to_string(),
                field: field.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Turn a synthesized value into an object, dereferencing references.
    ///
    /// Scalars, lists and null have no object form.
    pub(crate) fn materialize(&self, value: MockValue) -> Result<Option<MockObject>, MockError> {
        match value {
            MockValue::Object(object) => Ok(Some(object)),
            MockValue::Value(Value::Object(record)) => Ok(Some(record.into())),
            MockValue::Value(Value::Ref(reference)) => {
                let record = self.get_ref(&reference).cloned().ok_or_else(|| {
                    MockError::UnresolvedReference {
                        type_name: reference.type_name.clone(),
                        id: reference.id.clone(),
                    }
                })?;
                Ok(Some(
                    MockObject::from(record).with("__typename", reference.type_name),
                ))
            }
            _ => Ok(None),
        }
    }

    /// Synthesize a value of `field_type` for the field in `scope`.
    ///
    /// `sample` allows object types to be answered with an existing record;
    /// without it a fresh stub is created.
    pub(crate) fn mock_from_type(
        &mut self,
        field_type: &TypeRef,
        scope: &Scope<'_>,
        rng: &mut StdRng,
        sample: bool,
    ) -> Result<MockValue, MockError> {
        let field_type = field_type.nullable();
        let parent = scope.info.parent_type.as_str();

        if let Some(item_type) = field_type.list_item() {
            let item_name = item_type.named_type();
            if let Some(fk) = self.related_key(item_name, parent).map(str::to_string) {
                debug!("{parent}.{} is a list of related {item_name} via {fk}", scope.info.field_name);
                let refs = related_refs(self, scope, &RelatedOptions::new(fk), "related()", item_name)?;
                return Ok(MockValue::List(refs.into_iter().map(MockValue::from).collect()));
            }
            return self.generate_list(item_type, scope, rng);
        }

        let type_name = field_type.named_type();
        let definition = self.schema.get_type(type_name)?.clone();

        if self.schema.is_connection_type(type_name) {
            let node_type = self.schema.connection_node_type(type_name)?.to_string();
            let nodes = match self.related_key(&node_type, parent).map(str::to_string) {
                Some(fk) => {
                    debug!("{parent}.{} is a connection of related {node_type} via {fk}", scope.info.field_name);
                    related_refs(self, scope, &RelatedOptions::new(fk), "connection()", &node_type)?
                        .into_iter()
                        .map(MockValue::from)
                        .collect()
                }
                None => self
                    .generate_list(&TypeRef::named(node_type), scope, rng)?
                    .into_items()
                    .unwrap_or_default(),
            };
            return generate_connection_from_array(nodes, scope.args, &definition);
        }

        match &definition {
            TypeDefinition::Scalar { name } => {
                let generator = self
                    .generators
                    .get(name)
                    .cloned()
                    .ok_or_else(|| MockError::MissingGenerator(name.clone()))?;
                self.call_generator(&generator, scope, rng)
            }
            TypeDefinition::Interface { name, .. } | TypeDefinition::Union { name, .. } => {
                self.mock_abstract(name, scope, rng, sample)
            }
            TypeDefinition::Enum { name, values } => {
                if let Some(generator) = self.generators.get(name).cloned() {
                    return self.call_generator(&generator, scope, rng);
                }
                Ok(values
                    .choose(rng)
                    .map(|v| MockValue::from(v.as_str()))
                    .unwrap_or_else(MockValue::null))
            }
            TypeDefinition::Object { name, .. } => self.mock_object(name, scope, rng, sample),
        }
    }

    /// Fixed-length list drawn from existing records without repetition,
    /// topped up with fresh synthesis once the pool runs dry.
    fn generate_list(
        &mut self,
        item_type: &TypeRef,
        scope: &Scope<'_>,
        rng: &mut StdRng,
    ) -> Result<MockValue, MockError> {
        let item_name = item_type.named_type();
        let mut pool = if self.schema.get_type(item_name)?.is_composite() {
            self.get_all_refs(item_name)?
        } else {
            Vec::new()
        };

        let length = self.options.list_length;
        let mut items = Vec::with_capacity(length);
        for _ in 0..length {
            if pool.is_empty() {
                items.push(self.mock_from_type(item_type, scope, rng, false)?);
            } else {
                let idx = rng.gen_range(0..pool.len());
                items.push(MockValue::from(pool.remove(idx)));
            }
        }

        Ok(MockValue::List(items))
    }

    fn mock_abstract(
        &mut self,
        type_name: &str,
        scope: &Scope<'_>,
        rng: &mut StdRng,
        sample: bool,
    ) -> Result<MockValue, MockError> {
        let (concrete, interface_output) = match self.generators.get(type_name).cloned() {
            Some(generator) => {
                let output = self.call_generator(&generator, scope, rng)?;
                if output.is_null() {
                    return Ok(output);
                }

                let object = self
                    .materialize(output)?
                    .ok_or_else(|| MockError::AmbiguousAbstractResolution(type_name.to_string()))?;
                let concrete = object
                    .typename()
                    .map(str::to_string)
                    .ok_or_else(|| MockError::AmbiguousAbstractResolution(type_name.to_string()))?;

                if !self.schema.possible_types(type_name)?.contains(&concrete.as_str()) {
                    return Err(MockError::InvalidGeneratorOutput {
                        type_name: type_name.to_string(),
                        reason: format!("\"{concrete}\" is not a possible type"),
                    });
                }
                self.check_generator_fields(&concrete, &object)?;

                (concrete, object)
            }
            None => {
                let possible = self.schema.possible_types(type_name)?;
                let Some(concrete) = possible.choose(rng).map(|t| t.to_string()) else {
                    warn!("{type_name} has no concrete types to synthesize");
                    return Ok(MockValue::null());
                };
                (concrete, MockObject::new())
            }
        };

        // Output naming a stored record is that record; concrete synthesis
        // would only fabricate a different one.
        let stored = self
            .get_id(&interface_output)
            .is_some_and(|id| self.store.contains(&concrete, &id));
        if stored {
            let mut object = interface_output;
            object.insert("__typename", concrete);
            return Ok(MockValue::Object(object));
        }

        let concrete_value = self.mock_from_type(&TypeRef::named(&concrete), scope, rng, sample)?;
        if concrete_value.is_null() && interface_output.is_empty() {
            return Ok(concrete_value);
        }

        let mut object = interface_output;
        if let Some(concrete_object) = self.materialize(concrete_value)? {
            object.extend(concrete_object);
        }
        object.insert("__typename", concrete);

        Ok(MockValue::Object(object))
    }

    fn mock_object(
        &mut self,
        type_name: &str,
        scope: &Scope<'_>,
        rng: &mut StdRng,
        sample: bool,
    ) -> Result<MockValue, MockError> {
        let parent = scope.info.parent_type.as_str();

        // Stored records keep their own values; only fabricated ones take the
        // generator's output wholesale.
        let (base, fabricated) = if let Some(fk) = self.related_key(type_name, parent).map(str::to_string) {
            debug!("{parent}.{} is a related {type_name} via {fk}", scope.info.field_name);
            let related = related_refs(self, scope, &RelatedOptions::new(fk), "related()", type_name)?
                .into_iter()
                .next()
                .map(MockValue::from)
                .unwrap_or_else(MockValue::null);
            (related, false)
        } else if let Some(reference) = self.explicit_reference(type_name, scope.source) {
            (MockValue::from(reference), false)
        } else if sample {
            let refs = self.get_all_refs(type_name)?;
            match refs.choose(rng) {
                Some(reference) => (MockValue::from(reference.clone()), false),
                None => (MockValue::Object(MockObject::new()), true),
            }
        } else {
            let id = self.id(type_name)?;
            (MockValue::from(self.stub_if_needed(type_name, &id)), true)
        };

        let Some(generator) = self.generators.get(type_name).cloned() else {
            return Ok(base);
        };
        if base.is_null() {
            return Ok(base);
        }

        let mut object = self.materialize(base)?.unwrap_or_default();
        let identity = self.get_id(&object);
        let mut type_rng = self.rng(&type_key(type_name, identity.as_deref()));
        let overlay = {
            let scope = Scope {
                source: &object,
                args: scope.args,
                info: scope.info,
            };
            self.call_type_generator(type_name, &generator, &scope, &mut type_rng)?
        };
        if fabricated {
            object.extend(overlay);
        } else {
            object.fill(overlay);
        }

        Ok(MockValue::Object(object))
    }

    /// Record named by an explicit `$<type>Id` field on the source.
    fn explicit_reference(&mut self, type_name: &str, source: &MockObject) -> Option<Reference> {
        let field = format!("${}Id", lower_first(type_name));
        let id = source.value(&field).and_then(value_key)?;
        Some(self.stub_if_needed(type_name, &id))
    }
}
