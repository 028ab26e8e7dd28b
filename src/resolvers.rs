//! Field resolvers for relationships and lookups.
//!
//! These build [`Resolver`]s to place in generated objects or register as
//! generators. They are also what the synthesizer uses internally when a field
//! turns out to be an inferred relationship.

use crate::error::MockError;
use crate::mocks::{value_key, Mocks};
use crate::relay::{generate_connection_from_array, resolve_local_or_global_id};
use crate::synthesize::Scope;
use crate::value::{Args, MockContext, MockValue, Resolver};
use mock_core::{Record, Reference, Value};
use std::fmt;
use std::sync::Arc;

/// Predicate over a candidate record and the field arguments.
pub type Filter = Arc<dyn Fn(&Record, &Args) -> bool + Send + Sync>;

/// How a source record is matched against records of the related type.
#[derive(Clone)]
pub struct RelatedOptions {
    /// Field on the source holding the local key; the source's id when unset
    pub id_field_name: Option<String>,
    /// Field on the related records that must carry the local key
    pub related_field_name: String,
    pub filter: Option<Filter>,
}

impl RelatedOptions {
    pub fn new(related_field_name: impl Into<String>) -> Self {
        Self {
            id_field_name: None,
            related_field_name: related_field_name.into(),
            filter: None,
        }
    }

    pub fn id_field(mut self, id_field_name: impl Into<String>) -> Self {
        self.id_field_name = Some(id_field_name.into());
        self
    }

    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Record, &Args) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }
}

impl fmt::Debug for RelatedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelatedOptions")
            .field("id_field_name", &self.id_field_name)
            .field("related_field_name", &self.related_field_name)
            .field("filter", &self.filter.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Options for [`connection`].
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    pub related: RelatedOptions,
    /// Node type override; derived from the connection type when unset
    pub node_type: Option<String>,
}

impl ConnectionOptions {
    pub fn new(related: RelatedOptions) -> Self {
        Self {
            related,
            node_type: None,
        }
    }

    pub fn node_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }
}

/// References to the records of `target` that point at the source.
///
/// Matching records keep their insertion order.
pub(crate) fn related_refs(
    mocks: &Mocks,
    scope: &Scope<'_>,
    options: &RelatedOptions,
    resolver: &'static str,
    target: &str,
) -> Result<Vec<Reference>, MockError> {
    let local_key = match &options.id_field_name {
        Some(field) => scope.source.value(field).and_then(value_key),
        None => mocks.get_id(scope.source),
    };

    let Some(local_key) = local_key else {
        return Err(MockError::MissingRelationKey {
            resolver,
            field: options
                .id_field_name
                .clone()
                .unwrap_or_else(|| mocks.id_field().to_string()),
            parent_type: scope.info.parent_type.clone(),
            field_name: scope.info.field_name.clone(),
            return_type: scope.info.return_type.to_string(),
        });
    };

    Ok(mocks
        .entries(target)?
        .into_iter()
        .filter(|(_, record)| {
            record
                .get(&options.related_field_name)
                .is_some_and(|value| value.links_to(&local_key))
        })
        .filter(|(_, record)| {
            options
                .filter
                .as_ref()
                .map_or(true, |filter| filter(record, scope.args))
        })
        .map(|(reference, _)| reference)
        .collect())
}

/// Records of the field's type whose `related_field_name` points at the
/// source: all of them for list fields, the first one otherwise.
pub fn related(options: RelatedOptions) -> Resolver {
    Resolver::new(move |ctx: &mut MockContext<'_>| {
        let target = ctx.info.return_type.named_type().to_string();
        let scope = Scope {
            source: ctx.source,
            args: ctx.args,
            info: ctx.info,
        };
        let refs = related_refs(ctx.mocks, &scope, &options, "related()", &target)?;

        if ctx.info.return_type.is_list() {
            Ok(MockValue::List(refs.into_iter().map(MockValue::from).collect()))
        } else {
            Ok(refs
                .into_iter()
                .next()
                .map(MockValue::from)
                .unwrap_or_else(MockValue::null))
        }
    })
}

/// Related records paginated with the field's connection arguments.
pub fn connection(options: ConnectionOptions) -> Resolver {
    Resolver::new(move |ctx: &mut MockContext<'_>| {
        let connection_type = ctx.info.return_type.named_type();
        let schema = ctx.mocks.schema();

        if !schema.is_connection_type(connection_type) {
            return Err(MockError::InvalidConnectionType {
                connection_type: connection_type.to_string(),
                parent_type: ctx.info.parent_type.clone(),
            });
        }

        let node_type = match &options.node_type {
            Some(node_type) => node_type.clone(),
            None => schema.connection_node_type(connection_type)?.to_string(),
        };
        let definition = schema.get_type(connection_type)?.clone();

        let scope = Scope {
            source: ctx.source,
            args: ctx.args,
            info: ctx.info,
        };
        let nodes = related_refs(ctx.mocks, &scope, &options.related, "connection()", &node_type)?
            .into_iter()
            .map(MockValue::from)
            .collect();

        generate_connection_from_array(nodes, ctx.args, &definition)
    })
}

/// Record of the field's type whose id is given by the `arg_name` argument.
///
/// Both local and global ids are accepted.
pub fn item_by_id(arg_name: impl Into<String>) -> Resolver {
    let arg_name = arg_name.into();
    Resolver::new(move |ctx: &mut MockContext<'_>| {
        let Some(id) = ctx.args.get(&arg_name).and_then(value_key) else {
            return Ok(MockValue::null());
        };
        let local_id = resolve_local_or_global_id(&id);

        Ok(ctx
            .mocks
            .lookup_ref(ctx.info.return_type.named_type(), &local_id)
            .map(MockValue::from)
            .unwrap_or_else(MockValue::null))
    })
}

/// First record of the field's type whose `arg_name` field equals the
/// `arg_name` argument.
pub fn item_by_arg(arg_name: impl Into<String>) -> Resolver {
    let arg_name = arg_name.into();
    Resolver::new(move |ctx: &mut MockContext<'_>| {
        let Some(wanted) = ctx.args.get(&arg_name).filter(|v| !v.is_null()) else {
            return Ok(MockValue::null());
        };

        Ok(ctx
            .mocks
            .entries(ctx.info.return_type.named_type())?
            .into_iter()
            .find(|(_, record)| record.get(&arg_name) == Some(wanted))
            .map(|(reference, _)| MockValue::from(reference))
            .unwrap_or_else(MockValue::null))
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0 && !f.is_nan(),
        Value::String(s) => !s.is_empty(),
        Value::List(_) | Value::Object(_) | Value::Ref(_) => true,
    }
}

/// Combine per-argument predicates into one [`Filter`].
///
/// A predicate only applies when its argument is set to a truthy value; the
/// record passes when every applicable predicate accepts it.
pub fn filter_by_args<I, S>(filters: I) -> Filter
where
    I: IntoIterator<Item = (S, Filter)>,
    S: Into<String>,
{
    let filters: Vec<(String, Filter)> = filters
        .into_iter()
        .map(|(arg, filter)| (arg.into(), filter))
        .collect();

    Arc::new(move |record: &Record, args: &Args| {
        filters.iter().all(|(arg, filter)| {
            match args.get(arg) {
                Some(value) if is_truthy(value) => filter(record, args),
                _ => true,
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{FieldInfo, MockObject};
    use mock_core::{SchemaDefinition, TypeRef};

    const SCHEMA: &str = r#"
query: Query
types:
  - kind: object
    name: Query
    fields:
      - name: customer
        type: Customer
        args:
          - name: id
            type: ID
  - kind: object
    name: Customer
    fields:
      - name: id
        type: ID!
      - name: name
        type: String
      - name: orders
        type: "[Order]"
      - name: orderPage
        type: OrderConnection
  - kind: object
    name: Order
    fields:
      - name: id
        type: ID!
      - name: total
        type: Int
      - name: customer
        type: Customer
  - kind: object
    name: OrderConnection
    fields:
      - name: pageInfo
        type: PageInfo!
      - name: edges
        type: "[OrderEdge]"
      - name: totalCount
        type: Int
  - kind: object
    name: OrderEdge
    fields:
      - name: cursor
        type: String!
      - name: node
        type: Order
  - kind: object
    name: PageInfo
    fields:
      - name: hasNextPage
        type: Boolean!
      - name: hasPreviousPage
        type: Boolean!
      - name: startCursor
        type: String
      - name: endCursor
        type: String
"#;

    fn mocks() -> Mocks {
        let mut mocks = Mocks::new(SchemaDefinition::from_yaml(SCHEMA).unwrap());
        mocks
            .add_example("Customer", Record::new().with("id", "c1").with("name", "Ann"))
            .unwrap();
        mocks
            .add_example("Customer", Record::new().with("id", "c2").with("name", "Bo"))
            .unwrap();
        for (id, customer, total) in [("o1", "c1", 10i64), ("o2", "c2", 20), ("o3", "c1", 30)] {
            mocks
                .add_example(
                    "Order",
                    Record::new()
                        .with("id", id)
                        .with("customer", customer)
                        .with("total", total),
                )
                .unwrap();
        }
        mocks
    }

    fn call(
        mocks: &mut Mocks,
        resolver: &Resolver,
        source: &MockObject,
        args: &Args,
        info: &FieldInfo,
    ) -> Result<MockValue, MockError> {
        let mut rng = mocks.rng("test");
        let mut ctx = MockContext {
            mocks,
            source,
            args,
            info,
            rng: &mut rng,
        };
        resolver.call(&mut ctx)
    }

    fn ids(value: MockValue) -> Vec<String> {
        value
            .into_items()
            .unwrap()
            .iter()
            .map(|item| item.as_reference().unwrap().id.clone())
            .collect()
    }

    #[test]
    fn test_related_to_many() {
        let mut mocks = mocks();
        let source = MockObject::new().with("id", "c1");
        let info = FieldInfo::new("Customer", "orders", "[Order]".parse().unwrap());

        let value = call(&mut mocks, &related(RelatedOptions::new("customer")), &source, &Args::new(), &info).unwrap();
        assert_eq!(ids(value), vec!["o1", "o3"]);
    }

    #[test]
    fn test_related_with_filter() {
        let mut mocks = mocks();
        let source = MockObject::new().with("id", "c1");
        let info = FieldInfo::new("Customer", "orders", "[Order]".parse().unwrap());
        let options = RelatedOptions::new("customer")
            .filter(|record, _| record.get("total").and_then(Value::as_i64) > Some(15));

        let value = call(&mut mocks, &related(options), &source, &Args::new(), &info).unwrap();
        assert_eq!(ids(value), vec!["o3"]);
    }

    #[test]
    fn test_related_missing_key_is_an_error() {
        let mut mocks = mocks();
        let source = MockObject::new().with("name", "nobody");
        let info = FieldInfo::new("Customer", "orders", "[Order]".parse().unwrap());

        let result = call(&mut mocks, &related(RelatedOptions::new("customer")), &source, &Args::new(), &info);
        assert!(matches!(result, Err(MockError::MissingRelationKey { resolver: "related()", .. })));
    }

    #[test]
    fn test_connection_pages_related_records() {
        let mut mocks = mocks();
        let source = MockObject::new().with("id", "c1");
        let info = FieldInfo::new("Customer", "orderPage", TypeRef::named("OrderConnection"));
        let mut args = Args::new();
        args.insert("first".to_string(), Value::Int(1));

        let resolver = connection(ConnectionOptions::new(RelatedOptions::new("customer")));
        let MockValue::Object(page) = call(&mut mocks, &resolver, &source, &args, &info).unwrap() else {
            panic!("expected a connection object");
        };

        assert_eq!(page.value("totalCount"), Some(&Value::Int(2)));
        let Some(MockValue::Object(page_info)) = page.get("pageInfo") else {
            panic!("expected pageInfo");
        };
        assert_eq!(page_info.value("hasNextPage"), Some(&Value::Bool(true)));
        let Some(MockValue::List(edges)) = page.get("edges") else {
            panic!("expected edges");
        };
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn test_connection_on_plain_list_is_an_error() {
        let mut mocks = mocks();
        let source = MockObject::new().with("id", "c1");
        let info = FieldInfo::new("Customer", "orders", "[Order]".parse().unwrap());

        let resolver = connection(ConnectionOptions::new(RelatedOptions::new("customer")));
        let result = call(&mut mocks, &resolver, &source, &Args::new(), &info);
        assert!(matches!(result, Err(MockError::InvalidConnectionType { .. })));
    }

    #[test]
    fn test_item_by_id_accepts_global_ids() {
        let mut mocks = mocks();
        let info = FieldInfo::new("Query", "customer", TypeRef::named("Customer"));
        let resolver = item_by_id("id");

        for id in ["c2".to_string(), crate::relay::to_global_id("Customer", "c2")] {
            let mut args = Args::new();
            args.insert("id".to_string(), Value::from(id));
            let value = call(&mut mocks, &resolver, &MockObject::new(), &args, &info).unwrap();
            assert_eq!(value.as_reference(), Some(&Reference::new("Customer", "c2")));
        }

        let value = call(&mut mocks, &resolver, &MockObject::new(), &Args::new(), &info).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_item_by_arg() {
        let mut mocks = mocks();
        let info = FieldInfo::new("Query", "customer", TypeRef::named("Customer"));
        let mut args = Args::new();
        args.insert("name".to_string(), Value::from("Bo"));

        let value = call(&mut mocks, &item_by_arg("name"), &MockObject::new(), &args, &info).unwrap();
        assert_eq!(value.as_reference(), Some(&Reference::new("Customer", "c2")));
    }

    #[test]
    fn test_filter_by_args() {
        let min_total: Filter = Arc::new(|record: &Record, args: &Args| {
            let min = args.get("minTotal").and_then(Value::as_i64).unwrap_or(0);
            record.get("total").and_then(Value::as_i64).unwrap_or(0) >= min
        });
        let filter = filter_by_args([("minTotal", min_total)]);

        let order = Record::new().with("total", 10i64);
        let mut args = Args::new();
        assert!(filter(&order, &args));

        args.insert("minTotal".to_string(), Value::Int(20));
        assert!(!filter(&order, &args));

        args.insert("minTotal".to_string(), Value::Int(0));
        assert!(filter(&order, &args));
    }
}
