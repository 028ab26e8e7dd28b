//! Relay conventions: global ids, cursor pagination and the `Node` interface.
//!
//! # Global ids
//!
//! A global id is `base64("{Type}:{localId}")`. Decoding splits on the first
//! `:`; a string only counts as a global id when re-encoding its parts
//! reproduces it exactly, so plain local ids are never misread.
//!
//! # Connections
//!
//! [`connection_from_slice`] implements array-backed cursor pagination:
//! cursors are `base64("arrayconnection:{offset}")`, `first`/`after` page
//! forward and `last`/`before` page backward.

use crate::error::MockError;
use crate::value::{Args, MockContext, MockObject, MockValue, Resolver};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use mock_core::{TypeDefinition, Value};
use mock_generator::generators::uuid::generate_uuid;

const CURSOR_PREFIX: &str = "arrayconnection:";

/// Encode a global id.
pub fn to_global_id(type_name: &str, id: &str) -> String {
    STANDARD.encode(format!("{type_name}:{id}"))
}

/// Decode a global id into `(type, localId)` without validating it.
pub fn from_global_id(global_id: &str) -> Option<(String, String)> {
    let bytes = STANDARD.decode(global_id).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    let (type_name, id) = decoded.split_once(':')?;
    Some((type_name.to_string(), id.to_string()))
}

/// Decode a global id, accepting it only when it round-trips exactly.
pub fn id_info(id: &str) -> Option<(String, String)> {
    from_global_id(id).filter(|(type_name, local)| to_global_id(type_name, local) == id)
}

/// Get the local id from either a local or a global id.
pub fn resolve_local_or_global_id(id: &str) -> String {
    match id_info(id) {
        Some((_, local)) => local,
        None => id.to_string(),
    }
}

/// Encode a list offset as a cursor.
pub fn offset_to_cursor(offset: usize) -> String {
    STANDARD.encode(format!("{CURSOR_PREFIX}{offset}"))
}

/// Decode a cursor back to a list offset.
pub fn cursor_to_offset(cursor: &str) -> Option<i64> {
    let bytes = STANDARD.decode(cursor).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    decoded.strip_prefix(CURSOR_PREFIX)?.parse().ok()
}

/// Pagination arguments of a connection field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionArgs {
    pub first: Option<i64>,
    pub after: Option<String>,
    pub last: Option<i64>,
    pub before: Option<String>,
}

impl ConnectionArgs {
    /// Read pagination arguments from field arguments, ignoring the rest.
    pub fn from_args(args: &Args) -> Result<Self, MockError> {
        fn count(args: &Args, name: &str) -> Result<Option<i64>, MockError> {
            match args.get(name) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::Int(n)) => Ok(Some(*n)),
                Some(other) => Err(MockError::InvalidPagination(format!(
                    "argument \"{name}\" must be an integer, got {other:?}"
                ))),
            }
        }

        fn cursor(args: &Args, name: &str) -> Option<String> {
            args.get(name).and_then(Value::as_str).map(str::to_string)
        }

        Ok(Self {
            first: count(args, "first")?,
            after: cursor(args, "after"),
            last: count(args, "last")?,
            before: cursor(args, "before"),
        })
    }
}

/// One page element.
#[derive(Debug, Clone)]
pub struct Edge {
    pub cursor: String,
    pub node: MockValue,
}

/// Page boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

/// A page of a list.
#[derive(Debug, Clone)]
pub struct Connection {
    pub edges: Vec<Edge>,
    pub page_info: PageInfo,
}

/// Paginate a full list.
pub fn connection_from_slice(
    items: Vec<MockValue>,
    args: &ConnectionArgs,
) -> Result<Connection, MockError> {
    let length = items.len() as i64;

    let offset_or = |cursor: &Option<String>, default: i64| {
        cursor
            .as_deref()
            .and_then(cursor_to_offset)
            .unwrap_or(default)
    };
    let before_offset = offset_or(&args.before, length);
    let after_offset = offset_or(&args.after, -1);

    let mut start_offset = after_offset.max(-1).saturating_add(1);
    let mut end_offset = before_offset.min(length);

    if let Some(first) = args.first {
        if first < 0 {
            return Err(MockError::InvalidPagination(
                "argument \"first\" must be a non-negative integer".to_string(),
            ));
        }
        end_offset = end_offset.min(start_offset.saturating_add(first));
    }
    if let Some(last) = args.last {
        if last < 0 {
            return Err(MockError::InvalidPagination(
                "argument \"last\" must be a non-negative integer".to_string(),
            ));
        }
        start_offset = start_offset.max(end_offset.saturating_sub(last));
    }

    let lower = start_offset.clamp(0, length) as usize;
    let upper = end_offset.clamp(0, length) as usize;

    let edges: Vec<Edge> = if lower < upper {
        items
            .into_iter()
            .enumerate()
            .skip(lower)
            .take(upper - lower)
            .map(|(offset, node)| Edge {
                cursor: offset_to_cursor(offset),
                node,
            })
            .collect()
    } else {
        Vec::new()
    };

    let lower_bound = if args.after.is_some() {
        after_offset.saturating_add(1)
    } else {
        0
    };
    let upper_bound = if args.before.is_some() {
        before_offset
    } else {
        length
    };

    let page_info = PageInfo {
        start_cursor: edges.first().map(|e| e.cursor.clone()),
        end_cursor: edges.last().map(|e| e.cursor.clone()),
        has_previous_page: args.last.is_some() && start_offset > lower_bound,
        has_next_page: args.first.is_some() && end_offset < upper_bound,
    };

    Ok(Connection { edges, page_info })
}

/// Paginate `nodes` and shape the page after `connection_type`.
///
/// `nodes` and `totalCount` are added when the type declares them, and
/// `edges` is dropped when it does not.
pub fn generate_connection_from_array(
    nodes: Vec<MockValue>,
    args: &Args,
    connection_type: &TypeDefinition,
) -> Result<MockValue, MockError> {
    let total = nodes.len() as i64;
    let connection = connection_from_slice(nodes, &ConnectionArgs::from_args(args)?)?;

    let page_info = MockObject::new()
        .with("startCursor", opt_string(connection.page_info.start_cursor))
        .with("endCursor", opt_string(connection.page_info.end_cursor))
        .with("hasPreviousPage", connection.page_info.has_previous_page)
        .with("hasNextPage", connection.page_info.has_next_page);

    let mut object = MockObject::new().with("pageInfo", page_info);

    if connection_type.get_field("nodes").is_some() {
        let nodes = connection.edges.iter().map(|e| e.node.clone()).collect();
        object.insert("nodes", MockValue::List(nodes));
    }
    if connection_type.get_field("totalCount").is_some() {
        object.insert("totalCount", total);
    }
    if connection_type.get_field("edges").is_some() {
        let edges = connection
            .edges
            .into_iter()
            .map(|e| {
                MockValue::Object(
                    MockObject::new()
                        .with("cursor", e.cursor)
                        .with("node", e.node),
                )
            })
            .collect();
        object.insert("edges", MockValue::List(edges));
    }

    Ok(MockValue::Object(object))
}

fn opt_string(value: Option<String>) -> Value {
    value.map(Value::String).unwrap_or(Value::Null)
}

/// Default `ID` generator.
///
/// The parent's own id becomes a global id so it can be decoded again later.
/// Without one, a seeded UUID is used, made global when the parent type
/// implements `Node`.
pub fn global_id_mock() -> Resolver {
    Resolver::new(|ctx: &mut MockContext<'_>| {
        let parent = ctx.info.parent_type.as_str();

        if let Some(id) = ctx.mocks.get_id(ctx.source) {
            return Ok(MockValue::from(to_global_id(parent, &id)));
        }

        let id = generate_uuid(ctx.rng).to_string();
        if ctx.mocks.schema().implements_node(parent) {
            Ok(MockValue::from(to_global_id(parent, &id)))
        } else {
            Ok(MockValue::from(id))
        }
    })
}

/// Default `Node` generator: the record named by the `id` argument, with a
/// `__typename` hint.
pub fn node_mock() -> Resolver {
    Resolver::new(|ctx: &mut MockContext<'_>| {
        let Some(id) = ctx.args.get("id").and_then(Value::as_str) else {
            return Ok(MockValue::null());
        };
        let Some((type_name, local_id)) = from_global_id(id) else {
            return Ok(MockValue::null());
        };

        let mut object = ctx
            .mocks
            .get(&type_name, &local_id)
            .cloned()
            .map(MockObject::from)
            .unwrap_or_default();
        object.insert("__typename", type_name);

        Ok(MockValue::Object(object))
    })
}
