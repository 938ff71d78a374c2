/// Query builder and wire translation
use bytes::Bytes;
use strata_core::{Error, Key, Value};
use strata_proto as proto;

use crate::convert::value_to_proto;

/// Builder for a kind query with property filters, ordering, projection and
/// cursor pagination.
///
/// Construction never fails eagerly: a mistake made while building (empty
/// kind, empty property name) poisons the query, and the first execution
/// attempt returns that error without touching the network. A query returned
/// from a successful execution (`next` page) carries the same filters with
/// the advanced cursor.
#[derive(Debug, Clone)]
pub struct Query {
    kind: String,
    namespace: Option<String>,
    filters: Vec<proto::PropertyFilter>,
    orders: Vec<proto::PropertyOrder>,
    projection: Vec<proto::PropertyExpression>,
    start: Bytes,
    offset: Option<i32>,
    limit: Option<i32>,
    err: Option<Error>,
}

impl Query {
    /// Create a new query over entities of `kind`.
    pub fn new(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        let mut query = Self {
            kind,
            namespace: None,
            filters: Vec::new(),
            orders: Vec::new(),
            projection: Vec::new(),
            start: Bytes::new(),
            offset: None,
            limit: None,
            err: None,
        };
        if query.kind.is_empty() {
            query.poison("query kind must not be empty");
        }
        query
    }

    /// Scope the query to a namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Keep only entities whose `property` equals `value`.
    pub fn filter_eq(self, property: &str, value: Value) -> Self {
        self.push_filter(property, proto::property_filter::Operator::Equal, value)
    }

    /// Keep only entities whose `property` is less than `value`.
    pub fn filter_lt(self, property: &str, value: Value) -> Self {
        self.push_filter(property, proto::property_filter::Operator::LessThan, value)
    }

    /// Keep only entities whose `property` is less than or equal to `value`.
    pub fn filter_lte(self, property: &str, value: Value) -> Self {
        self.push_filter(
            property,
            proto::property_filter::Operator::LessThanOrEqual,
            value,
        )
    }

    /// Keep only entities whose `property` is greater than `value`.
    pub fn filter_gt(self, property: &str, value: Value) -> Self {
        self.push_filter(
            property,
            proto::property_filter::Operator::GreaterThan,
            value,
        )
    }

    /// Keep only entities whose `property` is greater than or equal to `value`.
    pub fn filter_gte(self, property: &str, value: Value) -> Self {
        self.push_filter(
            property,
            proto::property_filter::Operator::GreaterThanOrEqual,
            value,
        )
    }

    /// Keep only entities whose key descends from `ancestor`.
    pub fn ancestor(self, ancestor: &Key) -> Self {
        self.push_filter(
            "__key__",
            proto::property_filter::Operator::HasAncestor,
            Value::key(ancestor.clone()),
        )
    }

    /// Sort results by `property`, ascending.
    pub fn order(self, property: &str) -> Self {
        self.push_order(property, proto::property_order::Direction::Ascending)
    }

    /// Sort results by `property`, descending.
    pub fn order_desc(self, property: &str) -> Self {
        self.push_order(property, proto::property_order::Direction::Descending)
    }

    /// Return only `property` instead of full entities.
    pub fn project(mut self, property: &str) -> Self {
        if property.is_empty() {
            self.poison("projection property name must not be empty");
            return self;
        }
        self.projection.push(proto::PropertyExpression {
            property: Some(proto::PropertyReference {
                name: property.to_string(),
            }),
        });
        self
    }

    /// Skip the first `offset` results.
    pub fn offset(mut self, offset: i32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Return at most `limit` results per page.
    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resume the result stream from an opaque cursor.
    pub fn start(mut self, cursor: Bytes) -> Self {
        self.start = cursor;
        self
    }

    /// The cursor this query resumes from; empty at the start of the stream.
    pub fn start_cursor(&self) -> &Bytes {
        &self.start
    }

    fn push_filter(
        mut self,
        property: &str,
        operator: proto::property_filter::Operator,
        value: Value,
    ) -> Self {
        if property.is_empty() {
            self.poison("filter property name must not be empty");
            return self;
        }
        self.filters.push(proto::PropertyFilter {
            property: Some(proto::PropertyReference {
                name: property.to_string(),
            }),
            operator: operator as i32,
            value: Some(value_to_proto(&value)),
        });
        self
    }

    fn push_order(mut self, property: &str, direction: proto::property_order::Direction) -> Self {
        if property.is_empty() {
            self.poison("order property name must not be empty");
            return self;
        }
        self.orders.push(proto::PropertyOrder {
            property: Some(proto::PropertyReference {
                name: property.to_string(),
            }),
            direction: direction as i32,
        });
        self
    }

    // First construction mistake wins; later ones would only mask it.
    fn poison(&mut self, msg: &str) {
        if self.err.is_none() {
            self.err = Some(Error::InvalidQuery(msg.to_string()));
        }
    }

    pub(crate) fn err(&self) -> Option<&Error> {
        self.err.as_ref()
    }

    pub(crate) fn namespace_ref(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Continuation of this query from a new cursor position.
    pub(crate) fn with_start(&self, cursor: Bytes) -> Self {
        let mut next = self.clone();
        next.start = cursor;
        next
    }

    pub(crate) fn to_proto(&self) -> proto::Query {
        let filter = match self.filters.len() {
            0 => None,
            1 => Some(proto::Filter {
                composite_filter: None,
                property_filter: Some(self.filters[0].clone()),
            }),
            _ => Some(proto::Filter {
                composite_filter: Some(Box::new(proto::CompositeFilter {
                    operator: proto::composite_filter::Operator::And as i32,
                    filter: self
                        .filters
                        .iter()
                        .cloned()
                        .map(|f| proto::Filter {
                            composite_filter: None,
                            property_filter: Some(f),
                        })
                        .collect(),
                })),
                property_filter: None,
            }),
        };

        proto::Query {
            projection: self.projection.clone(),
            kind: vec![proto::KindExpression {
                name: self.kind.clone(),
            }],
            filter,
            order: self.orders.clone(),
            start_cursor: self.start.clone(),
            offset: self.offset,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_kind_poisons_query() {
        let query = Query::new("");
        assert_eq!(query.err().unwrap().code(), "INVALID_QUERY");
    }

    #[test]
    fn test_empty_filter_property_poisons_query() {
        let query = Query::new("Task").filter_eq("", Value::Bool(true));
        assert_eq!(query.err().unwrap().code(), "INVALID_QUERY");
    }

    #[test]
    fn test_first_construction_error_wins() {
        let query = Query::new("Task")
            .filter_eq("", Value::Bool(true))
            .order("");
        match query.err().unwrap() {
            Error::InvalidQuery(msg) => assert!(msg.contains("filter property")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_single_filter_is_not_wrapped() {
        let wire = Query::new("Task")
            .filter_eq("done", Value::Bool(false))
            .to_proto();

        let filter = wire.filter.unwrap();
        assert!(filter.composite_filter.is_none());
        let property = filter.property_filter.unwrap();
        assert_eq!(property.property.unwrap().name, "done");
        assert_eq!(
            property.operator,
            proto::property_filter::Operator::Equal as i32
        );
    }

    #[test]
    fn test_multiple_filters_compose_with_and() {
        let wire = Query::new("Task")
            .filter_eq("done", Value::Bool(false))
            .filter_gt("priority", Value::I(2))
            .to_proto();

        let composite = wire.filter.unwrap().composite_filter.unwrap();
        assert_eq!(
            composite.operator,
            proto::composite_filter::Operator::And as i32
        );
        assert_eq!(composite.filter.len(), 2);
    }

    #[test]
    fn test_ancestor_filter_targets_key_property() {
        let wire = Query::new("Task")
            .ancestor(&Key::with_name("Project", "infra"))
            .to_proto();

        let property = wire.filter.unwrap().property_filter.unwrap();
        assert_eq!(property.property.unwrap().name, "__key__");
        assert_eq!(
            property.operator,
            proto::property_filter::Operator::HasAncestor as i32
        );
    }

    #[test]
    fn test_continuation_keeps_filters_and_moves_cursor() {
        let query = Query::new("Task")
            .filter_eq("done", Value::Bool(false))
            .limit(10)
            .start(Bytes::from_static(b"page-1"));

        let next = query.with_start(Bytes::from_static(b"page-2"));
        assert_eq!(next.start_cursor().as_ref(), b"page-2");

        let wire = next.to_proto();
        assert!(wire.filter.is_some());
        assert_eq!(wire.limit, Some(10));
        assert_eq!(wire.start_cursor.as_ref(), b"page-2");
    }

    #[test]
    fn test_order_and_projection_translate() {
        let wire = Query::new("Task")
            .order("priority")
            .order_desc("created")
            .project("title")
            .to_proto();

        assert_eq!(wire.order.len(), 2);
        assert_eq!(
            wire.order[1].direction,
            proto::property_order::Direction::Descending as i32
        );
        assert_eq!(wire.projection.len(), 1);
    }
}
