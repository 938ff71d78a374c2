//! Wire messages for the StrataDB HTTP API.
//!
//! Every endpoint is an HTTP POST carrying one of the request messages below,
//! protobuf-encoded, and answers with the matching response message. The
//! structs are maintained by hand in prost's generated style so the crate
//! builds without a protoc toolchain; tags are part of the wire contract and
//! must not be renumbered.

use bytes::Bytes;

/// Scopes a key or query to a dataset and an optional namespace within it.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PartitionId {
    #[prost(string, optional, tag = "3")]
    pub dataset_id: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub namespace: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PathElement {
    #[prost(string, tag = "1")]
    pub kind: String,
    /// Zero means "no id"; the store assigns one on auto-id insert.
    #[prost(int64, tag = "2")]
    pub id: i64,
    #[prost(string, tag = "3")]
    pub name: String,
}

/// Hierarchical entity key: ordered path elements, most specific last.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Key {
    #[prost(message, optional, tag = "1")]
    pub partition_id: Option<PartitionId>,
    #[prost(message, repeated, tag = "2")]
    pub path_element: Vec<PathElement>,
}

/// Typed property value. Exactly one of the value fields is set; a message
/// with none set reads as null.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Value {
    #[prost(bool, optional, tag = "1")]
    pub boolean_value: Option<bool>,
    #[prost(int64, optional, tag = "2")]
    pub integer_value: Option<i64>,
    #[prost(double, optional, tag = "3")]
    pub double_value: Option<f64>,
    #[prost(int64, optional, tag = "4")]
    pub timestamp_microseconds_value: Option<i64>,
    #[prost(message, optional, boxed, tag = "5")]
    pub key_value: Option<Box<Key>>,
    #[prost(message, repeated, tag = "7")]
    pub list_value: Vec<Value>,
    #[prost(bool, optional, tag = "15")]
    pub indexed: Option<bool>,
    #[prost(string, optional, tag = "17")]
    pub string_value: Option<String>,
    #[prost(bytes = "bytes", optional, tag = "18")]
    pub blob_value: Option<Bytes>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Property {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "4")]
    pub value: Option<Value>,
}

/// A key plus its unordered property bag.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Entity {
    #[prost(message, optional, tag = "1")]
    pub key: Option<Key>,
    #[prost(message, repeated, tag = "2")]
    pub property: Vec<Property>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EntityResult {
    #[prost(message, optional, tag = "1")]
    pub entity: Option<Entity>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct KindExpression {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PropertyReference {
    #[prost(string, tag = "2")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PropertyExpression {
    #[prost(message, optional, tag = "1")]
    pub property: Option<PropertyReference>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PropertyOrder {
    #[prost(message, optional, tag = "1")]
    pub property: Option<PropertyReference>,
    #[prost(enumeration = "property_order::Direction", tag = "2")]
    pub direction: i32,
}

pub mod property_order {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Direction {
        Unspecified = 0,
        Ascending = 1,
        Descending = 2,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PropertyFilter {
    #[prost(message, optional, tag = "1")]
    pub property: Option<PropertyReference>,
    #[prost(enumeration = "property_filter::Operator", tag = "2")]
    pub operator: i32,
    #[prost(message, optional, tag = "3")]
    pub value: Option<Value>,
}

pub mod property_filter {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Operator {
        Unspecified = 0,
        LessThan = 1,
        LessThanOrEqual = 2,
        GreaterThan = 3,
        GreaterThanOrEqual = 4,
        Equal = 5,
        HasAncestor = 11,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CompositeFilter {
    #[prost(enumeration = "composite_filter::Operator", tag = "1")]
    pub operator: i32,
    #[prost(message, repeated, tag = "2")]
    pub filter: Vec<Filter>,
}

pub mod composite_filter {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Operator {
        Unspecified = 0,
        And = 1,
    }
}

/// Either a single property filter or an AND of several.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Filter {
    #[prost(message, optional, boxed, tag = "1")]
    pub composite_filter: Option<Box<CompositeFilter>>,
    #[prost(message, optional, tag = "2")]
    pub property_filter: Option<PropertyFilter>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Query {
    #[prost(message, repeated, tag = "2")]
    pub projection: Vec<PropertyExpression>,
    #[prost(message, repeated, tag = "3")]
    pub kind: Vec<KindExpression>,
    #[prost(message, optional, tag = "4")]
    pub filter: Option<Filter>,
    #[prost(message, repeated, tag = "5")]
    pub order: Vec<PropertyOrder>,
    /// Opaque cursor to resume from; empty means "from the beginning".
    #[prost(bytes = "bytes", tag = "7")]
    pub start_cursor: Bytes,
    #[prost(int32, optional, tag = "10")]
    pub offset: Option<i32>,
    #[prost(int32, optional, tag = "11")]
    pub limit: Option<i32>,
}

/// One page of query results. The end cursor always points past the last
/// result returned; a cursor equal to the request's start cursor means the
/// stream is exhausted.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryResultBatch {
    #[prost(message, repeated, tag = "2")]
    pub entity_result: Vec<EntityResult>,
    #[prost(bytes = "bytes", tag = "4")]
    pub end_cursor: Bytes,
}

/// Read-time options shared by lookup and query. An empty transaction id
/// means the read runs outside any transaction.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReadOptions {
    #[prost(bytes = "bytes", tag = "2")]
    pub transaction: Bytes,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RunQueryRequest {
    #[prost(message, optional, tag = "1")]
    pub read_options: Option<ReadOptions>,
    #[prost(message, optional, tag = "2")]
    pub partition_id: Option<PartitionId>,
    #[prost(message, optional, tag = "3")]
    pub query: Option<Query>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RunQueryResponse {
    #[prost(message, optional, tag = "1")]
    pub batch: Option<QueryResultBatch>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LookupRequest {
    #[prost(message, optional, tag = "1")]
    pub read_options: Option<ReadOptions>,
    #[prost(message, repeated, tag = "3")]
    pub key: Vec<Key>,
}

/// Lookup results keep request order within each bucket.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LookupResponse {
    #[prost(message, repeated, tag = "1")]
    pub found: Vec<EntityResult>,
    #[prost(message, repeated, tag = "2")]
    pub missing: Vec<EntityResult>,
    #[prost(message, repeated, tag = "3")]
    pub deferred: Vec<Key>,
}

/// The write payload of a commit. Auto-id inserts are listed separately so
/// the response can report the keys the store assigned, in order.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Mutation {
    #[prost(message, repeated, tag = "1")]
    pub upsert: Vec<Entity>,
    #[prost(message, repeated, tag = "2")]
    pub update: Vec<Entity>,
    #[prost(message, repeated, tag = "3")]
    pub insert: Vec<Entity>,
    #[prost(message, repeated, tag = "4")]
    pub insert_auto_id: Vec<Entity>,
    #[prost(message, repeated, tag = "5")]
    pub delete: Vec<Key>,
    #[prost(bool, optional, tag = "6")]
    pub force: Option<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MutationResult {
    #[prost(int32, tag = "1")]
    pub index_updates: i32,
    /// Completed keys for the mutation's insert_auto_id entities, in order.
    #[prost(message, repeated, tag = "2")]
    pub insert_auto_id_key: Vec<Key>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitRequest {
    #[prost(bytes = "bytes", tag = "1")]
    pub transaction: Bytes,
    #[prost(message, optional, tag = "2")]
    pub mutation: Option<Mutation>,
    #[prost(enumeration = "commit_request::Mode", tag = "5")]
    pub mode: i32,
}

pub mod commit_request {
    /// TRANSACTIONAL finalizes the transaction named in the request;
    /// NON_TRANSACTIONAL applies the mutation as its own atomic unit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Mode {
        Unspecified = 0,
        Transactional = 1,
        NonTransactional = 2,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitResponse {
    #[prost(message, optional, tag = "1")]
    pub mutation_result: Option<MutationResult>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BeginTransactionRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BeginTransactionResponse {
    #[prost(bytes = "bytes", tag = "1")]
    pub transaction: Bytes,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RollbackRequest {
    #[prost(bytes = "bytes", tag = "1")]
    pub transaction: Bytes,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RollbackResponse {}
