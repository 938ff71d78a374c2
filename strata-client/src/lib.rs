/// StrataDB HTTP Client Library
///
/// This crate provides a Rust client for the StrataDB remote document store:
/// hierarchical keys, typed property bags, queries with cursor pagination,
/// and optional atomic transactions, all carried over HTTP POST with
/// protobuf-encoded bodies.

pub mod error;
pub mod transport;
pub mod convert;
pub mod query;
pub mod transaction;
pub mod client;

// Re-export key types
pub use client::{Client, DEFAULT_BASE_URL};
pub use error::{ClientError, Result};
pub use query::Query;
pub use transaction::{LookupOutcome, Txn};
pub use transport::{HttpTransport, MockTransport, Transport};
pub use strata_core::{Entity, Key, PathElement, Properties, PropertiesBuilder, Record, Value};
