/// Test utilities and helpers for StrataDB client testing
///
/// This module provides common fixtures to simplify writing tests against
/// a scripted transport: a preconfigured client, a sample record type and
/// builders for canned wire responses.

use bytes::Bytes;
use std::sync::Arc;

use strata_client::convert::entity_to_proto;
use strata_client::{Client, MockTransport, Properties, PropertiesBuilder, Record, Value};
use strata_core::Key;
use strata_proto as proto;

/// Base URL every test client points at; nothing ever listens there, the
/// scripted transport answers before a socket would be involved.
pub const TEST_BASE_URL: &str = "http://localhost:8080/v1";

/// Dataset id used by the test client.
pub const TEST_DATASET: &str = "demo";

/// A client wired to a scripted transport.
pub struct TestClient {
    pub mock: Arc<MockTransport>,
    pub client: Client,
}

impl TestClient {
    pub fn new() -> Self {
        let mock = Arc::new(MockTransport::new());
        let client =
            Client::with_transport(TEST_DATASET, mock.clone()).with_base_url(TEST_BASE_URL);
        Self { mock, client }
    }

    /// Expected URL for one remote operation.
    pub fn url(&self, method: &str) -> String {
        format!("{}/datasets/{}/{}", TEST_BASE_URL, TEST_DATASET, method)
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Install a test subscriber so failing runs show client-side tracing.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Sample record used across the integration tests.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Task {
    pub title: String,
    pub done: bool,
    pub priority: i64,
}

impl Task {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

impl Record for Task {
    fn to_properties(&self) -> Properties {
        PropertiesBuilder::new()
            .string("title", self.title.clone())
            .bool("done", self.done)
            .integer("priority", self.priority)
            .build()
    }

    fn merge_properties(&mut self, properties: Properties) {
        for (name, value) in properties {
            match name.as_str() {
                "title" => {
                    if let Value::S(s) = value {
                        self.title = s;
                    }
                }
                "done" => {
                    if let Value::Bool(b) = value {
                        self.done = b;
                    }
                }
                "priority" => {
                    if let Value::I(i) = value {
                        self.priority = i;
                    }
                }
                _ => {}
            }
        }
    }
}

/// Wire entity result for `record` stored under `key`.
pub fn entity_result<T: Record>(key: &Key, record: &T) -> proto::EntityResult {
    proto::EntityResult {
        entity: Some(entity_to_proto(key, record)),
    }
}

/// Query response with the given results and end cursor.
pub fn run_query_response(
    results: Vec<proto::EntityResult>,
    end_cursor: impl Into<Bytes>,
) -> proto::RunQueryResponse {
    proto::RunQueryResponse {
        batch: Some(proto::QueryResultBatch {
            entity_result: results,
            end_cursor: end_cursor.into(),
        }),
    }
}

/// Lookup response listing only found entities.
pub fn lookup_response(found: Vec<proto::EntityResult>) -> proto::LookupResponse {
    proto::LookupResponse {
        found,
        missing: Vec::new(),
        deferred: Vec::new(),
    }
}

/// Commit response reporting store-assigned keys for auto-id inserts.
pub fn commit_response_with_keys(assigned: &[Key]) -> proto::CommitResponse {
    proto::CommitResponse {
        mutation_result: Some(proto::MutationResult {
            index_updates: assigned.len() as i32,
            insert_auto_id_key: assigned
                .iter()
                .map(|k| strata_client::convert::key_to_proto(k))
                .collect(),
        }),
    }
}

/// Commit response with no mutation result (plain transactional ack).
pub fn empty_commit_response() -> proto::CommitResponse {
    proto::CommitResponse {
        mutation_result: None,
    }
}
