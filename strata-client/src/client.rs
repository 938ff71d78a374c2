/// StrataDB remote client
use bytes::Bytes;
use std::sync::Arc;

use strata_core::{Key, Record};
use strata_proto as proto;

use crate::error::{ClientError, Result};
use crate::query::Query;
use crate::transaction::Txn;
use crate::transport::{call, endpoint_url, HttpTransport, Transport};

/// Production API endpoint. Override with [`Client::with_base_url`] for
/// staging or local instances.
pub const DEFAULT_BASE_URL: &str = "https://api.stratadb.dev/v1";

/// Handle to one dataset of a StrataDB deployment.
///
/// The client itself is stateless: it hands out [`Txn`] values that carry
/// the per-call state (transaction id, endpoint, transport). The direct
/// `get`/`put`/`delete`/`run_query` methods are shorthand for one-off
/// non-transactional operations.
///
/// # Example
/// ```no_run
/// # use strata_client::{Client, Key, PropertiesBuilder};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("my-dataset");
///
/// let task = PropertiesBuilder::new()
///     .string("title", "write report")
///     .bool("done", false)
///     .build();
///
/// let key = client.put(&Key::incomplete("Task"), &task).await?;
/// println!("stored under id {:?}", key.id());
/// # Ok(())
/// # }
/// ```
pub struct Client {
    dataset_id: String,
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Client for `dataset_id` over the default HTTP transport.
    pub fn new(dataset_id: impl Into<String>) -> Self {
        Self::with_transport(dataset_id, Arc::new(HttpTransport::new()))
    }

    /// Client over a caller-supplied transport (custom HTTP setup, mocks).
    pub fn with_transport(dataset_id: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            transport,
        }
    }

    /// Point the client at a different API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// A handle that runs every operation in non-transactional mode:
    /// each mutation commits as its own atomic unit.
    pub fn non_transactional(&self) -> Txn {
        Txn::new(
            Bytes::new(),
            self.dataset_id.clone(),
            self.base_url.clone(),
            self.transport.clone(),
        )
    }

    /// Start a transaction and return the handle scoped to it.
    ///
    /// Operations issued through the returned [`Txn`] stay invisible to
    /// other readers until its `commit` succeeds.
    pub async fn begin_transaction(&self) -> Result<Txn> {
        let url = endpoint_url(&self.base_url, &self.dataset_id, "beginTransaction");
        let request = proto::BeginTransactionRequest {};
        let response: proto::BeginTransactionResponse =
            call(self.transport.as_ref(), &url, &request).await?;

        if response.transaction.is_empty() {
            // An empty id would silently degrade every later call to
            // non-transactional mode.
            return Err(ClientError::Decode(
                "store returned an empty transaction id".to_string(),
            ));
        }

        Ok(Txn::new(
            response.transaction,
            self.dataset_id.clone(),
            self.base_url.clone(),
            self.transport.clone(),
        ))
    }

    /// One-off non-transactional lookup. See [`Txn::get`].
    pub async fn get<T: Record>(&self, keys: &[Key], dest: &mut Vec<T>) -> Result<()> {
        self.non_transactional().get(keys, dest).await
    }

    /// One-off non-transactional write. See [`Txn::put`].
    pub async fn put<T: Record>(&self, key: &Key, record: &T) -> Result<Key> {
        self.non_transactional().put(key, record).await
    }

    /// One-off non-transactional delete. See [`Txn::delete`].
    pub async fn delete(&self, keys: &[Key]) -> Result<()> {
        self.non_transactional().delete(keys).await
    }

    /// One-off non-transactional query. See [`Txn::run_query`].
    pub async fn run_query<T: Record>(
        &self,
        query: &Query,
        dest: &mut Vec<T>,
    ) -> Result<(Vec<Key>, Option<Query>)> {
        self.non_transactional().run_query(query, dest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_trimmed() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(&proto::CommitResponse::default());

        let client = Client::with_transport("demo", mock.clone())
            .with_base_url("http://localhost:8080/v1/");
        client
            .delete(&[strata_core::Key::with_id("Task", 1)])
            .await
            .unwrap();

        assert_eq!(
            mock.request_url(0),
            "http://localhost:8080/v1/datasets/demo/commit"
        );
    }

    #[tokio::test]
    async fn test_begin_transaction_returns_transactional_handle() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(&proto::BeginTransactionResponse {
            transaction: Bytes::from_static(b"tx-77"),
        });

        let client = Client::with_transport("demo", mock.clone())
            .with_base_url("http://localhost:8080/v1");
        let txn = client.begin_transaction().await.unwrap();

        assert!(txn.is_transactional());
        assert_eq!(
            mock.request_url(0),
            "http://localhost:8080/v1/datasets/demo/beginTransaction"
        );
    }

    #[tokio::test]
    async fn test_begin_transaction_rejects_empty_id() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(&proto::BeginTransactionResponse {
            transaction: Bytes::new(),
        });

        let client = Client::with_transport("demo", mock);
        let err = client
            .begin_transaction()
            .await
            .err()
            .expect("empty transaction id must be rejected");
        assert_eq!(err.code(), "DECODE_ERROR");
    }
}
