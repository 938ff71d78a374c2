/// Transaction-scoped remote operations
use bytes::Bytes;
use std::sync::Arc;

use strata_core::{Entity, Error, Key, Record};
use strata_proto as proto;

use crate::convert::{self, MultiConverter};
use crate::error::Result;
use crate::query::Query;
use crate::transport::{call, endpoint_url, Transport};

/// Transaction-scoped handle to the remote store.
///
/// A `Txn` with an empty transaction id is the non-transactional sentinel:
/// every mutation it issues runs inside its own single-operation transaction,
/// so each `put`/`delete` call is atomic on its own. A `Txn` carrying an id
/// from [`crate::Client::begin_transaction`] accumulates reads and mutations
/// server-side under that id until `commit` or `rollback`.
///
/// The handle is immutable after construction and holds no state across
/// calls, so transport or decode failures leave it usable for a retry. After
/// a successful `commit` or `rollback` the caller must discard it; reuse is
/// not guarded against.
pub struct Txn {
    id: Bytes,
    dataset_id: String,
    base_url: String,
    transport: Arc<dyn Transport>,
}

/// Per-key lookup outcome, for callers that need to tell "absent" apart
/// from "present with default values".
pub struct LookupOutcome {
    /// Entities that exist, in wire response order.
    pub found: Vec<Entity>,
    /// Keys the store reports as having no entity.
    pub missing: Vec<Key>,
    /// Keys the store declined to resolve in this call; retry separately.
    pub deferred: Vec<Key>,
}

impl Txn {
    pub(crate) fn new(
        id: Bytes,
        dataset_id: String,
        base_url: String,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            id,
            dataset_id,
            base_url,
            transport,
        }
    }

    /// True iff this handle carries a live transaction id.
    pub fn is_transactional(&self) -> bool {
        !self.id.is_empty()
    }

    fn url(&self, method: &str) -> String {
        endpoint_url(&self.base_url, &self.dataset_id, method)
    }

    fn read_options(&self) -> proto::ReadOptions {
        proto::ReadOptions {
            transaction: self.id.clone(),
        }
    }

    fn commit_mode(&self) -> proto::commit_request::Mode {
        if self.is_transactional() {
            proto::commit_request::Mode::Transactional
        } else {
            proto::commit_request::Mode::NonTransactional
        }
    }

    /// Run `query`, decoding one page of results into `dest`.
    ///
    /// Returns the result keys in wire order and, when the store advanced
    /// the cursor, a continuation query for the next page. A cursor echoed
    /// back unchanged is the store's only "stream exhausted" signal.
    pub async fn run_query<T: Record>(
        &self,
        query: &Query,
        dest: &mut Vec<T>,
    ) -> Result<(Vec<Key>, Option<Query>)> {
        if let Some(err) = query.err() {
            return Err(err.clone().into());
        }

        let request = proto::RunQueryRequest {
            read_options: Some(self.read_options()),
            partition_id: query.namespace_ref().map(|ns| proto::PartitionId {
                dataset_id: None,
                namespace: Some(ns.to_string()),
            }),
            query: Some(query.to_proto()),
        };

        let response: proto::RunQueryResponse =
            call(self.transport.as_ref(), &self.url("runQuery"), &request).await?;

        let batch = response.batch.unwrap_or_default();
        let mut converter = MultiConverter::bind(batch.entity_result.len(), dest)?;
        let mut keys = Vec::with_capacity(batch.entity_result.len());
        for (i, result) in batch.entity_result.into_iter().enumerate() {
            let entity = result.entity.unwrap_or_default();
            keys.push(convert::key_from_proto(entity.key.clone().unwrap_or_default()));
            converter.set(i, entity)?;
        }

        let next = (batch.end_cursor != *query.start_cursor())
            .then(|| query.with_start(batch.end_cursor));

        Ok((keys, next))
    }

    /// Look up `keys`, decoding the entities that exist into `dest`.
    ///
    /// An empty key set succeeds without a network call. The destination
    /// shape is validated before any I/O.
    ///
    /// Known limitation: found entities fill destination slots in wire
    /// response order, and slots beyond them keep their default value, so a
    /// caller cannot tell "absent" from "present but default-valued" here.
    /// Use [`Txn::lookup`] when that distinction matters.
    pub async fn get<T: Record>(&self, keys: &[Key], dest: &mut Vec<T>) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        self.require_complete(keys, "lookup")?;
        let mut converter = MultiConverter::bind(keys.len(), dest)?;
        let response = self.lookup_raw(keys).await?;
        for (i, result) in response.found.into_iter().enumerate() {
            converter.set(i, result.entity.unwrap_or_default())?;
        }
        Ok(())
    }

    /// Look up `keys`, reporting found, missing and deferred keys
    /// explicitly instead of decoding into a destination.
    pub async fn lookup(&self, keys: &[Key]) -> Result<LookupOutcome> {
        if keys.is_empty() {
            return Ok(LookupOutcome {
                found: Vec::new(),
                missing: Vec::new(),
                deferred: Vec::new(),
            });
        }
        self.require_complete(keys, "lookup")?;
        let response = self.lookup_raw(keys).await?;
        Ok(LookupOutcome {
            found: response
                .found
                .into_iter()
                .map(|r| convert::entity_from_proto(r.entity.unwrap_or_default()))
                .collect(),
            missing: response
                .missing
                .into_iter()
                .map(|r| {
                    convert::key_from_proto(
                        r.entity.unwrap_or_default().key.unwrap_or_default(),
                    )
                })
                .collect(),
            deferred: response
                .deferred
                .into_iter()
                .map(convert::key_from_proto)
                .collect(),
        })
    }

    async fn lookup_raw(&self, keys: &[Key]) -> Result<proto::LookupResponse> {
        let request = proto::LookupRequest {
            read_options: Some(self.read_options()),
            key: keys.iter().map(convert::key_to_proto).collect(),
        };
        call(self.transport.as_ref(), &self.url("lookup"), &request).await
    }

    /// Write `record` under `key`.
    ///
    /// A complete key is upserted; an incomplete key becomes an auto-id
    /// insert and the returned key carries the id the store assigned.
    /// Outside a transaction the write commits on its own.
    pub async fn put<T: Record>(&self, key: &Key, record: &T) -> Result<Key> {
        let entity = convert::entity_to_proto(key, record);
        let mut mutation = proto::Mutation::default();
        if key.is_complete() {
            mutation.upsert.push(entity);
        } else {
            mutation.insert_auto_id.push(entity);
        }

        let request = proto::CommitRequest {
            transaction: self.id.clone(),
            mutation: Some(mutation),
            mode: self.commit_mode() as i32,
        };
        let response: proto::CommitResponse =
            call(self.transport.as_ref(), &self.url("commit"), &request).await?;

        let mut assigned = response
            .mutation_result
            .unwrap_or_default()
            .insert_auto_id_key;
        if assigned.is_empty() {
            Ok(key.clone())
        } else {
            Ok(convert::key_from_proto(assigned.remove(0)))
        }
    }

    /// Delete the entities named by `keys` in one commit, all or nothing.
    pub async fn delete(&self, keys: &[Key]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        self.require_complete(keys, "delete")?;

        let request = proto::CommitRequest {
            transaction: self.id.clone(),
            mutation: Some(proto::Mutation {
                delete: keys.iter().map(convert::key_to_proto).collect(),
                ..Default::default()
            }),
            mode: self.commit_mode() as i32,
        };
        let _response: proto::CommitResponse =
            call(self.transport.as_ref(), &self.url("commit"), &request).await?;
        Ok(())
    }

    /// Finalize every operation issued under this transaction id.
    pub async fn commit(&self) -> Result<()> {
        self.require_transactional()?;
        let request = proto::CommitRequest {
            transaction: self.id.clone(),
            mutation: None,
            mode: proto::commit_request::Mode::Transactional as i32,
        };
        let _response: proto::CommitResponse =
            call(self.transport.as_ref(), &self.url("commit"), &request).await?;
        Ok(())
    }

    /// Abandon every operation issued under this transaction id.
    pub async fn rollback(&self) -> Result<()> {
        self.require_transactional()?;
        let request = proto::RollbackRequest {
            transaction: self.id.clone(),
        };
        let _response: proto::RollbackResponse =
            call(self.transport.as_ref(), &self.url("rollback"), &request).await?;
        Ok(())
    }

    fn require_transactional(&self) -> Result<()> {
        if !self.is_transactional() {
            return Err(Error::InvalidOperation("non-transactional operation".to_string()).into());
        }
        Ok(())
    }

    fn require_complete(&self, keys: &[Key], operation: &str) -> Result<()> {
        if let Some(key) = keys.iter().find(|k| !k.is_complete()) {
            return Err(Error::InvalidArgument(format!(
                "{} requires complete keys, got incomplete key of kind {:?}",
                operation,
                key.kind().unwrap_or("")
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use strata_core::Properties;

    fn txn(id: &'static [u8], mock: Arc<MockTransport>) -> Txn {
        Txn::new(
            Bytes::from_static(id),
            "demo".to_string(),
            "http://localhost:8080/v1".to_string(),
            mock,
        )
    }

    #[test]
    fn test_is_transactional() {
        let mock = Arc::new(MockTransport::new());
        assert!(!txn(b"", mock.clone()).is_transactional());
        assert!(txn(b"txid", mock).is_transactional());
    }

    #[test]
    fn test_url_building() {
        let mock = Arc::new(MockTransport::new());
        let txn = txn(b"", mock);
        assert_eq!(
            txn.url("runQuery"),
            "http://localhost:8080/v1/datasets/demo/runQuery"
        );
    }

    #[tokio::test]
    async fn test_commit_guard_makes_no_call() {
        let mock = Arc::new(MockTransport::new());
        let txn = txn(b"", mock.clone());

        let err = txn.commit().await.unwrap_err();
        assert_eq!(err.code(), "INVALID_OPERATION");
        assert_eq!(err.to_string(), "Invalid operation: non-transactional operation");
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_rollback_guard_makes_no_call() {
        let mock = Arc::new(MockTransport::new());
        let txn = txn(b"", mock.clone());

        let err = txn.rollback().await.unwrap_err();
        assert_eq!(err.code(), "INVALID_OPERATION");
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_get_makes_no_call() {
        let mock = Arc::new(MockTransport::new());
        let txn = txn(b"txid", mock.clone());

        let mut dest: Vec<Properties> = Vec::new();
        txn.get(&[], &mut dest).await.unwrap();
        assert_eq!(mock.request_count(), 0);
        assert!(dest.is_empty());
    }

    #[tokio::test]
    async fn test_get_rejects_incomplete_keys_before_io() {
        let mock = Arc::new(MockTransport::new());
        let txn = txn(b"", mock.clone());

        let mut dest: Vec<Properties> = Vec::new();
        let err = txn
            .get(&[Key::incomplete("Task")], &mut dest)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_get_validates_destination_before_io() {
        let mock = Arc::new(MockTransport::new());
        let txn = txn(b"", mock.clone());

        let mut dest: Vec<Properties> = vec![Properties::new(); 3];
        let err = txn
            .get(&[Key::with_id("Task", 1)], &mut dest)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        assert_eq!(mock.request_count(), 0);
    }
}
