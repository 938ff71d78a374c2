use bytes::Bytes;
use strata_client::{Key, Query, Value};
use strata_proto as proto;
use strata_test_utils::*;

/// Results decode into the destination in wire order, with keys to match.
#[tokio::test]
async fn test_run_query_decodes_results_in_wire_order() {
    let t = TestClient::new();
    let k1 = Key::with_id("Task", 1);
    let k2 = Key::with_id("Task", 2);
    t.mock.reply(&run_query_response(
        vec![
            entity_result(&k1, &Task::titled("first")),
            entity_result(&k2, &Task::titled("second")),
        ],
        Bytes::from_static(b"cursor-1"),
    ));

    let mut dest: Vec<Task> = Vec::new();
    let (keys, _next) = t
        .client
        .run_query(&Query::new("Task"), &mut dest)
        .await
        .unwrap();

    assert_eq!(keys, vec![k1, k2]);
    assert_eq!(dest.len(), 2);
    assert_eq!(dest[0].title, "first");
    assert_eq!(dest[1].title, "second");

    assert_eq!(t.mock.request_url(0), t.url("runQuery"));
    let request: proto::RunQueryRequest = t.mock.request(0);
    assert_eq!(request.query.unwrap().kind[0].name, "Task");
    assert!(request.read_options.unwrap().transaction.is_empty());
    assert!(request.partition_id.is_none());
}

/// A moved cursor means another page: the continuation query starts at the
/// response's end cursor.
#[tokio::test]
async fn test_run_query_returns_continuation_when_cursor_moves() {
    let t = TestClient::new();
    let query = Query::new("Task").start(Bytes::from_static(b"page-a"));
    t.mock.reply(&run_query_response(
        vec![entity_result(&Key::with_id("Task", 1), &Task::titled("x"))],
        Bytes::from_static(b"page-b"),
    ));

    let mut dest: Vec<Task> = Vec::new();
    let (_, next) = t.client.run_query(&query, &mut dest).await.unwrap();

    let next = next.expect("cursor moved, expected a next page");
    assert_eq!(next.start_cursor().as_ref(), b"page-b");
}

/// An end cursor equal to the start cursor is the only exhaustion signal.
#[tokio::test]
async fn test_run_query_stops_when_cursor_is_echoed_back() {
    let t = TestClient::new();
    let query = Query::new("Task").start(Bytes::from_static(b"page-a"));
    t.mock
        .reply(&run_query_response(Vec::new(), Bytes::from_static(b"page-a")));

    let mut dest: Vec<Task> = Vec::new();
    let (keys, next) = t.client.run_query(&query, &mut dest).await.unwrap();

    assert!(keys.is_empty());
    assert!(next.is_none());
}

#[tokio::test]
async fn test_run_query_handles_missing_batch() {
    let t = TestClient::new();
    t.mock.reply(&proto::RunQueryResponse { batch: None });

    let mut dest: Vec<Task> = Vec::new();
    let (keys, next) = t
        .client
        .run_query(&Query::new("Task"), &mut dest)
        .await
        .unwrap();

    assert!(keys.is_empty());
    assert!(dest.is_empty());
    assert!(next.is_none());
}

/// A construction mistake surfaces on execution and never reaches the wire.
#[tokio::test]
async fn test_poisoned_query_short_circuits() {
    let t = TestClient::new();
    let query = Query::new("Task").filter_eq("", Value::Bool(true));

    let mut dest: Vec<Task> = Vec::new();
    let err = t.client.run_query(&query, &mut dest).await.unwrap_err();

    assert_eq!(err.code(), "INVALID_QUERY");
    assert_eq!(t.mock.request_count(), 0);
}

#[tokio::test]
async fn test_namespace_travels_as_partition_id() {
    let t = TestClient::new();
    t.mock
        .reply(&run_query_response(Vec::new(), Bytes::new()));

    let query = Query::new("Task").namespace("tenant-a");
    let mut dest: Vec<Task> = Vec::new();
    t.client.run_query(&query, &mut dest).await.unwrap();

    let request: proto::RunQueryRequest = t.mock.request(0);
    assert_eq!(
        request.partition_id.unwrap().namespace.as_deref(),
        Some("tenant-a")
    );
}

#[tokio::test]
async fn test_transactional_query_carries_transaction_id() {
    let t = TestClient::new();
    t.mock.reply(&proto::BeginTransactionResponse {
        transaction: Bytes::from_static(b"tx-q"),
    });
    let txn = t.client.begin_transaction().await.unwrap();

    t.mock
        .reply(&run_query_response(Vec::new(), Bytes::new()));
    let mut dest: Vec<Task> = Vec::new();
    txn.run_query(&Query::new("Task"), &mut dest).await.unwrap();

    let request: proto::RunQueryRequest = t.mock.request(1);
    assert_eq!(
        request.read_options.unwrap().transaction.as_ref(),
        b"tx-q"
    );
}

/// Filters and limits survive into the continuation query, so driving a
/// stream page by page repeats the same predicate.
#[tokio::test]
async fn test_pagination_preserves_query_shape() {
    let t = TestClient::new();
    let query = Query::new("Task")
        .filter_eq("done", Value::Bool(false))
        .limit(2);

    t.mock.reply(&run_query_response(
        vec![
            entity_result(&Key::with_id("Task", 1), &Task::titled("a")),
            entity_result(&Key::with_id("Task", 2), &Task::titled("b")),
        ],
        Bytes::from_static(b"page-2"),
    ));
    let mut first_page: Vec<Task> = Vec::new();
    let (_, next) = t.client.run_query(&query, &mut first_page).await.unwrap();

    t.mock.reply(&run_query_response(
        vec![entity_result(&Key::with_id("Task", 3), &Task::titled("c"))],
        Bytes::from_static(b"page-2"),
    ));
    let mut second_page: Vec<Task> = Vec::new();
    let (keys, done) = t
        .client
        .run_query(&next.unwrap(), &mut second_page)
        .await
        .unwrap();

    assert_eq!(keys.len(), 1);
    assert!(done.is_none());

    let second_request: proto::RunQueryRequest = t.mock.request(1);
    let wire_query = second_request.query.unwrap();
    assert_eq!(wire_query.start_cursor.as_ref(), b"page-2");
    assert!(wire_query.filter.is_some());
    assert_eq!(wire_query.limit, Some(2));
}
