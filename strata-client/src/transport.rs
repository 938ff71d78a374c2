/// Transport abstraction and HTTP implementation
///
/// The client issues every remote operation as a single HTTP POST carrying a
/// protobuf-encoded body. The `Transport` trait is the injection seam:
/// production code uses `HttpTransport`, tests script a `MockTransport`.
/// Timeouts, TLS and connection pooling all belong to the transport; the
/// layers above never retry or reinterpret its failures.
use async_trait::async_trait;
use prost::Message;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{ClientError, Result};

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `url` and return the raw response body.
    ///
    /// Implementations must surface network failures and non-2xx statuses
    /// as `ClientError::Transport` without consuming or retrying anything.
    async fn send(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>>;
}

/// Production transport over a shared `reqwest` client.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured `reqwest` client (timeouts, proxies, TLS).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        let response = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/x-protobuf")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Transport(format!(
                "{} returned {}",
                url, status
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Builds the endpoint URL for one remote operation.
pub(crate) fn endpoint_url(base_url: &str, dataset_id: &str, method: &str) -> String {
    format!("{}/datasets/{}/{}", base_url, dataset_id, method)
}

/// Encodes `request`, POSTs it to `url`, and decodes the response body.
pub(crate) async fn call<Req, Resp>(
    transport: &dyn Transport,
    url: &str,
    request: &Req,
) -> Result<Resp>
where
    Req: Message,
    Resp: Message + Default,
{
    tracing::debug!(url, request_bytes = request.encoded_len(), "issuing request");
    let body = match transport.send(url, request.encode_to_vec()).await {
        Ok(body) => body,
        Err(err) => {
            tracing::warn!(url, error = %err, "request failed");
            return Err(err);
        }
    };
    Ok(Resp::decode(body.as_slice())?)
}

/// Scripted transport for tests: records every request it sees and answers
/// each with the next queued reply.
pub struct MockTransport {
    requests: Mutex<Vec<(String, Vec<u8>)>>,
    replies: Mutex<VecDeque<Result<Vec<u8>>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a protobuf message as the next response body.
    pub fn reply<M: Message>(&self, response: &M) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(response.encode_to_vec()));
    }

    /// Queue a raw response body (e.g. garbage to exercise decode errors).
    pub fn reply_raw(&self, body: Vec<u8>) {
        self.replies.lock().unwrap().push_back(Ok(body));
    }

    /// Queue an error as the next response.
    pub fn reply_error(&self, error: ClientError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Number of requests issued so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// URL of the `index`-th request.
    pub fn request_url(&self, index: usize) -> String {
        self.requests.lock().unwrap()[index].0.clone()
    }

    /// Decode the `index`-th request body as `M`.
    pub fn request<M: Message + Default>(&self, index: usize) -> M {
        let body = self.requests.lock().unwrap()[index].1.clone();
        M::decode(body.as_slice()).expect("recorded request does not decode")
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push((url.to_string(), body));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ClientError::Transport(
                    "mock transport has no reply queued".to_string(),
                ))
            })
    }
}
