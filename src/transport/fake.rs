//! In-process fake transport for unit tests
//!
//! [`FakeTransport`] replaces real network I/O in tests. Queue the
//! responses the "server" should produce with [`FakeTransport::enqueue`],
//! wire the transport into the code under test, then inspect what was
//! posted via [`FakeTransport::sent`].
//!
//! Each `post` consumes one queued response, in FIFO order. Posting with
//! an empty queue panics -- a test that sends more requests than it
//! scripted responses for is broken.

use std::collections::VecDeque;
use std::sync::Mutex;

use url::Url;

use crate::error::Result;
use crate::transport::{Credentials, Transport, TransportResponse};

/// One recorded outbound request.
#[derive(Debug, Clone)]
pub struct SentRequest {
    /// The URL the envelope was posted to.
    pub url: Url,
    /// The credentials attached at post time, if any.
    pub credentials: Option<Credentials>,
    /// The serialized envelope body.
    pub body: String,
}

/// Scriptable in-process [`Transport`] for tests.
///
/// # Examples
///
/// ```ignore
/// let transport = FakeTransport::new();
/// transport.enqueue(TransportResponse { status: 200, body: "{}".to_string() });
/// // ... drive the code under test, then:
/// let sent = transport.sent();
/// assert_eq!(sent.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct FakeTransport {
    /// Responses handed out by `post`, FIFO.
    responses: Mutex<VecDeque<TransportResponse>>,
    /// Every request posted so far, in order.
    requests: Mutex<Vec<SentRequest>>,
}

impl FakeTransport {
    /// Create a fake with an empty response queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a future `post`.
    pub fn enqueue(&self, response: TransportResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Queue a 200 response with the given body.
    pub fn enqueue_ok(&self, body: &str) {
        self.enqueue(TransportResponse {
            status: 200,
            body: body.to_string(),
        });
    }

    /// Snapshot of every request posted so far.
    pub fn sent(&self) -> Vec<SentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    /// Record the request and hand out the next queued response.
    ///
    /// # Panics
    ///
    /// Panics if no response is queued.
    async fn post(
        &self,
        url: &Url,
        credentials: Option<&Credentials>,
        body: String,
    ) -> Result<TransportResponse> {
        self.requests.lock().unwrap().push(SentRequest {
            url: url.clone(),
            credentials: credentials.cloned(),
            body,
        });

        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("FakeTransport: no queued response for post");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_url() -> Url {
        Url::parse("http://localhost/rpc").unwrap()
    }

    #[tokio::test]
    async fn test_post_records_request_and_returns_queued_response() {
        let transport = FakeTransport::new();
        transport.enqueue_ok(r#"{"result":1}"#);

        let response = transport
            .post(&test_url(), None, "{}".to_string())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"result":1}"#);

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "{}");
        assert!(sent[0].credentials.is_none());
    }

    #[tokio::test]
    async fn test_responses_are_consumed_in_fifo_order() {
        let transport = FakeTransport::new();
        transport.enqueue_ok("first");
        transport.enqueue_ok("second");

        let first = transport
            .post(&test_url(), None, "a".to_string())
            .await
            .unwrap();
        let second = transport
            .post(&test_url(), None, "b".to_string())
            .await
            .unwrap();

        assert_eq!(first.body, "first");
        assert_eq!(second.body, "second");
    }

    #[tokio::test]
    async fn test_post_records_credentials() {
        let transport = FakeTransport::new();
        transport.enqueue_ok("{}");

        let credentials = Credentials::new("user", "pass");
        transport
            .post(&test_url(), Some(&credentials), "{}".to_string())
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].credentials.as_ref().unwrap().user, "user");
    }
}
