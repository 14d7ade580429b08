//! Mock port implementations for testing.
//!
//! Configurable stand-ins for the completion service and the messaging
//! transport, allowing router and handler tests to run without external
//! APIs. Shared with the integration tests in `tests/`.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::foundation::{ReplyToken, UserId};
use crate::ports::{
    CompletionError, CompletionRequest, CompletionService, MessagingTransport, OutgoingMessage,
    TransportError,
};

/// Mock completion service.
///
/// Returns pre-configured responses in order and records every request for
/// verification; with no queued responses it echoes a fixed answer.
#[derive(Debug, Clone, Default)]
pub struct MockCompletionService {
    responses: Arc<Mutex<VecDeque<Result<String, MockCompletionError>>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// Cloneable error shapes for queueing.
#[derive(Debug, Clone)]
pub enum MockCompletionError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockCompletionError> for CompletionError {
    fn from(err: MockCompletionError) -> Self {
        match err {
            MockCompletionError::RateLimited { retry_after_secs } => {
                CompletionError::rate_limited(retry_after_secs)
            }
            MockCompletionError::Unavailable { message } => CompletionError::unavailable(message),
            MockCompletionError::Network { message } => CompletionError::network(message),
            MockCompletionError::Timeout { timeout_secs } => {
                CompletionError::Timeout { timeout_secs }
            }
        }
    }
}

impl MockCompletionService {
    /// Creates a mock with no queued responses (echo mode).
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(content.into()));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: MockCompletionError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Number of completion calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Copy of the recorded requests.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for MockCompletionService {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(request);

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(content)) => Ok(content),
            Some(Err(err)) => Err(err.into()),
            None => Ok("mock completion".to_string()),
        }
    }
}

/// One delivery recorded by [`MockTransport`].
#[derive(Debug, Clone)]
pub enum Delivery {
    Reply {
        token: ReplyToken,
        messages: Vec<OutgoingMessage>,
    },
    Push {
        user_id: UserId,
        messages: Vec<OutgoingMessage>,
    },
}

/// Mock messaging transport.
///
/// Records deliveries; reply calls can be scripted to fail with an
/// invalid-token error to exercise the push fallback.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    deliveries: Arc<Mutex<Vec<Delivery>>>,
    fail_replies_with_invalid_token: Arc<Mutex<bool>>,
    fail_pushes: Arc<Mutex<bool>>,
}

impl MockTransport {
    /// Creates a transport where every delivery succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent reply calls fail as invalid/expired token.
    pub fn expire_reply_tokens(&self) {
        *self.fail_replies_with_invalid_token.lock().unwrap() = true;
    }

    /// Makes subsequent push calls fail with a network error.
    pub fn break_push(&self) {
        *self.fail_pushes.lock().unwrap() = true;
    }

    /// Copy of all recorded deliveries.
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }

    /// Visible texts of all delivered messages, replies and pushes alike.
    pub fn delivered_texts(&self) -> Vec<String> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .flat_map(|d| match d {
                Delivery::Reply { messages, .. } | Delivery::Push { messages, .. } => {
                    messages.iter().map(|m| m.text_content().to_string())
                }
            })
            .collect()
    }

    /// Number of push deliveries recorded.
    pub fn push_count(&self) -> usize {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .filter(|d| matches!(d, Delivery::Push { .. }))
            .count()
    }
}

#[async_trait]
impl MessagingTransport for MockTransport {
    fn verify_signature(&self, _body: &[u8], signature: &str) -> bool {
        // Tests sign with the fixed marker rather than real HMAC.
        signature == "valid"
    }

    async fn reply(
        &self,
        token: &ReplyToken,
        messages: &[OutgoingMessage],
    ) -> Result<(), TransportError> {
        if *self.fail_replies_with_invalid_token.lock().unwrap() {
            return Err(TransportError::InvalidReplyToken);
        }
        self.deliveries.lock().unwrap().push(Delivery::Reply {
            token: token.clone(),
            messages: messages.to_vec(),
        });
        Ok(())
    }

    async fn push(
        &self,
        user_id: &UserId,
        messages: &[OutgoingMessage],
    ) -> Result<(), TransportError> {
        if *self.fail_pushes.lock().unwrap() {
            return Err(TransportError::network("push endpoint unreachable"));
        }
        self.deliveries.lock().unwrap().push(Delivery::Push {
            user_id: user_id.clone(),
            messages: messages.to_vec(),
        });
        Ok(())
    }
}
