//! Outbound integrations (OSC and HTTP triggers)
//!
//! The engine never talks to the network itself. It hands
//! [`IntegrationRequest`]s to an [`IntegrationPort`], which must return
//! immediately. [`IntegrationDispatcher`] is the production port: a bounded
//! queue in front of a worker task that owns the OSC socket and the HTTP
//! client. A delivery failure is logged there and never reaches the engine.

pub mod http;
pub mod osc;

pub use http::{build_trigger_url, HttpClient, TemplateValues};
pub use osc::{OscClient, OscKey, OscPayload};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Capacity of the dispatcher queue
pub const DISPATCH_QUEUE_CAPACITY: usize = 256;

/// One outbound send
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrationRequest {
    Osc {
        key: OscKey,
        payload: Option<OscPayload>,
    },
    /// GET to an already resolved and sanitised URL
    Http { url: String },
}

/// Result of one send attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub success: bool,
    pub message: String,
}

impl SendOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Nothing configured to send to; not a failure
    pub fn skipped(reason: impl Into<String>) -> Self {
        let message = reason.into();
        debug!("Integration skipped: {}", message);
        Self {
            success: true,
            message,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Sink for integration requests
///
/// Implementations must not block: the engine calls this from inside a
/// lifecycle evaluation.
pub trait IntegrationPort: Send + Sync {
    fn dispatch(&self, request: IntegrationRequest);
}

/// Port that drops every request
#[derive(Debug, Default, Clone, Copy)]
pub struct NullIntegrations;

impl IntegrationPort for NullIntegrations {
    fn dispatch(&self, _request: IntegrationRequest) {}
}

/// Queue-backed port that performs sends on a worker task
#[derive(Debug, Clone)]
pub struct IntegrationDispatcher {
    tx: mpsc::Sender<IntegrationRequest>,
}

impl IntegrationDispatcher {
    /// Spawn the worker task
    ///
    /// OSC messages are sent in order on the worker. Each HTTP request gets
    /// its own task so a slow endpoint cannot hold up the queue.
    pub fn spawn(osc: OscClient, http: HttpClient) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<IntegrationRequest>(DISPATCH_QUEUE_CAPACITY);

        let handle = tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                match request {
                    IntegrationRequest::Osc { key, payload } => {
                        let outcome = osc.send(key, payload).await;
                        if !outcome.success {
                            warn!("OSC send failed: {}", outcome.message);
                        }
                    }
                    IntegrationRequest::Http { url } => {
                        let client = http.clone();
                        tokio::spawn(async move {
                            let outcome = client.send(&url).await;
                            if !outcome.success {
                                warn!("HTTP trigger failed: {}", outcome.message);
                            }
                        });
                    }
                }
            }
            debug!("Integration dispatcher stopped");
        });

        (Self { tx }, handle)
    }
}

impl IntegrationPort for IntegrationDispatcher {
    fn dispatch(&self, request: IntegrationRequest) {
        if let Err(e) = self.tx.try_send(request) {
            warn!("Integration queue rejected request: {}", e);
        }
    }
}
