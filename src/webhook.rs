//! Best-effort notification of newly created suggestions.
//!
//! Payloads go through a bounded queue drained by a single worker task; each
//! delivery runs with a request timeout and gets one retry. Nothing here ever
//! reaches the HTTP client that created the suggestion.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, warn};

use crate::suggestions::repo_types::Suggestion;

const QUEUE_CAPACITY: usize = 256;
const MAX_IN_FLIGHT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    pub id: i64,
    pub message: String,
    pub email: String,
}

impl From<&Suggestion> for WebhookPayload {
    fn from(s: &Suggestion) -> Self {
        Self {
            id: s.id,
            message: s.message.clone(),
            email: s.email.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("webhook responded with status {0}")]
    Status(StatusCode),
}

/// Fire-and-forget sink for created suggestions. Must never block the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, payload: WebhookPayload);
}

pub struct WebhookNotifier {
    tx: Option<mpsc::Sender<WebhookPayload>>,
}

impl WebhookNotifier {
    /// Starts the delivery worker. Must be called inside a Tokio runtime.
    /// With `url == None` no worker is started and `notify` is a no-op.
    pub fn spawn(url: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let Some(url) = url else {
            return Ok(Self { tx: None });
        };

        let client = Client::builder().timeout(timeout).build()?;
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(run_worker(client, url, rx));
        Ok(Self { tx: Some(tx) })
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, payload: WebhookPayload) {
        let Some(tx) = &self.tx else {
            debug!(id = payload.id, "WEBHOOK_URL not configured, skipping webhook call");
            return;
        };
        match tx.try_send(payload) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(p)) => {
                warn!(id = p.id, "webhook queue full, dropping notification");
            }
            Err(mpsc::error::TrySendError::Closed(p)) => {
                error!(id = p.id, "webhook worker stopped, dropping notification");
            }
        }
    }
}

async fn run_worker(client: Client, url: String, mut rx: mpsc::Receiver<WebhookPayload>) {
    let slots = Arc::new(Semaphore::new(MAX_IN_FLIGHT));
    while let Some(payload) = rx.recv().await {
        let Ok(permit) = slots.clone().acquire_owned().await else {
            break;
        };
        let client = client.clone();
        let url = url.clone();
        tokio::spawn(async move {
            let _permit = permit;
            match deliver(&client, &url, &payload).await {
                Ok(()) => info!(id = payload.id, "webhook called successfully"),
                Err(e) => error!(id = payload.id, error = %e, "webhook delivery failed"),
            }
        });
    }
    debug!("webhook worker exiting");
}

/// POSTs `payload` to `url`, retrying once on a transport error or non-2xx status.
pub async fn deliver(
    client: &Client,
    url: &str,
    payload: &WebhookPayload,
) -> Result<(), WebhookError> {
    match send_once(client, url, payload).await {
        Ok(()) => Ok(()),
        Err(first) => {
            warn!(id = payload.id, error = %first, "webhook attempt failed, retrying once");
            send_once(client, url, payload).await
        }
    }
}

async fn send_once(
    client: &Client,
    url: &str,
    payload: &WebhookPayload,
) -> Result<(), WebhookError> {
    let res = client.post(url).json(payload).send().await?;
    let status = res.status();
    if !status.is_success() {
        return Err(WebhookError::Status(status));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn payload() -> WebhookPayload {
        WebhookPayload {
            id: 42,
            message: "crashes on save".into(),
            email: "a@x.com".into(),
        }
    }

    fn client(timeout: Duration) -> Client {
        Client::builder().timeout(timeout).build().unwrap()
    }

    #[test]
    fn payload_serializes_id_message_email_only() {
        let v = serde_json::to_value(payload()).unwrap();
        assert_eq!(
            v,
            json!({"id": 42, "message": "crashes on save", "email": "a@x.com"})
        );
    }

    #[tokio::test]
    async fn deliver_posts_json_once_on_success() {
        let server = MockServer::start_async().await;
        let hook = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/hook")
                    .header("content-type", "application/json")
                    .json_body(json!({"id": 42, "message": "crashes on save", "email": "a@x.com"}));
                then.status(200);
            })
            .await;

        deliver(&client(Duration::from_secs(5)), &server.url("/hook"), &payload())
            .await
            .unwrap();
        hook.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn deliver_retries_once_then_reports_status() {
        let server = MockServer::start_async().await;
        let hook = server
            .mock_async(|when, then| {
                when.method(POST).path("/hook");
                then.status(500);
            })
            .await;

        let err = deliver(&client(Duration::from_secs(5)), &server.url("/hook"), &payload())
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::Status(s) if s == StatusCode::INTERNAL_SERVER_ERROR));
        hook.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn deliver_times_out_slow_endpoint() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/slow");
                then.status(200).delay(Duration::from_millis(500));
            })
            .await;

        let err = deliver(&client(Duration::from_millis(50)), &server.url("/slow"), &payload())
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::Transport(_)));
    }

    #[tokio::test]
    async fn notifier_delivers_in_background() {
        let server = MockServer::start_async().await;
        let hook = server
            .mock_async(|when, then| {
                when.method(POST).path("/hook");
                then.status(204);
            })
            .await;

        let notifier =
            WebhookNotifier::spawn(Some(server.url("/hook")), Duration::from_secs(5)).unwrap();
        notifier.notify(payload());

        for _ in 0..100 {
            if hook.hits_async().await == 1 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("webhook was not delivered");
    }

    #[tokio::test]
    async fn notifier_without_url_is_a_noop() {
        let notifier = WebhookNotifier::spawn(None, Duration::from_secs(5)).unwrap();
        assert!(notifier.tx.is_none());
        notifier.notify(payload());
    }
}
