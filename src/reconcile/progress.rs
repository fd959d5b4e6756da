//! Progress events narrated by a reconciliation run.
//!
//! A run pushes events into a bounded channel; the consumer reads them as a
//! [`ProgressStream`]. The stream is finite: it ends right after the first
//! terminal event (success or error). The terminal methods consume the
//! reporter, so nothing can be sent after them.

use futures::StreamExt;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::ReconcileError;

/// Events buffered between a run and its consumer
pub const EVENT_BUFFER: usize = 16;

/// Stream of progress events for one run
pub type ProgressStream = BoxStream<'static, ProgressEvent>;

/// Whether an event is intermediate or ends the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Progress,
    Success,
    Error,
}

/// One progress notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Human-readable status line
    pub status: String,
    /// Percent complete, 0-100
    pub progress: u8,
    pub kind: EventKind,
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        self.kind != EventKind::Progress
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Encode as a server-sent-events frame (`data: {...}\n\n`).
    pub fn to_sse_frame(&self) -> Result<String, serde_json::Error> {
        Ok(format!("data: {}\n\n", self.to_json()?))
    }
}

/// Sending half of a run's event channel.
pub struct ProgressReporter {
    tx: Option<mpsc::Sender<ProgressEvent>>,
    last: u8,
}

impl ProgressReporter {
    /// A reporter wired to a fresh stream.
    pub fn channel(capacity: usize) -> (Self, ProgressStream) {
        let (tx, rx) = mpsc::channel(capacity);
        let reporter = Self {
            tx: Some(tx),
            last: 0,
        };
        (reporter, into_stream(rx))
    }

    /// A reporter nobody listens to, for non-streaming callers.
    pub fn silent() -> Self {
        Self { tx: None, last: 0 }
    }

    /// True once the consumer has dropped its stream.
    pub fn is_cancelled(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| tx.is_closed())
    }

    /// Emit an intermediate event.
    ///
    /// Progress never goes backwards and stays below 100 until the run ends.
    /// Fails with [`ReconcileError::Cancelled`] when the consumer is gone.
    pub async fn report(
        &mut self,
        progress: u8,
        status: impl Into<String>,
    ) -> Result<(), ReconcileError> {
        let progress = progress.clamp(self.last, 99);
        self.last = progress;
        self.send(ProgressEvent {
            status: status.into(),
            progress,
            kind: EventKind::Progress,
        })
        .await
    }

    /// Emit the terminal success event.
    pub async fn succeed(mut self, status: impl Into<String>) {
        let _ = self
            .send(ProgressEvent {
                status: status.into(),
                progress: 100,
                kind: EventKind::Success,
            })
            .await;
    }

    /// Emit the terminal error event.
    pub async fn fail(mut self, error: &ReconcileError) {
        let _ = self
            .send(ProgressEvent {
                status: format!("Error: {error}"),
                progress: 100,
                kind: EventKind::Error,
            })
            .await;
    }

    async fn send(&mut self, event: ProgressEvent) -> Result<(), ReconcileError> {
        let Some(tx) = &self.tx else {
            return Ok(());
        };
        tracing::debug!("Progress {}%: {}", event.progress, event.status);
        tx.send(event).await.map_err(|_| ReconcileError::Cancelled)
    }
}

/// Convert the receiver into a stream that stops after the first terminal event.
fn into_stream(rx: mpsc::Receiver<ProgressEvent>) -> ProgressStream {
    futures::stream::unfold((rx, false), |(mut rx, finished)| async move {
        if finished {
            return None;
        }
        let event = rx.recv().await?;
        let finished = event.is_terminal();
        Some((event, (rx, finished)))
    })
    .boxed()
}
