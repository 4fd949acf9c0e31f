//! Progress reporting for pipeline runs
//!
//! The orchestrator emits a fixed ladder of checkpoints (25, 50, 75, 100)
//! through the [`ProgressObserver`] port. Observers must be cheap and must
//! never fail the pipeline; delivery is fire-and-forget.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Pipeline step a progress event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStep {
    Outline,
    Lessons,
    Vocabulary,
    Phrases,
    Complete,
}

/// One progress checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub step: ProgressStep,
    /// Percentage complete, 0-100.
    pub progress: u8,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(step: ProgressStep, progress: u8, message: impl Into<String>) -> Self {
        Self { step, progress, message: message.into() }
    }
}

/// Observer port for pipeline progress.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// Observer that ignores every event; the default wiring.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

/// Forwards events into a tokio channel, e.g. toward a progress bar or a
/// server-push transport.
pub struct ChannelObserver {
    sender: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelObserver {
    pub fn new(sender: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { sender }
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_progress(&self, event: &ProgressEvent) {
        // The receiver may already be gone; that must not fail the run.
        let _ = self.sender.send(event.clone());
    }
}

/// Observer that records every event, for assertions in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: std::sync::Mutex<Vec<ProgressEvent>>,
}

#[cfg(test)]
impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl ProgressObserver for RecordingObserver {
    fn on_progress(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_wire_names_are_lowercase() {
        assert_eq!(serde_json::to_string(&ProgressStep::Outline).unwrap(), "\"outline\"");
        assert_eq!(serde_json::to_string(&ProgressStep::Complete).unwrap(), "\"complete\"");
    }

    #[test]
    fn test_event_serializes_flat() {
        let event = ProgressEvent::new(ProgressStep::Vocabulary, 75, "Vocabulary ready");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["step"], "vocabulary");
        assert_eq!(json["progress"], 75);
        assert_eq!(json["message"], "Vocabulary ready");
    }

    #[tokio::test]
    async fn test_channel_observer_forwards_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let observer = ChannelObserver::new(tx);

        observer.on_progress(&ProgressEvent::new(ProgressStep::Outline, 25, "outline done"));
        let received = rx.recv().await.unwrap();
        assert_eq!(received.progress, 25);
    }

    #[tokio::test]
    async fn test_channel_observer_survives_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let observer = ChannelObserver::new(tx);
        observer.on_progress(&ProgressEvent::new(ProgressStep::Complete, 100, "done"));
    }
}
