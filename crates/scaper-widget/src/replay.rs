//! Message replay
//!
//! Rebuilds interactive state on a fresh scene by applying recorded
//! messages one at a time, in recorded order. Later messages are defined
//! relative to the state earlier ones leave behind, so nothing is reordered
//! or batched.

use scaper_core::{EngineError, Message, Scene};

/// A message the scene failed to apply for a reason other than a stale target
#[derive(Debug, Clone, PartialEq)]
pub struct MessageFailure {
    /// Position in the queue
    pub index: usize,
    pub kind: String,
    pub error: EngineError,
}

/// Outcome of one replay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayReport {
    pub applied: usize,
    /// Messages whose target no longer exists
    pub skipped: usize,
    pub failures: Vec<MessageFailure>,
}

/// Apply `queue` to `scene` in order
pub fn replay<S: Scene + ?Sized>(scene: &mut S, queue: &[Message]) -> ReplayReport {
    let mut report = ReplayReport::default();

    for (index, message) in queue.iter().enumerate() {
        match scene.handle_message(message) {
            Ok(()) => report.applied += 1,
            Err(EngineError::StaleMessageTarget(target)) => {
                tracing::debug!(
                    "Skipping '{}' message {}: target '{}' is gone",
                    message.kind,
                    index,
                    target
                );
                report.skipped += 1;
            }
            Err(error) => {
                tracing::warn!("Failed to replay '{}' message {}: {}", message.kind, index, error);
                report.failures.push(MessageFailure {
                    index,
                    kind: message.kind.clone(),
                    error,
                });
            }
        }
    }

    tracing::debug!(
        "Replayed {} of {} messages ({} skipped)",
        report.applied,
        queue.len(),
        report.skipped
    );
    report
}
