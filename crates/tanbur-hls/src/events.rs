//! Build progress events.
//!
//! Observability side-channel: a lossy broadcast with no backpressure.
//! Nothing in the build path depends on anyone listening.

use tokio::sync::broadcast;

use crate::subtitle::TextSourceKind;

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Events emitted while a build runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// The manifest arrived and parsed.
    ManifestLoaded {
        master: bool,
        variants: usize,
        subtitle_tracks: usize,
    },
    /// Variant filtering finished with a non-empty result.
    VariantsSelected { indices: Vec<usize> },
    /// Text source policy decided.
    TextSourceChosen { kind: TextSourceKind },
    /// The renderer set was handed to the host.
    Completed,
    /// The build failed; the host got the error via its callback.
    Failed { error: String },
    /// The build observed cancellation and stopped.
    Canceled,
}

/// Broadcast emitter for build events. Cheap to clone.
#[derive(Clone)]
pub struct EventEmitter {
    tx: broadcast::Sender<BuildEvent>,
}

impl EventEmitter {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BuildEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: BuildEvent) {
        // No receivers is fine.
        let _ = self.tx.send(event);
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_events_in_order() {
        let emitter = EventEmitter::new();
        let mut rx = emitter.subscribe();

        emitter.emit(BuildEvent::ManifestLoaded {
            master: true,
            variants: 3,
            subtitle_tracks: 1,
        });
        emitter.emit(BuildEvent::Completed);

        assert!(matches!(
            rx.recv().await.unwrap(),
            BuildEvent::ManifestLoaded { variants: 3, .. }
        ));
        assert_eq!(rx.recv().await.unwrap(), BuildEvent::Completed);
    }

    #[test]
    fn emitting_without_subscribers_does_not_panic() {
        let emitter = EventEmitter::new();
        emitter.emit(BuildEvent::Canceled);
    }
}
