use crate::domain::MatchSnapshot;
use tokio::sync::watch;

/// Authoritative mirror of match state. Single writer (the game session
/// channel task); the renderer reads through a watch subscription.
///
/// Every apply is a full-value replace; readers never observe a
/// half-updated snapshot.
#[derive(Debug, Clone)]
pub struct MatchMirror {
    tx: watch::Sender<MatchSnapshot>,
}

impl MatchMirror {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(MatchSnapshot::default());
        Self { tx }
    }

    /// Replaces the mirrored snapshot wholesale and notifies subscribers.
    pub fn apply(&self, snapshot: MatchSnapshot) {
        // send_replace never fails even with no active subscribers.
        let _ = self.tx.send_replace(snapshot);
    }

    /// Subscribes the renderer/presentation side.
    pub fn subscribe(&self) -> watch::Receiver<MatchSnapshot> {
        self.tx.subscribe()
    }

    /// A copy of the most recent snapshot.
    pub fn latest(&self) -> MatchSnapshot {
        self.tx.borrow().clone()
    }
}

impl Default for MatchMirror {
    fn default() -> Self {
        Self::new()
    }
}
