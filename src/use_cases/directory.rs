use crate::domain::Room;
use tokio::sync::watch;

/// An incremental change delivered by the directory event feed.
///
/// `created`, `updated` and `started` all carry a complete room and share
/// upsert semantics; `deleted` carries only the identity key.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    Upsert(Room),
    Removed(String),
}

/// Local mirror of the room directory, kept consistent by applying the
/// bootstrap result as a full replace and feed events in arrival order.
///
/// Events arriving before the bootstrap completes are applied immediately;
/// upserts are idempotent, so a later full replace cannot duplicate entries.
#[derive(Debug, Clone)]
pub struct RoomDirectory {
    tx: watch::Sender<Vec<Room>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self { tx }
    }

    /// Replaces the whole mirror with a bootstrap result.
    pub fn replace_all(&self, rooms: Vec<Room>) {
        let _ = self.tx.send_replace(rooms);
    }

    /// Applies one feed event: upsert by room id (insert if absent, full
    /// field replace if present) or unconditional removal.
    pub fn apply(&self, event: RoomEvent) {
        self.tx.send_modify(|rooms| match event {
            RoomEvent::Upsert(room) => {
                match rooms.iter_mut().find(|r| r.room_id == room.room_id) {
                    Some(existing) => *existing = room,
                    None => rooms.push(room),
                }
            }
            RoomEvent::Removed(room_id) => {
                rooms.retain(|r| r.room_id != room_id);
            }
        });
    }

    /// Subscribes the presentation side.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Room>> {
        self.tx.subscribe()
    }

    /// A copy of the current room list.
    pub fn rooms(&self) -> Vec<Room> {
        self.tx.borrow().clone()
    }
}

impl Default for RoomDirectory {
    fn default() -> Self {
        Self::new()
    }
}
