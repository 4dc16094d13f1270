/// Room lifecycle phase as reported by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoomStatus {
    #[default]
    Waiting,
    Started,
}

impl RoomStatus {
    /// Normalizes the wire status case-insensitively. Anything that is not
    /// `started` counts as waiting.
    pub fn parse(raw: &str) -> RoomStatus {
        if raw.eq_ignore_ascii_case("started") {
            RoomStatus::Started
        } else {
            RoomStatus::Waiting
        }
    }
}

/// A joinable/active match room. Identity key is `room_id`; the directory
/// mirror holds at most one entry per id.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub room_id: String,
    pub room_name: String,
    pub player_ids: Vec<String>,
    pub status: RoomStatus,
    pub max_player: u32,
    pub wave: u32,
    /// Opaque server timestamps; the client never interprets them.
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
}
