// Wire protocol DTOs and conversions for both server-push channels.
// Domain types stay serde-free; everything on the wire goes through here.

use crate::domain::{
    Bullet, Intent, Invader, MatchSnapshot, Player, Room, RoomStatus, Shield, Shot, Ufo,
};
use crate::use_cases::RoomEvent;
use serde::{Deserialize, Serialize};

/// Messages the match server pushes over the gameplay WebSocket.
///
/// Unknown `type` values and payloads that fail to parse are treated alike
/// by the channel: the message is dropped and the prior snapshot stands.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum ServerMessage {
    State(MatchSnapshotDto),
}

/// Messages the client sends over the gameplay WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum ClientMessage {
    Input(IntentDto),
    Quit,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntentDto {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl From<Intent> for IntentDto {
    fn from(intent: Intent) -> Self {
        Self {
            left: intent.left,
            right: intent.right,
            fire: intent.fire,
        }
    }
}

fn default_level() -> i32 {
    1
}

/// Complete match snapshot as sent by the server. Missing fields default to
/// their empty/neutral values rather than preserving previous state; the
/// server normally sends complete snapshots.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshotDto {
    #[serde(default)]
    pub players: Vec<PlayerDto>,
    #[serde(default)]
    pub invaders: Vec<InvaderDto>,
    #[serde(default)]
    pub invader_bullets: Vec<BulletDto>,
    #[serde(default)]
    pub shields: Vec<ShieldDto>,
    #[serde(default)]
    pub ufo: Option<UfoDto>,
    #[serde(default = "default_level")]
    pub level: i32,
    #[serde(default)]
    pub game_over: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub lives: i32,
    #[serde(default)]
    pub shot: Option<ShotDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShotDto {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub h: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvaderDto {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    // Wire name collides with the message discriminator keyword.
    #[serde(rename = "type", default)]
    pub kind: u8,
    #[serde(default)]
    pub alive: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulletDto {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub h: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShieldDto {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub w: f32,
    #[serde(default)]
    pub h: f32,
    #[serde(default)]
    pub hp: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UfoDto {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

impl From<MatchSnapshotDto> for MatchSnapshot {
    fn from(dto: MatchSnapshotDto) -> Self {
        Self {
            players: dto.players.into_iter().map(Player::from).collect(),
            invaders: dto.invaders.into_iter().map(Invader::from).collect(),
            invader_bullets: dto.invader_bullets.into_iter().map(Bullet::from).collect(),
            shields: dto.shields.into_iter().map(Shield::from).collect(),
            ufo: dto.ufo.map(Ufo::from),
            level: dto.level,
            game_over: dto.game_over,
        }
    }
}

impl From<PlayerDto> for Player {
    fn from(dto: PlayerDto) -> Self {
        Self {
            user_id: dto.user_id,
            username: dto.username,
            x: dto.x,
            y: dto.y,
            lives: dto.lives,
            shot: dto.shot.map(Shot::from),
        }
    }
}

impl From<ShotDto> for Shot {
    fn from(dto: ShotDto) -> Self {
        Self {
            x: dto.x,
            y: dto.y,
            h: dto.h,
        }
    }
}

impl From<InvaderDto> for Invader {
    fn from(dto: InvaderDto) -> Self {
        Self {
            x: dto.x,
            y: dto.y,
            kind: dto.kind,
            alive: dto.alive,
        }
    }
}

impl From<BulletDto> for Bullet {
    fn from(dto: BulletDto) -> Self {
        Self {
            x: dto.x,
            y: dto.y,
            h: dto.h,
        }
    }
}

impl From<ShieldDto> for Shield {
    fn from(dto: ShieldDto) -> Self {
        Self {
            x: dto.x,
            y: dto.y,
            w: dto.w,
            h: dto.h,
            hp: dto.hp,
        }
    }
}

impl From<UfoDto> for Ufo {
    fn from(dto: UfoDto) -> Self {
        Self { x: dto.x, y: dto.y }
    }
}

fn default_max_player() -> u32 {
    2
}

/// Room as carried by the bootstrap response and by directory event payloads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub room_id: String,
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub player_ids: Vec<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default = "default_max_player")]
    pub max_player: u32,
    #[serde(default)]
    pub wave: u32,
    #[serde(default)]
    pub started_at: Option<serde_json::Value>,
    #[serde(default)]
    pub ended_at: Option<serde_json::Value>,
}

impl From<RoomDto> for Room {
    fn from(dto: RoomDto) -> Self {
        Self {
            room_id: dto.room_id,
            room_name: dto.room_name,
            player_ids: dto.player_ids,
            status: RoomStatus::parse(&dto.status),
            max_player: dto.max_player,
            wave: dto.wave,
            started_at: opaque_timestamp(dto.started_at),
            ended_at: opaque_timestamp(dto.ended_at),
        }
    }
}

// Timestamps arrive as ISO strings or numeric epochs depending on the server
// build; the client keeps them opaque either way.
fn opaque_timestamp(value: Option<serde_json::Value>) -> Option<String> {
    match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    }
}

/// Event data on the directory stream: `{type, payload}` where the type
/// duplicates the named SSE event.
#[derive(Debug, Deserialize)]
struct DirectoryEnvelope {
    #[serde(default)]
    payload: serde_json::Value,
}

/// `room.deleted` carries either the bare id or an object keyed by roomId.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeletedPayload {
    Id(String),
    Keyed {
        #[serde(rename = "roomId")]
        room_id: String,
    },
}

/// Decodes one named directory event into a mirror operation. Returns `None`
/// for the server's `hello` greeting, unknown event names and payloads that
/// fail to parse; those are dropped silently.
pub fn decode_directory_event(name: &str, data: &str) -> Option<RoomEvent> {
    let envelope: DirectoryEnvelope = serde_json::from_str(data).ok()?;
    match name {
        "room.created" | "room.updated" | "room.started" => {
            let room: RoomDto = serde_json::from_value(envelope.payload).ok()?;
            Some(RoomEvent::Upsert(room.into()))
        }
        "room.deleted" => {
            let deleted: DeletedPayload = serde_json::from_value(envelope.payload).ok()?;
            let room_id = match deleted {
                DeletedPayload::Id(id) => id,
                DeletedPayload::Keyed { room_id } => room_id,
            };
            Some(RoomEvent::Removed(room_id))
        }
        _ => None,
    }
}
