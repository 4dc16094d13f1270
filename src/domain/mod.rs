// Domain layer: value types mirrored from the authoritative server.

pub mod intent;
pub mod match_state;
pub mod room;
pub mod sprites;

pub use intent::{ControlKey, Intent};
pub use match_state::{Bullet, Invader, MatchSnapshot, Player, Shield, Shot, Ufo};
pub use room::{Room, RoomStatus};
