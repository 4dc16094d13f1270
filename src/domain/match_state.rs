// Match-state entities as last received from the authoritative server.
// The client never mutates these in place; snapshots are replaced wholesale.

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub user_id: String,
    pub username: String,
    pub x: f32,
    pub y: f32,
    pub lives: i32,
    /// The player's in-flight shot, if any.
    pub shot: Option<Shot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    pub x: f32,
    pub y: f32,
    pub h: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invader {
    pub x: f32,
    pub y: f32,
    /// Invader variant (1 squid, 2 crab, 3 octopus); selects the sprite.
    pub kind: u8,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub h: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shield {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub hp: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ufo {
    pub x: f32,
    pub y: f32,
}

/// Complete match state. Exactly the most recently received and successfully
/// parsed `state` message; parse failures leave the prior snapshot untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSnapshot {
    pub players: Vec<Player>,
    pub invaders: Vec<Invader>,
    pub invader_bullets: Vec<Bullet>,
    pub shields: Vec<Shield>,
    pub ufo: Option<Ufo>,
    pub level: i32,
    pub game_over: bool,
}

impl Default for MatchSnapshot {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            invaders: Vec::new(),
            invader_bullets: Vec::new(),
            shields: Vec::new(),
            ufo: None,
            level: 1,
            game_over: false,
        }
    }
}

impl MatchSnapshot {
    /// Looks up a player by the opaque user id.
    pub fn player(&self, user_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.user_id == user_id)
    }

    /// True if the player exists and still has lives left.
    pub fn is_player_alive(&self, user_id: &str) -> bool {
        self.player(user_id).is_some_and(|p| p.lives > 0)
    }

    /// The locally controlled player: the id match when known, otherwise the
    /// first player in the snapshot.
    pub fn local_player(&self, user_id: Option<&str>) -> Option<&Player> {
        user_id
            .and_then(|id| self.player(id))
            .or_else(|| self.players.first())
    }

    /// The match is over when the server says so, or when every known player
    /// is out of lives. A zero-player snapshot is never game-over.
    pub fn is_game_over(&self) -> bool {
        if self.game_over {
            return true;
        }
        !self.players.is_empty() && self.players.iter().all(|p| p.lives <= 0)
    }
}
