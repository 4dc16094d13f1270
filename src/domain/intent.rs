/// The player's currently-held control inputs. Always transmitted as a
/// complete value on every change, never as a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Intent {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl Intent {
    /// The all-false intent sent for players that are not allowed to act.
    pub const NONE: Intent = Intent {
        left: false,
        right: false,
        fire: false,
    };
}

/// Keys the synchronization layer reacts to. Everything else is ignored by
/// the embedding view before it reaches this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKey {
    Left,
    Right,
    Fire,
    /// Escape: leave the match instead of mutating intent.
    Quit,
}
