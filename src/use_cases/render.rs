use crate::domain::MatchSnapshot;

/// Consumer boundary for the presentation layer. Implementations draw the
/// synchronized state; the snapshot is read-only and must not be retained
/// mutably or merged with previous frames.
pub trait Renderer {
    /// Draws one frame from the given snapshot. `frame_tick` is a
    /// display-driven counter used for sprite animation phases.
    fn render(&mut self, snapshot: &MatchSnapshot, local_player_id: Option<&str>, frame_tick: u64);
}
