// Use cases layer: synchronization workflows between transports and mirrors.

pub mod directory;
pub mod input;
pub mod match_mirror;
pub mod render;
pub mod retry;
pub mod session;

pub use directory::{RoomDirectory, RoomEvent};
pub use input::{InputEffect, InputTracker};
pub use match_mirror::MatchMirror;
pub use render::Renderer;
pub use retry::RetryPolicy;
pub use session::SessionContext;
