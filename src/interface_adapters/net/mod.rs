// Network adapters: the gameplay WebSocket and the directory SSE feed.

pub mod directory_feed;
pub mod game_channel;
pub mod sse;

pub use directory_feed::{DirectoryFeed, FeedError};
pub use game_channel::{ChannelError, ChannelState, GameChannel};
