pub mod directory;

pub use directory::{DirectoryClient, DirectoryError};
