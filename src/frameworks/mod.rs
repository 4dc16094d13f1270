// Frameworks layer: process configuration and runtime bootstrap.

pub mod config;
pub mod runtime;
