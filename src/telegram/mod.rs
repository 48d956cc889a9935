//! Telegram integration: photo resolution via the Bot API.

pub mod photos;

pub use photos::PhotoResolver;
