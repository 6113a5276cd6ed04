//! # Chat UI Plugin for Bevy
//!
//! Renders the chat page as Bevy UI: a controls bar with the input field and
//! status glyph on top, the message list below it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use bevy_wschat::chat::ClientProfile;
//! use bevy_wschat::{ChatPlugin, ChatPluginConfig};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ChatPlugin::new(
//!             ChatPluginConfig::new("https://chat.example.org")
//!                 .with_profile(ClientProfile::newest_first()),
//!         ))
//!         .run();
//! }
//! ```
pub mod plugin;

mod input;
mod render;
mod style;
mod types;

pub use input::*;
pub use plugin::{ChatPlugin, ChatPluginConfig};
pub use render::*;
pub use style::{ChatTheme, ThemeSpec, parse_color};
pub use types::*;
