//! # bevy_wschat
//!
//! A WebSocket text chat client. The [`chat`] module holds the socket and
//! page model; with the `bevy` feature, [`chat_bevy`] renders it as Bevy UI.
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use bevy_wschat::{ChatPlugin, ChatPluginConfig};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ChatPlugin::new(ChatPluginConfig::new("http://localhost:8080")))
//!         .add_systems(Startup, |mut commands: Commands| {
//!             commands.spawn(Camera2d);
//!         })
//!         .run();
//! }
//! ```

pub mod chat;

#[cfg(feature = "bevy")]
pub mod chat_bevy;

#[cfg(feature = "bevy")]
pub use chat_bevy::{ChatPlugin, ChatPluginConfig, ChatTheme};
