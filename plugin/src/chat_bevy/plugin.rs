//! Chat Plugin for Bevy
//!
//! Spawns the chat page, opens the connection on startup and wires the
//! per-frame systems that apply connection events and keyboard input.

use bevy::prelude::*;

use crate::chat::{ChatView, ClientProfile};
use crate::chat_bevy::ChatTheme;
use crate::chat_bevy::input::{handle_keyboard_input, send_submitted};
use crate::chat_bevy::render::*;
use crate::chat_bevy::types::*;

/// Configuration for the chat plugin.
#[derive(Clone, Debug)]
pub struct ChatPluginConfig {
    /// URL standing in for the page location, e.g. `http://localhost:8080`
    pub origin: String,
    pub profile: ClientProfile,
    pub theme: ChatTheme,
}

impl ChatPluginConfig {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            profile: ClientProfile::default(),
            theme: ChatTheme::default(),
        }
    }

    pub fn with_profile(mut self, profile: ClientProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_theme(mut self, theme: ChatTheme) -> Self {
        self.theme = theme;
        self
    }
}

/// Bevy plugin for the chat client.
///
/// This plugin:
/// - Spawns the controls bar and message list
/// - Opens the single chat connection during `Startup`
/// - Applies connection events and key presses each frame
///
/// It does not spawn a camera; the app provides one.
pub struct ChatPlugin {
    config: ChatPluginConfig,
}

impl ChatPlugin {
    pub fn new(config: ChatPluginConfig) -> Self {
        Self { config }
    }
}

impl Plugin for ChatPlugin {
    fn build(&self, app: &mut App) {
        log::info!("Building chat plugin for origin {}", self.config.origin);

        app.insert_resource(ChatSettings {
            origin: self.config.origin.clone(),
            profile: self.config.profile.clone(),
        })
        .insert_resource(ChatViewResource(ChatView::new(self.config.profile.clone())))
        .insert_resource(ChatThemeResource(self.config.theme.clone()))
        .add_message::<ChatSubmitted>()
        .add_systems(Startup, (spawn_chat_ui, open_connection))
        .add_systems(
            Update,
            (
                process_chat_events,
                (handle_keyboard_input, send_submitted, sync_input_text).chain(),
                offset_message_list,
            ),
        );

        log::info!("Chat plugin configured");
    }
}
