use bevy::prelude::*;

use crate::chat::{ChatConnection, ChatEventReceiver, ChatView, ClientProfile, LineKind};
use crate::chat_bevy::ChatTheme;

/// Marker component for the chat UI root container
#[derive(Component)]
pub struct ChatRoot;

/// Marker for the bar holding the input field and status glyph
#[derive(Component)]
pub struct ControlsBar;

/// Marker for the text input container
#[derive(Component)]
pub struct InputField;

/// Marker for the text node mirroring the input buffer
#[derive(Component)]
pub struct InputText;

/// Marker for the status glyph text
#[derive(Component)]
pub struct StatusText;

/// Container the message lines are attached to
#[derive(Component)]
pub struct MessageList;

/// One rendered message line
#[derive(Component, Debug)]
pub struct MessageLine {
    pub kind: LineKind,
}

/// A line submitted with Enter, exactly as typed
#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub struct ChatSubmitted(pub String);

/// Where to connect and how to behave, fixed for the app's lifetime
#[derive(Resource, Clone, Debug)]
pub struct ChatSettings {
    pub origin: String,
    pub profile: ClientProfile,
}

#[derive(Resource, Deref, DerefMut)]
pub struct ChatViewResource(pub ChatView);

#[derive(Resource, Deref)]
pub struct ChatThemeResource(pub ChatTheme);

/// Keeps the connection handle alive for the app's lifetime
#[derive(Resource, Deref)]
pub struct ChatConnectionResource(pub ChatConnection);

#[derive(Resource, Deref)]
pub struct ChatEventReceiverResource(pub ChatEventReceiver);
