use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;

use crate::chat::KeyPress;
use crate::chat_bevy::types::{ChatConnectionResource, ChatSubmitted, ChatViewResource};

/// Feed key presses to the input field; Enter submits the buffer verbatim
pub fn handle_keyboard_input(
    mut keyboard_events: MessageReader<KeyboardInput>,
    mut view: ResMut<ChatViewResource>,
    mut submitted: MessageWriter<ChatSubmitted>,
) {
    for event in keyboard_events.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }

        if let Some(frame) = view.press(key_press(event)) {
            log::debug!("Submitting input ({} bytes)", frame.len());
            submitted.write(ChatSubmitted(frame));
        }
    }
}

/// Send submitted lines over the chat connection
pub fn send_submitted(
    mut submitted: MessageReader<ChatSubmitted>,
    connection: Option<Res<ChatConnectionResource>>,
) {
    for ChatSubmitted(frame) in submitted.read() {
        match connection.as_deref() {
            Some(connection) => {
                if let Err(e) = connection.send(frame.clone()) {
                    log::error!("Failed to send chat message: {}", e);
                }
            }
            None => log::warn!("No chat connection, dropping input"),
        }
    }
}

/// Translate a Bevy keyboard event into an input-field key press
fn key_press(event: &KeyboardInput) -> KeyPress {
    match &event.logical_key {
        Key::Enter => KeyPress::Enter,
        Key::Backspace => KeyPress::Backspace,
        _ => match &event.text {
            Some(text) if !text.chars().any(char::is_control) => KeyPress::Text(text.to_string()),
            _ => KeyPress::Other,
        },
    }
}
