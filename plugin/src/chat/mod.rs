//! Chat Client Core
//!
//! Connection handling and the page model of the chat client.
//! No Bevy dependencies - this can be used standalone.

mod connection;
mod error;
mod event;
mod profile;
mod target;
mod view;

pub use connection::{ChatConnection, ReadyState};
pub use error::ChatError;
pub use event::{
    CLOSE_ABNORMAL, CLOSE_NO_STATUS, CLOSE_NORMAL, ChatEvent, ChatEventReceiver, ChatEventSender,
    chat_event_channel,
};
pub use profile::{ClientProfile, LineOrder};
pub use target::{CHAT_PATH, SchemePolicy, connection_target};
pub use view::{ChatView, DisplayLine, KeyPress, LineKind, Placement, StatusGlyph, ViewChange};
