//! Connection target resolution
//!
//! A browser page connects to `<ws|wss>://<location.host>/chat`. Here the
//! page location is replaced by a configured origin URL.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::chat::ChatError;

/// Fixed path of the chat endpoint on the origin host.
pub const CHAT_PATH: &str = "/chat";

/// How the WebSocket scheme is picked from the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemePolicy {
    /// `wss` for a secure origin, `ws` otherwise.
    #[default]
    FollowPage,
    /// Always `ws`, even when the origin is secure.
    AlwaysInsecure,
}

/// Build the chat endpoint URL for a page origin.
///
/// The host keeps the origin's explicit port, the same way `location.host`
/// does; a default port for the origin scheme is left out.
pub fn connection_target(origin: &str, policy: SchemePolicy) -> Result<Url, ChatError> {
    let page = Url::parse(origin).map_err(|source| ChatError::InvalidOrigin {
        origin: origin.to_string(),
        source,
    })?;

    let secure = match page.scheme() {
        "https" | "wss" => true,
        "http" | "ws" => false,
        other => return Err(ChatError::UnsupportedScheme(other.to_string())),
    };

    let scheme = if secure && policy == SchemePolicy::FollowPage {
        "wss"
    } else {
        "ws"
    };

    let host = page
        .host_str()
        .ok_or_else(|| ChatError::MissingHost(origin.to_string()))?;
    let authority = match page.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    let target = format!("{}://{}{}", scheme, authority, CHAT_PATH);
    Url::parse(&target).map_err(|source| ChatError::InvalidOrigin {
        origin: origin.to_string(),
        source,
    })
}
