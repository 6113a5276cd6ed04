use chrono::{DateTime, Local};
use std::fmt;

/// One chat line as broadcast by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub content: String,
    /// Sender's remote address
    pub user: String,
    pub time: DateTime<Local>,
}

impl ChatMessage {
    /// Stamp `content` from `user` with the current local time.
    pub fn now(content: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            user: user.into(),
            time: Local::now(),
        }
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> {}",
            self.time.format("%H:%M:%S"),
            self.user,
            self.content
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_format() {
        let msg = ChatMessage {
            content: "hi".into(),
            user: "1.2.3.4:5".into(),
            time: Local.with_ymd_and_hms(2024, 1, 15, 9, 5, 3).single().unwrap(),
        };
        assert_eq!(msg.to_string(), "09:05:03 <1.2.3.4:5> hi");
    }

    #[test]
    fn test_content_is_not_escaped() {
        let msg = ChatMessage {
            content: "<b>bold</b>".into(),
            user: "[::1]:9000".into(),
            time: Local.with_ymd_and_hms(2024, 1, 15, 23, 59, 59).single().unwrap(),
        };
        assert_eq!(msg.to_string(), "23:59:59 <[::1]:9000> <b>bold</b>");
    }
}
