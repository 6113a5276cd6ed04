//! Display model of the chat page
//!
//! Holds the message list, status glyph and input buffer, and turns
//! connection events and key presses into changes the UI has to apply.

use std::collections::VecDeque;

use crate::chat::{ChatEvent, ClientProfile, LineOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Normal,
    /// Rendered from an error event, drawn with the error style
    Error,
}

/// One entry of the message list. The text is shown literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub text: String,
    pub kind: LineKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusGlyph {
    /// Nothing shown yet
    #[default]
    Pending,
    Open,
    Closed,
}

impl StatusGlyph {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusGlyph::Pending => "",
            StatusGlyph::Open => ":)",
            StatusGlyph::Closed => ":(",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Tail,
    Head,
}

/// What the UI has to do after an event was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewChange {
    Unchanged,
    LineInserted {
        line: DisplayLine,
        placement: Placement,
    },
    StatusChanged(StatusGlyph),
}

/// A key press inside the input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPress {
    Enter,
    Backspace,
    /// Printable text produced by the key
    Text(String),
    Other,
}

#[derive(Debug, Clone, Default)]
pub struct ChatView {
    profile: ClientProfile,
    lines: VecDeque<DisplayLine>,
    status: StatusGlyph,
    input: String,
}

impl ChatView {
    pub fn new(profile: ClientProfile) -> Self {
        Self {
            profile,
            ..Default::default()
        }
    }

    pub fn profile(&self) -> &ClientProfile {
        &self.profile
    }

    /// Lines in display order, top to bottom
    pub fn lines(&self) -> impl Iterator<Item = &DisplayLine> {
        self.lines.iter()
    }

    pub fn status(&self) -> StatusGlyph {
        self.status
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Apply a connection event to the page state.
    pub fn apply(&mut self, event: &ChatEvent) -> ViewChange {
        match event {
            ChatEvent::Open => self.set_status(StatusGlyph::Open),
            ChatEvent::Close { .. } => self.set_status(StatusGlyph::Closed),
            ChatEvent::Message { data } => self.insert(DisplayLine {
                text: data.clone(),
                kind: LineKind::Normal,
            }),
            ChatEvent::Error { data } if self.profile.error_lines => self.insert(DisplayLine {
                text: data.clone(),
                kind: LineKind::Error,
            }),
            ChatEvent::Error { .. } => ViewChange::Unchanged,
        }
    }

    /// Feed a key press to the input field.
    ///
    /// Returns the frame to send when Enter was pressed; the buffer is
    /// cleared at the same time. An empty buffer still yields an empty frame.
    pub fn press(&mut self, key: KeyPress) -> Option<String> {
        match key {
            KeyPress::Enter => Some(std::mem::take(&mut self.input)),
            KeyPress::Backspace => {
                self.input.pop();
                None
            }
            KeyPress::Text(text) => {
                self.input.push_str(&text);
                None
            }
            KeyPress::Other => None,
        }
    }

    fn set_status(&mut self, glyph: StatusGlyph) -> ViewChange {
        if !self.profile.status_indicator {
            return ViewChange::Unchanged;
        }
        self.status = glyph;
        ViewChange::StatusChanged(glyph)
    }

    fn insert(&mut self, line: DisplayLine) -> ViewChange {
        let placement = match self.profile.order {
            LineOrder::Append => {
                self.lines.push_back(line.clone());
                Placement::Tail
            }
            LineOrder::Prepend => {
                self.lines.push_front(line.clone());
                Placement::Head
            }
        };
        ViewChange::LineInserted { line, placement }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(data: &str) -> ChatEvent {
        ChatEvent::Message { data: data.into() }
    }

    fn texts(view: &ChatView) -> Vec<&str> {
        view.lines().map(|line| line.text.as_str()).collect()
    }

    #[test]
    fn test_append_keeps_arrival_order() {
        let mut view = ChatView::new(ClientProfile::full());
        view.apply(&message("hi"));
        view.apply(&message("there"));
        assert_eq!(texts(&view), ["hi", "there"]);
    }

    #[test]
    fn test_prepend_puts_newest_first() {
        let mut view = ChatView::new(ClientProfile::newest_first());
        let change = view.apply(&message("hi"));
        assert!(matches!(
            change,
            ViewChange::LineInserted { placement: Placement::Head, .. }
        ));
        view.apply(&message("there"));
        assert_eq!(texts(&view), ["there", "hi"]);
    }

    #[test]
    fn test_markup_is_kept_literally() {
        let mut view = ChatView::new(ClientProfile::plain());
        view.apply(&message("<b>bold</b> &amp;"));
        assert_eq!(texts(&view), ["<b>bold</b> &amp;"]);
    }

    #[test]
    fn test_enter_sends_and_clears() {
        let mut view = ChatView::new(ClientProfile::full());
        for c in "hello".chars() {
            assert_eq!(view.press(KeyPress::Text(c.to_string())), None);
        }
        assert_eq!(view.input(), "hello");
        assert_eq!(view.press(KeyPress::Enter), Some("hello".to_string()));
        assert_eq!(view.input(), "");
    }

    #[test]
    fn test_other_keys_neither_send_nor_clear() {
        let mut view = ChatView::new(ClientProfile::full());
        view.press(KeyPress::Text("abc".into()));
        assert_eq!(view.press(KeyPress::Other), None);
        assert_eq!(view.press(KeyPress::Backspace), None);
        assert_eq!(view.input(), "ab");
    }

    #[test]
    fn test_enter_on_empty_input_sends_empty_frame() {
        let mut view = ChatView::new(ClientProfile::full());
        assert_eq!(view.press(KeyPress::Enter), Some(String::new()));
    }

    #[test]
    fn test_status_glyph_follows_connection() {
        let mut view = ChatView::new(ClientProfile::full());
        assert_eq!(view.status().as_str(), "");
        assert_eq!(
            view.apply(&ChatEvent::Open),
            ViewChange::StatusChanged(StatusGlyph::Open)
        );
        assert_eq!(view.status().as_str(), ":)");
        view.apply(&ChatEvent::Close {
            code: 1000,
            reason: String::new(),
        });
        assert_eq!(view.status().as_str(), ":(");
    }

    #[test]
    fn test_no_status_without_indicator() {
        let mut view = ChatView::new(ClientProfile::plain());
        assert_eq!(view.apply(&ChatEvent::Open), ViewChange::Unchanged);
        assert_eq!(view.status(), StatusGlyph::Pending);
    }

    #[test]
    fn test_error_lines_are_marked() {
        let mut view = ChatView::new(ClientProfile::full());
        view.apply(&ChatEvent::Error { data: "oops".into() });
        let line = view.lines().next().unwrap();
        assert_eq!(line.text, "oops");
        assert_eq!(line.kind, LineKind::Error);
    }

    #[test]
    fn test_errors_ignored_without_error_lines() {
        let mut view = ChatView::new(ClientProfile::plain());
        assert_eq!(
            view.apply(&ChatEvent::Error { data: "oops".into() }),
            ViewChange::Unchanged
        );
        assert_eq!(view.lines().count(), 0);
    }
}
