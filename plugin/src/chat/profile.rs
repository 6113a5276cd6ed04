//! Client profiles
//!
//! The client exists in three flavors that differ in line ordering, the
//! status glyph, error rendering and scheme selection. A profile picks one.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chat::{ChatError, SchemePolicy};

/// Where new lines go in the message list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineOrder {
    #[default]
    Append,
    Prepend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientProfile {
    pub order: LineOrder,
    /// Show ":)" / ":(" as the connection opens and closes
    pub status_indicator: bool,
    /// Render error events as marked lines
    pub error_lines: bool,
    pub scheme: SchemePolicy,
}

impl ClientProfile {
    /// Appending list, status glyph, error lines, scheme follows the origin.
    pub fn full() -> Self {
        Self {
            order: LineOrder::Append,
            status_indicator: true,
            error_lines: true,
            scheme: SchemePolicy::FollowPage,
        }
    }

    /// Appending list with no indicators over a plain connection.
    pub fn plain() -> Self {
        Self {
            order: LineOrder::Append,
            status_indicator: false,
            error_lines: false,
            scheme: SchemePolicy::AlwaysInsecure,
        }
    }

    /// Newest line on top, no indicators, plain connection.
    pub fn newest_first() -> Self {
        Self {
            order: LineOrder::Prepend,
            ..Self::plain()
        }
    }

    /// Load a profile from a JSON file. Missing fields take the `full` values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ChatError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            log::error!("Failed to load client profile from {}: {}", path.display(), e);
            e
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self::full()
    }
}

impl FromStr for ClientProfile {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(Self::full()),
            "plain" => Ok(Self::plain()),
            "newest-first" | "newest_first" => Ok(Self::newest_first()),
            other => Err(ChatError::UnknownProfile(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_preset_names() {
        assert_eq!("full".parse::<ClientProfile>().unwrap(), ClientProfile::full());
        assert_eq!("Plain".parse::<ClientProfile>().unwrap(), ClientProfile::plain());
        assert_eq!(
            "newest-first".parse::<ClientProfile>().unwrap().order,
            LineOrder::Prepend
        );
        assert!(matches!(
            "fancy".parse::<ClientProfile>(),
            Err(ChatError::UnknownProfile(_))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "order": "prepend", "scheme": "always_insecure" }}"#).unwrap();

        let profile = ClientProfile::from_json_file(file.path()).unwrap();
        assert_eq!(profile.order, LineOrder::Prepend);
        assert_eq!(profile.scheme, SchemePolicy::AlwaysInsecure);
        assert!(profile.status_indicator);
        assert!(profile.error_lines);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ClientProfile::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ChatError::Io(_)));
    }
}
