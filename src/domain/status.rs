use std::fmt;

use serde::{Deserialize, Serialize};

/// Availability verdict for a monitored page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLabel {
    #[default]
    Unknown,
    NoSlots,
    PossibleSlots,
}

impl StatusLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusLabel::Unknown => "unknown",
            StatusLabel::NoSlots => "no_slots",
            StatusLabel::PossibleSlots => "possible_slots",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_snake_case_labels() {
        let json = serde_json::to_string(&StatusLabel::PossibleSlots).unwrap();
        assert_eq!(json, "\"possible_slots\"");
        let parsed: StatusLabel = serde_json::from_str("\"no_slots\"").unwrap();
        assert_eq!(parsed, StatusLabel::NoSlots);
        assert_eq!(StatusLabel::default().to_string(), "unknown");
    }
}
