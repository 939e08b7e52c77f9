//! Normalization of free-form input text into the list of raffle entries.

use crate::error::{DrawError, MIN_PARTICIPANTS};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Trims whitespace and byte-order marks, which files saved by some editors carry.
fn trim_entry(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK)
}

/// Ordered, non-empty, trimmed entries parsed from raw input. One line is one ticket,
/// so duplicate names are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantList(Vec<String>);

impl ParticipantList {
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.lines()
                .map(trim_entry)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Parses `raw` and rejects lists too short to draw from.
    pub fn parse_drawable(raw: &str) -> Result<Self, DrawError> {
        let list = Self::parse(raw);
        if list.len() < MIN_PARTICIPANTS {
            return Err(DrawError::insufficient(list.len()));
        }
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.get(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|entry| entry == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for ParticipantList {
    fn from(value: Vec<String>) -> Self {
        let raw = value.join("\n");
        Self::parse(&raw)
    }
}
