use crate::domain::column::Column;
use crate::error::BoardError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Stable identity of a card, compared as a string (e.g. "3", "17")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Workflow stage of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardStatus {
    Backlog,
    InProgress,
    Complete,
}

impl CardStatus {
    /// Wire value ("backlog", "in-progress", "complete")
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in-progress",
            Self::Complete => "complete",
        }
    }

    /// Lenient parse used for seed data: absent or unrecognized means backlog
    pub fn from_seed(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or(Self::Backlog)
    }

    /// Color class the rendered card carries
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Backlog => "Card-grey",
            Self::InProgress => "Card-blue",
            Self::Complete => "Card-green",
        }
    }
}

impl FromStr for CardStatus {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backlog" => Ok(Self::Backlog),
            "in-progress" => Ok(Self::InProgress),
            "complete" => Ok(Self::Complete),
            _ => Err(BoardError::InvalidStatus(s.to_string())),
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A card on the board. `name` and `description` are display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub description: String,
    pub status: CardStatus,
}

impl Card {
    pub fn new(
        id: impl Into<CardId>,
        name: impl Into<String>,
        description: impl Into<String>,
        status: CardStatus,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            status,
        }
    }

    /// Returns the card with its status aligned to `column`
    pub fn with_status(mut self, column: Column) -> Self {
        let status = column.status();
        if self.status != status {
            self.status = status;
        }
        self
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
