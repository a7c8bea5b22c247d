use crate::domain::card::CardStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three fixed lanes on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    Backlog,
    InProgress,
    Complete,
}

impl Column {
    /// All columns in left-to-right display order
    pub const ALL: [Column; 3] = [Column::Backlog, Column::InProgress, Column::Complete];

    /// The status a card must carry while it sits in this column
    pub fn status(self) -> CardStatus {
        match self {
            Self::Backlog => CardStatus::Backlog,
            Self::InProgress => CardStatus::InProgress,
            Self::Complete => CardStatus::Complete,
        }
    }

    /// The column a card with `status` belongs to
    pub fn for_status(status: CardStatus) -> Self {
        match status {
            CardStatus::Backlog => Self::Backlog,
            CardStatus::InProgress => Self::InProgress,
            CardStatus::Complete => Self::Complete,
        }
    }

    /// Stable identifier, matching the serialized form
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "inProgress",
            Self::Complete => "complete",
        }
    }

    /// Human readable lane heading
    pub fn title(self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::InProgress => "In Progress",
            Self::Complete => "Complete",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Backlog => 0,
            Self::InProgress => 1,
            Self::Complete => 2,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
