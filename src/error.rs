use thiserror::Error;

use crate::board::reconciler::ContainerRole;
use crate::domain::Column;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Card {id} not found in column {column}")]
    CardNotFound { column: Column, id: String },

    #[error("Duplicate card id: {0}")]
    DuplicateCard(String),

    #[error("Invalid card status: {0}")]
    InvalidStatus(String),

    #[error("Dragged element carries no card id")]
    MissingIdentity,

    #[error("Drop {0} does not resolve to a registered column")]
    UnknownContainer(ContainerRole),

    #[error("Card {id} is no longer in column {column}")]
    StaleReference { id: String, column: Column },

    #[error("Board invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Moving node {node} under {parent} would create a cycle")]
    HierarchyCycle { node: String, parent: String },

    #[error("A drag gesture is already in progress")]
    GestureInProgress,

    #[error("Drag controller is not connected")]
    DragInactive,

    #[error("Seed error: {0}")]
    Seed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl BoardError {
    /// Whether a drop that failed with this error may be dropped silently.
    ///
    /// Everything except [`BoardError::InvariantViolation`] is recoverable: the
    /// board keeps its previous state and the failure is only logged.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvariantViolation(_))
    }
}
