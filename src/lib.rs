//! # Swimlane Board
//!
//! Core of a three-column task board (Backlog / In Progress / Complete)
//! whose cards move between columns by drag and drop.
//!
//! The interesting part is [`DropReconciler`]: it takes the raw handles a
//! drag library reports for a drop, which may be missing, nested or stale,
//! and turns them into the next [`CardStore`] snapshot without ever
//! corrupting the board. [`BoardController`] owns that state and wires it to
//! a [`DragController`] for the lifetime of a mounted board.

pub mod board;
pub mod config;
pub mod domain;
pub mod drag;
pub mod error;
pub mod logging;
pub mod render;
pub mod seed;
pub mod ui;

// Re-export commonly used types
pub use board::{BoardController, CardMove, ContainerRole, DropOutcome, DropReconciler};
pub use config::BoardConfig;
pub use domain::{Card, CardId, CardStatus, CardStore, Column};
pub use drag::{DragController, DropEvent, DropSubscription, PointerDragController};
pub use error::{BoardError, Result};
pub use render::BoardView;
pub use seed::{SeedCard, SeedMode, SeedSource};
pub use ui::{ContainerHandles, ContainerRegistry, NodeHandle, NodeHierarchy, NodeTree};
