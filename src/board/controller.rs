use crate::board::reconciler::DropReconciler;
use crate::domain::{CardId, CardStore, Column};
use crate::drag::{DragController, DropEvent, DropSubscription};
use crate::error::{BoardError, Result};
use crate::seed::{SeedCard, SeedMode};
use crate::ui::{ContainerHandles, ContainerRegistry, NodeHierarchy};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An accepted move, recorded after the new snapshot is committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardMove {
    pub card_id: CardId,
    pub from: Column,
    pub to: Column,
    /// Index in the target column after the move
    pub position: usize,
    pub moved_at: DateTime<Utc>,
}

/// Result of handling one drop notification
#[derive(Debug)]
pub enum DropOutcome {
    Moved(CardMove),
    Ignored(BoardError),
}

impl DropOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved(_))
    }
}

enum ControllerState {
    Inactive,
    Active {
        registry: ContainerRegistry,
        drops: DropSubscription,
    },
}

/// Moves kept in [`BoardController::history`] unless configured otherwise
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Owns the board state and wires it to a drag controller.
///
/// `Inactive` until [`activate`](Self::activate) registers at least one
/// container; [`deactivate`](Self::deactivate) returns it there and may be
/// called any number of times. Dropping the controller releases the drag
/// subscription as well.
pub struct BoardController {
    store: CardStore,
    state: ControllerState,
    revision: u64,
    history: Vec<CardMove>,
    history_limit: usize,
}

impl BoardController {
    pub fn new(store: CardStore) -> Self {
        Self {
            store,
            state: ControllerState::Inactive,
            revision: 0,
            history: Vec::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Keeps at most `limit` of the most recent moves
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self.trim_history();
        self
    }

    /// Builds the initial store from seed rows
    pub fn from_seed(seeds: &[SeedCard], mode: SeedMode) -> Result<Self> {
        Ok(Self::new(CardStore::from_seed(seeds, mode)?))
    }

    /// Current snapshot, as handed to the renderer
    pub fn store(&self) -> &CardStore {
        &self.store
    }

    /// Bumped once per accepted drop; a change means the board must re-render
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Most recent accepted moves, oldest first
    pub fn history(&self) -> &[CardMove] {
        &self.history
    }

    /// Hands the recorded moves to the caller and starts a fresh history
    pub fn take_history(&mut self) -> Vec<CardMove> {
        std::mem::take(&mut self.history)
    }

    fn trim_history(&mut self) {
        let excess = self.history.len().saturating_sub(self.history_limit);
        self.history.drain(..excess);
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ControllerState::Active { .. })
    }

    pub fn registry(&self) -> Option<&ContainerRegistry> {
        match &self.state {
            ControllerState::Active { registry, .. } => Some(registry),
            ControllerState::Inactive => None,
        }
    }

    /// Registers the available containers with `drag` and subscribes to its
    /// drops. Stays inactive when no container is available or the drag
    /// controller refuses. Returns whether the board is now active.
    pub fn activate<D: DragController + ?Sized>(
        &mut self,
        handles: ContainerHandles,
        drag: &mut D,
    ) -> bool {
        self.deactivate();

        let registry = ContainerRegistry::new(&handles);
        if registry.is_empty() {
            tracing::debug!("no containers mounted, board stays inactive");
            return false;
        }

        let drops = match drag.connect(&registry.handles()) {
            Ok(drops) => drops,
            Err(err) => {
                tracing::warn!(error = %err, "drag controller refused containers");
                return false;
            }
        };

        tracing::info!(containers = registry.len(), "board activated");
        self.state = ControllerState::Active { registry, drops };
        true
    }

    /// Releases the drag subscription and clears the registry
    pub fn deactivate(&mut self) {
        let previous = std::mem::replace(&mut self.state, ControllerState::Inactive);
        if let ControllerState::Active { mut drops, .. } = previous {
            drops.close();
            tracing::info!("board deactivated");
        }
    }

    /// Handles every queued drop notification in delivery order.
    /// Returns how many were processed.
    pub fn pump<H: NodeHierarchy>(&mut self, hierarchy: &H) -> usize {
        let drops = match &mut self.state {
            ControllerState::Active { drops, .. } => drops.drain(),
            ControllerState::Inactive => return 0,
        };
        let count = drops.len();
        for drop in drops {
            self.handle_drop(hierarchy, drop);
        }
        count
    }

    /// Reconciles one drop against the current snapshot and commits the
    /// result. Unusable drops leave the board unchanged and are only logged.
    pub fn handle_drop<H: NodeHierarchy>(&mut self, hierarchy: &H, drop: DropEvent) -> DropOutcome {
        let ControllerState::Active { registry, .. } = &self.state else {
            tracing::debug!("drop received while inactive");
            return DropOutcome::Ignored(BoardError::DragInactive);
        };

        let dragged_id = drop.dragged.and_then(|node| hierarchy.declared_id(node));
        let reconciler = DropReconciler::new(registry, hierarchy);
        let reconciled = reconciler.reconcile(&self.store, dragged_id, &drop);

        match reconciled.and_then(|next| self.commit(next, dragged_id)) {
            Ok(record) => DropOutcome::Moved(record),
            Err(err) if err.is_recoverable() => {
                tracing::warn!(error = %err, "drop ignored");
                DropOutcome::Ignored(err)
            }
            Err(err) => {
                tracing::error!(error = %err, "drop rejected");
                debug_assert!(err.is_recoverable(), "{err}");
                DropOutcome::Ignored(err)
            }
        }
    }

    /// Swaps in `next` as the current snapshot and records the move
    fn commit(&mut self, next: CardStore, dragged_id: Option<&str>) -> Result<CardMove> {
        let card_id = CardId::from(dragged_id.unwrap_or_default());
        let from = self.store.locate(&card_id).map(|(column, _)| column);
        let to = next.locate(&card_id);

        let (Some(from), Some((to, position))) = (from, to) else {
            return Err(BoardError::InvariantViolation(format!(
                "card {card_id} lost during reconciliation"
            )));
        };

        self.store = next;
        self.revision += 1;

        let record = CardMove {
            card_id,
            from,
            to,
            position,
            moved_at: Utc::now(),
        };
        tracing::info!(
            card = %record.card_id,
            from = %record.from,
            to = %record.to,
            position = record.position,
            "card moved"
        );
        self.history.push(record.clone());
        self.trim_history();
        Ok(record)
    }
}

impl Drop for BoardController {
    fn drop(&mut self) {
        self.deactivate();
    }
}
