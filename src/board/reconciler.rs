use crate::domain::{CardId, CardStore, Column};
use crate::drag::DropEvent;
use crate::error::{BoardError, Result};
use crate::ui::{ContainerRegistry, NodeHandle, NodeHierarchy};
use std::fmt;

/// Which end of a drop failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerRole {
    Source,
    Target,
}

impl fmt::Display for ContainerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// Turns raw drop notifications into the next [`CardStore`] snapshot.
///
/// Every read goes against the snapshot passed in and the result is a fresh
/// snapshot, so callers swap it in with a single assignment and nothing ever
/// observes a card that has left its source but not reached its target.
pub struct DropReconciler<'a, H> {
    registry: &'a ContainerRegistry,
    hierarchy: &'a H,
}

impl<'a, H: NodeHierarchy> DropReconciler<'a, H> {
    pub fn new(registry: &'a ContainerRegistry, hierarchy: &'a H) -> Self {
        Self {
            registry,
            hierarchy,
        }
    }

    /// Computes the store that results from `drop`.
    ///
    /// `dragged_id` is the id the dragged element declares. Every `Err` leaves
    /// `store` as the valid state; only [`BoardError::InvariantViolation`]
    /// indicates a defect rather than a stale or malformed drop.
    pub fn reconcile(
        &self,
        store: &CardStore,
        dragged_id: Option<&str>,
        drop: &DropEvent,
    ) -> Result<CardStore> {
        let id = dragged_id
            .filter(|id| !id.is_empty())
            .map(CardId::from)
            .ok_or(BoardError::MissingIdentity)?;

        let fallback = drop.dragged.and_then(|d| self.hierarchy.parent(d));
        let source = self
            .resolve_container(drop.source, fallback)
            .ok_or(BoardError::UnknownContainer(ContainerRole::Source))?;
        let target = self
            .resolve_container(drop.target, fallback)
            .ok_or(BoardError::UnknownContainer(ContainerRole::Target))?;

        let holders = store.columns_containing(&id);
        if holders.len() > 1 {
            return Err(BoardError::InvariantViolation(format!(
                "card {id} is held by {} columns",
                holders.len()
            )));
        }

        let (card, remaining) = store.remove_from_column(source, &id).map_err(|_| {
            BoardError::StaleReference {
                id: id.to_string(),
                column: source,
            }
        })?;

        let card = if source == target {
            card
        } else {
            card.with_status(target)
        };

        let before = self.sibling_id(drop.sibling, drop.dragged, &id);

        let next = if source == target {
            let sequence = CardStore::insert_into_column(target, remaining, card, before.as_ref());
            store.with_columns([(target, sequence)])
        } else {
            let sequence = CardStore::insert_into_column(
                target,
                store.column(target).to_vec(),
                card,
                before.as_ref(),
            );
            store.with_columns([(source, remaining), (target, sequence)])
        };

        tracing::debug!(card = %id, from = %source, to = %target, "drop reconciled");
        Ok(next)
    }

    /// Total form of [`reconcile`](Self::reconcile): recoverable failures
    /// yield `store` unchanged. Invariant violations still surface.
    pub fn apply(
        &self,
        store: &CardStore,
        dragged_id: Option<&str>,
        drop: &DropEvent,
    ) -> Result<CardStore> {
        match self.reconcile(store, dragged_id, drop) {
            Ok(next) => Ok(next),
            Err(err) if err.is_recoverable() => {
                tracing::debug!(error = %err, "drop ignored");
                Ok(store.clone())
            }
            Err(err) => Err(err),
        }
    }

    fn resolve_container(
        &self,
        raw: Option<NodeHandle>,
        fallback: Option<NodeHandle>,
    ) -> Option<Column> {
        raw.and_then(|handle| self.registry.resolve(self.hierarchy, handle))
            .or_else(|| fallback.and_then(|handle| self.registry.resolve(self.hierarchy, handle)))
    }

    /// Id of the card the dragged one should precede. A sibling that is the
    /// dragged element itself, or resolves to its id, means "no sibling".
    fn sibling_id(
        &self,
        sibling: Option<NodeHandle>,
        dragged: Option<NodeHandle>,
        dragged_id: &CardId,
    ) -> Option<CardId> {
        let sibling = sibling.filter(|s| Some(*s) != dragged)?;
        let id = self
            .hierarchy
            .ancestors(sibling)
            .find_map(|node| self.hierarchy.declared_id(node))
            .map(CardId::from)?;
        (&id != dragged_id).then_some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Card, CardStatus};
    use crate::seed::{default_seed, SeedMode};
    use crate::ui::{ContainerHandles, NodeTree};

    struct Board {
        tree: NodeTree,
        containers: [NodeHandle; 3],
        cards: Vec<(String, NodeHandle)>,
        registry: ContainerRegistry,
        store: CardStore,
    }

    impl Board {
        fn container(&self, column: Column) -> NodeHandle {
            self.containers[column.index()]
        }

        fn card(&self, id: &str) -> NodeHandle {
            self.cards
                .iter()
                .find(|(card, _)| card == id)
                .map(|(_, node)| *node)
                .unwrap()
        }

        fn drop_event(&self, id: &str, target: Column, sibling: Option<&str>) -> DropEvent {
            let (source, _) = self.store.locate(&CardId::from(id)).unwrap();
            DropEvent {
                dragged: Some(self.card(id)),
                target: Some(self.container(target)),
                source: Some(self.container(source)),
                sibling: sibling.map(|s| self.card(s)),
            }
        }

        fn reconciler(&self) -> DropReconciler<'_, NodeTree> {
            DropReconciler::new(&self.registry, &self.tree)
        }
    }

    fn board(store: CardStore) -> Board {
        let mut tree = NodeTree::new();
        let root = tree.create_element(&["Board"]);
        let mut containers = Vec::new();
        let mut cards = Vec::new();
        for column in Column::ALL {
            let container = tree.create_element(&["Swimlane-dragColumn"]);
            tree.append_child(root, container).unwrap();
            for card in store.column(column) {
                let node = tree.create_element(&["Card"]);
                tree.set_data_id(node, card.id.as_str()).unwrap();
                tree.append_child(container, node).unwrap();
                let title = tree.create_text(&card.name);
                tree.append_child(node, title).unwrap();
                cards.push((card.id.to_string(), node));
            }
            containers.push(container);
        }
        let containers = [containers[0], containers[1], containers[2]];
        let registry = ContainerRegistry::new(&ContainerHandles {
            backlog: Some(containers[0]),
            in_progress: Some(containers[1]),
            complete: Some(containers[2]),
        });
        Board {
            tree,
            containers,
            cards,
            registry,
            store,
        }
    }

    fn seeded() -> Board {
        board(CardStore::from_seed(&default_seed(), SeedMode::Seeded).unwrap())
    }

    fn ids(store: &CardStore, column: Column) -> Vec<&str> {
        store.column(column).iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_cross_column_drop_appends_and_updates_status() {
        let b = seeded();
        let event = b.drop_event("3", Column::InProgress, None);

        let next = b.reconciler().reconcile(&b.store, Some("3"), &event).unwrap();

        assert!(!ids(&next, Column::Backlog).contains(&"3"));
        let last = next.column(Column::InProgress).last().unwrap();
        assert_eq!(last.id.as_str(), "3");
        assert_eq!(last.status, CardStatus::InProgress);
        assert!(next.shares_column(&b.store, Column::Complete));
        assert!(next.verify().is_ok());
    }

    #[test]
    fn test_drop_before_sibling() {
        let b = seeded();
        let event = b.drop_event("3", Column::Complete, Some("11"));

        let next = b.reconciler().reconcile(&b.store, Some("3"), &event).unwrap();

        assert_eq!(ids(&next, Column::Complete), vec!["2", "3", "11", "13", "17"]);
        assert_eq!(next.column(Column::Complete)[1].status, CardStatus::Complete);
    }

    #[test]
    fn test_sibling_resolved_from_inner_node() {
        let b = seeded();
        let mut event = b.drop_event("6", Column::InProgress, None);
        let inner = b.tree.children(b.card("5"))[0];
        event.sibling = Some(inner);

        let next = b.reconciler().reconcile(&b.store, Some("6"), &event).unwrap();

        assert_eq!(ids(&next, Column::InProgress), vec!["1", "4", "6", "5", "15", "16"]);
    }

    #[test]
    fn test_sibling_from_other_column_appends() {
        let b = seeded();
        let event = b.drop_event("3", Column::InProgress, Some("2"));

        let next = b.reconciler().reconcile(&b.store, Some("3"), &event).unwrap();

        assert_eq!(ids(&next, Column::InProgress).last(), Some(&"3"));
    }

    #[test]
    fn test_sibling_equal_to_dragged_appends() {
        let b = seeded();
        let mut event = b.drop_event("1", Column::InProgress, None);
        event.sibling = event.dragged;

        let next = b.reconciler().reconcile(&b.store, Some("1"), &event).unwrap();

        assert_eq!(ids(&next, Column::InProgress), vec!["4", "5", "15", "16", "1"]);
    }

    #[test]
    fn test_same_column_reorder_keeps_status() {
        let b = seeded();
        let event = b.drop_event("16", Column::InProgress, Some("1"));

        let next = b.reconciler().reconcile(&b.store, Some("16"), &event).unwrap();

        assert_eq!(ids(&next, Column::InProgress), vec!["16", "1", "4", "5", "15"]);
        assert_eq!(next.column(Column::InProgress)[0].status, CardStatus::InProgress);
        assert!(next.shares_column(&b.store, Column::Backlog));
        assert!(next.shares_column(&b.store, Column::Complete));
    }

    #[test]
    fn test_missing_identity() {
        let b = seeded();
        let event = b.drop_event("3", Column::InProgress, None);

        for id in [None, Some("")] {
            let err = b.reconciler().reconcile(&b.store, id, &event).unwrap_err();
            assert!(matches!(err, BoardError::MissingIdentity));
        }

        // Blank is still an id, just not one the board knows
        let err = b.reconciler().reconcile(&b.store, Some("   "), &event).unwrap_err();
        assert!(matches!(err, BoardError::StaleReference { .. }));
    }

    #[test]
    fn test_ids_match_exactly() {
        let b = seeded();
        let event = b.drop_event("3", Column::InProgress, None);

        let err = b.reconciler().reconcile(&b.store, Some(" 3 "), &event).unwrap_err();
        assert!(matches!(err, BoardError::StaleReference { .. }));
        assert_eq!(b.reconciler().apply(&b.store, Some(" 3 "), &event).unwrap(), b.store);
    }

    #[test]
    fn test_unknown_target_with_detached_element_is_rejected() {
        let mut b = seeded();
        let card = b.card("3");
        b.tree.detach(card).unwrap();
        let mut event = b.drop_event("3", Column::InProgress, None);
        event.target = Some(NodeHandle::new());

        let err = b.reconciler().reconcile(&b.store, Some("3"), &event).unwrap_err();
        assert!(matches!(err, BoardError::UnknownContainer(ContainerRole::Target)));
    }

    #[test]
    fn test_unresolvable_target_falls_back_to_parent() {
        let mut b = seeded();
        let body = b.tree.create_element(&[]);
        let mirror = b.tree.create_element(&["gu-mirror"]);
        b.tree.append_child(body, mirror).unwrap();
        let event = DropEvent {
            dragged: Some(b.card("3")),
            target: Some(mirror),
            source: Some(b.container(Column::Backlog)),
            sibling: None,
        };
        // The drag library already moved the element into its new lane
        let (in_progress, card) = (b.container(Column::InProgress), b.card("3"));
        b.tree.append_child(in_progress, card).unwrap();

        let next = b.reconciler().reconcile(&b.store, Some("3"), &event).unwrap();

        assert!(!ids(&next, Column::Backlog).contains(&"3"));
        let last = next.column(Column::InProgress).last().unwrap();
        assert_eq!(last.id.as_str(), "3");
        assert_eq!(last.status, CardStatus::InProgress);
    }

    #[test]
    fn test_unknown_source_in_unregistered_lane_is_rejected() {
        let mut b = seeded();
        let card = b.card("3");
        let stray = b.tree.create_element(&["Swimlane-dragColumn"]);
        b.tree.append_child(stray, card).unwrap();
        let mut event = b.drop_event("3", Column::InProgress, None);
        event.source = Some(NodeHandle::new());

        let err = b.reconciler().reconcile(&b.store, Some("3"), &event).unwrap_err();
        assert!(matches!(err, BoardError::UnknownContainer(ContainerRole::Source)));
    }

    #[test]
    fn test_missing_target_falls_back_to_parent() {
        let b = seeded();
        let mut event = b.drop_event("3", Column::InProgress, None);
        event.target = None;

        // The element still sits in backlog, so this is a reorder to the end
        let next = b.reconciler().reconcile(&b.store, Some("3"), &event).unwrap();
        assert_eq!(ids(&next, Column::Backlog).last(), Some(&"3"));
        assert_eq!(next.column(Column::Backlog).len(), b.store.column(Column::Backlog).len());
    }

    #[test]
    fn test_missing_source_falls_back_to_parent() {
        let b = seeded();
        let mut event = b.drop_event("3", Column::InProgress, None);
        event.source = None;

        let next = b.reconciler().reconcile(&b.store, Some("3"), &event).unwrap();

        assert_eq!(ids(&next, Column::InProgress).last(), Some(&"3"));
    }

    #[test]
    fn test_unknown_source_without_fallback() {
        let b = seeded();
        let event = DropEvent {
            dragged: None,
            target: Some(b.container(Column::InProgress)),
            source: Some(NodeHandle::new()),
            sibling: None,
        };

        let err = b.reconciler().reconcile(&b.store, Some("3"), &event).unwrap_err();
        assert!(matches!(err, BoardError::UnknownContainer(ContainerRole::Source)));
    }

    #[test]
    fn test_card_not_in_source_is_stale() {
        let b = seeded();
        let mut event = b.drop_event("3", Column::InProgress, None);
        event.source = Some(b.container(Column::Complete));

        let err = b.reconciler().reconcile(&b.store, Some("3"), &event).unwrap_err();
        assert!(matches!(
            err,
            BoardError::StaleReference { column: Column::Complete, .. }
        ));
    }

    #[test]
    fn test_apply_returns_input_on_recoverable_failure() {
        let b = seeded();
        let mut event = b.drop_event("3", Column::InProgress, None);
        event.source = Some(b.container(Column::Complete));

        let once = b.reconciler().apply(&b.store, Some("3"), &event).unwrap();
        let twice = b.reconciler().apply(&once, Some("3"), &event).unwrap();

        assert_eq!(once, b.store);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_duplicate_card_is_invariant_violation() {
        let store = CardStore::from_columns(
            vec![Card::new("x", "X", "", CardStatus::Backlog)],
            vec![Card::new("x", "X", "", CardStatus::InProgress)],
            Vec::new(),
        );
        let b = board(store);
        let event = DropEvent {
            dragged: Some(b.cards[0].1),
            target: Some(b.container(Column::Complete)),
            source: Some(b.container(Column::Backlog)),
            sibling: None,
        };

        let err = b.reconciler().apply(&b.store, Some("x"), &event).unwrap_err();
        assert!(matches!(err, BoardError::InvariantViolation(_)));
    }
}
