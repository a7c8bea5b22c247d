use crate::domain::card::{Card, CardId, CardStatus};
use crate::domain::column::Column;
use crate::error::{BoardError, Result};
use crate::seed::{SeedCard, SeedMode};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Immutable snapshot of the three ordered card sequences.
///
/// Each column is held behind an [`Arc`], so cloning a store is cheap and a
/// commit that touches one or two columns shares the rest with the previous
/// snapshot. Sequence order is the visual top-to-bottom order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardStore {
    backlog: Arc<Vec<Card>>,
    in_progress: Arc<Vec<Card>>,
    complete: Arc<Vec<Card>>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from seed data, preserving seed order within each column.
    ///
    /// In [`SeedMode::AllBacklog`] every card lands in the backlog with its
    /// status reset. Duplicate ids are rejected.
    pub fn from_seed(seeds: &[SeedCard], mode: SeedMode) -> Result<Self> {
        let mut columns: [Vec<Card>; 3] = Default::default();
        let mut seen = HashSet::with_capacity(seeds.len());

        for seed in seeds {
            if !seen.insert(seed.id.as_str()) {
                return Err(BoardError::DuplicateCard(seed.id.clone()));
            }
            let status = match mode {
                SeedMode::Seeded => CardStatus::from_seed(seed.status.as_deref()),
                SeedMode::AllBacklog => CardStatus::Backlog,
            };
            let column = Column::for_status(status);
            columns[column.index()].push(Card::new(
                seed.id.as_str(),
                seed.name.clone(),
                seed.description.clone(),
                status,
            ));
        }

        let [backlog, in_progress, complete] = columns;
        Ok(Self::from_columns(backlog, in_progress, complete))
    }

    /// Builds a store from raw sequences without checking invariants.
    pub(crate) fn from_columns(
        backlog: Vec<Card>,
        in_progress: Vec<Card>,
        complete: Vec<Card>,
    ) -> Self {
        Self {
            backlog: Arc::new(backlog),
            in_progress: Arc::new(in_progress),
            complete: Arc::new(complete),
        }
    }

    fn slot(&self, column: Column) -> &Arc<Vec<Card>> {
        match column {
            Column::Backlog => &self.backlog,
            Column::InProgress => &self.in_progress,
            Column::Complete => &self.complete,
        }
    }

    fn slot_mut(&mut self, column: Column) -> &mut Arc<Vec<Card>> {
        match column {
            Column::Backlog => &mut self.backlog,
            Column::InProgress => &mut self.in_progress,
            Column::Complete => &mut self.complete,
        }
    }

    /// The ordered cards of `column`
    pub fn column(&self, column: Column) -> &[Card] {
        self.slot(column).as_slice()
    }

    /// Total number of cards across all columns
    pub fn len(&self) -> usize {
        Column::ALL.iter().map(|c| self.column(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds the column and position of a card
    pub fn locate(&self, id: &CardId) -> Option<(Column, usize)> {
        Column::ALL.iter().find_map(|column| {
            self.column(*column)
                .iter()
                .position(|card| &card.id == id)
                .map(|idx| (*column, idx))
        })
    }

    /// Every column holding a card with `id`; more than one is a defect
    pub fn columns_containing(&self, id: &CardId) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|column| self.column(*column).iter().any(|card| &card.id == id))
            .collect()
    }

    /// All card ids, sorted, duplicates kept
    pub fn card_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<CardId> = Column::ALL
            .iter()
            .flat_map(|column| self.column(*column).iter().map(|card| card.id.clone()))
            .collect();
        ids.sort();
        ids
    }

    /// Removes the card with `id` from `column`.
    ///
    /// Returns the card and the column's remaining sequence, relative order
    /// preserved. The store itself is untouched.
    pub fn remove_from_column(&self, column: Column, id: &CardId) -> Result<(Card, Vec<Card>)> {
        let mut remaining = self.column(column).to_vec();
        let idx = remaining
            .iter()
            .position(|card| &card.id == id)
            .ok_or_else(|| BoardError::CardNotFound {
                column,
                id: id.to_string(),
            })?;
        let card = remaining.remove(idx);
        Ok((card, remaining))
    }

    /// Inserts `card` into `sequence` immediately before the card whose id is
    /// `before`. Appends when `before` is `None` or names no card in the
    /// sequence; a stale reference is not an error.
    pub fn insert_into_column(
        column: Column,
        mut sequence: Vec<Card>,
        card: Card,
        before: Option<&CardId>,
    ) -> Vec<Card> {
        let position = before.and_then(|before| {
            let found = sequence.iter().position(|c| &c.id == before);
            if found.is_none() {
                tracing::debug!(
                    column = %column,
                    before = %before,
                    card = %card.id,
                    "insert-before reference not in column, appending"
                );
            }
            found
        });

        match position {
            Some(idx) => sequence.insert(idx, card),
            None => sequence.push(card),
        }
        sequence
    }

    /// Produces a new snapshot with the given columns replaced. Columns not
    /// mentioned are shared with `self`.
    pub fn with_columns(&self, updates: impl IntoIterator<Item = (Column, Vec<Card>)>) -> Self {
        let mut next = self.clone();
        for (column, sequence) in updates {
            *next.slot_mut(column) = Arc::new(sequence);
        }
        next
    }

    /// Whether `column` is physically shared between the two snapshots
    pub fn shares_column(&self, other: &CardStore, column: Column) -> bool {
        Arc::ptr_eq(self.slot(column), other.slot(column))
    }

    /// Checks that every id appears once and every status matches its column
    pub fn verify(&self) -> Result<()> {
        let mut seen: HashMap<&CardId, Column> = HashMap::with_capacity(self.len());
        for column in Column::ALL {
            for card in self.column(column) {
                if let Some(previous) = seen.insert(&card.id, column) {
                    return Err(BoardError::InvariantViolation(format!(
                        "card {} appears in both {} and {}",
                        card.id, previous, column
                    )));
                }
                if card.status != column.status() {
                    return Err(BoardError::InvariantViolation(format!(
                        "card {} in {} has status {}",
                        card.id, column, card.status
                    )));
                }
            }
        }
        Ok(())
    }
}
