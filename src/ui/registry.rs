use crate::domain::Column;
use crate::ui::{NodeHandle, NodeHierarchy};
use std::collections::HashMap;

/// The drop containers the rendering layer hands over at activation.
/// Any of them may be missing if that lane failed to mount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerHandles {
    pub backlog: Option<NodeHandle>,
    pub in_progress: Option<NodeHandle>,
    pub complete: Option<NodeHandle>,
}

impl ContainerHandles {
    /// Present handles paired with their column, in display order
    pub fn present(&self) -> Vec<(Column, NodeHandle)> {
        [
            (Column::Backlog, self.backlog),
            (Column::InProgress, self.in_progress),
            (Column::Complete, self.complete),
        ]
        .into_iter()
        .filter_map(|(column, handle)| handle.map(|h| (column, h)))
        .collect()
    }
}

/// Maps registered container handles to their column. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct ContainerRegistry {
    columns: HashMap<NodeHandle, Column>,
}

impl ContainerRegistry {
    pub fn new(handles: &ContainerHandles) -> Self {
        Self {
            columns: handles.present().into_iter().map(|(c, h)| (h, c)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn handles(&self) -> Vec<NodeHandle> {
        self.columns.keys().copied().collect()
    }

    /// Column of an exact registered handle
    pub fn column_of(&self, handle: NodeHandle) -> Option<Column> {
        self.columns.get(&handle).copied()
    }

    /// Resolves `handle` to the column of the nearest registered container at
    /// or above it. `None` when no ancestor is registered.
    pub fn resolve<H: NodeHierarchy>(&self, hierarchy: &H, handle: NodeHandle) -> Option<Column> {
        if let Some(column) = self.column_of(handle) {
            return Some(column);
        }
        hierarchy
            .ancestors(handle)
            .find_map(|node| self.column_of(node))
    }
}
