use crate::drag::{DragController, DropEvent, DropSubscription};
use crate::error::{BoardError, Result};
use crate::ui::{NodeHandle, NodeHierarchy, NodeTree};
use std::collections::HashSet;
use tokio::sync::mpsc::UnboundedSender;

struct Drake {
    containers: HashSet<NodeHandle>,
    tx: UnboundedSender<DropEvent>,
}

#[derive(Debug, Clone, Copy)]
struct Hover {
    container: NodeHandle,
    reference: Option<NodeHandle>,
}

#[derive(Debug, Clone, Copy)]
struct Gesture {
    item: NodeHandle,
    source: NodeHandle,
    hover: Option<Hover>,
}

/// Single-pointer drag library over a [`NodeTree`].
///
/// Draggable items are the direct children of connected containers. A
/// gesture is `press`, any number of `hover`s, then `release`; the item is
/// moved in the tree before the drop is reported, the same way DOM drag
/// libraries mutate the document first and notify afterwards.
pub struct PointerDragController {
    drake: Option<Drake>,
    gesture: Option<Gesture>,
    report_source: bool,
}

impl Default for PointerDragController {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerDragController {
    pub fn new() -> Self {
        Self {
            drake: None,
            gesture: None,
            report_source: true,
        }
    }

    /// Leave `source` out of drop notifications, as some drag libraries do
    pub fn without_source(mut self) -> Self {
        self.report_source = false;
        self
    }

    /// Whether a live subscriber is attached
    pub fn is_connected(&self) -> bool {
        self.drake.as_ref().is_some_and(|d| !d.tx.is_closed())
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    fn live_drake(&mut self) -> Option<&Drake> {
        if self.drake.as_ref().is_some_and(|d| d.tx.is_closed()) {
            tracing::debug!("drop subscription closed, releasing containers");
            self.drake = None;
            self.gesture = None;
        }
        self.drake.as_ref()
    }

    /// Starts a gesture on the draggable item at or above `node`.
    ///
    /// Returns the grabbed item, or `None` when nothing under `node` can be
    /// dragged.
    pub fn press(&mut self, tree: &NodeTree, node: NodeHandle) -> Result<Option<NodeHandle>> {
        if self.gesture.is_some() {
            return Err(BoardError::GestureInProgress);
        }
        let drake = self.live_drake().ok_or(BoardError::DragInactive)?;

        let grabbed = tree.ancestors(node).find_map(|candidate| {
            tree.parent(candidate)
                .filter(|parent| drake.containers.contains(parent))
                .map(|parent| (candidate, parent))
        });

        let Some((item, source)) = grabbed else {
            return Ok(None);
        };

        tracing::debug!(item = %item, source = %source, "drag started");
        self.gesture = Some(Gesture {
            item,
            source,
            hover: None,
        });
        Ok(Some(item))
    }

    /// Moves the pointer over `node`, or outside every node when `None`
    pub fn hover(&mut self, tree: &NodeTree, node: Option<NodeHandle>) {
        let Some(containers) = self.drake.as_ref().map(|d| &d.containers) else {
            return;
        };
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        let item = gesture.item;

        gesture.hover = node.and_then(|node| {
            let path: Vec<NodeHandle> = tree.ancestors(node).collect();
            let at = path.iter().position(|n| containers.contains(n))?;
            let container = path[at];
            let reference = match at.checked_sub(1).map(|i| path[i]) {
                Some(child) if child == item => tree.next_sibling(item),
                other => other,
            };
            Some(Hover {
                container,
                reference,
            })
        });
    }

    /// Ends the gesture. Dropping over a container moves the item and emits
    /// one [`DropEvent`]; anywhere else cancels the drag.
    pub fn release(&mut self, tree: &mut NodeTree) -> Result<Option<DropEvent>> {
        let Some(gesture) = self.gesture.take() else {
            return Ok(None);
        };
        let Some(hover) = gesture.hover else {
            tracing::debug!(item = %gesture.item, "drag cancelled outside any container");
            return Ok(None);
        };

        tree.insert_before(hover.container, gesture.item, hover.reference)?;

        let event = DropEvent {
            dragged: Some(gesture.item),
            target: Some(hover.container),
            source: self.report_source.then_some(gesture.source),
            sibling: tree.next_sibling(gesture.item),
        };

        let drake = self.live_drake().ok_or(BoardError::DragInactive)?;
        if drake.tx.send(event).is_err() {
            self.drake = None;
            return Err(BoardError::DragInactive);
        }
        Ok(Some(event))
    }

    /// Abandons the current gesture without a drop
    pub fn cancel(&mut self) {
        self.gesture = None;
    }

    /// Releases every connected container
    pub fn destroy(&mut self) {
        self.drake = None;
        self.gesture = None;
    }
}

impl DragController for PointerDragController {
    fn connect(&mut self, containers: &[NodeHandle]) -> Result<DropSubscription> {
        if self.drake.is_some() {
            tracing::debug!("reconnecting drag controller, previous subscriber dropped");
        }
        let (tx, subscription) = DropSubscription::channel();
        self.gesture = None;
        self.drake = Some(Drake {
            containers: containers.iter().copied().collect(),
            tx,
        });
        Ok(subscription)
    }
}
