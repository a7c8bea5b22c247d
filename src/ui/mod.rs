//! Containment model for the rendered board.
//!
//! Drop notifications carry raw node handles whose ancestry is not
//! guaranteed: a target may be the dragged element itself or a wrapper
//! inside a lane. Everything that interprets those handles reads through
//! [`NodeHierarchy`].

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod registry;
pub mod tree;

pub use registry::{ContainerHandles, ContainerRegistry};
pub use tree::{NodeKind, NodeTree};

/// Opaque reference to a node supplied by the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeHandle(Uuid);

impl NodeHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0.simple())
    }
}

/// Upper bound on any upward walk, so a cyclic hierarchy cannot hang a drop
pub const MAX_ANCESTRY_DEPTH: usize = 256;

/// Read access to a parent-linked node hierarchy
pub trait NodeHierarchy {
    /// Parent of `node`, `None` for roots and unknown nodes
    fn parent(&self, node: NodeHandle) -> Option<NodeHandle>;

    /// The card id the node declares on itself, if any
    fn declared_id(&self, node: NodeHandle) -> Option<&str>;

    /// Whether the hierarchy knows about `node`
    fn contains(&self, node: NodeHandle) -> bool;

    /// Walks from `node` (inclusive) towards the root
    fn ancestors(&self, node: NodeHandle) -> Ancestors<'_, Self>
    where
        Self: Sized,
    {
        Ancestors {
            hierarchy: self,
            next: self.contains(node).then_some(node),
            depth: 0,
        }
    }
}

/// Iterator returned by [`NodeHierarchy::ancestors`]
pub struct Ancestors<'a, H> {
    hierarchy: &'a H,
    next: Option<NodeHandle>,
    depth: usize,
}

impl<H: NodeHierarchy> Iterator for Ancestors<'_, H> {
    type Item = NodeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        if self.depth >= MAX_ANCESTRY_DEPTH {
            return None;
        }
        let current = self.next?;
        self.depth += 1;
        self.next = self.hierarchy.parent(current);
        Some(current)
    }
}
