use crate::error::{BoardError, Result};
use crate::ui::{NodeHandle, NodeHierarchy};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
    classes: Vec<String>,
    data_id: Option<String>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            classes: Vec::new(),
            data_id: None,
        }
    }
}

/// Arena-backed element tree standing in for the rendered document
#[derive(Debug, Default)]
pub struct NodeTree {
    nodes: HashMap<NodeHandle, Node>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, handle: NodeHandle) -> Result<&Node> {
        self.nodes
            .get(&handle)
            .ok_or_else(|| BoardError::UnknownNode(handle.to_string()))
    }

    fn node_mut(&mut self, handle: NodeHandle) -> Result<&mut Node> {
        self.nodes
            .get_mut(&handle)
            .ok_or_else(|| BoardError::UnknownNode(handle.to_string()))
    }

    /// Creates a detached element carrying `classes`
    pub fn create_element(&mut self, classes: &[&str]) -> NodeHandle {
        let handle = NodeHandle::new();
        let mut node = Node::new(NodeKind::Element);
        node.classes = classes.iter().map(|c| c.to_string()).collect();
        self.nodes.insert(handle, node);
        handle
    }

    /// Creates a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeHandle {
        let handle = NodeHandle::new();
        self.nodes
            .insert(handle, Node::new(NodeKind::Text(text.to_string())));
        handle
    }

    /// Sets the `data-id` attribute. Text nodes cannot carry one.
    pub fn set_data_id(&mut self, handle: NodeHandle, id: &str) -> Result<()> {
        let node = self.node_mut(handle)?;
        if let NodeKind::Text(_) = node.kind {
            return Err(BoardError::UnknownNode(format!("{handle} is a text node")));
        }
        node.data_id = Some(id.to_string());
        Ok(())
    }

    pub fn kind(&self, handle: NodeHandle) -> Option<&NodeKind> {
        self.nodes.get(&handle).map(|n| &n.kind)
    }

    pub fn has_class(&self, handle: NodeHandle, class: &str) -> bool {
        self.nodes
            .get(&handle)
            .map(|n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn classes(&self, handle: NodeHandle) -> &[String] {
        self.nodes
            .get(&handle)
            .map(|n| n.classes.as_slice())
            .unwrap_or(&[])
    }

    pub fn children(&self, handle: NodeHandle) -> &[NodeHandle] {
        self.nodes
            .get(&handle)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// The sibling immediately after `handle` under the same parent
    pub fn next_sibling(&self, handle: NodeHandle) -> Option<NodeHandle> {
        let parent = self.nodes.get(&handle)?.parent?;
        let siblings = self.children(parent);
        let idx = siblings.iter().position(|c| *c == handle)?;
        siblings.get(idx + 1).copied()
    }

    /// Nearest node, starting at `handle` itself, that satisfies `predicate`
    pub fn closest(
        &self,
        handle: NodeHandle,
        predicate: impl Fn(&NodeTree, NodeHandle) -> bool,
    ) -> Option<NodeHandle> {
        self.ancestors(handle).find(|n| predicate(self, *n))
    }

    /// Appends `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        self.insert_before(parent, child, None)
    }

    /// Inserts `child` under `parent` before `reference`, or last when the
    /// reference is `None` or not a child of `parent`. Moving a node under
    /// itself or one of its descendants is rejected.
    pub fn insert_before(
        &mut self,
        parent: NodeHandle,
        child: NodeHandle,
        reference: Option<NodeHandle>,
    ) -> Result<()> {
        self.node(parent)?;
        self.node(child)?;
        if self.ancestors(parent).any(|n| n == child) {
            return Err(BoardError::HierarchyCycle {
                node: child.to_string(),
                parent: parent.to_string(),
            });
        }

        self.detach(child)?;

        let parent_node = self.node_mut(parent)?;
        let idx = reference
            .filter(|r| *r != child)
            .and_then(|r| parent_node.children.iter().position(|c| *c == r))
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(idx, child);

        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Unlinks `handle` from its parent, keeping its subtree
    pub fn detach(&mut self, handle: NodeHandle) -> Result<()> {
        let previous = self.node_mut(handle)?.parent.take();
        if let Some(parent) = previous {
            let parent_node = self.node_mut(parent)?;
            parent_node.children.retain(|c| *c != handle);
        }
        Ok(())
    }

    /// Drops every descendant of `handle` from the tree
    pub fn remove_children(&mut self, handle: NodeHandle) -> Result<()> {
        let mut pending = std::mem::take(&mut self.node_mut(handle)?.children);
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                pending.extend(node.children);
            }
        }
        Ok(())
    }
}

impl NodeHierarchy for NodeTree {
    fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    fn declared_id(&self, node: NodeHandle) -> Option<&str> {
        self.nodes.get(&node).and_then(|n| n.data_id.as_deref())
    }

    fn contains(&self, node: NodeHandle) -> bool {
        self.nodes.contains_key(&node)
    }
}
