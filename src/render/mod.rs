//! Renders a [`CardStore`] snapshot into a [`NodeTree`].
//!
//! The board skeleton (lanes, headers, drop containers) is mounted once and
//! its handles stay stable for the life of the view; only card elements are
//! rebuilt on each render.

use crate::domain::{CardStore, Column};
use crate::error::Result;
use crate::ui::{ContainerHandles, NodeHandle, NodeTree};

pub mod layout;

pub use layout::{LayoutConfig, Rect};

pub const BOARD_CLASS: &str = "Board";
pub const LANE_CLASS: &str = "Swimlane";
pub const HEADER_CLASS: &str = "Swimlane-header";
pub const CONTAINER_CLASS: &str = "Swimlane-dragColumn";
pub const CARD_CLASS: &str = "Card";
pub const CARD_TITLE_CLASS: &str = "Card-title";

#[derive(Debug, Clone, Copy)]
struct Lane {
    column: Column,
    wrapper: NodeHandle,
    container: NodeHandle,
}

#[derive(Debug, Clone, Copy)]
struct Placed {
    node: NodeHandle,
    rect: Rect,
    depth: u8,
}

pub struct BoardView {
    layout: LayoutConfig,
    board: NodeHandle,
    lanes: Vec<Lane>,
    placed: Vec<Placed>,
}

impl BoardView {
    /// Mounts the board skeleton into `tree`
    pub fn mount(tree: &mut NodeTree, layout: LayoutConfig) -> Result<Self> {
        let board = tree.create_element(&[BOARD_CLASS]);
        let mut lanes = Vec::with_capacity(Column::ALL.len());

        for column in Column::ALL {
            let wrapper = tree.create_element(&[LANE_CLASS]);
            let header = tree.create_element(&[HEADER_CLASS]);
            let title = tree.create_text(column.title());
            let container = tree.create_element(&[CONTAINER_CLASS]);

            tree.append_child(board, wrapper)?;
            tree.append_child(wrapper, header)?;
            tree.append_child(header, title)?;
            tree.append_child(wrapper, container)?;

            lanes.push(Lane {
                column,
                wrapper,
                container,
            });
        }

        let mut view = Self {
            layout,
            board,
            lanes,
            placed: Vec::new(),
        };
        view.place(tree, &CardStore::new());
        Ok(view)
    }

    pub fn board(&self) -> NodeHandle {
        self.board
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// The drop container of every mounted lane
    pub fn container_handles(&self) -> ContainerHandles {
        ContainerHandles {
            backlog: self.container(Column::Backlog),
            in_progress: self.container(Column::InProgress),
            complete: self.container(Column::Complete),
        }
    }

    pub fn container(&self, column: Column) -> Option<NodeHandle> {
        self.lanes
            .iter()
            .find(|lane| lane.column == column)
            .map(|lane| lane.container)
    }

    /// Every node carrying the drop-container class, in display order
    pub fn containers(&self, tree: &NodeTree) -> Vec<NodeHandle> {
        self.lanes
            .iter()
            .map(|lane| lane.container)
            .filter(|node| tree.has_class(*node, CONTAINER_CLASS))
            .collect()
    }

    /// Card elements currently under the container of `column`
    pub fn cards_in(&self, tree: &NodeTree, column: Column) -> Vec<NodeHandle> {
        self.container(column)
            .map(|container| {
                tree.children(container)
                    .iter()
                    .copied()
                    .filter(|node| tree.has_class(*node, CARD_CLASS))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Rebuilds the card elements of every lane from `store`
    pub fn render(&mut self, tree: &mut NodeTree, store: &CardStore) -> Result<()> {
        for lane in &self.lanes {
            tree.remove_children(lane.container)?;
            for card in store.column(lane.column) {
                let node = tree.create_element(&[CARD_CLASS, card.status.css_class()]);
                tree.set_data_id(node, card.id.as_str())?;
                let title = tree.create_element(&[CARD_TITLE_CLASS]);
                let text = tree.create_text(&card.name);

                tree.append_child(lane.container, node)?;
                tree.append_child(node, title)?;
                tree.append_child(title, text)?;
            }
        }

        self.place(tree, store);
        tracing::debug!(cards = store.len(), "board rendered");
        Ok(())
    }

    fn place(&mut self, tree: &NodeTree, store: &CardStore) {
        let layout = self.layout;
        let mut placed = Vec::new();
        let mut board_height: f64 = 0.0;

        for (index, lane) in self.lanes.iter().enumerate() {
            let count = store.column(lane.column).len();
            let lane_rect = layout.lane(index, count);
            board_height = board_height.max(lane_rect.height);

            placed.push(Placed {
                node: lane.wrapper,
                rect: lane_rect,
                depth: 1,
            });
            placed.push(Placed {
                node: lane.container,
                rect: layout.container(index, count),
                depth: 2,
            });

            for (row, node) in self.cards_in(tree, lane.column).into_iter().enumerate() {
                let rect = layout.card(index, row);
                placed.push(Placed {
                    node,
                    rect,
                    depth: 3,
                });
                if let Some(title) = tree.children(node).first() {
                    placed.push(Placed {
                        node: *title,
                        rect,
                        depth: 4,
                    });
                }
            }
        }

        placed.push(Placed {
            node: self.board,
            rect: Rect::new(
                0.0,
                0.0,
                layout.column_width * self.lanes.len() as f64,
                board_height,
            ),
            depth: 0,
        });
        self.placed = placed;
    }

    /// Deepest rendered node under the point
    pub fn hit_test(&self, x: f64, y: f64) -> Option<NodeHandle> {
        self.placed
            .iter()
            .filter(|p| p.rect.contains(x, y))
            .max_by_key(|p| p.depth)
            .map(|p| p.node)
    }

    pub fn bounding_box(&self, node: NodeHandle) -> Option<Rect> {
        self.placed.iter().find(|p| p.node == node).map(|p| p.rect)
    }
}
