use serde::{Deserialize, Serialize};

/// Axis-aligned box in board coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges are outside
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Geometry of the rendered board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub column_width: f64,
    pub header_height: f64,
    pub card_height: f64,
    pub min_column_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_width: 320.0,
            header_height: 48.0,
            card_height: 72.0,
            min_column_height: 400.0,
        }
    }
}

impl LayoutConfig {
    /// Box of the lane wrapper at `index`, header included
    pub fn lane(&self, index: usize, cards: usize) -> Rect {
        Rect::new(
            self.column_width * index as f64,
            0.0,
            self.column_width,
            self.header_height + self.container_height(cards),
        )
    }

    /// Box of the drop container under the lane header
    pub fn container(&self, index: usize, cards: usize) -> Rect {
        Rect::new(
            self.column_width * index as f64,
            self.header_height,
            self.column_width,
            self.container_height(cards),
        )
    }

    /// Box of the card at `row` within the container at `index`
    pub fn card(&self, index: usize, row: usize) -> Rect {
        Rect::new(
            self.column_width * index as f64,
            self.header_height + self.card_height * row as f64,
            self.column_width,
            self.card_height,
        )
    }

    fn container_height(&self, cards: usize) -> f64 {
        (self.card_height * cards as f64).max(self.min_column_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(0.0, 0.0));
        assert!(rect.contains(9.9, 9.9));
        assert!(!rect.contains(10.0, 5.0));
        assert_eq!(rect.center(), (5.0, 5.0));
    }

    #[test]
    fn test_container_grows_with_cards() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.container(1, 2).height, 400.0);
        assert_eq!(layout.container(1, 10).height, 720.0);
        assert_eq!(layout.container(2, 0).x, 640.0);
    }

    #[test]
    fn test_cards_stack_below_header() {
        let layout = LayoutConfig::default();
        let first = layout.card(0, 0);
        let third = layout.card(0, 2);
        assert_eq!(first.y, 48.0);
        assert_eq!(third.y, 48.0 + 144.0);
        assert!(layout.container(0, 3).contains(third.x, third.y));
    }
}
