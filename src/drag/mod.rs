use crate::error::Result;
use crate::ui::NodeHandle;
use tokio::sync::mpsc;

pub mod pointer;

pub use pointer::PointerDragController;

/// One completed drop, as reported by the drag library.
///
/// None of the handles are guaranteed to be the registered containers
/// themselves; any of them may also be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropEvent {
    pub dragged: Option<NodeHandle>,
    pub target: Option<NodeHandle>,
    pub source: Option<NodeHandle>,
    pub sibling: Option<NodeHandle>,
}

/// A drag library that can wire a set of containers together
pub trait DragController {
    /// Treats `containers` as interconnected drop zones and subscribes to
    /// their drop notifications.
    fn connect(&mut self, containers: &[NodeHandle]) -> Result<DropSubscription>;
}

/// Receiving end of a drag controller's drop notifications.
///
/// Notifications queue up in delivery order and are consumed by a single
/// reader. Closing or dropping the subscription releases the controller.
#[derive(Debug)]
pub struct DropSubscription {
    rx: mpsc::UnboundedReceiver<DropEvent>,
}

impl DropSubscription {
    /// Creates a linked sender/subscription pair
    pub fn channel() -> (mpsc::UnboundedSender<DropEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    /// Next queued drop, without waiting
    pub fn try_next(&mut self) -> Option<DropEvent> {
        self.rx.try_recv().ok()
    }

    /// Takes every queued drop in delivery order
    pub fn drain(&mut self) -> Vec<DropEvent> {
        let mut drops = Vec::new();
        while let Some(drop) = self.try_next() {
            drops.push(drop);
        }
        drops
    }

    /// Stops accepting new notifications
    pub fn close(&mut self) {
        self.rx.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_preserves_order() {
        let (tx, mut subscription) = DropSubscription::channel();
        let first = DropEvent {
            dragged: Some(NodeHandle::new()),
            ..Default::default()
        };
        let second = DropEvent::default();
        tx.send(first).unwrap();
        tx.send(second).unwrap();

        assert_eq!(subscription.drain(), vec![first, second]);
        assert_eq!(subscription.try_next(), None);
    }

    #[test]
    fn test_close_releases_sender() {
        let (tx, mut subscription) = DropSubscription::channel();
        subscription.close();

        assert!(tx.is_closed());
        assert!(tx.send(DropEvent::default()).is_err());
    }

    #[test]
    fn test_drop_releases_sender() {
        let (tx, subscription) = DropSubscription::channel();
        drop(subscription);
        assert!(tx.is_closed());
    }
}
