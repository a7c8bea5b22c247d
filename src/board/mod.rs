pub mod controller;
pub mod reconciler;

pub use controller::{BoardController, CardMove, DropOutcome, DEFAULT_HISTORY_LIMIT};
pub use reconciler::{ContainerRole, DropReconciler};
