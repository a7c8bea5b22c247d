pub mod card;
pub mod column;
pub mod store;

pub use card::{Card, CardId, CardStatus};
pub use column::Column;
pub use store::CardStore;
