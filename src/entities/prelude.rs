//! `SeaORM` Entity prelude

pub use super::tags::Entity as Tags;
pub use super::turnover_history::Entity as TurnoverHistory;
