//! SeaORM Entity for the latest known state of each RFID tag

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    /// Electronic Product Code
    #[sea_orm(primary_key, auto_increment = false)]
    pub epc: String,
    pub product_id: String,
    /// Last presence event, e.g. "arrival", "moved", "departed"
    pub event: String,
    /// Last read time (ms since epoch, 0 = never read)
    pub last_read: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
