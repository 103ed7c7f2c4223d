//! SeaORM Entity for per-product turnover history

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "turnover_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub product_id: String,
    /// Rolling daily-turn estimate (0 until enough records exist)
    pub daily_turn: f64,
    /// Turn records as a JSON array, newest first
    #[sea_orm(column_type = "JsonBinary")]
    pub records: Json,
    /// Last computation time (ms since epoch)
    pub timestamp: i64,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
