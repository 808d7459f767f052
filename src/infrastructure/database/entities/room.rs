//! Room entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub number: String,

    /// single, double, twin, suite, deluxe
    pub room_type: String,

    pub floor: i32,
    pub capacity: i32,

    /// Nightly rate in minor currency units
    pub price_per_night: i64,

    #[sea_orm(nullable)]
    pub description: Option<String>,

    /// available, occupied, cleaning, maintenance
    pub status: String,

    #[sea_orm(nullable)]
    pub last_cleaned: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,
    #[sea_orm(has_many = "super::housekeeping_task::Entity")]
    HousekeepingTasks,
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl Related<super::housekeeping_task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HousekeepingTasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
