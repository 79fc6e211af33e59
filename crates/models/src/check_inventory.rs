use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::status::AcceptStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "check_inventory")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub warehouse_staff_id: i32,
    pub status: AcceptStatus,
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub deleted_by: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Detail,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Detail => Entity::has_many(crate::check_inventory_detail::Entity).into() }
    }
}

impl Related<crate::check_inventory_detail::Entity> for Entity {
    fn to() -> RelationDef { Relation::Detail.def() }
}

impl ActiveModelBehavior for ActiveModel {}
