use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub deleted_by: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Permission,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Permission => Entity::has_many(crate::role_permission::Entity).into() }
    }
}

impl Related<crate::role_permission::Entity> for Entity {
    fn to() -> RelationDef { Relation::Permission.def() }
}

impl ActiveModelBehavior for ActiveModel {}
