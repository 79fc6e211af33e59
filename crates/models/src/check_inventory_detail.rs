use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::status::AcceptStatus;
use crate::{check_inventory, material};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "check_inventory_detail")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub check_inventory_id: i32,
    pub material_id: i32,
    /// Counted quantity; becomes the material's stock once approved.
    pub inventory_quantity: i32,
    pub damaged_quantity: i32,
    pub note: Option<String>,
    pub status: AcceptStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub deleted_by: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    CheckInventory,
    Material,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::CheckInventory => Entity::belongs_to(check_inventory::Entity)
                .from(Column::CheckInventoryId)
                .to(check_inventory::Column::Id)
                .into(),
            Relation::Material => Entity::belongs_to(material::Entity)
                .from(Column::MaterialId)
                .to(material::Column::Id)
                .into(),
        }
    }
}

impl Related<check_inventory::Entity> for Entity {
    fn to() -> RelationDef { Relation::CheckInventory.def() }
}

impl Related<material::Entity> for Entity {
    fn to() -> RelationDef { Relation::Material.def() }
}

impl ActiveModelBehavior for ActiveModel {}
