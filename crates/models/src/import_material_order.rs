use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::status::AcceptStatus;
use crate::{import_material, material};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "import_material_order")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub import_material_id: i32,
    pub material_id: i32,
    pub quantity: i32,
    pub price_per_unit: i64,
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
    ImportMaterial,
    Material,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ImportMaterial => Entity::belongs_to(import_material::Entity)
                .from(Column::ImportMaterialId)
                .to(import_material::Column::Id)
                .into(),
            Relation::Material => Entity::belongs_to(material::Entity)
                .from(Column::MaterialId)
                .to(material::Column::Id)
                .into(),
        }
    }
}

impl Related<import_material::Entity> for Entity {
    fn to() -> RelationDef { Relation::ImportMaterial.def() }
}

impl Related<material::Entity> for Entity {
    fn to() -> RelationDef { Relation::Material.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// `None` when price × quantity leaves the `i64` range.
    pub fn line_total(&self) -> Option<i64> {
        self.price_per_unit.checked_mul(i64::from(self.quantity))
    }
}
