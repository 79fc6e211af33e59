use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::status::BookingStatus;
use crate::tables_restaurant;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub table_id: i32,
    pub name_customer: String,
    pub phone: String,
    pub number_people: i32,
    pub arrival_time: DateTimeWithTimeZone,
    pub status: BookingStatus,
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
    Table,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Table => Entity::belongs_to(tables_restaurant::Entity)
                .from(Column::TableId)
                .to(tables_restaurant::Column::Id)
                .into(),
        }
    }
}

impl Related<tables_restaurant::Entity> for Entity {
    fn to() -> RelationDef { Relation::Table.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Digits with an optional leading `+`, 8 to 15 long.
pub fn validate_phone(phone: &str) -> Result<(), errors::ModelError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.len() < 8 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(errors::ModelError::Validation("invalid phone number".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_phone;

    #[test]
    fn phone_validation() {
        assert!(validate_phone("0901234567").is_ok());
        assert!(validate_phone("+84901234567").is_ok());
        assert!(validate_phone("09-0123").is_err());
        assert!(validate_phone("1234").is_err());
    }
}
