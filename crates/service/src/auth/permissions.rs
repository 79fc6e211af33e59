//! `<resource>_<action>` permission strings.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Booking,
    Table,
    Material,
    CheckInventory,
    ImportMaterial,
    ExportMaterial,
    Promotion,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Booking,
        Resource::Table,
        Resource::Material,
        Resource::CheckInventory,
        Resource::ImportMaterial,
        Resource::ExportMaterial,
        Resource::Promotion,
        Resource::Dashboard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Booking => "booking",
            Resource::Table => "table",
            Resource::Material => "material",
            Resource::CheckInventory => "check_inventory",
            Resource::ImportMaterial => "import_material",
            Resource::ExportMaterial => "export_material",
            Resource::Promotion => "promotion",
            Resource::Dashboard => "dashboard",
        }
    }
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Read, Action::Create, Action::Update, Action::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

pub fn permission(resource: Resource, action: Action) -> String {
    format!("{}_{}", resource.as_str(), action.as_str())
}

/// Every permission string, granted to the bootstrap admin role.
pub fn all_permissions() -> Vec<String> {
    Resource::ALL
        .iter()
        .flat_map(|r| Action::ALL.iter().map(move |a| permission(*r, *a)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_string_format() {
        assert_eq!(permission(Resource::CheckInventory, Action::Update), "check_inventory_update");
        assert_eq!(permission(Resource::Promotion, Action::Read), "promotion_read");
    }

    #[test]
    fn all_permissions_cover_every_pair() {
        let all = all_permissions();
        assert_eq!(all.len(), Resource::ALL.len() * Action::ALL.len());
        assert!(all.contains(&"dashboard_read".to_string()));
    }
}
