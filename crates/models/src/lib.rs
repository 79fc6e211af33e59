//! sea-orm entities for the back office plus the status enums they share.

pub mod errors;
pub mod db;
pub mod status;
pub mod soft_delete;

pub mod role;
pub mod role_permission;
pub mod user;
pub mod material;
pub mod tables_restaurant;
pub mod booking;
pub mod check_inventory;
pub mod check_inventory_detail;
pub mod import_material;
pub mod import_material_order;
pub mod export_material;
pub mod export_material_order;
pub mod promotion;
pub mod user_log;

impl_soft_delete!(
    role,
    user,
    material,
    tables_restaurant,
    booking,
    check_inventory,
    check_inventory_detail,
    import_material,
    import_material_order,
    export_material,
    export_material_order,
    promotion,
);

#[cfg(test)]
mod tests;
