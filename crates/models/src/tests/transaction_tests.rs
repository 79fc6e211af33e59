use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set, TransactionTrait};

use super::migrated_db;
use crate::material;

fn new_material(name: &str, quantity: i32) -> material::ActiveModel {
    let now = Utc::now().fixed_offset();
    material::ActiveModel {
        material: Set(name.to_string()),
        unit: Set("kg".into()),
        limit_over: Set(5),
        quantity: Set(quantity),
        note: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        created_by: Set(None),
        updated_by: Set(None),
        deleted_by: Set(None),
        ..Default::default()
    }
}

#[tokio::test]
async fn rollback_discards_inserts() -> Result<(), anyhow::Error> {
    let db = migrated_db().await?;
    let txn = db.begin().await?;
    new_material("Rice", 10).insert(&txn).await?;
    txn.rollback().await?;
    assert_eq!(material::Entity::find().count(&db).await?, 0);
    Ok(())
}

#[tokio::test]
async fn commit_persists_inserts() -> Result<(), anyhow::Error> {
    let db = migrated_db().await?;
    let txn = db.begin().await?;
    let m = new_material("Beef", 3).insert(&txn).await?;
    txn.commit().await?;
    let found = material::Entity::find_by_id(m.id).one(&db).await?.expect("committed");
    assert_eq!(found.quantity, 3);
    assert!(found.is_below_limit());
    Ok(())
}
