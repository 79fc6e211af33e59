use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

use super::migrated_db;
use crate::soft_delete::{find_active_by_id, soft_delete, SoftDelete};
use crate::status::{PromotionStatus, TableStatus};
use crate::{promotion, tables_restaurant};

async fn insert_table(db: &sea_orm::DatabaseConnection, name: &str) -> Result<tables_restaurant::Model, anyhow::Error> {
    let now = Utc::now().fixed_offset();
    let am = tables_restaurant::ActiveModel {
        name: Set(name.to_string()),
        number_seat: Set(4),
        status: Set(TableStatus::Ready),
        note: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        created_by: Set(Some(1)),
        updated_by: Set(None),
        deleted_by: Set(None),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

#[tokio::test]
async fn soft_deleted_rows_stay_in_storage_but_leave_reads() -> Result<(), anyhow::Error> {
    let db = migrated_db().await?;
    let t1 = insert_table(&db, "T1").await?;
    let t2 = insert_table(&db, "T2").await?;

    assert!(soft_delete::<tables_restaurant::Entity, _>(&db, t1.id, Some(7)).await?);

    assert!(find_active_by_id::<tables_restaurant::Entity, _>(&db, t1.id).await?.is_none());
    assert!(find_active_by_id::<tables_restaurant::Entity, _>(&db, t2.id).await?.is_some());
    assert_eq!(tables_restaurant::Entity::find_active().count(&db).await?, 1);

    let raw = tables_restaurant::Entity::find_by_id(t1.id).one(&db).await?.expect("row kept");
    assert!(raw.deleted_at.is_some());
    assert_eq!(raw.deleted_by, Some(7));
    Ok(())
}

#[tokio::test]
async fn soft_delete_twice_reports_miss() -> Result<(), anyhow::Error> {
    let db = migrated_db().await?;
    let t = insert_table(&db, "T9").await?;
    assert!(soft_delete::<tables_restaurant::Entity, _>(&db, t.id, None).await?);
    assert!(!soft_delete::<tables_restaurant::Entity, _>(&db, t.id, None).await?);
    assert!(!soft_delete::<tables_restaurant::Entity, _>(&db, 9999, None).await?);
    Ok(())
}

#[tokio::test]
async fn promotions_are_seeded() -> Result<(), anyhow::Error> {
    let db = migrated_db().await?;
    let rows = promotion::Entity::find_active().all(&db).await?;
    let mut names: Vec<_> = rows.iter().map(|p| (p.name.as_str(), p.percent)).collect();
    names.sort();
    assert_eq!(names, vec![("Khai trương", 50), ("Quốc khánh", 30)]);
    assert!(rows.iter().all(|p| p.status == PromotionStatus::Active));
    Ok(())
}
