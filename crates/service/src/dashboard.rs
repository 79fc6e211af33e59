//! Import/export figures for the dashboard. Only approved documents count,
//! since their totals are settled.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate};
use common::pagination::empty_as_none;
use models::soft_delete::SoftDelete;
use models::status::AcceptStatus;
use models::{export_material, import_material};
use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRangeType {
    #[default]
    Month,
    Day,
}

impl FromStr for DateRangeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(Self::Month),
            "day" => Ok(Self::Day),
            other => Err(format!("unknown dateRangeType '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub date_range_type: Option<DateRangeType>,
    /// `YYYY-MM-DD,YYYY-MM-DD`, both days inclusive.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub date_ranges: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<FixedOffset>,
    /// exclusive
    pub end: DateTime<FixedOffset>,
}

impl DashboardQuery {
    pub fn range(&self) -> Result<Option<DateRange>, ServiceError> {
        self.date_ranges.as_deref().map(parse_date_ranges).transpose()
    }
}

fn start_of_day(d: NaiveDate) -> Result<DateTime<FixedOffset>, ServiceError> {
    d.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().fixed_offset())
        .ok_or_else(|| ServiceError::Validation(format!("invalid date {d}")))
}

pub fn parse_date_ranges(raw: &str) -> Result<DateRange, ServiceError> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [from, to] = parts.as_slice() else {
        return Err(ServiceError::Validation("dateRanges must be two dates separated by a comma".into()));
    };
    let parse = |s: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| ServiceError::Validation(format!("dateRanges '{s}': {e}")))
    };
    let (from, to) = (parse(*from)?, parse(*to)?);
    if from > to {
        return Err(ServiceError::Validation("dateRanges start is after end".into()));
    }
    Ok(DateRange { start: start_of_day(from)?, end: start_of_day(to)? + Duration::days(1) })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    pub import_total_payment: i64,
    pub export_total_payment: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chart {
    pub items: Vec<ChartItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub import_material_total_payment: i64,
    pub import_material_count: u64,
    pub export_material_total_revenue: i64,
    pub export_material_count: u64,
}

async fn approved_imports(db: &DatabaseConnection, range: Option<DateRange>) -> Result<Vec<(DateTime<FixedOffset>, i64)>, ServiceError> {
    use import_material::{Column, Entity};
    let mut select = Entity::find_active().filter(Column::Status.eq(AcceptStatus::Approve));
    if let Some(r) = range {
        select = select.filter(Column::CreatedAt.gte(r.start)).filter(Column::CreatedAt.lt(r.end));
    }
    Ok(select.all(db).await?.into_iter().map(|m| (m.created_at, m.total_payment_import)).collect())
}

async fn approved_exports(db: &DatabaseConnection, range: Option<DateRange>) -> Result<Vec<(DateTime<FixedOffset>, i64)>, ServiceError> {
    use export_material::{Column, Entity};
    let mut select = Entity::find_active().filter(Column::Status.eq(AcceptStatus::Approve));
    if let Some(r) = range {
        select = select.filter(Column::CreatedAt.gte(r.start)).filter(Column::CreatedAt.lt(r.end));
    }
    Ok(select.all(db).await?.into_iter().map(|m| (m.created_at, m.total_payment_export)).collect())
}

/// Bucket documents by month (1..=12) or day of month (1..=31).
pub fn bucket(
    kind: DateRangeType,
    imports: &[(DateTime<FixedOffset>, i64)],
    exports: &[(DateTime<FixedOffset>, i64)],
) -> Vec<ChartItem> {
    if imports.is_empty() && exports.is_empty() {
        return Vec::new();
    }
    let slots = match kind {
        DateRangeType::Month => 12,
        DateRangeType::Day => 31,
    };
    let key = |d: &DateTime<FixedOffset>| match kind {
        DateRangeType::Month => d.month(),
        DateRangeType::Day => d.day(),
    };
    let mut items: Vec<ChartItem> = (1..=slots)
        .map(|n| ChartItem {
            month: (kind == DateRangeType::Month).then_some(n),
            day: (kind == DateRangeType::Day).then_some(n),
            import_total_payment: 0,
            export_total_payment: 0,
        })
        .collect();
    for (at, total) in imports {
        let slot = &mut items[(key(at) - 1) as usize];
        slot.import_total_payment = slot.import_total_payment.saturating_add(*total);
    }
    for (at, total) in exports {
        let slot = &mut items[(key(at) - 1) as usize];
        slot.export_total_payment = slot.export_total_payment.saturating_add(*total);
    }
    items
}

pub async fn import_export_chart(db: &DatabaseConnection, q: &DashboardQuery) -> Result<Chart, ServiceError> {
    let range = q.range()?;
    let imports = approved_imports(db, range).await?;
    let exports = approved_exports(db, range).await?;
    debug!(imports = imports.len(), exports = exports.len(), "dashboard chart");
    Ok(Chart { items: bucket(q.date_range_type.unwrap_or_default(), &imports, &exports) })
}

pub async fn summary(db: &DatabaseConnection, q: &DashboardQuery) -> Result<Summary, ServiceError> {
    let range = q.range()?;
    let imports = approved_imports(db, range).await?;
    let exports = approved_exports(db, range).await?;
    Ok(Summary {
        import_material_total_payment: imports.iter().fold(0i64, |acc, (_, t)| acc.saturating_add(*t)),
        import_material_count: imports.len() as u64,
        export_material_total_revenue: exports.iter().fold(0i64, |acc, (_, t)| acc.saturating_add(*t)),
        export_material_count: exports.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import_material::{self as imports, CreateImportMaterialInput, CreateImportOrderInput, UpdateImportMaterialInput};
    use crate::test_support::{ctx, get_db, material_fixture};
    use chrono::{TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap().fixed_offset()
    }

    #[test]
    fn parses_inclusive_range() {
        let r = parse_date_ranges("2024-03-01, 2024-03-31").unwrap();
        assert_eq!(r.start, at(2024, 3, 1) - Duration::hours(10));
        assert_eq!(r.end, at(2024, 4, 1) - Duration::hours(10));
        assert!(parse_date_ranges("2024-03-01").is_err());
        assert!(parse_date_ranges("2024-03-31,2024-03-01").is_err());
        assert!(parse_date_ranges("yesterday,today").is_err());
    }

    #[test]
    fn range_type_parses_case_insensitively() {
        assert_eq!("Month".parse::<DateRangeType>().unwrap(), DateRangeType::Month);
        assert_eq!("day".parse::<DateRangeType>().unwrap(), DateRangeType::Day);
        assert!("week".parse::<DateRangeType>().is_err());
    }

    #[test]
    fn buckets_by_month_and_day() {
        let imports = [(at(2024, 1, 5), 100), (at(2024, 1, 20), 50), (at(2024, 12, 31), 7)];
        let exports = [(at(2024, 2, 5), 30)];

        let months = bucket(DateRangeType::Month, &imports, &exports);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].month, Some(1));
        assert_eq!(months[0].import_total_payment, 150);
        assert_eq!(months[1].export_total_payment, 30);
        assert_eq!(months[11].import_total_payment, 7);

        let days = bucket(DateRangeType::Day, &imports, &exports);
        assert_eq!(days.len(), 31);
        assert_eq!(days[4].day, Some(5));
        assert_eq!(days[4].import_total_payment, 100);
        assert_eq!(days[4].export_total_payment, 30);
        assert_eq!(days[30].import_total_payment, 7);

        assert!(bucket(DateRangeType::Month, &[], &[]).is_empty());
    }

    #[test]
    fn bucket_sums_saturate_instead_of_wrapping() {
        let imports = [(at(2024, 3, 1), i64::MAX), (at(2024, 3, 2), 10)];
        let months = bucket(DateRangeType::Month, &imports, &[]);
        assert_eq!(months[2].import_total_payment, i64::MAX);
    }

    #[tokio::test]
    async fn summary_counts_approved_documents_only() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let rice = material_fixture(&db, "Rice", 0).await?;
        let approved = imports::create(&db, &ctx(), CreateImportMaterialInput::default()).await?;
        imports::create_order(
            &db,
            &ctx(),
            CreateImportOrderInput {
                import_material_id: approved.id,
                material_id: rice.id,
                quantity: 4,
                price_per_unit: 2_500,
                status: Some(AcceptStatus::Approve),
            },
        )
        .await?;
        imports::update(&db, &ctx(), approved.id, UpdateImportMaterialInput { status: Some(AcceptStatus::Approve), ..Default::default() }).await?;
        imports::create(&db, &ctx(), CreateImportMaterialInput::default()).await?;

        let s = summary(&db, &DashboardQuery::default()).await?;
        assert_eq!(s.import_material_count, 1);
        assert_eq!(s.import_material_total_payment, 10_000);
        assert_eq!(s.export_material_count, 0);

        let chart = import_export_chart(&db, &DashboardQuery::default()).await?;
        assert_eq!(chart.items.len(), 12);
        let month = Utc::now().month() as usize;
        assert_eq!(chart.items[month - 1].import_total_payment, 10_000);

        let past = DashboardQuery { date_ranges: Some("2000-01-01,2000-12-31".into()), ..Default::default() };
        assert!(import_export_chart(&db, &past).await?.items.is_empty());
        Ok(())
    }
}
