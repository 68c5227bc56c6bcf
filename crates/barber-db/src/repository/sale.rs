//! # Sale Repository
//!
//! Database operations for sales.
//!
//! ## Query Assembly
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleFilter { barber: Some("vini"), range: 2026-10-01..=2026-10-14 }    │
//! │       │                                                                 │
//! │       ▼  push_filter()                                                  │
//! │  WHERE deleted_at IS NULL                                               │
//! │    AND barber = ?                                                       │
//! │    AND sale_date >= ?                                                   │
//! │    AND sale_date <= ?                                                   │
//! │       │                                                                 │
//! │       ├──► list()    SELECT columns ... ORDER BY sale_date, sale_time   │
//! │       └──► totals()  SELECT COALESCE(SUM(total_cents), 0) ...           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every value is bound, never formatted into the SQL text.

use barber_core::export::ImportedSale;
use barber_core::filter::month_start;
use barber_core::{DateRange, Money, Sale, SaleDraft, SaleFilter, SalesTotals};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

const SELECT_SALES: &str = r#"
    SELECT
        id,
        created_at,
        sale_date,
        sale_time,
        client,
        barber,
        haircut_cents AS haircut,
        beard_cents AS beard,
        eyebrow_cents AS eyebrow,
        product_name,
        product_price_cents AS product_price,
        discount_cents AS discount,
        total_cents AS total,
        deleted_at
    FROM sales"#;

// =============================================================================
// Input Types
// =============================================================================

/// Row order for [`SaleRepository::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Latest first, for the history page.
    Newest,
    /// Earliest first, for the CSV export.
    Oldest,
}

impl SortOrder {
    /// Sales within the same minute keep insertion order.
    fn order_by(self) -> &'static str {
        match self {
            SortOrder::Newest => " ORDER BY sale_date DESC, sale_time DESC, rowid DESC",
            SortOrder::Oldest => " ORDER BY sale_date ASC, sale_time ASC, rowid ASC",
        }
    }
}

/// A sale ready to be written.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub draft: SaleDraft,
    pub created_at: DateTime<Utc>,
    pub sale_date: NaiveDate,
    /// `HH:MM`
    pub sale_time: String,
    pub total: Money,
}

impl NewSale {
    /// Stamps a draft with the shop-local time it was rung up.
    ///
    /// The total is computed from the draft.
    pub fn stamped(draft: SaleDraft, local: NaiveDateTime, created_at: DateTime<Utc>) -> Self {
        let total = draft.total();
        NewSale {
            draft,
            created_at,
            sale_date: local.date(),
            sale_time: local.format("%H:%M").to_string(),
            total,
        }
    }

    /// Converts a row from a legacy CSV file, keeping its recorded total.
    pub fn from_import(imported: ImportedSale, created_at: DateTime<Utc>) -> Self {
        NewSale {
            draft: imported.draft,
            created_at,
            sale_date: imported.sale_date,
            sale_time: imported.sale_time,
            total: imported.total.clamp_non_negative(),
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale and returns the stored row.
    pub async fn insert(&self, new_sale: &NewSale) -> DbResult<Sale> {
        let sale = to_sale(new_sale);

        debug!(
            id = %sale.id,
            barber = %sale.barber,
            total = %sale.total,
            "Inserting sale"
        );

        insert_query(&sale).execute(&self.pool).await?;

        Ok(sale)
    }

    /// Inserts many sales in a single transaction and returns how many were
    /// written. Nothing is written if any insert fails.
    pub async fn insert_many(&self, new_sales: &[NewSale]) -> DbResult<usize> {
        let mut tx = self.pool.begin().await?;

        for new_sale in new_sales {
            let sale = to_sale(new_sale);
            insert_query(&sale).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        info!(count = new_sales.len(), "Inserted sales batch");
        Ok(new_sales.len())
    }

    /// Gets a sale by ID, including soft-deleted ones.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_SALES);
        query.push(" WHERE id = ").push_bind(id.to_string());

        let sale = query
            .build_query_as::<Sale>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Lists live sales matching the filter.
    pub async fn list(&self, filter: &SaleFilter, order: SortOrder) -> DbResult<Vec<Sale>> {
        let mut query = list_query(filter, order);
        debug!(sql = %query.sql(), "Listing sales");

        let sales = query
            .build_query_as::<Sale>()
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Sum of live sales in `filter`. Zero when nothing matches.
    pub async fn sum_total(&self, filter: &SaleFilter) -> DbResult<Money> {
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT COALESCE(SUM(total_cents), 0) FROM sales",
        );
        push_filter(&mut query, filter);

        let cents = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(Money::from_cents(cents))
    }

    /// Totals of the day and of the month so far.
    ///
    /// ## Arguments
    /// * `barber` - restrict to one barber, or `None` for the whole shop
    /// * `today` - the shop-local current date
    pub async fn totals(&self, barber: Option<&str>, today: NaiveDate) -> DbResult<SalesTotals> {
        let barber = barber.map(str::to_string);

        let day = SaleFilter {
            barber: barber.clone(),
            range: DateRange::single_day(today),
        };
        let month = SaleFilter {
            barber,
            range: DateRange {
                start: Some(month_start(today)),
                end: Some(today),
            },
        };

        Ok(SalesTotals {
            today: self.sum_total(&day).await?,
            month: self.sum_total(&month).await?,
        })
    }

    /// Hides a sale from history, export and totals.
    ///
    /// ## Errors
    /// `NotFound` when the id is unknown or the sale is already deleted.
    pub async fn soft_delete(&self, id: &str, at: DateTime<Utc>) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE sales SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        info!(id = %id, "Sale soft-deleted");
        Ok(())
    }

    /// Number of live sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Query Helpers
// =============================================================================

fn to_sale(new_sale: &NewSale) -> Sale {
    let draft = &new_sale.draft;
    Sale {
        id: Uuid::new_v4().to_string(),
        created_at: new_sale.created_at,
        sale_date: new_sale.sale_date,
        sale_time: new_sale.sale_time.clone(),
        client: draft.client.clone(),
        barber: draft.barber.clone(),
        haircut: draft.haircut,
        beard: draft.beard,
        eyebrow: draft.eyebrow,
        product_name: draft.product_name.clone(),
        product_price: draft.product_price,
        discount: draft.discount,
        total: new_sale.total,
        deleted_at: None,
    }
}

fn insert_query(sale: &Sale) -> sqlx::query::Query<'_, Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
    sqlx::query(
        r#"
        INSERT INTO sales (
            id, created_at, sale_date, sale_time, client, barber,
            haircut_cents, beard_cents, eyebrow_cents,
            product_name, product_price_cents, discount_cents, total_cents
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6,
            ?7, ?8, ?9,
            ?10, ?11, ?12, ?13
        )
        "#,
    )
    .bind(&sale.id)
    .bind(sale.created_at)
    .bind(sale.sale_date)
    .bind(&sale.sale_time)
    .bind(&sale.client)
    .bind(&sale.barber)
    .bind(sale.haircut.cents())
    .bind(sale.beard.cents())
    .bind(sale.eyebrow.cents())
    .bind(&sale.product_name)
    .bind(sale.product_price.cents())
    .bind(sale.discount.cents())
    .bind(sale.total.cents())
}

fn list_query(filter: &SaleFilter, order: SortOrder) -> QueryBuilder<'static, Sqlite> {
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_SALES);
    push_filter(&mut query, filter);
    query.push(order.order_by());
    query
}

/// Appends the WHERE clause for `filter`. Soft-deleted rows never match.
fn push_filter(query: &mut QueryBuilder<'static, Sqlite>, filter: &SaleFilter) {
    query.push(" WHERE deleted_at IS NULL");

    if let Some(barber) = &filter.barber {
        query.push(" AND barber = ").push_bind(barber.clone());
    }
    if let Some(start) = filter.range.start {
        query.push(" AND sale_date >= ").push_bind(start);
    }
    if let Some(end) = filter.range.end {
        query.push(" AND sale_date <= ").push_bind(end);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, NaiveTime, TimeZone};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(barber: &str, haircut_cents: i64) -> SaleDraft {
        SaleDraft {
            client: "Cliente".to_string(),
            barber: barber.to_string(),
            haircut: Money::from_cents(haircut_cents),
            beard: Money::zero(),
            eyebrow: Money::zero(),
            product_name: None,
            product_price: Money::zero(),
            discount: Money::zero(),
        }
    }

    fn at(date: NaiveDate, hh: u32, mm: u32) -> NaiveDateTime {
        date.and_time(NaiveTime::from_hms_opt(hh, mm, 0).unwrap())
    }

    async fn record(db: &Database, barber: &str, cents: i64, when: NaiveDateTime) -> Sale {
        let created = Utc.from_utc_datetime(&when);
        db.sales()
            .insert(&NewSale::stamped(draft(barber, cents), when, created))
            .await
            .unwrap()
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[test]
    fn test_filter_sql_for_barber_with_open_end() {
        let filter = SaleFilter {
            barber: Some("vini".to_string()),
            range: DateRange {
                start: Some(day(2026, 10, 1)),
                end: None,
            },
        };
        let query = list_query(&filter, SortOrder::Newest);
        let sql = query.sql();

        assert!(sql.contains("WHERE deleted_at IS NULL AND barber = ? AND sale_date >= ?"));
        assert!(!sql.contains("sale_date <="));
        assert!(sql.ends_with("ORDER BY sale_date DESC, sale_time DESC, rowid DESC"));
    }

    #[test]
    fn test_filter_sql_for_admin_without_dates() {
        let filter = SaleFilter {
            barber: None,
            range: DateRange {
                start: None,
                end: None,
            },
        };
        let query = list_query(&filter, SortOrder::Oldest);
        let sql = query.sql();

        assert!(sql.contains("WHERE deleted_at IS NULL ORDER BY sale_date ASC"));
        assert!(!sql.contains("barber ="));
    }

    #[test]
    fn test_stamped_sale_computes_total_and_time() {
        let mut d = draft("vini", 3000);
        d.discount = Money::from_cents(5000);
        let when = at(day(2026, 10, 14), 9, 5);
        let new_sale = NewSale::stamped(d, when, Utc::now());

        assert_eq!(new_sale.total, Money::zero());
        assert_eq!(new_sale.sale_time, "09:05");
        assert_eq!(new_sale.sale_date, day(2026, 10, 14));
    }

    #[tokio::test]
    async fn test_insert_and_get_by_id() {
        let db = test_db().await;
        let mut d = draft("artur", 3500);
        d.product_name = Some("Xampu".to_string());
        d.product_price = Money::from_cents(2500);
        let when = at(day(2026, 10, 14), 10, 30);

        let stored = db
            .sales()
            .insert(&NewSale::stamped(d, when, Utc::now()))
            .await
            .unwrap();
        let loaded = db.sales().get_by_id(&stored.id).await.unwrap().unwrap();

        assert_eq!(loaded.barber, "artur");
        assert_eq!(loaded.total.cents(), 6000);
        assert_eq!(loaded.product_name.as_deref(), Some("Xampu"));
        assert_eq!(loaded.sale_time, "10:30");
        assert_eq!(loaded.sale_date, day(2026, 10, 14));
        assert!(!loaded.is_deleted());
    }

    #[tokio::test]
    async fn test_list_scopes_orders_and_filters_dates() {
        let db = test_db().await;
        let today = day(2026, 10, 14);
        record(&db, "vini", 1000, at(today, 9, 0)).await;
        record(&db, "vini", 2000, at(today, 15, 0)).await;
        record(&db, "artur", 3000, at(today, 11, 0)).await;
        record(&db, "vini", 4000, at(today - Duration::days(3), 12, 0)).await;

        let todays_vini = SaleFilter {
            barber: Some("vini".to_string()),
            range: DateRange::single_day(today),
        };
        let rows = db.sales().list(&todays_vini, SortOrder::Newest).await.unwrap();
        let totals: Vec<i64> = rows.iter().map(|s| s.total.cents()).collect();
        assert_eq!(totals, vec![2000, 1000]);

        let rows = db.sales().list(&todays_vini, SortOrder::Oldest).await.unwrap();
        let totals: Vec<i64> = rows.iter().map(|s| s.total.cents()).collect();
        assert_eq!(totals, vec![1000, 2000]);

        let everyone_ever = SaleFilter {
            barber: None,
            range: DateRange {
                start: None,
                end: None,
            },
        };
        assert_eq!(db.sales().list(&everyone_ever, SortOrder::Newest).await.unwrap().len(), 4);

        let older = SaleFilter {
            barber: None,
            range: DateRange {
                start: None,
                end: Some(today - Duration::days(1)),
            },
        };
        let rows = db.sales().list(&older, SortOrder::Newest).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total.cents(), 4000);
    }

    #[tokio::test]
    async fn test_totals_day_and_month_scoped_by_barber() {
        let db = test_db().await;
        let today = day(2026, 10, 14);
        record(&db, "vini", 1000, at(today, 9, 0)).await;
        record(&db, "artur", 3000, at(today, 10, 0)).await;
        record(&db, "vini", 500, at(day(2026, 10, 1), 10, 0)).await;
        // Previous month and future days are outside the month-to-date window
        record(&db, "vini", 7000, at(day(2026, 9, 30), 10, 0)).await;
        record(&db, "vini", 9000, at(day(2026, 10, 15), 10, 0)).await;

        let vini = db.sales().totals(Some("vini"), today).await.unwrap();
        assert_eq!(vini.today.cents(), 1000);
        assert_eq!(vini.month.cents(), 1500);

        let shop = db.sales().totals(None, today).await.unwrap();
        assert_eq!(shop.today.cents(), 4000);
        assert_eq!(shop.month.cents(), 4500);

        let nobody = db.sales().totals(Some("ninguem"), today).await.unwrap();
        assert_eq!(nobody, SalesTotals::default());
    }

    #[tokio::test]
    async fn test_soft_delete_hides_sale_everywhere() {
        let db = test_db().await;
        let today = day(2026, 10, 14);
        let kept = record(&db, "vini", 1000, at(today, 9, 0)).await;
        let removed = record(&db, "vini", 2500, at(today, 9, 30)).await;

        db.sales().soft_delete(&removed.id, Utc::now()).await.unwrap();

        let filter = SaleFilter {
            barber: None,
            range: DateRange::single_day(today),
        };
        let rows = db.sales().list(&filter, SortOrder::Newest).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, kept.id);

        assert_eq!(db.sales().totals(None, today).await.unwrap().today.cents(), 1000);
        assert_eq!(db.sales().count().await.unwrap(), 1);

        let loaded = db.sales().get_by_id(&removed.id).await.unwrap().unwrap();
        assert!(loaded.is_deleted());

        let again = db.sales().soft_delete(&removed.id, Utc::now()).await;
        assert!(matches!(again, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_insert_many_is_atomic() {
        let db = test_db().await;
        let when = at(day(2026, 10, 14), 9, 0);
        let good = NewSale::stamped(draft("vini", 1000), when, Utc::now());
        let mut bad = NewSale::stamped(draft("vini", 1000), when, Utc::now());
        bad.draft.beard = Money::from_cents(-1);

        let result = db.sales().insert_many(&[good.clone(), bad]).await;
        assert!(matches!(result, Err(DbError::ConstraintViolation(_))));
        assert_eq!(db.sales().count().await.unwrap(), 0);

        assert_eq!(db.sales().insert_many(&[good]).await.unwrap(), 1);
        assert_eq!(db.sales().count().await.unwrap(), 1);
    }
}
