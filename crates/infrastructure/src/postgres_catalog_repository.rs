use async_trait::async_trait;
use quoterun_application::CatalogRepository;
use quoterun_core::{AppError, AppResult};
use quoterun_domain::{CatalogItem, CatalogItemInput};
use serde_json::Value;
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed catalog repository.
#[derive(Clone)]
pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    /// Creates a catalog repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CatalogItemRow {
    code: String,
    name: String,
    base_price_cents: i64,
    formula: Option<Value>,
}

fn item_from_row(row: CatalogItemRow) -> AppResult<CatalogItem> {
    CatalogItem::new(CatalogItemInput {
        code: row.code,
        name: row.name,
        base_price_cents: row.base_price_cents,
        formula: row.formula.unwrap_or(Value::Null),
    })
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn save_item(&self, item: CatalogItem) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO catalog_items (code, name, base_price_cents, formula, updated_at)
            VALUES ($1, $2, $3, $4, now())
            ON CONFLICT (code)
            DO UPDATE SET
                name = EXCLUDED.name,
                base_price_cents = EXCLUDED.base_price_cents,
                formula = EXCLUDED.formula,
                updated_at = now()
            "#,
        )
        .bind(item.code().as_str())
        .bind(item.name().as_str())
        .bind(item.base_price_cents())
        .bind(item.formula())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to save catalog item '{}': {error}",
                item.code().as_str()
            ))
        })?;

        Ok(())
    }

    async fn find_item(&self, code: &str) -> AppResult<Option<CatalogItem>> {
        let row = sqlx::query_as::<_, CatalogItemRow>(
            r#"
            SELECT code, name, base_price_cents, formula
            FROM catalog_items
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load catalog item '{code}': {error}"))
        })?;

        row.map(item_from_row).transpose()
    }
}
