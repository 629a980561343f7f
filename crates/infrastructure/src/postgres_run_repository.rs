use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quoterun_application::{
    CreateRunInput, PricingRun, RunRepository, RunStatus, SaveBreakdownInput,
};
use quoterun_core::{AppError, AppResult, TenantId};
use quoterun_domain::LineItem;
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// PostgreSQL-backed pricing run repository.
#[derive(Clone)]
pub struct PostgresRunRepository {
    pool: PgPool,
}

impl PostgresRunRepository {
    /// Creates a run repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PricingRunRow {
    id: Uuid,
    template_code: String,
    tenant_id: Option<Uuid>,
    user_id: Option<String>,
    answers: Value,
    status: String,
    pricing_breakdown: Option<Value>,
    total_cents: i64,
    submitted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

fn run_from_row(row: PricingRunRow) -> AppResult<PricingRun> {
    let pricing_breakdown = row
        .pricing_breakdown
        .map(serde_json::from_value::<Vec<LineItem>>)
        .transpose()
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to decode pricing breakdown for run '{}': {error}",
                row.id
            ))
        })?;

    Ok(PricingRun {
        run_id: row.id.to_string(),
        template_code: row.template_code,
        tenant_id: row.tenant_id.map(TenantId::from_uuid),
        user_id: row.user_id,
        answers: row.answers,
        status: RunStatus::parse(row.status.as_str())?,
        pricing_breakdown,
        total_cents: row.total_cents,
        submitted_at: row.submitted_at,
        created_at: row.created_at,
    })
}

fn parse_run_id(run_id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(run_id)
        .map_err(|_| AppError::Validation(format!("invalid run identifier '{run_id}'")))
}

#[async_trait]
impl RunRepository for PostgresRunRepository {
    async fn create_run(&self, input: CreateRunInput) -> AppResult<PricingRun> {
        let row = sqlx::query_as::<_, PricingRunRow>(
            r#"
            INSERT INTO pricing_runs (template_code, tenant_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, template_code, tenant_id, user_id, answers, status,
                pricing_breakdown, total_cents, submitted_at, created_at
            "#,
        )
        .bind(input.template_code.as_str())
        .bind(input.tenant_id.map(|tenant_id| tenant_id.as_uuid()))
        .bind(input.user_id.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to create run for template '{}': {error}",
                input.template_code
            ))
        })?;

        run_from_row(row)
    }

    async fn find_run(&self, run_id: &str) -> AppResult<Option<PricingRun>> {
        let id = parse_run_id(run_id)?;

        let row = sqlx::query_as::<_, PricingRunRow>(
            r#"
            SELECT id, template_code, tenant_id, user_id, answers, status,
                pricing_breakdown, total_cents, submitted_at, created_at
            FROM pricing_runs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load run '{run_id}': {error}")))?;

        row.map(run_from_row).transpose()
    }

    async fn replace_answers(
        &self,
        run_id: &str,
        answers: Value,
    ) -> AppResult<Option<PricingRun>> {
        let id = parse_run_id(run_id)?;

        let row = sqlx::query_as::<_, PricingRunRow>(
            r#"
            UPDATE pricing_runs
            SET answers = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, template_code, tenant_id, user_id, answers, status,
                pricing_breakdown, total_cents, submitted_at, created_at
            "#,
        )
        .bind(id)
        .bind(answers)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update answers for run '{run_id}': {error}"
            ))
        })?;

        row.map(run_from_row).transpose()
    }

    async fn save_breakdown(
        &self,
        run_id: &str,
        input: SaveBreakdownInput,
    ) -> AppResult<Option<PricingRun>> {
        let id = parse_run_id(run_id)?;
        let breakdown = serde_json::to_value(&input.line_items).map_err(|error| {
            AppError::Internal(format!(
                "failed to encode pricing breakdown for run '{run_id}': {error}"
            ))
        })?;

        let row = sqlx::query_as::<_, PricingRunRow>(
            r#"
            UPDATE pricing_runs
            SET pricing_breakdown = $2, total_cents = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, template_code, tenant_id, user_id, answers, status,
                pricing_breakdown, total_cents, submitted_at, created_at
            "#,
        )
        .bind(id)
        .bind(breakdown)
        .bind(input.total_cents)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to save pricing breakdown for run '{run_id}': {error}"
            ))
        })?;

        row.map(run_from_row).transpose()
    }

    async fn mark_submitted(
        &self,
        run_id: &str,
        submitted_at: DateTime<Utc>,
    ) -> AppResult<Option<PricingRun>> {
        let id = parse_run_id(run_id)?;

        let row = sqlx::query_as::<_, PricingRunRow>(
            r#"
            UPDATE pricing_runs
            SET status = 'submitted', submitted_at = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, template_code, tenant_id, user_id, answers, status,
                pricing_breakdown, total_cents, submitted_at, created_at
            "#,
        )
        .bind(id)
        .bind(submitted_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to submit run '{run_id}': {error}"))
        })?;

        row.map(run_from_row).transpose()
    }
}
