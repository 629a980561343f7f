use async_trait::async_trait;
use quoterun_application::TemplateRepository;
use quoterun_core::{AppError, AppResult};
use quoterun_domain::{WizardTemplate, WizardTemplateInput};
use serde_json::Value;
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed template repository.
#[derive(Clone)]
pub struct PostgresTemplateRepository {
    pool: PgPool,
}

impl PostgresTemplateRepository {
    /// Creates a template repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct WizardTemplateRow {
    code: String,
    name: String,
    version: i32,
    is_active: bool,
    schema: Value,
}

fn template_from_row(row: WizardTemplateRow) -> AppResult<WizardTemplate> {
    WizardTemplate::new(WizardTemplateInput {
        code: row.code,
        name: row.name,
        version: row.version,
        is_active: row.is_active,
        schema: row.schema,
    })
}

#[async_trait]
impl TemplateRepository for PostgresTemplateRepository {
    async fn save_template(&self, template: WizardTemplate) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO wizard_templates (code, name, version, is_active, schema, updated_at)
            VALUES ($1, $2, $3, $4, $5, now())
            ON CONFLICT (code)
            DO UPDATE SET
                name = EXCLUDED.name,
                version = EXCLUDED.version,
                is_active = EXCLUDED.is_active,
                schema = EXCLUDED.schema,
                updated_at = now()
            "#,
        )
        .bind(template.code().as_str())
        .bind(template.name().as_str())
        .bind(template.version())
        .bind(template.is_active())
        .bind(template.schema())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to save template '{}': {error}",
                template.code().as_str()
            ))
        })?;

        Ok(())
    }

    async fn find_template(&self, code: &str) -> AppResult<Option<WizardTemplate>> {
        let row = sqlx::query_as::<_, WizardTemplateRow>(
            r#"
            SELECT code, name, version, is_active, schema
            FROM wizard_templates
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load template '{code}': {error}"))
        })?;

        row.map(template_from_row).transpose()
    }

    async fn list_templates(&self) -> AppResult<Vec<WizardTemplate>> {
        let rows = sqlx::query_as::<_, WizardTemplateRow>(
            r#"
            SELECT code, name, version, is_active, schema
            FROM wizard_templates
            ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list templates: {error}")))?;

        rows.into_iter().map(template_from_row).collect()
    }
}
