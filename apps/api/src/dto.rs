use chrono::{DateTime, Utc};
use quoterun_application::{NormalizedTemplate, PricingRun};
use quoterun_domain::{LineItem, WizardSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of a wizard template with its normalized schema.
#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub code: String,
    pub name: String,
    pub version: i32,
    pub is_active: bool,
    pub schema: WizardSchema,
}

impl From<NormalizedTemplate> for TemplateResponse {
    fn from(value: NormalizedTemplate) -> Self {
        Self {
            code: value.code,
            name: value.name,
            version: value.version,
            is_active: value.is_active,
            schema: value.schema,
        }
    }
}

/// API representation of a pricing run.
#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub run_id: String,
    pub template_code: String,
    pub tenant_id: Option<Uuid>,
    pub user_id: Option<String>,
    pub answers: Value,
    pub status: String,
    pub pricing_breakdown: Option<Vec<LineItem>>,
    pub total_cents: i64,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<PricingRun> for RunResponse {
    fn from(value: PricingRun) -> Self {
        Self {
            run_id: value.run_id,
            template_code: value.template_code,
            tenant_id: value.tenant_id.map(|tenant_id| tenant_id.as_uuid()),
            user_id: value.user_id,
            answers: value.answers,
            status: value.status.as_str().to_owned(),
            pricing_breakdown: value.pricing_breakdown,
            total_cents: value.total_cents,
            submitted_at: value.submitted_at,
            created_at: value.created_at,
        }
    }
}

/// Incoming payload for run creation.
#[derive(Debug, Deserialize)]
pub struct CreateRunRequest {
    pub template_code: String,
    pub tenant_id: Option<Uuid>,
    pub user_id: Option<String>,
}

/// Incoming payload for replacing a run's answers.
#[derive(Debug, Deserialize)]
pub struct PatchAnswersRequest {
    pub answers: Value,
}
