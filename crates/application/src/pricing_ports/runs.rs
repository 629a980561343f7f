use chrono::{DateTime, Utc};
use quoterun_core::{AppError, AppResult, TenantId};
use quoterun_domain::LineItem;
use serde_json::Value;

/// Lifecycle status of one pricing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Run is editable and pricing previews may be requested.
    Draft,
    /// Run has been submitted by its user.
    Submitted,
}

impl RunStatus {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
        }
    }

    /// Parses storage value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            _ => Err(AppError::Validation(format!(
                "unknown pricing run status '{value}'"
            ))),
        }
    }
}

/// Persisted pricing run record.
///
/// `total_cents` equals the sum of the breakdown's extended cents as
/// of the last pricing pass; it is not kept live-consistent with the
/// answers (pricing is recomputed on demand, not on every edit).
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRun {
    /// Stable run identifier.
    pub run_id: String,
    /// Code of the owning wizard template.
    pub template_code: String,
    /// Optional owning tenant.
    pub tenant_id: Option<TenantId>,
    /// Optional owning user subject.
    pub user_id: Option<String>,
    /// Free-form answer mapping, the only mutable user input.
    pub answers: Value,
    /// Lifecycle status.
    pub status: RunStatus,
    /// Last computed breakdown, replaced as a batch on each pass.
    pub pricing_breakdown: Option<Vec<LineItem>>,
    /// Sum of the breakdown's extended cents at computation time.
    pub total_cents: i64,
    /// Submission timestamp, set on submit.
    pub submitted_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new draft run.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRunInput {
    /// Code of the owning wizard template.
    pub template_code: String,
    /// Optional owning tenant.
    pub tenant_id: Option<TenantId>,
    /// Optional owning user subject.
    pub user_id: Option<String>,
}

/// Freshly computed breakdown persisted as a full overwrite.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveBreakdownInput {
    /// Ordered line items of the pass.
    pub line_items: Vec<LineItem>,
    /// Integer sum of the line items' extended cents.
    pub total_cents: i64,
}
