use quoterun_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::WizardSchema;

/// Versioned wizard template definition.
///
/// Templates are authored out-of-band and loaded read-only; the raw
/// schema payload is kept as stored and normalized on every load
/// rather than persisted in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardTemplate {
    code: NonEmptyString,
    name: NonEmptyString,
    version: i32,
    is_active: bool,
    schema: Value,
}

/// Input payload used to construct a validated wizard template.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardTemplateInput {
    /// Stable unique template code.
    pub code: String,
    /// User-facing template name.
    pub name: String,
    /// Template version number.
    pub version: i32,
    /// Whether the template is available for new runs.
    pub is_active: bool,
    /// Raw schema payload, tolerant of historical shape drift.
    pub schema: Value,
}

impl WizardTemplate {
    /// Creates a validated wizard template.
    pub fn new(input: WizardTemplateInput) -> AppResult<Self> {
        let WizardTemplateInput {
            code,
            name,
            version,
            is_active,
            schema,
        } = input;

        if version < 1 {
            return Err(AppError::Validation(
                "template version must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            code: NonEmptyString::new(code)?,
            name: NonEmptyString::new(name)?,
            version,
            is_active,
            schema,
        })
    }

    /// Returns the unique template code.
    #[must_use]
    pub fn code(&self) -> &NonEmptyString {
        &self.code
    }

    /// Returns the user-facing template name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the template version.
    #[must_use]
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Returns whether the template accepts new runs.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the raw stored schema payload.
    #[must_use]
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Normalizes the stored schema into its canonical step list.
    #[must_use]
    pub fn normalized_schema(&self) -> WizardSchema {
        WizardSchema::from_raw(&self.schema)
    }
}
