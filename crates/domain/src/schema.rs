use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One recognized historical shape of a stored wizard schema.
///
/// Template schemas drifted across editor versions; loading always
/// funnels them through the same detector chain instead of trusting
/// the stored shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaShape {
    /// `{steps: [...]}` already canonical.
    Canonical,
    /// `{schema: {steps: [...]}}` wrapper.
    NestedSchema,
    /// `{data: {steps: [...]}}` wrapper.
    NestedData,
    /// `{Steps: [...]}` capitalized key copied to lowercase.
    CapitalizedSteps,
    /// `[{steps: [...]}, ...]` array wrapper, first element taken.
    ArrayWrapped,
}

/// Detector priority order. Detection stops at the first match, so
/// the order is part of the normalization contract.
pub const SHAPE_PRIORITY: [SchemaShape; 5] = [
    SchemaShape::Canonical,
    SchemaShape::NestedSchema,
    SchemaShape::NestedData,
    SchemaShape::CapitalizedSteps,
    SchemaShape::ArrayWrapped,
];

impl SchemaShape {
    fn detect(self, value: &Value) -> Option<Map<String, Value>> {
        match self {
            Self::Canonical => {
                let object = value.as_object()?;
                object.get("steps")?.as_array()?;
                Some(object.clone())
            }
            Self::NestedSchema => Self::Canonical.detect(value.as_object()?.get("schema")?),
            Self::NestedData => Self::Canonical.detect(value.as_object()?.get("data")?),
            Self::CapitalizedSteps => {
                let steps = value.as_object()?.get("Steps")?.as_array()?;
                let mut canonical = Map::new();
                canonical.insert("steps".to_owned(), Value::Array(steps.clone()));
                Some(canonical)
            }
            Self::ArrayWrapped => Self::Canonical.detect(value.as_array()?.first()?),
        }
    }
}

/// Normalizes a raw stored schema payload into the canonical
/// `{steps: [...]}` mapping, or an empty mapping when no shape
/// matches. Never fails; malformed schemas degrade to zero steps so
/// the wizard renders "no steps" instead of crashing.
#[must_use]
pub fn normalize_schema(raw: &Value) -> Map<String, Value> {
    let decoded = decode_string_layers(raw);
    for shape in SHAPE_PRIORITY {
        if let Some(canonical) = shape.detect(&decoded) {
            return canonical;
        }
    }

    Map::new()
}

/// Unwraps up to two layers of JSON-string encoding. Some stored
/// schemas were encoded twice by older editors.
fn decode_string_layers(raw: &Value) -> Value {
    let mut current = raw.clone();
    for _ in 0..2 {
        let Value::String(text) = &current else {
            break;
        };

        match serde_json::from_str::<Value>(text) {
            Ok(decoded) => current = decoded,
            Err(_) => break,
        }
    }

    current
}

/// Canonical wizard schema consumed by pricing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardSchema {
    /// Ordered wizard steps.
    #[serde(default)]
    pub steps: Vec<WizardStep>,
}

impl WizardSchema {
    /// Normalizes and deserializes a raw stored schema payload.
    ///
    /// Payloads that normalize but do not deserialize (step entries
    /// of the wrong JSON type) degrade to zero steps as well.
    #[must_use]
    pub fn from_raw(raw: &Value) -> Self {
        let canonical = normalize_schema(raw);
        serde_json::from_value(Value::Object(canonical)).unwrap_or_default()
    }
}

/// One ordered wizard step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardStep {
    /// Form field definitions, opaque to pricing.
    #[serde(default)]
    pub fields: Value,
    /// Pricing rules evaluated once per step.
    #[serde(default)]
    pub pricing: Vec<PricingRule>,
    /// Optional repeat block evaluated once per repetition index.
    #[serde(default)]
    pub repeat: Option<RepeatBlock>,
}

/// One pricing rule referencing a catalog item by code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    /// Referenced catalog item code. Rules with unknown codes are
    /// skipped silently during pricing.
    #[serde(default)]
    pub catalog: String,
    /// Quantity expression or literal.
    #[serde(default)]
    pub qty: Option<Value>,
    /// Argument name to expression-or-literal mapping.
    #[serde(default)]
    pub args: Map<String, Value>,
}

/// Repeat block pricing the nested rules once per collection element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepeatBlock {
    /// Expression yielding the repetition count.
    #[serde(default, rename = "countFrom")]
    pub count_from: Value,
    /// Pricing rules evaluated per repetition.
    #[serde(default)]
    pub pricing: Vec<PricingRule>,
}
