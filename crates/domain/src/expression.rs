use serde_json::Value;

/// Parsed form of one wizard path expression.
///
/// Template authors write quantities and arguments either as JSON
/// numbers or as small path strings (`answers.count`, `item.cpu`,
/// `len(answers.vms)`). Anything else evaluates to zero rather than
/// erroring; templates are authored by trusted operators and the
/// lenient fallback is relied upon by existing definitions, at the
/// cost of typos silently pricing as zero.
#[derive(Debug, Clone, PartialEq)]
pub enum PathExpr {
    /// Numeric literal returned unchanged.
    Literal(serde_json::Number),
    /// Dot-path resolved against the run answers.
    AnswersPath(Vec<String>),
    /// Dot-path resolved against the current repeat-iteration item.
    ItemPath(Vec<String>),
    /// Length of the sequence the inner expression resolves to.
    LenOf(Box<PathExpr>),
    /// Unrecognized shape, evaluates to zero.
    Unknown,
}

impl PathExpr {
    /// Parses a raw expression value into its AST form.
    #[must_use]
    pub fn parse(raw: &Value) -> Self {
        match raw {
            Value::Number(number) => Self::Literal(number.clone()),
            Value::String(text) => Self::parse_str(text),
            _ => Self::Unknown,
        }
    }

    fn parse_str(text: &str) -> Self {
        if let Some(path) = text.strip_prefix("answers.") {
            return Self::AnswersPath(split_segments(path));
        }

        if let Some(path) = text.strip_prefix("item.") {
            return Self::ItemPath(split_segments(path));
        }

        if let Some(inner) = text.strip_prefix("len(")
            && let Some(inner) = inner.strip_suffix(')')
        {
            return Self::LenOf(Box::new(Self::parse_str(inner.trim())));
        }

        Self::Unknown
    }

    /// Evaluates the expression against the run answers and an
    /// optional repeat-iteration item context.
    ///
    /// Missing path segments resolve to `Null`; an `item.` path
    /// without an item context and every unrecognized shape resolve
    /// to `0`.
    #[must_use]
    pub fn evaluate(&self, answers: &Value, item: Option<&Value>) -> Value {
        match self {
            Self::Literal(number) => Value::Number(number.clone()),
            Self::AnswersPath(segments) => {
                resolve_path(answers, segments).cloned().unwrap_or(Value::Null)
            }
            Self::ItemPath(segments) => match item {
                Some(item) => resolve_path(item, segments).cloned().unwrap_or(Value::Null),
                None => Value::Number(0.into()),
            },
            Self::LenOf(inner) => {
                let resolved = inner.evaluate(answers, item);
                let length = resolved.as_array().map_or(0, Vec::len);
                Value::Number(length.into())
            }
            Self::Unknown => Value::Number(0.into()),
        }
    }
}

/// Parses and evaluates a raw expression value in one call.
#[must_use]
pub fn evaluate(raw: &Value, answers: &Value, item: Option<&Value>) -> Value {
    PathExpr::parse(raw).evaluate(answers, item)
}

/// Coerces an evaluated value into the number its pricing consumers
/// use: numbers pass through, numeric strings parse, everything else
/// (including the absent `Null`) is zero.
#[must_use]
pub fn number_or_zero(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn split_segments(path: &str) -> Vec<String> {
    path.split('.').map(ToOwned::to_owned).collect()
}

fn resolve_path<'a>(root: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = root;
    for segment in segments {
        if segment.is_empty() {
            return None;
        }

        current = current.as_object()?.get(segment.as_str())?;
    }

    Some(current)
}
