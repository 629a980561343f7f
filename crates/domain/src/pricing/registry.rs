use quoterun_core::{AppError, AppResult};

use super::{AgingStrategy, PerUnitStrategy, PricingStrategy, SwitchStrategy, TieredStrategy};

/// Static registry mapping a formula type to its pricing strategy.
pub struct PricingStrategyRegistry {
    strategies: Vec<Box<dyn PricingStrategy>>,
}

impl PricingStrategyRegistry {
    /// Creates a registry with the full built-in strategy set.
    #[must_use]
    pub fn with_default_strategies() -> Self {
        Self {
            strategies: vec![
                Box::new(PerUnitStrategy),
                Box::new(TieredStrategy),
                Box::new(SwitchStrategy),
                Box::new(AgingStrategy),
            ],
        }
    }

    /// Returns the first strategy supporting the given formula type.
    ///
    /// An unknown type is a configuration error that aborts the
    /// whole pricing pass; no partial breakdown may be persisted.
    pub fn get(&self, formula_type: &str) -> AppResult<&dyn PricingStrategy> {
        self.strategies
            .iter()
            .map(AsRef::as_ref)
            .find(|strategy| strategy.supports(formula_type))
            .ok_or_else(|| {
                AppError::Configuration(format!("unsupported pricing type: {formula_type}"))
            })
    }
}

impl Default for PricingStrategyRegistry {
    fn default() -> Self {
        Self::with_default_strategies()
    }
}
