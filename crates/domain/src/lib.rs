//! Domain entities, the wizard expression language, and the pricing engine.

#![forbid(unsafe_code)]

mod catalog;
mod expression;
mod pricing;
mod schema;
mod template;

pub use catalog::{CatalogItem, CatalogItemInput, DEFAULT_FORMULA_TYPE};
pub use expression::{PathExpr, evaluate, number_or_zero};
pub use pricing::{
    AgingStrategy, LineItem, LineItemFields, PerUnitStrategy, PricingContext, PricingStrategy,
    PricingStrategyRegistry, StrategyInput, SwitchStrategy, TieredStrategy,
};
pub use schema::{
    PricingRule, RepeatBlock, SHAPE_PRIORITY, SchemaShape, WizardSchema, WizardStep,
    normalize_schema,
};
pub use template::{WizardTemplate, WizardTemplateInput};
