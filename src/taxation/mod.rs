pub mod processor;

pub use processor::OrderTaxesProcessor;

use serde::{Deserialize, Serialize};

pub const SERVICE_CATEGORY: &str = "SERVICE";
pub const SERVICE_TAX_EXEMPT_CATEGORY: &str = "SERVICE_TAX_EXEMPT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRate {
    pub code: String,
    pub name: String,
    /// Fraction of the base amount, e.g. 0.20 for a 20% rate.
    pub amount: f64,
    pub included: bool,
}

/// Rate lookup strategy. Rate tables and jurisdiction rules live with the
/// host, not in this crate.
pub trait TaxRateResolver {
    fn resolve(&self, category: &str, jurisdiction: &str) -> Option<TaxRate>;
}

/// Amount calculation strategy, in minor currency units.
pub trait TaxCalculator {
    fn calculate(&self, base: i64, rate: &TaxRate) -> i64;
}
