//! Product records and listing tiers.
//!
//! Records are supplied by the product store; the pricing code only reads them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculators::{compute_profitability, ProductFiscalInput, Profitability};
use super::constants::FiscalConstants;
use super::lenient;

/// Marketplace listing type. Each tier has its own sale price and commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingTier {
    Classic,
    Premium,
}

impl ListingTier {
    /// Commission charged by the marketplace for this tier, as a fraction
    pub fn commission_rate(self, constants: &FiscalConstants) -> Decimal {
        match self {
            ListingTier::Classic => constants.commission_classic,
            ListingTier::Premium => constants.commission_premium,
        }
    }
}

/// Stored product, keyed by SKU.
///
/// Rates are human-entered percentages. Competitor prices are reference values
/// shown next to our own and never enter the calculation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub sku: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub brand_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub cost: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub input_tax_rate: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub output_tax_rate: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub excise_tax_rate: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub interstate_tax_rate: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub substitution_tax_rate: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub freight: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price_classic: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price_premium: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub competitor_price_classic: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub competitor_price_premium: Decimal,
}

impl ProductRecord {
    /// Build the transient calculation input for this product.
    pub fn fiscal_input(&self, simulate_substitution_tax_relief: bool) -> ProductFiscalInput {
        ProductFiscalInput {
            cost: self.cost,
            input_tax_rate: self.input_tax_rate,
            output_tax_rate: self.output_tax_rate,
            excise_tax_rate: self.excise_tax_rate,
            interstate_tax_rate: self.interstate_tax_rate,
            substitution_tax_rate: self.substitution_tax_rate,
            freight: self.freight,
            simulate_substitution_tax_relief,
            price_classic: self.price_classic,
            price_premium: self.price_premium,
        }
    }

    pub fn profitability(&self, simulate_substitution_tax_relief: bool) -> Profitability {
        compute_profitability(&self.fiscal_input(simulate_substitution_tax_relief))
    }
}
