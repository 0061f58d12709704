//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{round_money, AcquisitionBreakdown, Profitability, TierResult};
use super::portfolio::EvaluatedProduct;

/// Response for a single calculation
#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub acquisition: AcquisitionBreakdown,
    pub classic: TierResult,
    pub premium: TierResult,
    pub has_loss: bool,
}

impl CalculateResponse {
    /// `has_loss` is passed separately so it can come from the unrounded result.
    pub fn new(profitability: Profitability, has_loss: bool) -> Self {
        Self {
            acquisition: profitability.acquisition,
            classic: profitability.classic,
            premium: profitability.premium,
            has_loss,
        }
    }
}

/// One catalogue row with display margins
#[derive(Debug, Serialize)]
pub struct CatalogRowResponse {
    pub sku: String,
    pub name: String,
    pub brand_name: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_classic: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_premium: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub competitor_price_classic: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub competitor_price_premium: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub margin_classic: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub margin_premium: Decimal,
    pub has_loss: bool,
}

impl CatalogRowResponse {
    pub fn from_evaluated(evaluated: &EvaluatedProduct<'_>, margin_places: u32) -> Self {
        let product = evaluated.product;
        let profitability = &evaluated.profitability;
        Self {
            sku: product.sku.clone(),
            name: product.name.clone(),
            brand_name: product.brand_name.clone(),
            cost: product.cost,
            price_classic: product.price_classic,
            price_premium: product.price_premium,
            competitor_price_classic: product.competitor_price_classic,
            competitor_price_premium: product.competitor_price_premium,
            margin_classic: round_money(profitability.classic.margin, margin_places),
            margin_premium: round_money(profitability.premium.margin, margin_places),
            has_loss: profitability.has_loss(),
        }
    }
}

/// Response for a catalogue listing
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub count: usize,
    pub simulate_substitution_tax_relief: bool,
    pub products: Vec<CatalogRowResponse>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
