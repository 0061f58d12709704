//! Request DTOs for pricing API endpoints.

use serde::Deserialize;

use super::calculators::ProductFiscalInput;
use super::lenient;
use super::models::ProductRecord;
use super::portfolio::{CatalogQuery, LossFilter};

/// Request to calculate one product's profitability
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    #[serde(flatten)]
    pub input: ProductFiscalInput,
    /// Round the breakdown for display
    #[serde(default, deserialize_with = "lenient::flag")]
    pub round: bool,
}

/// Request for the dashboard report
#[derive(Debug, Deserialize)]
pub struct PortfolioRequest {
    #[serde(default)]
    pub products: Vec<ProductRecord>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub simulate_substitution_tax_relief: bool,
}

/// Request to list a catalogue with margins
#[derive(Debug, Deserialize)]
pub struct CatalogRequest {
    #[serde(default)]
    pub products: Vec<ProductRecord>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub simulate_substitution_tax_relief: bool,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub loss_filter: Option<LossFilter>,
}

impl CatalogRequest {
    pub fn query(&self) -> CatalogQuery {
        CatalogQuery {
            search: self.search.clone(),
            loss_filter: self.loss_filter,
            simulate_substitution_tax_relief: self.simulate_substitution_tax_relief,
        }
    }
}
