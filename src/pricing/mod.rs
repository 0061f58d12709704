//! Pricing engine module.
//!
//! Computes tax credits, sale-side costs and per-tier margins for marketplace
//! listings. The calculation itself lives in [`calculators`] and is pure; the
//! rest of the module evaluates catalogues and exposes everything over HTTP/JSON.

pub mod calculators;
pub mod constants;
pub mod lenient;
pub mod models;
pub mod portfolio;
pub mod requests;
pub mod responses;
pub mod routes;

// Re-export commonly used items
pub use calculators::{
    compute_profitability, round_money, AcquisitionBreakdown, ProductFiscalInput, Profitability,
    TierResult,
};
pub use constants::{FiscalConstants, FISCAL_CONSTANTS};
pub use models::{ListingTier, ProductRecord};
pub use portfolio::{filter_catalog, portfolio_report, CatalogQuery, LossFilter, PortfolioReport};
pub use routes::router;
