//! HTTP handlers exposing the pricing engine as JSON.
//!
//! Stateless: every request carries the products it wants evaluated and every
//! response is computed fresh.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::calculators::compute_profitability;
use super::portfolio::{filter_catalog, portfolio_report, PortfolioReport};
use super::requests::{CalculateRequest, CatalogRequest, PortfolioRequest};
use super::responses::{CalculateResponse, CatalogResponse, CatalogRowResponse};

/// Money fields are always displayed in cents
const MONEY_PLACES: u32 = 2;

/// Pricing routes, mounted under `/api/pricing`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calculate", post(calculate))
        .route("/portfolio", post(portfolio))
        .route("/catalog", post(catalog))
}

/// Profitability breakdown for one product
async fn calculate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<CalculateResponse>> {
    let Json(request) = payload?;

    let profitability = compute_profitability(&request.input);
    let has_loss = profitability.has_loss();

    tracing::debug!(
        simulate = request.input.simulate_substitution_tax_relief,
        has_loss,
        "Calculated profitability"
    );

    let profitability = if request.round {
        profitability.rounded(MONEY_PLACES, state.config.margin_places)
    } else {
        profitability
    };

    Ok(Json(CalculateResponse::new(profitability, has_loss)))
}

/// Dashboard report over a set of products
async fn portfolio(
    payload: std::result::Result<Json<PortfolioRequest>, JsonRejection>,
) -> Result<Json<PortfolioReport>> {
    let Json(request) = payload?;

    let report = portfolio_report(&request.products, request.simulate_substitution_tax_relief);

    tracing::debug!(
        products = report.total_products,
        simulate = report.simulate_substitution_tax_relief,
        classic_losses = report.classic.loss,
        premium_losses = report.premium.loss,
        "Built portfolio report"
    );

    Ok(Json(report))
}

/// Filtered catalogue listing with per-tier margins
async fn catalog(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CatalogRequest>, JsonRejection>,
) -> Result<Json<CatalogResponse>> {
    let Json(request) = payload?;

    let query = request.query();
    let rows: Vec<CatalogRowResponse> = filter_catalog(&request.products, &query)
        .iter()
        .map(|evaluated| CatalogRowResponse::from_evaluated(evaluated, state.config.margin_places))
        .collect();

    tracing::debug!(
        products = request.products.len(),
        matched = rows.len(),
        loss_filter = ?query.loss_filter,
        "Filtered catalog"
    );

    Ok(Json(CatalogResponse {
        count: rows.len(),
        simulate_substitution_tax_relief: query.simulate_substitution_tax_relief,
        products: rows,
    }))
}
