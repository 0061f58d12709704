//! Catalogue-level evaluation: search, loss filtering and the dashboard report.
//!
//! Each pass evaluates every product under one simulation flag so that all
//! rows describe the same scenario.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculators::{add, div, Profitability};
use super::models::{ListingTier, ProductRecord};

/// Which tiers a loss filter looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossFilter {
    /// Loss in either tier
    AnyTier,
    Classic,
    Premium,
}

impl LossFilter {
    pub fn matches(self, profitability: &Profitability) -> bool {
        match self {
            LossFilter::AnyTier => profitability.has_loss(),
            LossFilter::Classic => profitability.tier(ListingTier::Classic).is_loss(),
            LossFilter::Premium => profitability.tier(ListingTier::Premium).is_loss(),
        }
    }
}

/// Case-insensitive substring match on name, SKU or brand.
///
/// An empty term matches every product.
pub fn matches_search(product: &ProductRecord, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    product.name.to_lowercase().contains(&term)
        || product.sku.to_lowercase().contains(&term)
        || product
            .brand_name
            .as_deref()
            .is_some_and(|brand| brand.to_lowercase().contains(&term))
}

/// Catalogue listing criteria
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub search: String,
    pub loss_filter: Option<LossFilter>,
    pub simulate_substitution_tax_relief: bool,
}

/// A product together with its freshly computed profitability
#[derive(Debug, Clone)]
pub struct EvaluatedProduct<'a> {
    pub product: &'a ProductRecord,
    pub profitability: Profitability,
}

/// Evaluate and filter a catalogue, keeping the input order.
pub fn filter_catalog<'a>(
    products: &'a [ProductRecord],
    query: &CatalogQuery,
) -> Vec<EvaluatedProduct<'a>> {
    products
        .iter()
        .filter(|product| matches_search(product, &query.search))
        .map(|product| EvaluatedProduct {
            product,
            profitability: product.profitability(query.simulate_substitution_tax_relief),
        })
        .filter(|evaluated| {
            query
                .loss_filter
                .map_or(true, |filter| filter.matches(&evaluated.profitability))
        })
        .collect()
}

/// Profitable vs loss-making product counts for one tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierOutcome {
    pub profitable: usize,
    pub loss: usize,
}

impl TierOutcome {
    fn record(&mut self, margin: Decimal) {
        if margin >= Decimal::ZERO {
            self.profitable += 1;
        } else {
            self.loss += 1;
        }
    }
}

/// Dashboard summary of a catalogue under one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioReport {
    pub total_products: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub average_price_classic: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub average_price_premium: Decimal,
    pub classic: TierOutcome,
    pub premium: TierOutcome,
    pub simulate_substitution_tax_relief: bool,
}

impl PortfolioReport {
    pub fn has_losses(&self) -> bool {
        self.classic.loss > 0 || self.premium.loss > 0
    }
}

/// Mean of `count` prices, 0 when there are none.
///
/// Falls back to summing `price / count` when the plain total would overflow.
fn average<I>(prices: I, count: usize) -> Decimal
where
    I: Iterator<Item = Decimal> + Clone,
{
    if count == 0 {
        return Decimal::ZERO;
    }
    let count = Decimal::from(count);
    match prices.clone().try_fold(Decimal::ZERO, |total, price| total.checked_add(price)) {
        Some(total) => div(total, count),
        None => prices.map(|price| div(price, count)).fold(Decimal::ZERO, add),
    }
}

/// Build the dashboard report, evaluating every product with the same flag.
pub fn portfolio_report(
    products: &[ProductRecord],
    simulate_substitution_tax_relief: bool,
) -> PortfolioReport {
    let mut classic = TierOutcome::default();
    let mut premium = TierOutcome::default();

    for product in products {
        let profitability = product.profitability(simulate_substitution_tax_relief);

        classic.record(profitability.classic.margin);
        premium.record(profitability.premium.margin);
    }

    PortfolioReport {
        total_products: products.len(),
        average_price_classic: average(products.iter().map(|p| p.price_classic), products.len()),
        average_price_premium: average(products.iter().map(|p| p.price_premium), products.len()),
        classic,
        premium,
        simulate_substitution_tax_relief,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn healthy() -> ProductRecord {
        ProductRecord {
            sku: "DRL-100".to_string(),
            name: "Cordless Drill".to_string(),
            brand_name: Some("Voltix".to_string()),
            cost: dec!(100),
            input_tax_rate: dec!(18),
            output_tax_rate: dec!(18),
            freight: dec!(10),
            price_classic: dec!(200),
            price_premium: dec!(250),
            ..Default::default()
        }
    }

    /// Loses money on classic, profitable on premium.
    fn classic_loss() -> ProductRecord {
        ProductRecord {
            sku: "SAW-200".to_string(),
            name: "Circular Saw".to_string(),
            brand_name: None,
            cost: dec!(100),
            output_tax_rate: dec!(18),
            freight: dec!(10),
            price_classic: dec!(100),
            price_premium: dec!(400),
            ..Default::default()
        }
    }

    /// Profitable only while the substitution tax is reimbursed.
    fn st_sensitive() -> ProductRecord {
        ProductRecord {
            sku: "GRD-300".to_string(),
            name: "Angle Grinder".to_string(),
            brand_name: Some("Ferro".to_string()),
            substitution_tax_rate: dec!(70),
            ..healthy()
        }
    }

    #[test]
    fn test_search_matches_name_sku_and_brand() {
        let product = healthy();
        assert!(matches_search(&product, "drill"));
        assert!(matches_search(&product, "drl-1"));
        assert!(matches_search(&product, "VOLT"));
        assert!(matches_search(&product, ""));
        assert!(matches_search(&product, "   "));
        assert!(!matches_search(&product, "saw"));
    }

    #[test]
    fn test_search_without_brand() {
        let product = classic_loss();
        assert!(!matches_search(&product, "voltix"));
        assert!(matches_search(&product, "circular"));
    }

    #[test]
    fn test_loss_filter_scopes() {
        let result = classic_loss().profitability(false);

        assert!(LossFilter::AnyTier.matches(&result));
        assert!(LossFilter::Classic.matches(&result));
        assert!(!LossFilter::Premium.matches(&result));
    }

    #[test]
    fn test_filter_catalog_keeps_order_and_applies_losses() {
        let products = vec![healthy(), classic_loss(), st_sensitive()];

        let all = filter_catalog(&products, &CatalogQuery::default());
        let skus: Vec<&str> = all.iter().map(|e| e.product.sku.as_str()).collect();
        assert_eq!(skus, vec!["DRL-100", "SAW-200", "GRD-300"]);

        let losses = filter_catalog(
            &products,
            &CatalogQuery {
                loss_filter: Some(LossFilter::AnyTier),
                ..Default::default()
            },
        );
        let skus: Vec<&str> = losses.iter().map(|e| e.product.sku.as_str()).collect();
        assert_eq!(skus, vec!["SAW-200", "GRD-300"]);

        let premium_losses = filter_catalog(
            &products,
            &CatalogQuery {
                loss_filter: Some(LossFilter::Premium),
                ..Default::default()
            },
        );
        let skus: Vec<&str> = premium_losses.iter().map(|e| e.product.sku.as_str()).collect();
        assert_eq!(skus, vec!["GRD-300"]);
    }

    #[test]
    fn test_filter_catalog_obeys_simulation_flag() {
        let products = vec![healthy(), classic_loss(), st_sensitive()];

        let losses = filter_catalog(
            &products,
            &CatalogQuery {
                loss_filter: Some(LossFilter::AnyTier),
                simulate_substitution_tax_relief: true,
                ..Default::default()
            },
        );
        let skus: Vec<&str> = losses.iter().map(|e| e.product.sku.as_str()).collect();
        assert_eq!(skus, vec!["SAW-200"]);
        assert!(losses[0].profitability.classic.is_loss());
    }

    #[test]
    fn test_filter_catalog_combines_search_and_losses() {
        let products = vec![healthy(), classic_loss(), st_sensitive()];

        let rows = filter_catalog(
            &products,
            &CatalogQuery {
                search: "ferro".to_string(),
                loss_filter: Some(LossFilter::AnyTier),
                simulate_substitution_tax_relief: false,
            },
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product.sku, "GRD-300");
    }

    #[test]
    fn test_portfolio_report_counts_and_averages() {
        let products = vec![healthy(), classic_loss(), st_sensitive()];
        let report = portfolio_report(&products, false);

        assert_eq!(report.total_products, 3);
        // (200 + 100 + 200) / 3 and (250 + 400 + 250) / 3
        assert_eq!(report.average_price_classic, dec!(500) / dec!(3));
        assert_eq!(report.average_price_premium, dec!(300));
        assert_eq!(report.classic, TierOutcome { profitable: 1, loss: 2 });
        assert_eq!(report.premium, TierOutcome { profitable: 2, loss: 1 });
        assert!(report.has_losses());
        assert!(!report.simulate_substitution_tax_relief);
    }

    #[test]
    fn test_portfolio_report_under_relief() {
        let products = vec![healthy(), classic_loss(), st_sensitive()];
        let report = portfolio_report(&products, true);

        assert_eq!(report.classic.loss, 1);
        assert_eq!(report.premium.loss, 0);
        assert!(report.simulate_substitution_tax_relief);
    }

    #[test]
    fn test_portfolio_report_empty_catalog() {
        let report = portfolio_report(&[], false);

        assert_eq!(report.total_products, 0);
        assert_eq!(report.average_price_classic, Decimal::ZERO);
        assert_eq!(report.average_price_premium, Decimal::ZERO);
        assert!(!report.has_losses());
    }

    #[test]
    fn test_portfolio_report_averages_huge_prices() {
        let huge = ProductRecord {
            price_classic: Decimal::MAX,
            price_premium: Decimal::MAX,
            ..healthy()
        };
        let report = portfolio_report(&[huge.clone(), huge], false);

        assert_eq!(report.total_products, 2);
        assert!(report.average_price_classic >= Decimal::MAX - Decimal::ONE);
        assert!(report.average_price_premium >= Decimal::MAX - Decimal::ONE);
        assert_eq!(report.classic, TierOutcome { profitable: 2, loss: 0 });
    }

    #[test]
    fn test_zero_priced_product_counts_as_profitable() {
        let product = ProductRecord {
            sku: "NEW-1".to_string(),
            cost: dec!(500),
            ..Default::default()
        };
        let report = portfolio_report(&[product], false);

        assert_eq!(report.classic, TierOutcome { profitable: 1, loss: 0 });
        assert_eq!(report.premium, TierOutcome { profitable: 1, loss: 0 });
    }
}
