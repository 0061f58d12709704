//! Core pricing calculation functions.
//!
//! Pure functions for the tax-and-margin math - no I/O, no shared state.
//! Every call recomputes the full breakdown from its input, so results never
//! go stale when a price or the simulation flag changes.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::constants::{percent_to_fraction, FISCAL_CONSTANTS, ONE_HUNDRED};
use super::lenient;
use super::models::ListingTier;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
/// Only used for display; the calculation itself keeps full precision.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use marketplace_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

// Overflowing results clamp to the representable bound carrying the sign of
// the exact result, so no input can make a calculation panic.

fn bound(negative: bool) -> Decimal {
    if negative {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

pub(crate) fn mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b)
        .unwrap_or_else(|| bound(a.is_sign_negative() != b.is_sign_negative()))
}

pub(crate) fn add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| bound(a.is_sign_negative()))
}

pub(crate) fn sub(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b).unwrap_or_else(|| bound(a.is_sign_negative()))
}

/// `b` must be non-zero.
pub(crate) fn div(a: Decimal, b: Decimal) -> Decimal {
    a.checked_div(b)
        .unwrap_or_else(|| bound(a.is_sign_negative() != b.is_sign_negative()))
}

/// Cost and tax attributes of one product, plus the prices being evaluated.
///
/// Rates are human-entered percentages (`18` means 18%). Missing or
/// non-numeric fields deserialize as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductFiscalInput {
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub cost: Decimal,
    /// ICMS paid on purchase
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub input_tax_rate: Decimal,
    /// ICMS due on sale
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub output_tax_rate: Decimal,
    /// IPI
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub excise_tax_rate: Decimal,
    /// DIFAL
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub interstate_tax_rate: Decimal,
    /// ICMS-ST
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub substitution_tax_rate: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub freight: Decimal,
    /// Treat the substitution tax as reimbursed for this calculation only
    #[serde(default, deserialize_with = "lenient::flag")]
    pub simulate_substitution_tax_relief: bool,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price_classic: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price_premium: Decimal,
}

impl ProductFiscalInput {
    pub fn price(&self, tier: ListingTier) -> Decimal {
        match tier {
            ListingTier::Classic => self.price_classic,
            ListingTier::Premium => self.price_premium,
        }
    }

    /// Substitution tax rate in force for this calculation, as a fraction.
    pub fn effective_substitution_tax_rate(&self) -> Decimal {
        if self.simulate_substitution_tax_relief {
            Decimal::ZERO
        } else {
            percent_to_fraction(self.substitution_tax_rate)
        }
    }

    /// Share of the sale price consumed by price-proportional deductions in a
    /// tier (commission, output tax, sales-tax debit, interstate tax).
    ///
    /// Profit only grows with price while this stays below 1. Rates are not
    /// checked against that bound; callers can use this to detect it.
    pub fn proportional_rate(&self, tier: ListingTier) -> Decimal {
        let output = percent_to_fraction(self.output_tax_rate);
        let interstate = percent_to_fraction(self.interstate_tax_rate);
        let sales_tax = mul(sub(Decimal::ONE, output), FISCAL_CONSTANTS.sales_tax_rate);
        [output, sales_tax, interstate]
            .into_iter()
            .fold(tier.commission_rate(&FISCAL_CONSTANTS), add)
    }

    /// Lowest price at which a tier stops losing money, if any exists.
    ///
    /// `None` when price-proportional deductions reach 100% of the price,
    /// since no price can then cover the fixed costs.
    pub fn breakeven_price(&self, tier: ListingTier) -> Option<Decimal> {
        let retained = sub(Decimal::ONE, self.proportional_rate(tier));
        if retained <= Decimal::ZERO {
            return None;
        }
        let fixed = add(acquisition_breakdown(self).net_acquisition_cost, self.freight);
        Some(div(fixed, retained))
    }
}

/// Purchase-side taxes and credits, shared by both tiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcquisitionBreakdown {
    #[serde(with = "rust_decimal::serde::str")]
    pub entry_tax_credit: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub excise_tax: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub substitution_tax: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub sales_tax_credit_base: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub sales_tax_credit: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub net_acquisition_cost: Decimal,
}

/// Sale-side costs and margin for one listing tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierResult {
    pub tier: ListingTier,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub commission: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub output_tax: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub sales_tax_debit_base: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub sales_tax_debit: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub interstate_tax: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_landed_cost: Decimal,
    /// Percentage of the price left after all costs. Negative means a loss.
    #[serde(with = "rust_decimal::serde::str")]
    pub margin: Decimal,
}

impl TierResult {
    pub fn is_loss(&self) -> bool {
        self.margin < Decimal::ZERO
    }

    fn rounded(&self, money_places: u32, margin_places: u32) -> Self {
        Self {
            tier: self.tier,
            price: round_money(self.price, money_places),
            commission: round_money(self.commission, money_places),
            output_tax: round_money(self.output_tax, money_places),
            sales_tax_debit_base: round_money(self.sales_tax_debit_base, money_places),
            sales_tax_debit: round_money(self.sales_tax_debit, money_places),
            interstate_tax: round_money(self.interstate_tax, money_places),
            total_landed_cost: round_money(self.total_landed_cost, money_places),
            margin: round_money(self.margin, margin_places),
        }
    }
}

/// Full result of one calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profitability {
    pub acquisition: AcquisitionBreakdown,
    pub classic: TierResult,
    pub premium: TierResult,
}

impl Profitability {
    pub fn tier(&self, tier: ListingTier) -> &TierResult {
        match tier {
            ListingTier::Classic => &self.classic,
            ListingTier::Premium => &self.premium,
        }
    }

    /// A product has a loss when either tier's margin is negative.
    pub fn has_loss(&self) -> bool {
        self.classic.is_loss() || self.premium.is_loss()
    }

    /// Copy rounded for display. Money fields use `money_places`, margins use
    /// `margin_places`. Classify losses on the unrounded value.
    pub fn rounded(&self, money_places: u32, margin_places: u32) -> Self {
        let a = &self.acquisition;
        Self {
            acquisition: AcquisitionBreakdown {
                entry_tax_credit: round_money(a.entry_tax_credit, money_places),
                excise_tax: round_money(a.excise_tax, money_places),
                substitution_tax: round_money(a.substitution_tax, money_places),
                sales_tax_credit_base: round_money(a.sales_tax_credit_base, money_places),
                sales_tax_credit: round_money(a.sales_tax_credit, money_places),
                net_acquisition_cost: round_money(a.net_acquisition_cost, money_places),
            },
            classic: self.classic.rounded(money_places, margin_places),
            premium: self.premium.rounded(money_places, margin_places),
        }
    }
}

/// Compute purchase-side credits and the net acquisition cost.
///
/// The PIS/COFINS credit base excludes the ICMS credit but includes IPI.
pub fn acquisition_breakdown(input: &ProductFiscalInput) -> AcquisitionBreakdown {
    let cost = input.cost;

    let entry_tax_credit = mul(cost, percent_to_fraction(input.input_tax_rate));
    let excise_tax = mul(cost, percent_to_fraction(input.excise_tax_rate));
    let substitution_tax = mul(cost, input.effective_substitution_tax_rate());

    let sales_tax_credit_base = add(sub(cost, entry_tax_credit), excise_tax);
    let sales_tax_credit = mul(sales_tax_credit_base, FISCAL_CONSTANTS.sales_tax_rate);

    let net_acquisition_cost = add(
        add(sub(sub(cost, entry_tax_credit), sales_tax_credit), excise_tax),
        substitution_tax,
    );

    AcquisitionBreakdown {
        entry_tax_credit,
        excise_tax,
        substitution_tax,
        sales_tax_credit_base,
        sales_tax_credit,
        net_acquisition_cost,
    }
}

/// Compute sale-side costs and margin for one tier.
///
/// A zero price yields a margin of exactly zero rather than dividing by it.
pub fn tier_result(
    input: &ProductFiscalInput,
    acquisition: &AcquisitionBreakdown,
    tier: ListingTier,
) -> TierResult {
    let price = input.price(tier);

    let commission = mul(price, tier.commission_rate(&FISCAL_CONSTANTS));
    let output_tax = mul(price, percent_to_fraction(input.output_tax_rate));

    let sales_tax_debit_base = sub(price, output_tax);
    let sales_tax_debit = mul(sales_tax_debit_base, FISCAL_CONSTANTS.sales_tax_rate);
    let interstate_tax = mul(price, percent_to_fraction(input.interstate_tax_rate));

    let total_landed_cost = [
        input.freight,
        commission,
        sales_tax_debit,
        output_tax,
        interstate_tax,
    ]
    .into_iter()
    .fold(acquisition.net_acquisition_cost, add);

    let margin = if price > Decimal::ZERO {
        mul(div(sub(price, total_landed_cost), price), ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };

    TierResult {
        tier,
        price,
        commission,
        output_tax,
        sales_tax_debit_base,
        sales_tax_debit,
        interstate_tax,
        total_landed_cost,
        margin,
    }
}

/// Compute the full profitability breakdown for both listing tiers.
///
/// Pure and total: the input is never modified and any input produces a
/// result. The substitution-tax relief flag only changes this calculation,
/// never the stored rate.
pub fn compute_profitability(input: &ProductFiscalInput) -> Profitability {
    let acquisition = acquisition_breakdown(input);
    let classic = tier_result(input, &acquisition, ListingTier::Classic);
    let premium = tier_result(input, &acquisition, ListingTier::Premium);

    Profitability {
        acquisition,
        classic,
        premium,
    }
}
