//! Fixed fiscal and marketplace rates.
//!
//! These apply to every product and every calculation. They are stored as
//! fractions (0.0925 = 9.25%), unlike the per-product rates which arrive as
//! human-entered percentages.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Rates shared by all calculations in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiscalConstants {
    /// Combined PIS/COFINS rate of the non-cumulative regime. Used for both the
    /// acquisition credit and the sale debit.
    pub sales_tax_rate: Decimal,
    /// Marketplace commission for classic listings
    pub commission_classic: Decimal,
    /// Marketplace commission for premium listings
    pub commission_premium: Decimal,
}

pub const FISCAL_CONSTANTS: FiscalConstants = FiscalConstants {
    sales_tax_rate: dec!(0.0925),
    commission_classic: dec!(0.115),
    commission_premium: dec!(0.165),
};

pub(crate) const ONE_HUNDRED: Decimal = dec!(100);

/// Convert a human-entered percentage (18 = 18%) into a fraction.
pub fn percent_to_fraction(percent: Decimal) -> Decimal {
    percent / ONE_HUNDRED
}
