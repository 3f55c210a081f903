//! Tax resolution: rate composition and taxability decisions.
//!
//! Everything here is a pure function of its inputs. Prices are expected to
//! be sanitized already (see [`crate::core::money::parse_price`]).

use super::jurisdiction::Jurisdiction;
use super::taxability::TaxabilityRule;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Tax due on one purchase in one jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateCalculation<'a> {
    pub jurisdiction: &'a Jurisdiction,
    pub subtotal: Decimal,
    pub state_amount: Decimal,
    pub local_amount: Decimal,
    pub mctd_amount: Decimal,
    pub total_tax: Decimal,
    /// Percentage actually charged
    pub effective_rate: Decimal,
}

impl RateCalculation<'_> {
    pub fn total_with_tax(&self) -> Decimal {
        self.subtotal + self.total_tax
    }
}

/// Which path produced a [`Resolution`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Treatment {
    /// Ordinary taxable item, every component applies
    Standard,
    /// The rule exempts the item outright
    RuleExempt,
    /// Threshold rule, price at or above the cutoff
    AboveThreshold,
    /// Threshold rule, price below the cutoff, locality grants the exemption
    BelowThresholdExempt,
    /// Threshold rule, price below the cutoff, only the state component is exempt
    BelowThresholdLocalTaxed,
}

impl Treatment {
    pub fn display(&self) -> &'static str {
        match self {
            Treatment::Standard => "Taxable",
            Treatment::RuleExempt => "Exempt",
            Treatment::AboveThreshold => "Taxable (at or above threshold)",
            Treatment::BelowThresholdExempt => "Exempt (below threshold)",
            Treatment::BelowThresholdLocalTaxed => "State exempt, local tax applies",
        }
    }
}

/// Result of resolving one rule at one price in one jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution<'a> {
    pub taxable: bool,
    pub treatment: Treatment,
    pub calculation: RateCalculation<'a>,
}

/// Apply every rate component of `jurisdiction` to `subtotal`.
///
/// `effective_rate` is the jurisdiction's combined rate as published, not a
/// ratio of the computed amounts.
pub fn calculate_tax(jurisdiction: &Jurisdiction, subtotal: Decimal) -> RateCalculation<'_> {
    let state_amount = component(subtotal, jurisdiction.state_rate);
    let local_amount = component(subtotal, jurisdiction.local_rate);
    let mctd_amount = component(subtotal, jurisdiction.mctd_rate);

    RateCalculation {
        jurisdiction,
        subtotal,
        state_amount,
        local_amount,
        mctd_amount,
        total_tax: state_amount + local_amount + mctd_amount,
        effective_rate: jurisdiction.combined_rate,
    }
}

/// Binary answer to "is this purchase taxed at all".
///
/// Below a threshold the state component is always exempt, so the purchase
/// is still taxed only when the locality does not extend the exemption and
/// has a local or MCTD rate to charge.
pub fn is_taxable(rule: &TaxabilityRule, price: Decimal, jurisdiction: &Jurisdiction) -> bool {
    match rule.price_threshold() {
        Some(threshold) if price >= threshold => true,
        Some(_) => {
            !jurisdiction.grants_clothing_exemption() && jurisdiction.sub_state_rate() > Decimal::ZERO
        }
        None => rule.taxable,
    }
}

/// Resolve the tax on `price` for an item covered by `rule`.
pub fn resolve<'a>(
    rule: &TaxabilityRule,
    price: Decimal,
    jurisdiction: &'a Jurisdiction,
) -> Resolution<'a> {
    let taxable = is_taxable(rule, price, jurisdiction);

    let (treatment, calculation) = match rule.price_threshold() {
        Some(threshold) if price >= threshold => {
            (Treatment::AboveThreshold, calculate_tax(jurisdiction, price))
        }
        Some(_) => below_threshold(jurisdiction, price),
        None if rule.taxable => (Treatment::Standard, calculate_tax(jurisdiction, price)),
        None => (Treatment::RuleExempt, exempt(jurisdiction, price)),
    };

    log::debug!(
        "{} @ {} in {}: {:?} state={} local={} mctd={} total={}",
        rule.id,
        price,
        jurisdiction.code,
        treatment,
        calculation.state_amount,
        calculation.local_amount,
        calculation.mctd_amount,
        calculation.total_tax
    );

    Resolution {
        taxable,
        treatment,
        calculation,
    }
}

fn below_threshold(jurisdiction: &Jurisdiction, price: Decimal) -> (Treatment, RateCalculation<'_>) {
    if jurisdiction.grants_clothing_exemption() {
        return (Treatment::BelowThresholdExempt, exempt(jurisdiction, price));
    }

    let local_amount = component(price, jurisdiction.local_rate);
    let mctd_amount = component(price, jurisdiction.mctd_rate);
    let total_tax = local_amount + mctd_amount;

    let treatment = if total_tax.is_zero() && jurisdiction.sub_state_rate().is_zero() {
        Treatment::BelowThresholdExempt
    } else {
        Treatment::BelowThresholdLocalTaxed
    };

    let calculation = RateCalculation {
        jurisdiction,
        subtotal: price,
        state_amount: Decimal::ZERO,
        local_amount,
        mctd_amount,
        total_tax,
        effective_rate: ratio(total_tax, price),
    };
    (treatment, calculation)
}

fn exempt(jurisdiction: &Jurisdiction, price: Decimal) -> RateCalculation<'_> {
    RateCalculation {
        jurisdiction,
        subtotal: price,
        state_amount: Decimal::ZERO,
        local_amount: Decimal::ZERO,
        mctd_amount: Decimal::ZERO,
        total_tax: Decimal::ZERO,
        effective_rate: Decimal::ZERO,
    }
}

fn component(amount: Decimal, rate: Decimal) -> Decimal {
    amount * rate / dec!(100)
}

fn ratio(tax: Decimal, price: Decimal) -> Decimal {
    if price.is_zero() {
        Decimal::ZERO
    } else {
        tax / price * dec!(100)
    }
}
