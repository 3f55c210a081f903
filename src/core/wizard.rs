//! Category → item → price → jurisdiction selection flow

use super::engine::{resolve, Resolution};
use super::jurisdiction::Jurisdiction;
use super::money::parse_price;
use super::taxability::{TaxCategory, TaxabilityRule};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const DEFAULT_PRICE: Decimal = dec!(100);

/// Suggested prices offered at the price step
pub const QUICK_PRICES: [Decimal; 5] = [dec!(50), dec!(99), dec!(110), dec!(150), dec!(200)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Category,
    Item,
    /// Only visited for threshold rules
    Price,
    Jurisdiction,
    Result,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("cannot {action} at the {step:?} step")]
pub struct WrongStep {
    pub action: &'static str,
    pub step: Step,
}

#[derive(Debug, Clone)]
pub struct Wizard<'a> {
    step: Step,
    category: Option<&'a TaxCategory>,
    rule: Option<&'a TaxabilityRule>,
    price: Decimal,
    jurisdiction: Option<&'a Jurisdiction>,
}

impl Default for Wizard<'_> {
    fn default() -> Self {
        Wizard {
            step: Step::Category,
            category: None,
            rule: None,
            price: DEFAULT_PRICE,
            jurisdiction: None,
        }
    }
}

impl<'a> Wizard<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn category(&self) -> Option<&'a TaxCategory> {
        self.category
    }

    pub fn rule(&self) -> Option<&'a TaxabilityRule> {
        self.rule
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn jurisdiction(&self) -> Option<&'a Jurisdiction> {
        self.jurisdiction
    }

    fn is_threshold_flow(&self) -> bool {
        self.rule.is_some_and(TaxabilityRule::is_threshold)
    }

    fn expect_step(&self, expected: Step, action: &'static str) -> Result<(), WrongStep> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WrongStep {
                action,
                step: self.step,
            })
        }
    }

    pub fn select_category(&mut self, category: &'a TaxCategory) -> Result<(), WrongStep> {
        self.expect_step(Step::Category, "select a category")?;
        self.category = Some(category);
        self.rule = None;
        self.step = Step::Item;
        Ok(())
    }

    pub fn select_item(&mut self, rule: &'a TaxabilityRule) -> Result<(), WrongStep> {
        self.expect_step(Step::Item, "select an item")?;
        self.rule = Some(rule);
        self.step = if rule.is_threshold() {
            Step::Price
        } else {
            Step::Jurisdiction
        };
        Ok(())
    }

    /// Unparseable or negative input is taken as zero.
    pub fn submit_price(&mut self, input: &str) -> Result<(), WrongStep> {
        self.expect_step(Step::Price, "enter a price")?;
        self.price = parse_price(input);
        self.step = Step::Jurisdiction;
        Ok(())
    }

    pub fn select_jurisdiction(&mut self, jurisdiction: &'a Jurisdiction) -> Result<(), WrongStep> {
        self.expect_step(Step::Jurisdiction, "select a jurisdiction")?;
        self.jurisdiction = Some(jurisdiction);
        self.step = Step::Result;
        Ok(())
    }

    /// Selections are kept so going forward again can reuse them.
    pub fn back(&mut self) {
        self.step = match self.step {
            Step::Category | Step::Item => Step::Category,
            Step::Price => Step::Item,
            Step::Jurisdiction if self.is_threshold_flow() => Step::Price,
            Step::Jurisdiction => Step::Item,
            Step::Result => Step::Jurisdiction,
        };
    }

    pub fn reset(&mut self) {
        *self = Wizard::default();
    }

    /// 1-based position of the current step
    pub fn step_number(&self) -> usize {
        match (self.step, self.is_threshold_flow()) {
            (Step::Category, _) => 1,
            (Step::Item, _) => 2,
            (Step::Price, _) => 3,
            (Step::Jurisdiction, true) => 4,
            (Step::Jurisdiction, false) => 3,
            (Step::Result, true) => 5,
            (Step::Result, false) => 4,
        }
    }

    pub fn total_steps(&self) -> usize {
        if self.is_threshold_flow() {
            5
        } else {
            4
        }
    }

    /// Available once every selection has been made
    pub fn resolution(&self) -> Option<Resolution<'a>> {
        if self.step != Step::Result {
            return None;
        }
        let rule = self.rule?;
        let jurisdiction = self.jurisdiction?;
        Some(resolve(rule, self.price, jurisdiction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::Treatment;
    use crate::core::jurisdiction::JurisdictionLevel;
    use crate::core::taxability::ExemptionType;
    use chrono::NaiveDate;

    fn rule(id: &str, exemption_type: Option<ExemptionType>) -> TaxabilityRule {
        TaxabilityRule {
            id: id.to_string(),
            category: "Clothing".to_string(),
            subcategory: None,
            description: id.to_string(),
            taxable: exemption_type.is_none(),
            exemption_type,
            threshold: exemption_type.map(|_| dec!(110)),
            conditions: Vec::new(),
            tb_reference: "TB-ST-530".to_string(),
            tb_url: String::new(),
            notes: None,
        }
    }

    fn category() -> TaxCategory {
        TaxCategory {
            id: "clothing".to_string(),
            name: "Clothing".to_string(),
            description: String::new(),
            rules: vec![
                rule("clothing-under", Some(ExemptionType::Threshold)),
                rule("accessories", None),
            ],
        }
    }

    fn county() -> Jurisdiction {
        Jurisdiction {
            code: "NY-WESTCHESTER".to_string(),
            name: "Westchester County".to_string(),
            level: JurisdictionLevel::County,
            parent_code: None,
            state_rate: dec!(4),
            local_rate: dec!(3),
            mctd_rate: dec!(0.375),
            combined_rate: dec!(7.375),
            in_mctd: true,
            effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            zip_codes: None,
            clothing_exemption: Some(false),
        }
    }

    #[test]
    fn threshold_flow_visits_price() {
        let category = category();
        let county = county();
        let mut wizard = Wizard::new();
        assert_eq!((wizard.step_number(), wizard.total_steps()), (1, 4));

        wizard.select_category(&category).unwrap();
        wizard.select_item(&category.rules[0]).unwrap();
        assert_eq!(wizard.step(), Step::Price);
        assert_eq!(wizard.total_steps(), 5);

        wizard.submit_price("80").unwrap();
        wizard.select_jurisdiction(&county).unwrap();
        assert_eq!(wizard.step_number(), 5);

        let resolution = wizard.resolution().unwrap();
        assert_eq!(resolution.treatment, Treatment::BelowThresholdLocalTaxed);
        assert_eq!(resolution.calculation.total_tax, dec!(2.7));
    }

    #[test]
    fn plain_flow_skips_price() {
        let category = category();
        let county = county();
        let mut wizard = Wizard::new();
        wizard.select_category(&category).unwrap();
        wizard.select_item(&category.rules[1]).unwrap();
        assert_eq!(wizard.step(), Step::Jurisdiction);
        assert_eq!(wizard.step_number(), 3);

        wizard.select_jurisdiction(&county).unwrap();
        assert_eq!(wizard.step_number(), 4);
        let resolution = wizard.resolution().unwrap();
        assert_eq!(resolution.calculation.subtotal, DEFAULT_PRICE);
        assert_eq!(resolution.calculation.total_tax, dec!(7.375));
    }

    #[test]
    fn back_depends_on_rule_kind() {
        let category = category();
        let mut wizard = Wizard::new();
        wizard.select_category(&category).unwrap();
        wizard.select_item(&category.rules[0]).unwrap();
        wizard.submit_price("50").unwrap();
        wizard.back();
        assert_eq!(wizard.step(), Step::Price);
        wizard.back();
        assert_eq!(wizard.step(), Step::Item);

        wizard.select_item(&category.rules[1]).unwrap();
        wizard.back();
        assert_eq!(wizard.step(), Step::Item);
        wizard.back();
        wizard.back();
        assert_eq!(wizard.step(), Step::Category);
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        let category = category();
        let county = county();
        let mut wizard = Wizard::new();
        assert!(wizard.select_jurisdiction(&county).is_err());
        assert!(wizard.submit_price("10").is_err());
        wizard.select_category(&category).unwrap();
        assert_eq!(
            wizard.select_category(&category),
            Err(WrongStep {
                action: "select a category",
                step: Step::Item
            })
        );
        assert!(wizard.resolution().is_none());
    }

    #[test]
    fn bad_price_becomes_zero_and_reset_restores_default() {
        let category = category();
        let mut wizard = Wizard::new();
        wizard.select_category(&category).unwrap();
        wizard.select_item(&category.rules[0]).unwrap();
        wizard.submit_price("abc").unwrap();
        assert_eq!(wizard.price(), Decimal::ZERO);

        wizard.reset();
        assert_eq!(wizard.step(), Step::Category);
        assert_eq!(wizard.price(), DEFAULT_PRICE);
        assert!(wizard.rule().is_none());
    }
}
