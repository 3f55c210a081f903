//! Reference data compiled into the binary

use crate::core::{DataError, State, StateRegistry};

const BUNDLED: &[(&str, &str)] = &[
    ("AL", include_str!("../data/al.json")),
    ("NY", include_str!("../data/ny.json")),
];

/// Load and validate every bundled state
pub fn bundled_states() -> Result<StateRegistry, DataError> {
    let mut registry = StateRegistry::default();
    for (code, json) in BUNDLED {
        log::debug!("loading bundled data for {}", code);
        registry.insert(State::from_json(json)?);
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        is_taxable, resolve, EventKind, NexusLogic, Treatment, ZipMatch,
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn bundled_data_is_valid() {
        let registry = bundled_states().unwrap();
        assert_eq!(registry.codes().collect::<Vec<_>>(), vec!["AL", "NY"]);
        for state in registry.states() {
            for jurisdiction in state.jurisdictions.all() {
                assert_eq!(jurisdiction.combined_rate, jurisdiction.component_sum());
                assert!(jurisdiction.combined_rate <= state.max_combined_rate);
            }
        }
    }

    #[test]
    fn new_york_city_clothing() {
        let registry = bundled_states().unwrap();
        let ny = registry.get("NY").unwrap();
        let nyc = ny.jurisdictions.lookup_zip("10001").jurisdiction();
        assert_eq!(nyc.code, "NY-NYC");
        assert_eq!(nyc.combined_rate, dec!(8.875));

        let rule = ny.catalog.rule("clothing-under-110").unwrap();
        let below = resolve(rule, dec!(109.99), nyc);
        assert_eq!(below.calculation.total_tax, Decimal::ZERO);
        assert!(!is_taxable(rule, dec!(109.99), nyc));

        let at = resolve(rule, dec!(110), nyc);
        assert_eq!(at.treatment, Treatment::AboveThreshold);
        assert_eq!(at.calculation.total_tax, dec!(9.7625));
    }

    #[test]
    fn westchester_charges_local_tax_on_cheap_clothing() {
        let registry = bundled_states().unwrap();
        let ny = registry.get("NY").unwrap();
        let westchester = ny.jurisdictions.by_code("NY-WESTCHESTER").unwrap();
        let rule = ny.catalog.rule("clothing-under-110").unwrap();

        let resolution = resolve(rule, dec!(100), westchester);
        assert_eq!(resolution.treatment, Treatment::BelowThresholdLocalTaxed);
        assert_eq!(resolution.calculation.state_amount, Decimal::ZERO);
        assert_eq!(resolution.calculation.total_tax, dec!(3.375));
    }

    #[test]
    fn unknown_zip_uses_state_rate() {
        let registry = bundled_states().unwrap();
        let ny = registry.get("ny").unwrap();
        let found = ny.jurisdictions.lookup_zip("00000");
        assert!(matches!(found, ZipMatch::StateDefault(j) if j.code == "NY"));
    }

    #[test]
    fn duplicate_alabama_zips_resolve_to_the_later_city() {
        let registry = bundled_states().unwrap();
        let al = registry.get("AL").unwrap();
        assert_eq!(al.jurisdictions.lookup_zip("35226").jurisdiction().code, "AL-HOOVER");
        assert_eq!(al.jurisdictions.lookup_zip("35203").jurisdiction().code, "AL-BIRMINGHAM");
    }

    #[test]
    fn state_specific_nexus_and_calendar() {
        let registry = bundled_states().unwrap();
        let ny = registry.get("NY").unwrap();
        assert_eq!(ny.nexus.logic, NexusLogic::And);
        assert!(!ny.nexus.evaluate(dec!(600000), 50).has_nexus);

        let al = registry.get("AL").unwrap();
        assert!(al.nexus.transaction_threshold.is_none());
        assert!(al.nexus.evaluate(dec!(250001), 0).has_nexus);

        let events = al.calendar(2025);
        assert_eq!(events.len(), 12 + 4 + 1 + 3);
        assert!(events.windows(2).all(|w| w[0].due_date <= w[1].due_date));
        assert_eq!(
            events.iter().filter(|e| e.kind == EventKind::RateChange).count(),
            2
        );
        assert_eq!(al.filing_discount.as_ref().unwrap().discount(dec!(1000)), dec!(23));
        assert_eq!(al.ssut.as_ref().unwrap().calculate(dec!(100)), dec!(8));
    }

    #[test]
    fn same_day_filings_keep_each_state_order() {
        let registry = bundled_states().unwrap();
        let on_april_20 = |code: &str| -> Vec<String> {
            registry
                .get(code)
                .unwrap()
                .calendar(2025)
                .into_iter()
                .filter(|e| e.due_date == NaiveDate::from_ymd_opt(2025, 4, 20).unwrap())
                .map(|e| e.id)
                .collect()
        };
        assert_eq!(on_april_20("NY"), vec!["quarterly-filing-2025-1", "monthly-filing-2025-3"]);
        assert_eq!(on_april_20("AL"), vec!["monthly-filing-2025-3", "quarterly-filing-2025-1"]);
    }
}
