use super::bulletins::{BulletinCatalog, TechnicalBulletin};
use super::compliance::{
    filing_requirement_for, generate_calendar, CalendarRules, ComplianceEvent, DueDate,
    FilingDiscount, FilingRequirement, NexusThreshold, SsutProgram,
};
use super::jurisdiction::{Jurisdiction, JurisdictionLevel, JurisdictionRegistry};
use super::taxability::{TaxCategory, TaxabilityCatalog};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("invalid state data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{state}: duplicate jurisdiction code {code}")]
    DuplicateCode { state: String, code: String },
    #[error("{code}: combined rate {combined} does not equal component sum {sum}")]
    CombinedRateMismatch {
        code: String,
        combined: Decimal,
        sum: Decimal,
    },
    #[error("{code}: rates must not be negative")]
    NegativeRate { code: String },
    #[error("{code}: unknown parent jurisdiction {parent}")]
    UnknownParent { code: String, parent: String },
    #[error("{state}: no state-level jurisdiction with code {state}")]
    MissingStateJurisdiction { state: String },
    #[error("rule {id}: threshold exemption without a threshold")]
    MissingThreshold { id: String },
    #[error("{state}: filing requirement {id} has max <= min")]
    InvalidFilingBand { state: String, id: String },
    #[error("{state}: invalid calendar date {month}/{day}")]
    InvalidDueDate { state: String, month: u32, day: u32 },
}

/// On-disk format for one state's reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StateConfig {
    /// Two-letter postal code, also the code of the state-level jurisdiction
    pub code: String,
    pub name: String,
    #[schemars(with = "String")]
    pub state_rate: Decimal,
    #[schemars(with = "String")]
    pub max_combined_rate: Decimal,
    #[serde(default)]
    pub highlights: Vec<String>,
    pub jurisdictions: Vec<Jurisdiction>,
    #[serde(default)]
    pub categories: Vec<TaxCategory>,
    #[serde(default)]
    pub filing_requirements: Vec<FilingRequirement>,
    pub nexus: NexusThreshold,
    #[serde(default)]
    pub calendar: CalendarRules,
    #[serde(default)]
    pub bulletins: Vec<TechnicalBulletin>,
    /// Reduced state rates by product class, e.g. `food`
    #[serde(default)]
    #[schemars(with = "BTreeMap<String, String>")]
    pub special_rates: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub ssut: Option<SsutProgram>,
    #[serde(default)]
    pub filing_discount: Option<FilingDiscount>,
}

/// Validated, indexed reference data for one state
#[derive(Debug, Clone)]
pub struct State {
    pub code: String,
    pub name: String,
    pub state_rate: Decimal,
    pub max_combined_rate: Decimal,
    pub highlights: Vec<String>,
    pub jurisdictions: JurisdictionRegistry,
    pub catalog: TaxabilityCatalog,
    pub bulletins: BulletinCatalog,
    pub filing_requirements: Vec<FilingRequirement>,
    pub nexus: NexusThreshold,
    pub calendar_rules: CalendarRules,
    pub special_rates: BTreeMap<String, Decimal>,
    pub ssut: Option<SsutProgram>,
    pub filing_discount: Option<FilingDiscount>,
}

impl State {
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let config: StateConfig = serde_json::from_str(json)?;
        Self::from_config(config)
    }

    pub fn from_config(config: StateConfig) -> Result<Self, DataError> {
        let state_index = validate(&config)?;

        log::debug!(
            "loaded {}: {} jurisdictions, {} categories, {} bulletins",
            config.code,
            config.jurisdictions.len(),
            config.categories.len(),
            config.bulletins.len()
        );

        Ok(State {
            jurisdictions: JurisdictionRegistry::new(config.jurisdictions, state_index),
            catalog: TaxabilityCatalog::new(config.categories),
            bulletins: BulletinCatalog::new(config.bulletins),
            code: config.code,
            name: config.name,
            state_rate: config.state_rate,
            max_combined_rate: config.max_combined_rate,
            highlights: config.highlights,
            filing_requirements: config.filing_requirements,
            nexus: config.nexus,
            calendar_rules: config.calendar,
            special_rates: config.special_rates,
            ssut: config.ssut,
            filing_discount: config.filing_discount,
        })
    }

    pub fn calendar(&self, year: i32) -> Vec<ComplianceEvent> {
        generate_calendar(&self.calendar_rules, &self.code, year)
    }

    pub fn filing_requirement(&self, annual_sales: Decimal) -> Option<&FilingRequirement> {
        filing_requirement_for(&self.filing_requirements, annual_sales)
    }
}

/// Check invariants and return the index of the state-level jurisdiction
fn validate(config: &StateConfig) -> Result<usize, DataError> {
    let mut codes = HashSet::new();
    for jurisdiction in &config.jurisdictions {
        if !codes.insert(jurisdiction.code.as_str()) {
            return Err(DataError::DuplicateCode {
                state: config.code.clone(),
                code: jurisdiction.code.clone(),
            });
        }
        let rates = [
            jurisdiction.state_rate,
            jurisdiction.local_rate,
            jurisdiction.mctd_rate,
            jurisdiction.combined_rate,
        ];
        if rates.iter().any(Decimal::is_sign_negative) {
            return Err(DataError::NegativeRate {
                code: jurisdiction.code.clone(),
            });
        }
        if jurisdiction.combined_rate != jurisdiction.component_sum() {
            return Err(DataError::CombinedRateMismatch {
                code: jurisdiction.code.clone(),
                combined: jurisdiction.combined_rate,
                sum: jurisdiction.component_sum(),
            });
        }
    }

    for jurisdiction in &config.jurisdictions {
        if let Some(parent) = &jurisdiction.parent_code {
            if !codes.contains(parent.as_str()) {
                return Err(DataError::UnknownParent {
                    code: jurisdiction.code.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    let state_index = config
        .jurisdictions
        .iter()
        .position(|j| j.code == config.code && j.level == JurisdictionLevel::State)
        .ok_or_else(|| DataError::MissingStateJurisdiction {
            state: config.code.clone(),
        })?;

    for rule in config.categories.iter().flat_map(|c| c.rules.iter()) {
        if rule.is_threshold() && rule.threshold.is_none() {
            return Err(DataError::MissingThreshold {
                id: rule.id.clone(),
            });
        }
    }

    for requirement in &config.filing_requirements {
        if requirement
            .threshold
            .max
            .is_some_and(|max| max <= requirement.threshold.min)
        {
            return Err(DataError::InvalidFilingBand {
                state: config.code.clone(),
                id: requirement.id.clone(),
            });
        }
    }

    let rules = &config.calendar;
    let due_dates = rules
        .quarterly
        .iter()
        .flat_map(|q| q.quarters.iter().map(|q| q.due))
        .chain(rules.annual.iter().map(|a| a.due))
        .chain(rules.reminders.iter().map(|r| r.due))
        .chain(rules.monthly.iter().map(|m| DueDate {
            month: 1,
            day: m.due_day,
            next_year: false,
        }));
    for due in due_dates {
        if !(1..=12).contains(&due.month) || !(1..=31).contains(&due.day) {
            return Err(DataError::InvalidDueDate {
                state: config.code.clone(),
                month: due.month,
                day: due.day,
            });
        }
    }

    Ok(state_index)
}

/// All loaded states, keyed by upper-case code
#[derive(Debug, Clone, Default)]
pub struct StateRegistry {
    states: BTreeMap<String, State>,
}

impl StateRegistry {
    /// Add a state, replacing any existing state with the same code
    pub fn insert(&mut self, state: State) -> Option<State> {
        let previous = self.states.insert(state.code.to_uppercase(), state);
        if let Some(previous) = &previous {
            log::info!("replacing bundled data for {}", previous.code);
        }
        previous
    }

    pub fn get(&self, code: &str) -> Option<&State> {
        self.states.get(&code.trim().to_uppercase())
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> serde_json::Value {
        json!({
            "code": "XX",
            "name": "Example",
            "state_rate": "4",
            "max_combined_rate": "8.5",
            "jurisdictions": [
                {
                    "code": "XX",
                    "name": "Example State",
                    "level": "state",
                    "state_rate": "4",
                    "local_rate": "0",
                    "mctd_rate": "0",
                    "combined_rate": "4",
                    "effective_date": "2024-01-01"
                },
                {
                    "code": "XX-METRO",
                    "name": "Metro",
                    "level": "city",
                    "parent_code": "XX",
                    "state_rate": "4",
                    "local_rate": "4.125",
                    "mctd_rate": "0.375",
                    "combined_rate": "8.5",
                    "in_mctd": true,
                    "effective_date": "2024-01-01",
                    "zip_codes": ["12345"],
                    "clothing_exemption": true
                }
            ],
            "categories": [
                {
                    "id": "clothing",
                    "name": "Clothing",
                    "description": "Apparel",
                    "rules": [{
                        "id": "clothing-under",
                        "category": "Clothing",
                        "description": "Clothing under $110",
                        "taxable": false,
                        "exemption_type": "threshold",
                        "threshold": "110",
                        "tb_reference": "TB-1",
                        "tb_url": "https://example.test"
                    }]
                }
            ],
            "filing_requirements": [
                {
                    "id": "quarterly",
                    "frequency": "quarterly",
                    "threshold": { "min": "0", "max": "1000" },
                    "form": "Q-1",
                    "due_day": 20,
                    "electronic_required": false,
                    "description": "Quarterly"
                }
            ],
            "nexus": {
                "type": "economic",
                "sales_threshold": "100000",
                "logic": "OR",
                "lookback_period": "Previous calendar year",
                "description": "Sales only"
            }
        })
    }

    fn load(value: serde_json::Value) -> Result<State, DataError> {
        State::from_json(&value.to_string())
    }

    #[test]
    fn valid_config_loads() {
        let state = load(config()).unwrap();
        assert_eq!(state.jurisdictions.state().code, "XX");
        assert_eq!(state.jurisdictions.lookup_zip("12345").jurisdiction().code, "XX-METRO");
        assert!(state.catalog.rule("clothing-under").is_some());
        assert!(state.nexus.transaction_threshold.is_none());
        assert!(state.calendar(2025).is_empty());
        assert_eq!(state.filing_requirement(Decimal::from(999)).map(|r| r.id.as_str()), Some("quarterly"));
    }

    #[test]
    fn combined_rate_mismatch_is_rejected() {
        let mut value = config();
        value["jurisdictions"][1]["combined_rate"] = json!("8.875");
        assert!(matches!(load(value), Err(DataError::CombinedRateMismatch { .. })));
    }

    #[test]
    fn duplicate_code_is_rejected() {
        let mut value = config();
        value["jurisdictions"][1]["code"] = json!("XX");
        assert!(matches!(load(value), Err(DataError::DuplicateCode { .. })));
    }

    #[test]
    fn negative_rate_is_rejected() {
        let mut value = config();
        value["jurisdictions"][1]["local_rate"] = json!("-4.125");
        value["jurisdictions"][1]["combined_rate"] = json!("0.25");
        assert!(matches!(load(value), Err(DataError::NegativeRate { .. })));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut value = config();
        value["jurisdictions"][1]["parent_code"] = json!("XX-NOPE");
        assert!(matches!(load(value), Err(DataError::UnknownParent { .. })));
    }

    #[test]
    fn missing_state_record_is_rejected() {
        let mut value = config();
        value["jurisdictions"][0]["level"] = json!("county");
        assert!(matches!(load(value), Err(DataError::MissingStateJurisdiction { .. })));
    }

    #[test]
    fn threshold_rule_needs_threshold() {
        let mut value = config();
        value["categories"][0]["rules"][0]
            .as_object_mut()
            .unwrap()
            .remove("threshold");
        assert!(matches!(load(value), Err(DataError::MissingThreshold { .. })));
    }

    #[test]
    fn empty_filing_band_is_rejected() {
        let mut value = config();
        value["filing_requirements"][0]["threshold"]["max"] = json!("0");
        assert!(matches!(load(value), Err(DataError::InvalidFilingBand { .. })));
    }

    #[test]
    fn bad_reminder_date_is_rejected() {
        let mut value = config();
        value["calendar"] = json!({
            "reminders": [{
                "id": "bad",
                "type": "registration",
                "title": "Bad",
                "description": "Bad",
                "due": { "month": 13, "day": 1 },
                "priority": "low"
            }]
        });
        assert!(matches!(load(value), Err(DataError::InvalidDueDate { .. })));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(State::from_json("{"), Err(DataError::Parse(_))));
    }

    #[test]
    fn registry_replaces_by_code() {
        let mut registry = StateRegistry::default();
        assert!(registry.insert(load(config()).unwrap()).is_none());
        let mut replacement = load(config()).unwrap();
        replacement.name = "Replacement".to_string();
        assert!(registry.insert(replacement).is_some());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("xx").map(|s| s.name.as_str()), Some("Replacement"));
    }
}
