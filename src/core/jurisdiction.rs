use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Level of a taxing authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum JurisdictionLevel {
    State,
    County,
    City,
    District,
}

impl JurisdictionLevel {
    pub fn display(&self) -> &'static str {
        match self {
            JurisdictionLevel::State => "State",
            JurisdictionLevel::County => "County",
            JurisdictionLevel::City => "City",
            JurisdictionLevel::District => "District",
        }
    }
}

impl std::fmt::Display for JurisdictionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// A taxing authority and its rate components (all rates are percentages)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Jurisdiction {
    /// Unique key, e.g. `NY-NYC`
    pub code: String,
    pub name: String,
    pub level: JurisdictionLevel,
    /// Enclosing jurisdiction (lookup only)
    #[serde(default)]
    pub parent_code: Option<String>,
    #[schemars(with = "String")]
    pub state_rate: Decimal,
    #[schemars(with = "String")]
    pub local_rate: Decimal,
    #[schemars(with = "String")]
    pub mctd_rate: Decimal,
    /// Must equal state + local + MCTD
    #[schemars(with = "String")]
    pub combined_rate: Decimal,
    #[serde(default)]
    pub in_mctd: bool,
    #[schemars(with = "String")]
    pub effective_date: NaiveDate,
    #[serde(default)]
    pub zip_codes: Option<Vec<String>>,
    /// Whether the locality extends the clothing threshold exemption to its
    /// own local and MCTD components. The state component is exempt either way.
    #[serde(default)]
    pub clothing_exemption: Option<bool>,
}

impl Jurisdiction {
    pub fn component_sum(&self) -> Decimal {
        self.state_rate + self.local_rate + self.mctd_rate
    }

    pub fn grants_clothing_exemption(&self) -> bool {
        self.clothing_exemption.unwrap_or(false)
    }

    /// Local and MCTD together; what remains chargeable when only the
    /// state component is exempt.
    pub fn sub_state_rate(&self) -> Decimal {
        self.local_rate + self.mctd_rate
    }
}

/// Outcome of a ZIP lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZipMatch<'a> {
    /// The ZIP belongs to this jurisdiction
    Exact(&'a Jurisdiction),
    /// The ZIP is unknown; the state-level record was used instead
    StateDefault(&'a Jurisdiction),
}

impl<'a> ZipMatch<'a> {
    pub fn jurisdiction(&self) -> &'a Jurisdiction {
        match self {
            ZipMatch::Exact(j) | ZipMatch::StateDefault(j) => j,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, ZipMatch::Exact(_))
    }
}

/// Read-only jurisdiction table for one state, with a ZIP index
#[derive(Debug, Clone)]
pub struct JurisdictionRegistry {
    jurisdictions: Vec<Jurisdiction>,
    by_code: HashMap<String, usize>,
    zip_index: HashMap<String, usize>,
    state_index: usize,
}

impl JurisdictionRegistry {
    /// Build the registry. `state_index` must point at the state-level record;
    /// `core::state` validates the table before calling this.
    pub(crate) fn new(jurisdictions: Vec<Jurisdiction>, state_index: usize) -> Self {
        let by_code = jurisdictions
            .iter()
            .enumerate()
            .map(|(i, j)| (j.code.clone(), i))
            .collect();

        let mut zip_index: HashMap<String, usize> = HashMap::new();
        for (i, jurisdiction) in jurisdictions.iter().enumerate() {
            for zip in jurisdiction.zip_codes.iter().flatten() {
                if let Some(previous) = zip_index.insert(zip.clone(), i) {
                    if previous != i {
                        log::warn!(
                            "ZIP {} listed by both {} and {}; using {}",
                            zip,
                            jurisdictions[previous].code,
                            jurisdiction.code,
                            jurisdiction.code
                        );
                    }
                }
            }
        }

        JurisdictionRegistry {
            jurisdictions,
            by_code,
            zip_index,
            state_index,
        }
    }

    pub fn all(&self) -> &[Jurisdiction] {
        &self.jurisdictions
    }

    pub fn by_code(&self, code: &str) -> Option<&Jurisdiction> {
        self.by_code.get(code).map(|&i| &self.jurisdictions[i])
    }

    /// The top-level state record
    pub fn state(&self) -> &Jurisdiction {
        &self.jurisdictions[self.state_index]
    }

    /// Resolve a ZIP (five digits, or ZIP+4 by its prefix). Unknown ZIPs fall
    /// back to the state record.
    pub fn lookup_zip(&self, zip: &str) -> ZipMatch<'_> {
        let prefix = zip.trim().get(..5).unwrap_or(zip.trim());
        match self.zip_index.get(prefix) {
            Some(&i) => ZipMatch::Exact(&self.jurisdictions[i]),
            None => {
                log::debug!("ZIP {} not indexed, using state rate", zip);
                ZipMatch::StateDefault(self.state())
            }
        }
    }

    pub fn with_level(&self, level: JurisdictionLevel) -> impl Iterator<Item = &Jurisdiction> {
        self.jurisdictions.iter().filter(move |j| j.level == level)
    }

    pub fn counties(&self) -> Vec<&Jurisdiction> {
        self.with_level(JurisdictionLevel::County).collect()
    }

    pub fn cities(&self) -> Vec<&Jurisdiction> {
        self.with_level(JurisdictionLevel::City).collect()
    }

    pub fn in_mctd(&self) -> impl Iterator<Item = &Jurisdiction> {
        self.jurisdictions.iter().filter(|j| j.in_mctd)
    }

    pub fn children_of<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a Jurisdiction> {
        self.jurisdictions
            .iter()
            .filter(move |j| j.parent_code.as_deref() == Some(parent))
    }

    pub fn zip_count(&self) -> usize {
        self.zip_index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn jurisdiction(code: &str, level: JurisdictionLevel, local: Decimal, zips: &[&str]) -> Jurisdiction {
        Jurisdiction {
            code: code.to_string(),
            name: code.to_string(),
            level,
            parent_code: None,
            state_rate: dec!(4),
            local_rate: local,
            mctd_rate: Decimal::ZERO,
            combined_rate: dec!(4) + local,
            in_mctd: false,
            effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            zip_codes: if zips.is_empty() {
                None
            } else {
                Some(zips.iter().map(|z| z.to_string()).collect())
            },
            clothing_exemption: None,
        }
    }

    fn registry() -> JurisdictionRegistry {
        let mut city = jurisdiction("XX-CITY", JurisdictionLevel::City, dec!(5), &["11111", "22222"]);
        city.parent_code = Some("XX-COUNTY".to_string());
        JurisdictionRegistry::new(
            vec![
                jurisdiction("XX", JurisdictionLevel::State, Decimal::ZERO, &[]),
                jurisdiction("XX-COUNTY", JurisdictionLevel::County, dec!(2), &["33333"]),
                city,
                jurisdiction("XX-OTHER", JurisdictionLevel::City, dec!(6), &["22222"]),
            ],
            0,
        )
    }

    #[test]
    fn zip_lookup_finds_owner() {
        let registry = registry();
        let found = registry.lookup_zip("11111");
        assert!(found.is_exact());
        assert_eq!(found.jurisdiction().code, "XX-CITY");
    }

    #[test]
    fn unknown_zip_falls_back_to_state() {
        let registry = registry();
        let found = registry.lookup_zip("99999");
        assert_eq!(found, ZipMatch::StateDefault(registry.state()));
        assert_eq!(found.jurisdiction().code, "XX");
    }

    #[test]
    fn zip_plus_four_uses_prefix() {
        let registry = registry();
        assert_eq!(registry.lookup_zip("33333-1234").jurisdiction().code, "XX-COUNTY");
    }

    #[test]
    fn later_zip_claim_wins() {
        let registry = registry();
        assert_eq!(registry.lookup_zip("22222").jurisdiction().code, "XX-OTHER");
        assert_eq!(registry.zip_count(), 3);
    }

    #[test]
    fn filters() {
        let registry = registry();
        assert_eq!(registry.counties().len(), 1);
        assert_eq!(registry.cities().len(), 2);
        assert_eq!(registry.children_of("XX-COUNTY").count(), 1);
        assert_eq!(registry.in_mctd().count(), 0);
        assert!(registry.by_code("XX-CITY").is_some());
        assert!(registry.by_code("nope").is_none());
    }
}
