use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How an item class escapes tax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExemptionType {
    Full,
    Partial,
    /// Exempt only below a price cutoff
    Threshold,
    Conditional,
}

impl ExemptionType {
    pub fn display(&self) -> &'static str {
        match self {
            ExemptionType::Full => "Full",
            ExemptionType::Partial => "Partial",
            ExemptionType::Threshold => "Threshold",
            ExemptionType::Conditional => "Conditional",
        }
    }
}

/// Tax treatment of one item class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TaxabilityRule {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub description: String,
    /// Default determination
    pub taxable: bool,
    #[serde(default)]
    pub exemption_type: Option<ExemptionType>,
    /// Price cutoff; only meaningful for threshold exemptions
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub threshold: Option<Decimal>,
    /// Informational qualifiers, never evaluated
    #[serde(default)]
    pub conditions: Vec<String>,
    pub tb_reference: String,
    pub tb_url: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TaxabilityRule {
    pub fn is_threshold(&self) -> bool {
        self.exemption_type == Some(ExemptionType::Threshold)
    }

    /// The cutoff when this is a threshold rule that carries one
    pub fn price_threshold(&self) -> Option<Decimal> {
        if self.is_threshold() {
            self.threshold
        } else {
            None
        }
    }

    /// Short label used in listings, e.g. `Exempt*` for threshold rules
    pub fn status_label(&self) -> String {
        let base = if self.taxable { "Taxable" } else { "Exempt" };
        if self.is_threshold() {
            format!("{}*", base)
        } else {
            base.to_string()
        }
    }

    fn matches(&self, query: &str) -> bool {
        let contains = |text: &str| text.to_lowercase().contains(query);
        contains(&self.description)
            || contains(&self.category)
            || self.subcategory.as_deref().is_some_and(contains)
            || self.notes.as_deref().is_some_and(contains)
            || self.conditions.iter().any(|c| contains(c.as_str()))
    }
}

/// A group of rules presented together, e.g. "Clothing & Footwear"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TaxCategory {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rules: Vec<TaxabilityRule>,
}

/// Read-only set of categories for one state
#[derive(Debug, Clone, Default)]
pub struct TaxabilityCatalog {
    categories: Vec<TaxCategory>,
}

impl TaxabilityCatalog {
    pub fn new(categories: Vec<TaxCategory>) -> Self {
        TaxabilityCatalog { categories }
    }

    pub fn categories(&self) -> &[TaxCategory] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&TaxCategory> {
        self.categories
            .iter()
            .find(|c| c.id.eq_ignore_ascii_case(id))
    }

    pub fn rules(&self) -> impl Iterator<Item = &TaxabilityRule> {
        self.categories.iter().flat_map(|c| c.rules.iter())
    }

    pub fn rule(&self, id: &str) -> Option<&TaxabilityRule> {
        self.rules().find(|r| r.id.eq_ignore_ascii_case(id))
    }

    /// Case-insensitive substring search across rule text
    pub fn search(&self, query: &str) -> Vec<&TaxabilityRule> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.rules().filter(|r| r.matches(&query)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rule(id: &str, description: &str, taxable: bool) -> TaxabilityRule {
        TaxabilityRule {
            id: id.to_string(),
            category: "Food & Beverages".to_string(),
            subcategory: None,
            description: description.to_string(),
            taxable,
            exemption_type: None,
            threshold: None,
            conditions: Vec::new(),
            tb_reference: "TB-ST-283".to_string(),
            tb_url: "https://example.test/tb".to_string(),
            notes: None,
        }
    }

    fn catalog() -> TaxabilityCatalog {
        let mut clothing = rule("clothing-under", "Clothing and footwear under $110", false);
        clothing.category = "Clothing".to_string();
        clothing.exemption_type = Some(ExemptionType::Threshold);
        clothing.threshold = Some(dec!(110));
        clothing.conditions = vec!["Per item, not per invoice".to_string()];

        TaxabilityCatalog::new(vec![
            TaxCategory {
                id: "food".to_string(),
                name: "Food".to_string(),
                description: "Food".to_string(),
                rules: vec![
                    rule("groceries", "Grocery food items", false),
                    rule("candy", "Candy and confectionery", true),
                ],
            },
            TaxCategory {
                id: "clothing".to_string(),
                name: "Clothing".to_string(),
                description: "Clothing".to_string(),
                rules: vec![clothing],
            },
        ])
    }

    #[test]
    fn search_is_case_insensitive() {
        let catalog = catalog();
        let hits = catalog.search("CANDY");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "candy");
    }

    #[test]
    fn search_covers_conditions_and_category() {
        let catalog = catalog();
        assert_eq!(catalog.search("invoice")[0].id, "clothing-under");
        assert_eq!(catalog.search("food & bev").len(), 2);
        assert!(catalog.search("   ").is_empty());
    }

    #[test]
    fn lookup_by_id() {
        let catalog = catalog();
        assert!(catalog.category("FOOD").is_some());
        assert_eq!(catalog.rule("groceries").map(|r| r.taxable), Some(false));
        assert!(catalog.rule("missing").is_none());
    }

    #[test]
    fn threshold_only_for_threshold_rules() {
        let catalog = catalog();
        let clothing = catalog.rule("clothing-under").unwrap();
        assert_eq!(clothing.price_threshold(), Some(dec!(110)));
        assert_eq!(clothing.status_label(), "Exempt*");

        let mut candy = catalog.rule("candy").unwrap().clone();
        candy.threshold = Some(dec!(5));
        assert_eq!(candy.price_threshold(), None);
        assert_eq!(candy.status_label(), "Taxable");
    }
}
