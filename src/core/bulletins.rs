use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Published guidance cited by taxability rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TechnicalBulletin {
    pub id: String,
    /// Publisher's reference, e.g. `TB-ST-530`
    pub number: String,
    pub title: String,
    pub category: String,
    #[schemars(with = "String")]
    pub published_date: NaiveDate,
    #[schemars(with = "String")]
    pub last_updated: NaiveDate,
    pub summary: String,
    pub url: String,
    #[serde(default)]
    pub related_topics: Vec<String>,
}

impl TechnicalBulletin {
    fn matches(&self, query: &str) -> bool {
        let contains = |text: &str| text.to_lowercase().contains(query);
        contains(&self.title)
            || contains(&self.summary)
            || contains(&self.category)
            || contains(&self.number)
            || self.related_topics.iter().any(|t| contains(t.as_str()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct BulletinCatalog {
    bulletins: Vec<TechnicalBulletin>,
}

impl BulletinCatalog {
    pub fn new(bulletins: Vec<TechnicalBulletin>) -> Self {
        BulletinCatalog { bulletins }
    }

    pub fn all(&self) -> &[TechnicalBulletin] {
        &self.bulletins
    }

    /// Case-insensitive substring search
    pub fn search(&self, query: &str) -> Vec<&TechnicalBulletin> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.bulletins.iter().collect();
        }
        self.bulletins.iter().filter(|b| b.matches(&query)).collect()
    }

    /// Exact category match
    pub fn by_category(&self, category: &str) -> Vec<&TechnicalBulletin> {
        self.bulletins
            .iter()
            .filter(|b| b.category == category)
            .collect()
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<&str> {
        self.bulletins
            .iter()
            .map(|b| b.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Lookup by bulletin number, ignoring case
    pub fn by_number(&self, number: &str) -> Option<&TechnicalBulletin> {
        self.bulletins
            .iter()
            .find(|b| b.number.eq_ignore_ascii_case(number))
    }
}
