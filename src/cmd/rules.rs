//! Rules command - browse and search taxability rules

use crate::cmd::{print_json, print_table, select_state};
use anyhow::bail;
use clap::Args;
use salestax::core::{format_usd, StateRegistry, TaxabilityRule};
use tabled::Tabled;

/// Shorter queries are ignored
const MIN_QUERY_LEN: usize = 2;

#[derive(Args, Debug)]
pub struct RulesCommand {
    /// Two-letter state code
    #[arg(short, long, default_value = "NY")]
    state: String,

    /// Only rules in this category id
    #[arg(short, long, conflicts_with = "search")]
    category: Option<String>,

    /// Case-insensitive text search across rules
    #[arg(long)]
    search: Option<String>,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "Rule")]
    id: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Threshold")]
    threshold: String,
    #[tabled(rename = "Reference")]
    reference: String,
}

impl From<&TaxabilityRule> for RuleRow {
    fn from(rule: &TaxabilityRule) -> Self {
        RuleRow {
            id: rule.id.clone(),
            category: rule.category.clone(),
            description: rule.description.clone(),
            status: rule.status_label(),
            threshold: rule
                .price_threshold()
                .map(format_usd)
                .unwrap_or_else(|| "-".to_string()),
            reference: rule.tb_reference.clone(),
        }
    }
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Rules")]
    rules: usize,
    #[tabled(rename = "Description")]
    description: String,
}

impl RulesCommand {
    pub fn exec(&self, states: &StateRegistry) -> anyhow::Result<()> {
        let state = select_state(states, &self.state)?;
        let catalog = &state.catalog;

        let rules: Vec<&TaxabilityRule> = if let Some(query) = &self.search {
            if query.trim().chars().count() < MIN_QUERY_LEN {
                log::info!("search '{}' is too short, ignoring", query.trim());
                Vec::new()
            } else {
                catalog.search(query)
            }
        } else if let Some(id) = &self.category {
            match catalog.category(id) {
                Some(category) => category.rules.iter().collect(),
                None => bail!(
                    "unknown category '{}' (available: {})",
                    id,
                    catalog
                        .categories()
                        .iter()
                        .map(|c| c.id.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }
        } else {
            if self.json {
                return print_json(catalog.categories());
            }
            let rows = catalog
                .categories()
                .iter()
                .map(|c| CategoryRow {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    rules: c.rules.len(),
                    description: c.description.clone(),
                })
                .collect();
            print_table::<CategoryRow>(rows);
            return Ok(());
        };

        if self.json {
            return print_json(&rules);
        }
        if rules.is_empty() {
            println!("No matching rules");
            return Ok(());
        }

        let has_threshold = rules.iter().any(|r| r.is_threshold());
        print_table(rules.into_iter().map(RuleRow::from).collect::<Vec<_>>());
        if has_threshold {
            println!("* Threshold exemption: status depends on price and jurisdiction");
        }
        Ok(())
    }
}
