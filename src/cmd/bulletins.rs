//! Bulletins command - search technical bulletins

use crate::cmd::{print_json, print_table, select_state};
use clap::Args;
use salestax::core::{StateRegistry, TechnicalBulletin};
use tabled::Tabled;

const MIN_QUERY_LEN: usize = 2;

#[derive(Args, Debug)]
pub struct BulletinsCommand {
    /// Two-letter state code
    #[arg(short, long, default_value = "NY")]
    state: String,

    /// Case-insensitive text search (at least two characters)
    #[arg(long)]
    search: Option<String>,

    /// Only bulletins in this category (exact match)
    #[arg(short, long)]
    category: Option<String>,

    /// List the categories instead of bulletins
    #[arg(long, conflicts_with_all = ["search", "category"])]
    categories: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct BulletinRow {
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Updated")]
    last_updated: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl BulletinsCommand {
    pub fn exec(&self, states: &StateRegistry) -> anyhow::Result<()> {
        let state = select_state(states, &self.state)?;
        let catalog = &state.bulletins;

        if self.categories {
            let categories = catalog.categories();
            if self.json {
                return print_json(&categories);
            }
            for category in categories {
                println!("{}", category);
            }
            return Ok(());
        }

        let query = self.search.as_deref().map(str::trim);
        let query = match query {
            Some(q) if q.chars().count() < MIN_QUERY_LEN => {
                log::info!("search '{}' is too short, ignoring", q);
                None
            }
            q => q,
        };
        let found: Vec<&TechnicalBulletin> = match (query, &self.category) {
            (Some(q), Some(category)) => catalog
                .search(q)
                .into_iter()
                .filter(|b| &b.category == category)
                .collect(),
            (Some(q), None) => catalog.search(q),
            (None, Some(category)) => catalog.by_category(category),
            (None, None) => catalog.all().iter().collect(),
        };

        if self.json {
            return print_json(&found);
        }
        if found.is_empty() {
            println!("No matching bulletins");
            return Ok(());
        }

        let rows = found
            .iter()
            .map(|b| BulletinRow {
                number: b.number.clone(),
                title: b.title.clone(),
                category: b.category.clone(),
                last_updated: b.last_updated.to_string(),
                url: b.url.clone(),
            })
            .collect::<Vec<_>>();
        print_table(rows);
        Ok(())
    }
}
