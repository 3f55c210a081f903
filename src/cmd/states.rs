//! States command - bundled states and their headline rates

use crate::cmd::{print_json, print_table};
use clap::Args;
use salestax::core::{format_rate, StateRegistry};
use serde::Serialize;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct StatesCommand {
    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled, Serialize)]
struct StateRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State Rate")]
    state_rate: String,
    #[tabled(rename = "Max Combined")]
    max_combined_rate: String,
    #[tabled(rename = "Jurisdictions")]
    jurisdictions: usize,
    #[tabled(rename = "ZIPs")]
    zip_codes: usize,
    #[tabled(rename = "Highlights")]
    highlights: String,
}

impl StatesCommand {
    pub fn exec(&self, states: &StateRegistry) -> anyhow::Result<()> {
        let rows: Vec<StateRow> = states
            .states()
            .map(|state| StateRow {
                code: state.code.clone(),
                name: state.name.clone(),
                state_rate: format_rate(state.state_rate),
                max_combined_rate: format_rate(state.max_combined_rate),
                jurisdictions: state.jurisdictions.all().len(),
                zip_codes: state.jurisdictions.zip_count(),
                highlights: state.highlights.join("\n"),
            })
            .collect();

        if self.json {
            print_json(&rows)
        } else {
            print_table(rows);
            Ok(())
        }
    }
}
