//! Lookup command - ZIP code to jurisdiction and rate

use crate::cmd::calculate::print_breakdown;
use crate::cmd::{print_json, select_state, DEFAULT_STATE};
use anyhow::bail;
use clap::Args;
use salestax::core::{
    calculate_tax, format_rate, is_valid_zip, parse_price, RateCalculation, StateRegistry, ZipMatch,
};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct LookupCommand {
    /// Five-digit ZIP or ZIP+4
    zip: String,

    /// State to search; without it the first state listing the ZIP is used,
    /// falling back to the New York state rate
    #[arg(short, long)]
    state: Option<String>,

    /// Purchase amount to calculate tax on
    #[arg(short, long, default_value = "100")]
    amount: String,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct LookupOutput<'a> {
    zip: &'a str,
    state: &'a str,
    exact: bool,
    calculation: RateCalculation<'a>,
}

impl LookupCommand {
    pub fn exec(&self, states: &StateRegistry) -> anyhow::Result<()> {
        let zip = self.zip.trim();
        if !is_valid_zip(zip) {
            bail!("invalid ZIP code '{}': expected 12345 or 12345-6789", zip);
        }

        let (state, found) = match &self.state {
            Some(code) => {
                let state = select_state(states, code)?;
                (state, state.jurisdictions.lookup_zip(zip))
            }
            None => {
                let exact = states.states().find_map(|state| {
                    match state.jurisdictions.lookup_zip(zip) {
                        found @ ZipMatch::Exact(_) => Some((state, found)),
                        ZipMatch::StateDefault(_) => None,
                    }
                });
                match exact {
                    Some(hit) => hit,
                    None => {
                        let state = select_state(states, DEFAULT_STATE)?;
                        (state, state.jurisdictions.lookup_zip(zip))
                    }
                }
            }
        };

        let calculation = calculate_tax(found.jurisdiction(), parse_price(&self.amount));

        if self.json {
            return print_json(&LookupOutput {
                zip,
                state: &state.code,
                exact: found.is_exact(),
                calculation,
            });
        }

        if !found.is_exact() {
            println!("ZIP {} not found, using state rate", zip);
        }
        let j = found.jurisdiction();
        println!();
        println!("{} ({}, {})", j.name, j.code, state.name);
        println!("Combined rate: {}", format_rate(j.combined_rate));
        if j.in_mctd {
            println!("Inside the Metropolitan Commuter Transportation District");
        }
        print_breakdown(&calculation);
        Ok(())
    }
}
