//! Rates command - jurisdiction rate table for one state

use crate::cmd::{print_json, print_table, select_state, write_csv, yes_no, CsvColumn};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use salestax::core::{format_rate, Jurisdiction, JurisdictionLevel, StateRegistry};
use salestax_derive::CsvColumns;
use serde::Serialize;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct RatesCommand {
    /// Two-letter state code
    #[arg(short, long, default_value = "NY")]
    state: String,

    /// Only jurisdictions at this level
    #[arg(short, long, value_enum)]
    level: Option<LevelArg>,

    /// Only jurisdictions inside the MCTD
    #[arg(long)]
    mctd: bool,

    /// Only direct children of this jurisdiction code
    #[arg(short, long)]
    parent: Option<String>,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LevelArg {
    State,
    County,
    City,
    District,
}

impl From<LevelArg> for JurisdictionLevel {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::State => JurisdictionLevel::State,
            LevelArg::County => JurisdictionLevel::County,
            LevelArg::City => JurisdictionLevel::City,
            LevelArg::District => JurisdictionLevel::District,
        }
    }
}

/// Row for the rates table and CSV output
#[derive(Debug, Clone, Tabled, Serialize, CsvColumns)]
pub struct RateRow {
    /// Jurisdiction code, e.g. NY-NYC
    #[tabled(rename = "Code")]
    pub code: String,

    /// Jurisdiction name
    #[tabled(rename = "Name")]
    pub name: String,

    /// state, county, city or district
    #[tabled(rename = "Level")]
    pub level: String,

    /// State component (percent)
    #[tabled(rename = "State")]
    pub state_rate: String,

    /// Local component (percent)
    #[tabled(rename = "Local")]
    pub local_rate: String,

    /// MCTD surcharge (percent)
    #[tabled(rename = "MCTD")]
    pub mctd_rate: String,

    /// Sum of the three components (percent)
    #[tabled(rename = "Combined")]
    pub combined_rate: String,

    /// Whether the locality exempts its own tax on clothing under the threshold
    #[tabled(rename = "Clothing Exempt")]
    pub clothing_exemption: String,

    /// Number of ZIP codes mapped to the jurisdiction
    #[tabled(rename = "ZIPs")]
    pub zip_count: usize,
}

impl RateRow {
    fn from_jurisdiction(j: &Jurisdiction, csv: bool) -> Self {
        let rate = |r: Decimal| if csv { r.to_string() } else { format_rate(r) };
        RateRow {
            code: j.code.clone(),
            name: j.name.clone(),
            level: j.level.display().to_lowercase(),
            state_rate: rate(j.state_rate),
            local_rate: rate(j.local_rate),
            mctd_rate: rate(j.mctd_rate),
            combined_rate: rate(j.combined_rate),
            clothing_exemption: match j.clothing_exemption {
                Some(value) => yes_no(value),
                None => "-".to_string(),
            },
            zip_count: j.zip_codes.as_ref().map_or(0, Vec::len),
        }
    }
}

impl RatesCommand {
    pub fn exec(&self, states: &StateRegistry) -> anyhow::Result<()> {
        let state = select_state(states, &self.state)?;
        let level = self.level.map(JurisdictionLevel::from);

        let rows: Vec<RateRow> = state
            .jurisdictions
            .all()
            .iter()
            .filter(|j| level.map_or(true, |l| j.level == l))
            .filter(|j| !self.mctd || j.in_mctd)
            .filter(|j| {
                self.parent.as_deref().map_or(true, |p| {
                    j.parent_code
                        .as_deref()
                        .is_some_and(|c| c.eq_ignore_ascii_case(p))
                })
            })
            .map(|j| RateRow::from_jurisdiction(j, self.csv))
            .collect();

        if self.csv {
            write_csv(&rows)
        } else if self.json {
            print_json(&rows)
        } else if rows.is_empty() {
            println!("No jurisdictions found matching filters");
            Ok(())
        } else {
            println!();
            println!("{} SALES TAX RATES", state.name.to_uppercase());
            print_table(rows);
            for (class, rate) in &state.special_rates {
                println!("Reduced state rate for {}: {}", class, format_rate(*rate));
            }
            Ok(())
        }
    }
}
