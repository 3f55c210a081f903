pub mod bulletins;
pub mod calculate;
pub mod calendar;
pub mod filing;
pub mod lookup;
pub mod nexus;
pub mod rates;
pub mod research;
pub mod rules;
pub mod schema;
pub mod states;
pub mod wizard;

use anyhow::Context;
use salestax::core::{State, StateRegistry};
use salestax::data;
use serde::Serialize;
use std::io;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

/// State used when none is named
pub const DEFAULT_STATE: &str = "NY";

/// Column description generated by `#[derive(CsvColumns)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvColumn {
    pub name: &'static str,
    pub optional: bool,
    pub description: &'static str,
}

/// Bundled states, plus an optional data file that overrides by state code
pub fn load_states(extra: Option<&Path>) -> anyhow::Result<StateRegistry> {
    let mut states = data::bundled_states().context("bundled state data is invalid")?;
    if let Some(path) = extra {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let state = State::from_json(&json)
            .with_context(|| format!("invalid state data in {}", path.display()))?;
        states.insert(state);
    }
    Ok(states)
}

pub fn select_state<'a>(states: &'a StateRegistry, code: &str) -> anyhow::Result<&'a State> {
    states.get(code).with_context(|| {
        format!(
            "unknown state '{}' (available: {})",
            code,
            states.codes().collect::<Vec<_>>().join(", ")
        )
    })
}

pub fn print_table<T: Tabled>(rows: Vec<T>) {
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn write_csv<T: Serialize>(rows: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}
