//! Schema command - print the state data file and CSV output formats

use crate::cmd::calendar::EventRecord;
use crate::cmd::rates::RateRow;
use crate::cmd::CsvColumn;
use clap::{Args, ValueEnum};
use salestax::core::StateConfig;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,

    /// CSV output to describe
    #[arg(long, value_enum, default_value = "rates")]
    table: CsvTable,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for a state data file (`--data`)
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CsvTable {
    /// `salestax rates --csv`
    Rates,
    /// `salestax calendar --csv`
    Calendar,
}

impl CsvTable {
    fn columns(&self) -> &'static [CsvColumn] {
        match self {
            CsvTable::Rates => RateRow::csv_columns(),
            CsvTable::Calendar => EventRecord::csv_columns(),
        }
    }
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(StateConfig);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => {
                let names: Vec<&str> = self.table.columns().iter().map(|c| c.name).collect();
                println!("{}", names.join(","));
            }
            SchemaFormat::CsvFields => {
                println!("CSV Output Format");
                println!("=================");
                println!();
                for column in self.table.columns() {
                    let req = if column.optional { "optional" } else { "always" };
                    println!("{:20} ({:8})  {}", column.name, req, column.description);
                }
                if matches!(self.table, CsvTable::Rates) {
                    println!();
                    println!("Rates are percentages, e.g. 8.875 means 8.875%");
                }
            }
        }
        Ok(())
    }
}
