//! Calculate command - resolve a rule at a price in a jurisdiction

use crate::cmd::{print_json, select_state};
use anyhow::bail;
use clap::Args;
use salestax::core::{
    format_rate, format_usd, is_valid_zip, parse_price, resolve, Jurisdiction, RateCalculation,
    Resolution, State, StateRegistry, Treatment,
};
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CalculateCommand {
    /// Two-letter state code
    #[arg(short, long, default_value = "NY")]
    state: String,

    /// Taxability rule id (see `salestax rules`)
    #[arg(short, long)]
    rule: String,

    /// Purchase price, e.g. 109.99 or $1,250
    #[arg(short, long, default_value = "100")]
    price: String,

    /// Jurisdiction code, e.g. NY-NYC
    #[arg(short, long, conflicts_with = "zip")]
    jurisdiction: Option<String>,

    /// ZIP code to resolve the jurisdiction from
    #[arg(short, long)]
    zip: Option<String>,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct CalculateOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    zip: Option<&'a str>,
    /// False when the ZIP fell back to the state rate
    #[serde(skip_serializing_if = "Option::is_none")]
    exact: Option<bool>,
    #[serde(flatten)]
    resolution: Resolution<'a>,
}

#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "Component")]
    component: &'static str,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl CalculateCommand {
    pub fn exec(&self, states: &StateRegistry) -> anyhow::Result<()> {
        let state = select_state(states, &self.state)?;
        let Some(rule) = state.catalog.rule(&self.rule) else {
            bail!(
                "unknown rule '{}' for {}; run `salestax rules --state {}` to list rules",
                self.rule,
                state.code,
                state.code
            );
        };
        let (jurisdiction, exact) = self.jurisdiction(state)?;
        let price = parse_price(&self.price);

        let resolution = resolve(rule, price, jurisdiction);

        if self.json {
            return print_json(&CalculateOutput {
                zip: self.zip.as_deref().map(str::trim),
                exact,
                resolution,
            });
        }

        if let (Some(false), Some(zip)) = (exact, &self.zip) {
            println!("ZIP {} not found, using state rate", zip.trim());
        }
        println!();
        println!("{}", rule.description);
        println!("Status: {}", rule.status_label());
        if let Some(threshold) = rule.price_threshold() {
            println!("Threshold: {} per item", format_usd(threshold));
        }
        print_resolution(&resolution);
        Ok(())
    }

    /// The jurisdiction to charge, and for `--zip` whether the ZIP was listed
    fn jurisdiction<'a>(&self, state: &'a State) -> anyhow::Result<(&'a Jurisdiction, Option<bool>)> {
        if let Some(code) = &self.jurisdiction {
            let code = code.trim().to_uppercase();
            return match state.jurisdictions.by_code(&code) {
                Some(j) => Ok((j, None)),
                None => bail!(
                    "unknown jurisdiction '{}' for {}; run `salestax rates --state {}` to list codes",
                    code,
                    state.code,
                    state.code
                ),
            };
        }
        if let Some(zip) = &self.zip {
            if !is_valid_zip(zip.trim()) {
                bail!("invalid ZIP code '{}'", zip);
            }
            let found = state.jurisdictions.lookup_zip(zip);
            return Ok((found.jurisdiction(), Some(found.is_exact())));
        }
        Ok((state.jurisdictions.state(), None))
    }
}

/// Print the component breakdown and how the rule was applied
pub fn print_resolution(resolution: &Resolution<'_>) {
    let calc = &resolution.calculation;
    println!();
    println!("{} ({})", calc.jurisdiction.name, calc.jurisdiction.code);
    print_breakdown(calc);

    match resolution.treatment {
        Treatment::Standard | Treatment::AboveThreshold => {}
        Treatment::RuleExempt => println!("This item is exempt from sales tax."),
        Treatment::BelowThresholdExempt => {
            println!("Below the clothing threshold: exempt from state and local tax.")
        }
        Treatment::BelowThresholdLocalTaxed => println!(
            "Below the clothing threshold: exempt from state tax, but {} does not grant the local exemption.",
            calc.jurisdiction.name
        ),
    }
    println!("Treatment: {}", resolution.treatment.display());
}

/// Component table for a plain rate calculation
pub fn print_breakdown(calc: &RateCalculation<'_>) {
    let j = calc.jurisdiction;
    let mut rows = vec![ComponentRow {
        component: "State",
        rate: format_rate(j.state_rate),
        amount: format_usd(calc.state_amount),
    }];
    if !j.local_rate.is_zero() {
        rows.push(ComponentRow {
            component: "Local",
            rate: format_rate(j.local_rate),
            amount: format_usd(calc.local_amount),
        });
    }
    if !j.mctd_rate.is_zero() {
        rows.push(ComponentRow {
            component: "MCTD",
            rate: format_rate(j.mctd_rate),
            amount: format_usd(calc.mctd_amount),
        });
    }
    rows.push(ComponentRow {
        component: "Total tax",
        rate: format_rate(calc.effective_rate),
        amount: format_usd(calc.total_tax),
    });

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
    println!(
        "Subtotal {}  Total {}",
        format_usd(calc.subtotal),
        format_usd(calc.total_with_tax())
    );
}
