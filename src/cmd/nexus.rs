//! Nexus command - economic nexus test for a state

use crate::cmd::{print_json, select_state, yes_no};
use clap::Args;
use salestax::core::{format_usd, parse_price, NexusLogic, NexusStatus, StateRegistry};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct NexusCommand {
    /// Two-letter state code
    #[arg(short, long, default_value = "NY")]
    state: String,

    /// Gross receipts delivered into the state over the lookback period
    #[arg(long)]
    sales: String,

    /// Number of separate transactions over the lookback period
    #[arg(long, default_value_t = 0)]
    transactions: u64,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct NexusOutput<'a> {
    state: &'a str,
    sales: rust_decimal::Decimal,
    transactions: u64,
    #[serde(flatten)]
    status: NexusStatus,
    description: &'a str,
}

impl NexusCommand {
    pub fn exec(&self, states: &StateRegistry) -> anyhow::Result<()> {
        let state = select_state(states, &self.state)?;
        let nexus = &state.nexus;
        let sales = parse_price(&self.sales);
        let status = nexus.evaluate(sales, self.transactions);

        if self.json {
            return print_json(&NexusOutput {
                state: &state.code,
                sales,
                transactions: self.transactions,
                status,
                description: &nexus.description,
            });
        }

        println!();
        println!("{} economic nexus", state.name);
        println!("{}", nexus.description);
        println!("Lookback: {}", nexus.lookback_period);
        println!();
        println!(
            "Sales {} > {}: {}",
            format_usd(sales),
            format_usd(nexus.sales_threshold),
            yes_no(status.sales_met)
        );
        if let Some(limit) = nexus.transaction_threshold {
            let joiner = match nexus.logic {
                NexusLogic::And => "AND",
                NexusLogic::Or => "OR",
            };
            println!(
                "{} transactions {} > {}: {}",
                joiner,
                self.transactions,
                limit,
                yes_no(status.transactions_met)
            );
        }
        println!();
        if status.has_nexus {
            println!(
                "Economic nexus established: registration and collection required in {}.",
                state.code
            );
        } else {
            println!("No economic nexus in {}.", state.code);
        }
        Ok(())
    }
}
