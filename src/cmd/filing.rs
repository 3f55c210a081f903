//! Filing command - return frequency, timely filing discount and SSUT

use crate::cmd::{print_json, print_table, select_state, yes_no};
use clap::Args;
use salestax::core::{
    format_rate, format_usd, parse_price, FilingRequirement, SsutProgram, State, StateRegistry,
};
use serde::Serialize;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct FilingCommand {
    /// Two-letter state code
    #[arg(short, long, default_value = "NY")]
    state: String,

    /// Annual taxable sales; picks the applicable filing frequency
    #[arg(long)]
    sales: Option<String>,

    /// Tax due on one return; computes the timely filing discount
    #[arg(long)]
    tax_due: Option<String>,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct RequirementRow {
    #[tabled(rename = "Frequency")]
    frequency: &'static str,
    #[tabled(rename = "Annual Sales")]
    band: String,
    #[tabled(rename = "Form")]
    form: String,
    #[tabled(rename = "Due Day")]
    due_day: u32,
    #[tabled(rename = "E-file")]
    electronic: String,
}

impl From<&FilingRequirement> for RequirementRow {
    fn from(r: &FilingRequirement) -> Self {
        let band = match r.threshold.max {
            Some(max) => format!("{} - {}", format_usd(r.threshold.min), format_usd(max)),
            None => format!("{}+", format_usd(r.threshold.min)),
        };
        RequirementRow {
            frequency: r.frequency.display(),
            band,
            form: r.form.clone(),
            due_day: r.due_day,
            electronic: yes_no(r.electronic_required),
        }
    }
}

#[derive(Serialize)]
struct FilingOutput<'a> {
    state: &'a str,
    requirement: Option<&'a FilingRequirement>,
    requirements: &'a [FilingRequirement],
    #[serde(skip_serializing_if = "Option::is_none")]
    discount: Option<rust_decimal::Decimal>,
    ssut: Option<&'a SsutProgram>,
}

impl FilingCommand {
    pub fn exec(&self, states: &StateRegistry) -> anyhow::Result<()> {
        let state = select_state(states, &self.state)?;
        let requirement = self
            .sales
            .as_deref()
            .and_then(|s| state.filing_requirement(parse_price(s)));
        let tax_due = self.tax_due.as_deref().map(parse_price);
        let discount = tax_due.and_then(|due| {
            state
                .filing_discount
                .as_ref()
                .map(|d| d.discount(due))
        });

        if self.json {
            return print_json(&FilingOutput {
                state: &state.code,
                requirement,
                requirements: &state.filing_requirements,
                discount,
                ssut: state.ssut.as_ref(),
            });
        }

        println!();
        println!("{} filing requirements", state.name);
        print_table(
            state
                .filing_requirements
                .iter()
                .map(RequirementRow::from)
                .collect::<Vec<_>>(),
        );

        if let Some(sales) = &self.sales {
            match requirement {
                Some(r) => println!(
                    "Annual sales of {}: file {} on {} by day {}. {}",
                    format_usd(parse_price(sales)),
                    r.frequency.display().to_lowercase(),
                    r.form,
                    r.due_day,
                    r.description
                ),
                None => println!("No filing band covers {}", format_usd(parse_price(sales))),
            }
        }

        if let Some(due) = tax_due {
            match (&state.filing_discount, discount) {
                (Some(d), Some(amount)) => {
                    println!(
                        "Timely filing discount on {}: {}",
                        format_usd(due),
                        format_usd(amount)
                    );
                    if let Some(notes) = &d.notes {
                        println!("  {}", notes);
                    }
                }
                _ => println!("{} does not offer a timely filing discount", state.code),
            }
        }

        print_ssut(state);
        Ok(())
    }
}

fn print_ssut(state: &State) {
    let Some(ssut) = &state.ssut else {
        return;
    };
    println!();
    println!(
        "Simplified Sellers Use Tax: flat {} (effective {}, {})",
        format_rate(ssut.rate),
        ssut.effective_date,
        ssut.legislative_reference
    );
    println!(
        "Seller discount {} of tax collected, up to {} per month",
        format_rate(ssut.discount_rate),
        format_usd(ssut.discount_max_monthly)
    );
    for item in &ssut.eligibility {
        println!("  - {}", item);
    }
}
