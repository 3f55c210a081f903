//! Wizard command - interactive category, item, price and jurisdiction flow
//!
//! Reads one answer per line from stdin. At any prompt `b` goes back, `r`
//! starts over and `q` (or end of input) quits.

use crate::cmd::calculate::print_resolution;
use crate::cmd::select_state;
use clap::Args;
use salestax::core::wizard::QUICK_PRICES;
use salestax::core::{format_usd, Jurisdiction, State, StateRegistry, Step, Wizard};
use std::io::{self, BufRead, Write};

#[derive(Args, Debug)]
pub struct WizardCommand {
    /// Two-letter state code
    #[arg(short, long, default_value = "NY")]
    state: String,
}

enum Input {
    Back,
    Restart,
    Quit,
    Answer(String),
}

impl WizardCommand {
    pub fn exec(&self, states: &StateRegistry) -> anyhow::Result<()> {
        let state = select_state(states, &self.state)?;
        let stdin = io::stdin();
        run(state, &mut stdin.lock())
    }
}

fn run(state: &State, input: &mut impl BufRead) -> anyhow::Result<()> {
    let jurisdictions: Vec<&Jurisdiction> = state.jurisdictions.all().iter().collect();
    let mut wizard = Wizard::new();

    println!("{} taxability wizard (b = back, r = restart, q = quit)", state.name);
    loop {
        println!();
        println!("Step {} of {}", wizard.step_number(), wizard.total_steps());
        match wizard.step() {
            Step::Category => {
                for (i, category) in state.catalog.categories().iter().enumerate() {
                    println!("  {}. {}", i + 1, category.name);
                }
            }
            Step::Item => {
                if let Some(category) = wizard.category() {
                    for (i, rule) in category.rules.iter().enumerate() {
                        println!("  {}. {} [{}]", i + 1, rule.description, rule.status_label());
                    }
                }
            }
            Step::Price => {
                let quick: Vec<String> = QUICK_PRICES.iter().map(|p| format_usd(*p)).collect();
                println!(
                    "Price per item (default {}, e.g. {})",
                    format_usd(wizard.price()),
                    quick.join(", ")
                );
            }
            Step::Jurisdiction => {
                for (i, j) in jurisdictions.iter().enumerate() {
                    println!("  {}. {} ({})", i + 1, j.name, j.code);
                }
            }
            Step::Result => {
                if let Some(resolution) = wizard.resolution() {
                    print_resolution(&resolution);
                }
                println!("Press enter to start over, q to quit");
            }
        }

        let answer = match prompt(input)? {
            Input::Quit => return Ok(()),
            Input::Back => {
                wizard.back();
                continue;
            }
            Input::Restart => {
                wizard.reset();
                continue;
            }
            Input::Answer(answer) => answer,
        };

        let result = match wizard.step() {
            Step::Category => match pick(&answer, state.catalog.categories()) {
                Some(category) => wizard.select_category(category),
                None => {
                    println!("Enter a number from the list");
                    continue;
                }
            },
            Step::Item => match wizard.category().and_then(|c| pick(&answer, &c.rules)) {
                Some(rule) => wizard.select_item(rule),
                None => {
                    println!("Enter a number from the list");
                    continue;
                }
            },
            Step::Price => {
                let entered = if answer.is_empty() {
                    wizard.price().to_string()
                } else {
                    answer
                };
                wizard.submit_price(&entered)
            }
            Step::Jurisdiction => match pick(&answer, &jurisdictions) {
                Some(j) => wizard.select_jurisdiction(*j),
                None => {
                    println!("Enter a number from the list");
                    continue;
                }
            },
            Step::Result => {
                wizard.reset();
                Ok(())
            }
        };
        if let Err(e) = result {
            log::warn!("{}", e);
        }
    }
}

fn prompt(input: &mut impl BufRead) -> io::Result<Input> {
    print!("> ");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Input::Quit);
    }
    Ok(match line.trim() {
        "b" | "B" => Input::Back,
        "r" | "R" => Input::Restart,
        "q" | "Q" => Input::Quit,
        other => Input::Answer(other.to_string()),
    })
}

/// 1-based menu choice
fn pick<'a, T>(answer: &str, items: &'a [T]) -> Option<&'a T> {
    let index: usize = answer.parse().ok()?;
    items.get(index.checked_sub(1)?)
}
