use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

/// U.S. sales tax calculator, taxability reference and compliance calendar
#[derive(Parser, Debug)]
#[command(name = "salestax", version, about)]
struct Cli {
    /// Extra state data file (JSON); replaces a bundled state with the same code
    #[arg(long, global = true, value_name = "FILE")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List bundled states
    States(cmd::states::StatesCommand),
    /// List jurisdictions and their rate components
    Rates(cmd::rates::RatesCommand),
    /// Resolve a ZIP code to its jurisdiction
    Lookup(cmd::lookup::LookupCommand),
    /// Calculate tax for an item, price and jurisdiction
    Calculate(cmd::calculate::CalculateCommand),
    /// Browse and search taxability rules
    Rules(cmd::rules::RulesCommand),
    /// Compliance calendar for a year
    Calendar(cmd::calendar::CalendarCommand),
    /// Economic nexus test
    Nexus(cmd::nexus::NexusCommand),
    /// Filing frequency and timely filing discount
    Filing(cmd::filing::FilingCommand),
    /// Search technical bulletins
    Bulletins(cmd::bulletins::BulletinsCommand),
    /// Step through category, item, price and jurisdiction interactively
    Wizard(cmd::wizard::WizardCommand),
    /// Query the research backend
    Research(cmd::research::ResearchCommand),
    /// Print the state data format
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("warning: failed to read .env: {}", e);
        }
    }
    pretty_env_logger::init();

    let cli = Cli::parse();
    let data = cli.data.as_deref();

    match cli.command {
        Command::Research(command) => command.exec(),
        Command::Schema(command) => command.exec(),
        command => {
            let states = cmd::load_states(data)?;
            match command {
                Command::States(command) => command.exec(&states),
                Command::Rates(command) => command.exec(&states),
                Command::Lookup(command) => command.exec(&states),
                Command::Calculate(command) => command.exec(&states),
                Command::Rules(command) => command.exec(&states),
                Command::Calendar(command) => command.exec(&states),
                Command::Nexus(command) => command.exec(&states),
                Command::Filing(command) => command.exec(&states),
                Command::Bulletins(command) => command.exec(&states),
                Command::Wizard(command) => command.exec(&states),
                Command::Research(_) | Command::Schema(_) => Ok(()),
            }
        }
    }
}
