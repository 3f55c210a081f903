//! Calendar command - compliance deadlines for a state and year

use crate::cmd::{print_json, print_table, select_state, write_csv, CsvColumn};
use chrono::{Datelike, Local, NaiveDate};
use clap::Args;
use salestax::core::{days_until, upcoming, ComplianceEvent, StateRegistry};
use salestax_derive::CsvColumns;
use serde::Serialize;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct CalendarCommand {
    /// Two-letter state code
    #[arg(short, long, default_value = "NY")]
    state: String,

    /// Calendar year (defaults to the current year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Only events due soon, counted from --today
    #[arg(short, long)]
    upcoming: bool,

    /// Window for --upcoming, in days
    #[arg(long, default_value_t = 90)]
    days: u64,

    /// Maximum events shown with --upcoming
    #[arg(long, default_value_t = 10)]
    limit: usize,

    /// Reference date (YYYY-MM-DD) instead of the local date
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

/// One calendar event as written to CSV
#[derive(Debug, Clone, Serialize, CsvColumns)]
pub struct EventRecord {
    /// Stable event id, e.g. monthly-filing-2025-3
    pub id: String,

    /// Due date (YYYY-MM-DD)
    pub due_date: NaiveDate,

    /// filing, payment, registration or rate_change
    #[serde(rename = "type")]
    pub kind: String,

    /// Event title
    pub title: String,

    /// Return or form number, when one applies
    pub form: Option<String>,

    /// HIGH, MEDIUM or LOW
    pub priority: String,

    /// Jurisdiction the event belongs to
    pub jurisdiction: String,

    /// What has to be done
    pub description: String,
}

impl From<&ComplianceEvent> for EventRecord {
    fn from(event: &ComplianceEvent) -> Self {
        EventRecord {
            id: event.id.clone(),
            due_date: event.due_date,
            kind: event.kind.display().to_string(),
            title: event.title.clone(),
            form: event.form.clone(),
            priority: event.priority.display().to_string(),
            jurisdiction: event.jurisdiction.clone(),
            description: event.description.clone(),
        }
    }
}

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Due")]
    due_date: String,
    #[tabled(rename = "In")]
    days: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Event")]
    title: String,
    #[tabled(rename = "Form")]
    form: String,
    #[tabled(rename = "Priority")]
    priority: &'static str,
}

impl CalendarCommand {
    pub fn exec(&self, states: &StateRegistry) -> anyhow::Result<()> {
        let state = select_state(states, &self.state)?;
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let year = self.year.unwrap_or_else(|| today.year());

        let events = state.calendar(year);
        log::debug!("{} events for {} {}", events.len(), state.code, year);

        let shown: Vec<&ComplianceEvent> = if self.upcoming {
            upcoming(&events, today, self.days, self.limit)
        } else {
            events.iter().collect()
        };

        if self.csv {
            let records: Vec<EventRecord> = shown.iter().copied().map(EventRecord::from).collect();
            return write_csv(&records);
        }
        if self.json {
            return print_json(&shown);
        }
        if shown.is_empty() {
            if self.upcoming {
                println!("No events due in the next {} days", self.days);
            } else {
                println!("No compliance events for {} in {}", state.code, year);
            }
            return Ok(());
        }

        println!();
        println!("{} compliance calendar {}", state.name, year);
        let rows = shown
            .iter()
            .map(|e| EventRow {
                due_date: e.due_date.format("%b %d, %Y").to_string(),
                days: describe_days(days_until(today, e.due_date)),
                kind: e.kind.display(),
                title: e.title.clone(),
                form: e.form.clone().unwrap_or_default(),
                priority: e.priority.display(),
            })
            .collect::<Vec<_>>();
        print_table(rows);
        Ok(())
    }
}

fn describe_days(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        d if d < 0 => format!("{} days ago", -d),
        d => format!("{} days", d),
    }
}
