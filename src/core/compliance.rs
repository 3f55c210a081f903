use chrono::{Days, Month, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How often a vendor files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    pub fn display(&self) -> &'static str {
        match self {
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::Annual => "Annual",
        }
    }
}

/// Half-open sales band `[min, max)`; no `max` means unbounded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SalesBand {
    #[schemars(with = "String")]
    pub min: Decimal,
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub max: Option<Decimal>,
}

impl SalesBand {
    pub fn contains(&self, sales: Decimal) -> bool {
        sales >= self.min && self.max.map_or(true, |max| sales < max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FilingRequirement {
    pub id: String,
    pub frequency: Frequency,
    pub threshold: SalesBand,
    pub form: String,
    pub due_day: u32,
    pub electronic_required: bool,
    pub description: String,
}

/// First requirement whose band contains `annual_sales`
pub fn filing_requirement_for(
    requirements: &[FilingRequirement],
    annual_sales: Decimal,
) -> Option<&FilingRequirement> {
    requirements
        .iter()
        .find(|r| r.threshold.contains(annual_sales))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NexusType {
    Economic,
    Physical,
}

/// How the sales and transaction tests combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum NexusLogic {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NexusThreshold {
    #[serde(rename = "type")]
    pub kind: NexusType,
    #[schemars(with = "String")]
    pub sales_threshold: Decimal,
    /// Absent when the state only tests sales
    #[serde(default)]
    pub transaction_threshold: Option<u64>,
    pub logic: NexusLogic,
    pub lookback_period: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NexusStatus {
    pub sales_met: bool,
    pub transactions_met: bool,
    pub has_nexus: bool,
}

impl NexusThreshold {
    /// Both comparisons are strict: exactly hitting a threshold does not meet it.
    pub fn evaluate(&self, sales: Decimal, transactions: u64) -> NexusStatus {
        let sales_met = sales > self.sales_threshold;
        let (transactions_met, has_nexus) = match self.transaction_threshold {
            Some(threshold) => {
                let met = transactions > threshold;
                let has_nexus = match self.logic {
                    NexusLogic::And => sales_met && met,
                    NexusLogic::Or => sales_met || met,
                };
                (met, has_nexus)
            }
            None => (false, sales_met),
        };
        NexusStatus {
            sales_met,
            transactions_met,
            has_nexus,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Filing,
    Payment,
    Registration,
    RateChange,
}

impl EventKind {
    pub fn display(&self) -> &'static str {
        match self {
            EventKind::Filing => "filing",
            EventKind::Payment => "payment",
            EventKind::Registration => "registration",
            EventKind::RateChange => "rate_change",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn display(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        }
    }
}

/// A dated obligation produced by [`generate_calendar`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceEvent {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub due_date: NaiveDate,
    pub jurisdiction: String,
    pub form: Option<String>,
    pub description: String,
    pub priority: Priority,
}

/// Month and day relative to the calendar year being generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DueDate {
    pub month: u32,
    pub day: u32,
    /// Falls in the following year
    #[serde(default)]
    pub next_year: bool,
}

impl DueDate {
    /// Days past the end of the month clamp to its last day.
    pub fn resolve(&self, year: i32) -> Option<NaiveDate> {
        let year = if self.next_year {
            year.checked_add(1)?
        } else {
            year
        };
        (1..=self.day.min(31))
            .rev()
            .find_map(|day| NaiveDate::from_ymd_opt(year, self.month, day))
    }
}

/// One return per month, due on `due_day` of the following month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthlyRule {
    #[serde(default)]
    pub form: Option<String>,
    pub due_day: u32,
    pub priority: Priority,
    /// Placeholders: `{month}`, `{year}`
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuarterDue {
    pub label: String,
    pub period: String,
    pub due: DueDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuarterlyRule {
    #[serde(default)]
    pub form: Option<String>,
    pub priority: Priority,
    /// Placeholders: `{quarter}`, `{period}`, `{year}`
    pub title: String,
    pub description: String,
    pub quarters: Vec<QuarterDue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnnualRule {
    #[serde(default)]
    pub form: Option<String>,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub due: DueDate,
}

/// Fixed-date reminder: registration checks, tax holidays, rate changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReminderRule {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub title: String,
    pub description: String,
    pub due: DueDate,
    #[serde(default)]
    pub form: Option<String>,
    pub priority: Priority,
}

/// Per-state calendar generation rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CalendarRules {
    #[serde(default)]
    pub monthly: Option<MonthlyRule>,
    #[serde(default)]
    pub quarterly: Option<QuarterlyRule>,
    #[serde(default)]
    pub annual: Option<AnnualRule>,
    #[serde(default)]
    pub reminders: Vec<ReminderRule>,
    /// Emit quarterly events ahead of monthly ones; decides the order of
    /// events that share a due date
    #[serde(default)]
    pub quarterly_first: bool,
}

/// Build the compliance calendar for `year`, sorted by due date.
///
/// Deterministic: the same rules and year always give the same sequence.
pub fn generate_calendar(rules: &CalendarRules, jurisdiction: &str, year: i32) -> Vec<ComplianceEvent> {
    let mut events = Vec::new();
    let year_text = year.to_string();

    if rules.quarterly_first {
        push_quarterly(&mut events, rules, jurisdiction, year);
        push_monthly(&mut events, rules, jurisdiction, year);
    } else {
        push_monthly(&mut events, rules, jurisdiction, year);
        push_quarterly(&mut events, rules, jurisdiction, year);
    }

    if let Some(annual) = &rules.annual {
        let vars = [("year", year_text.as_str())];
        if let Some(due_date) = annual.due.resolve(year) {
            events.push(ComplianceEvent {
                id: format!("annual-filing-{}", year),
                title: fill(&annual.title, &vars),
                kind: EventKind::Filing,
                due_date,
                jurisdiction: jurisdiction.to_string(),
                form: annual.form.clone(),
                description: fill(&annual.description, &vars),
                priority: annual.priority,
            });
        }
    }

    for reminder in &rules.reminders {
        let vars = [("year", year_text.as_str())];
        if let Some(due_date) = reminder.due.resolve(year) {
            events.push(ComplianceEvent {
                id: format!("{}-{}", reminder.id, year),
                title: fill(&reminder.title, &vars),
                kind: reminder.kind,
                due_date,
                jurisdiction: jurisdiction.to_string(),
                form: reminder.form.clone(),
                description: fill(&reminder.description, &vars),
                priority: reminder.priority,
            });
        }
    }

    // stable: ties keep generation order
    events.sort_by_key(|e| e.due_date);
    events
}

fn push_monthly(events: &mut Vec<ComplianceEvent>, rules: &CalendarRules, jurisdiction: &str, year: i32) {
    let year_text = year.to_string();
    if let Some(monthly) = &rules.monthly {
        for (index, month) in (1..=12u32).enumerate() {
            let name = month_name(month);
            let due = DueDate {
                month: if month == 12 { 1 } else { month + 1 },
                day: monthly.due_day,
                next_year: month == 12,
            };
            let vars = [("month", name), ("year", year_text.as_str())];
            if let Some(due_date) = due.resolve(year) {
                events.push(ComplianceEvent {
                    id: format!("monthly-filing-{}-{}", year, index + 1),
                    title: fill(&monthly.title, &vars),
                    kind: EventKind::Filing,
                    due_date,
                    jurisdiction: jurisdiction.to_string(),
                    form: monthly.form.clone(),
                    description: fill(&monthly.description, &vars),
                    priority: monthly.priority,
                });
            }
        }
    }
}

fn push_quarterly(events: &mut Vec<ComplianceEvent>, rules: &CalendarRules, jurisdiction: &str, year: i32) {
    let year_text = year.to_string();
    if let Some(quarterly) = &rules.quarterly {
        for (index, quarter) in quarterly.quarters.iter().enumerate() {
            let vars = [
                ("quarter", quarter.label.as_str()),
                ("period", quarter.period.as_str()),
                ("year", year_text.as_str()),
            ];
            if let Some(due_date) = quarter.due.resolve(year) {
                events.push(ComplianceEvent {
                    id: format!("quarterly-filing-{}-{}", year, index + 1),
                    title: fill(&quarterly.title, &vars),
                    kind: EventKind::Filing,
                    due_date,
                    jurisdiction: jurisdiction.to_string(),
                    form: quarterly.form.clone(),
                    description: fill(&quarterly.description, &vars),
                    priority: quarterly.priority,
                });
            }
        }
    }
}

/// Events due within `window_days` of `today` (inclusive), at most `limit`
pub fn upcoming(
    events: &[ComplianceEvent],
    today: NaiveDate,
    window_days: u64,
    limit: usize,
) -> Vec<&ComplianceEvent> {
    let horizon = today
        .checked_add_days(Days::new(window_days))
        .unwrap_or(NaiveDate::MAX);
    events
        .iter()
        .filter(|e| e.due_date >= today && e.due_date <= horizon)
        .take(limit)
        .collect()
}

/// Negative when the date has passed
pub fn days_until(today: NaiveDate, due: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Tiered discount for returns filed and paid on time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FilingDiscount {
    #[schemars(with = "String")]
    pub first_tier_amount: Decimal,
    #[schemars(with = "String")]
    pub first_tier_rate: Decimal,
    #[schemars(with = "String")]
    pub second_tier_rate: Decimal,
    #[schemars(with = "String")]
    pub max_monthly: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

impl FilingDiscount {
    pub fn discount(&self, tax_due: Decimal) -> Decimal {
        if tax_due <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let first = tax_due.min(self.first_tier_amount) * self.first_tier_rate / dec!(100);
        let second = (tax_due - self.first_tier_amount).max(Decimal::ZERO) * self.second_tier_rate
            / dec!(100);
        (first + second).min(self.max_monthly)
    }
}

/// Flat-rate program for remote sellers covering state and local tax
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SsutProgram {
    #[schemars(with = "String")]
    pub rate: Decimal,
    /// Seller discount on tax collected and remitted on time
    #[schemars(with = "String")]
    pub discount_rate: Decimal,
    #[schemars(with = "String")]
    pub discount_max_monthly: Decimal,
    #[schemars(with = "String")]
    pub effective_date: NaiveDate,
    pub legislative_reference: String,
    #[serde(default)]
    pub eligibility: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

impl SsutProgram {
    pub fn calculate(&self, subtotal: Decimal) -> Decimal {
        subtotal * self.rate / dec!(100)
    }

    pub fn seller_discount(&self, tax_collected: Decimal) -> Decimal {
        (tax_collected.max(Decimal::ZERO) * self.discount_rate / dec!(100))
            .min(self.discount_max_monthly)
    }
}

fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("", |m| m.name())
}

fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |text, (key, value)| {
        text.replace(&format!("{{{}}}", key), value)
    })
}
