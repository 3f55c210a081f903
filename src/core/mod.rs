pub mod bulletins;
pub mod compliance;
pub mod engine;
pub mod jurisdiction;
pub mod money;
pub mod state;
pub mod taxability;
pub mod wizard;

// Flat public surface for domain types and functions.
pub use bulletins::{BulletinCatalog, TechnicalBulletin};
pub use compliance::{
    days_until, filing_requirement_for, generate_calendar, upcoming, CalendarRules,
    ComplianceEvent, EventKind, FilingDiscount, FilingRequirement, Frequency, NexusLogic,
    NexusStatus, NexusThreshold, NexusType, Priority, SalesBand, SsutProgram,
};
pub use engine::{calculate_tax, is_taxable, resolve, RateCalculation, Resolution, Treatment};
pub use jurisdiction::{Jurisdiction, JurisdictionLevel, JurisdictionRegistry, ZipMatch};
pub use money::{format_rate, format_usd, is_valid_zip, parse_price};
pub use state::{DataError, State, StateConfig, StateRegistry};
pub use taxability::{ExemptionType, TaxCategory, TaxabilityCatalog, TaxabilityRule};
pub use wizard::{Step, Wizard, WrongStep};
