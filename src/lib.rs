//! Sales tax resolution, taxability reference data and compliance calendars
//! for U.S. jurisdictions.

pub mod core;
pub mod data;
pub mod research;
