//! Data models for the pogoda application
//!
//! - Location: coordinates and resolved place names
//! - Parameter: requestable weather variables and selections of them
//! - Report: structured weather query results

pub mod location;
pub mod parameter;
pub mod report;

pub use location::{Coordinates, Location};
pub use parameter::{ParameterSelection, WeatherParameter};
pub use report::{Observation, ReportKind, WeatherReport};
