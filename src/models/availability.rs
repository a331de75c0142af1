//! Month availability model.

use serde::{Deserialize, Serialize};

/// Server assertion that a day of the requested month is bookable or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthAvailabilityEntry {
    /// Day of month (1..=31)
    pub day: u32,
    pub available: bool,
}
