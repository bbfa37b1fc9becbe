use serde::{Deserialize, Serialize};

use worklog_core::{DomainError, DomainResult};

/// Records before this year are rejected outright.
pub const MIN_YEAR: i32 = 2000;

/// Composite month/year key of a monthly record (unique per principal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    month: u32,
    year: i32,
}

impl MonthKey {
    /// Validated constructor: month must be 1–12, year at least [`MIN_YEAR`].
    pub fn new(month: u32, year: i32) -> DomainResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::invalid_argument(format!(
                "month must be 1-12, got {month}"
            )));
        }
        if year < MIN_YEAR {
            return Err(DomainError::invalid_argument(format!(
                "year must be at least {MIN_YEAR}, got {year}"
            )));
        }
        Ok(Self { month, year })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

impl core::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
