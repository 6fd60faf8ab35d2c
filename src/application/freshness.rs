// Freshness gate for intraday artifacts
use chrono::{Days, NaiveDate};

use crate::domain::error::RenderError;
use crate::domain::table::Table;

/// Accepts a table only when its first row carries `today - lag_days`.
///
/// Plain calendar arithmetic: no trading calendar, no timezone, so a Monday
/// render expects Sunday's date with the default lag of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessGate {
    lag_days: u32,
}

impl Default for FreshnessGate {
    fn default() -> Self {
        Self { lag_days: 1 }
    }
}

impl FreshnessGate {
    pub fn new(lag_days: u32) -> Self {
        Self { lag_days }
    }

    pub fn expected_date(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.lag_days)))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn check(&self, table: &Table, date_column: &str, today: NaiveDate) -> Result<(), RenderError> {
        let expected = self.expected_date(today);
        let found = table.first_row_date(date_column)?;

        if found == Some(expected) {
            Ok(())
        } else {
            tracing::debug!(
                artifact = %table.source,
                ?found,
                %expected,
                "artifact failed freshness gate"
            );
            Err(RenderError::StaleData {
                artifact: table.source.clone(),
                found,
                expected,
            })
        }
    }
}
