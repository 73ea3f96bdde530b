//! Error types for report aggregation.

use chrono::NaiveDate;
use thiserror::Error;

use bayou_core::CoreError;

/// Report building errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The location's tax schedule has no row covering a ticket's date.
    /// Settlement cannot run without a rate, so the report refuses
    /// rather than guessing one.
    #[error("No tax rate in effect on {0}")]
    NoRateForDate(NaiveDate),

    /// The report range is inverted.
    #[error("Report range is invalid: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Settlement failed for a ticket in the report set.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for Results with ReportError.
pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let err = ReportError::NoRateForDate(date);
        assert_eq!(err.to_string(), "No tax rate in effect on 2025-03-10");
    }
}
