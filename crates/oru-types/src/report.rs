//! Procedure report type.
//!
//! This module provides the `ProcedureReport` struct, the record built
//! while an OBR segment and its notes are parsed and handed to the
//! result repository when the report is complete.

use crate::{OrderId, ReportStatus};

/// A lab report for one ordered procedure.
///
/// A report belongs to exactly one order and one order-line sequence
/// number. Dates are kept in their normalized textual form
/// (`YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`) exactly as produced by the
/// date/time normalizer, including its zero sentinel for absent values.
///
/// # Examples
///
/// ```
/// use oru_types::{ProcedureReport, ReportStatus};
///
/// let report = ProcedureReport {
///     order_id: 4021,
///     order_sequence: 1,
///     date_collected: "2013-04-01 09:30:00".into(),
///     date_report: "2013-04-02".into(),
///     status: ReportStatus::Final,
///     notes: String::new(),
/// };
///
/// assert_eq!(report.status.as_str(), "final");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcedureReport {
    /// Order this report answers.
    pub order_id: OrderId,
    /// Sequence number of the matched order line.
    pub order_sequence: u32,
    /// When the specimen was collected (normalized date-time text).
    pub date_collected: String,
    /// When the report was produced (normalized date text, date portion
    /// only).
    pub date_report: String,
    /// Report status as mapped from the message.
    pub status: ReportStatus,
    /// Free-text notes accumulated from the report's note segments, one
    /// line per segment.
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_construction() {
        let report = ProcedureReport {
            order_id: 11,
            order_sequence: 2,
            date_collected: "0000-00-00 00:00:00".into(),
            date_report: "2013-04-02".into(),
            status: ReportStatus::Preliminary,
            notes: "specimen slightly hemolyzed\n".into(),
        };

        assert_eq!(report.order_sequence, 2);
        assert!(report.notes.ends_with('\n'));
    }
}
