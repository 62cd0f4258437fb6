//! Procedure result type.
//!
//! This module provides the `ProcedureResult` struct, the record built
//! for each observation segment and handed to the result repository when
//! the observation is complete.

use crate::{AbnormalFlag, DocumentId, ReportId, ReportStatus, ResultDataType};

/// A single observation within a lab report.
///
/// The report identifier is assigned lazily: it is only known once the
/// owning report has been flushed, and remains `None` for observations
/// that arrive without a preceding report segment.
///
/// The first line of `comments` is reserved for long free-text values,
/// so a freshly opened result starts its comment buffer with a single
/// line break; note segments append below it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcedureResult {
    /// Report this result belongs to, once one has been persisted.
    pub report_id: Option<ReportId>,
    /// Classification of the value carried by this result.
    pub data_type: ResultDataType,
    /// Observation code (OBX-3 component 0).
    pub result_code: String,
    /// Observation display text (OBX-3 component 1).
    pub result_text: String,
    /// The observation value; empty for embedded and long-text results.
    pub value: String,
    /// Stored document holding the decoded payload of an embedded
    /// result.
    pub document_id: Option<DocumentId>,
    /// When the observation was made (normalized date-time text).
    pub date: String,
    /// Performing facility.
    pub facility: String,
    /// Units of the value.
    pub units: String,
    /// Reference range for the value.
    pub range: String,
    /// Abnormal flag as mapped from the message.
    pub abnormal: AbnormalFlag,
    /// Status of this individual result.
    pub status: ReportStatus,
    /// Multi-line comment buffer; first line reserved for long-text
    /// values.
    pub comments: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_construction() {
        let result = ProcedureResult {
            report_id: Some(31),
            data_type: ResultDataType::Numeric,
            result_code: "718-7".into(),
            result_text: "Hemoglobin".into(),
            value: "13.4".into(),
            document_id: None,
            date: "2013-04-01 09:30:00".into(),
            facility: "Acme Lab".into(),
            units: "g/dL".into(),
            range: "12.0-16.0".into(),
            abnormal: AbnormalFlag::Normal,
            status: ReportStatus::Final,
            comments: "\n".into(),
        };

        assert_eq!(result.report_id, Some(31));
        assert_eq!(result.data_type.as_char(), 'N');
        assert!(result.document_id.is_none());
    }
}
