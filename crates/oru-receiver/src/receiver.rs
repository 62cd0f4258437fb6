//! The message state machine.
//!
//! Walks a tokenized message segment by segment, dispatching on the
//! segment type together with the current context (a note segment is
//! legal in three places with three different effects). Report and
//! result rows are buffered while their segments accumulate and handed
//! to the repository the moment a new report, result, or patient
//! begins, or at end of message.

use chrono::Local;

use oru_types::{
    AbnormalFlag, CategoryId, DocumentId, EncounterId, OrderId, ProcedureOrder, ProcedureReport,
    ProcedureResult, ReportId, ReportStatus, ResultDataType,
};

use crate::datetime::{normalize_date, normalize_datetime};
use crate::escape::unescape;
use crate::matcher::OrderLineMatcher;
use crate::payload::{decode_payload, media_type};
use crate::repository::{CategoryLookup, DocumentStore, OrderRepository, ResultRepository};
use crate::segment::{tokenize, Delimiters, Segment};
use crate::types::{ReceiveError, ReceiveResult, ReceiveStats, ReceiverConfig};

/// Line separator for accumulated note and comment text.
const COMMENT_DELIMITER: char = '\n';

/// Values longer than this are stored as long free text in the comment
/// buffer rather than in the value column.
const LONG_TEXT_LIMIT: usize = 200;

/// What kind of segment came most recently, for segment types that are
/// legal in more than one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    None,
    Header,
    Patient,
    OrderRequest,
    ReportRequest,
    Result,
}

/// Parses one result message and persists its reports and results.
///
/// The referenced orders must already exist; electronic results for
/// manual (unrecorded) orders are rejected with
/// [`ReceiveError::OrderNotFound`]. Any error aborts the remaining
/// segments, but rows flushed earlier in the same message stay
/// persisted; no transaction wraps the whole message.
///
/// # Example
///
/// ```
/// use oru_receiver::{receive_oru_message, InMemoryRepository, ReceiverConfig};
/// use oru_types::ProcedureOrder;
///
/// let mut repo = InMemoryRepository::new();
/// repo.add_category("Lab Report");
/// repo.add_order(ProcedureOrder { id: 4021, patient_id: 7, encounter_id: None });
/// repo.add_line_item(4021, "CBC", "Complete Blood Count");
///
/// let message = "MSH|^~\\&|LAB|ACME||CLINIC|201304010900||ORU^R01|MSG0001|P|2.3\r\
///     PID|1||12345|123-45-6789|DOE^JANE||19800101\r\
///     ORC|RE|4021\r\
///     OBR|1|4021||CBC^Complete Blood Count|||201304010930|||||||||||||||20130402|||F\r\
///     OBX|1|NM|718-7^Hemoglobin||13.4|g/dL|12.0-16.0||||F|||201304010930";
///
/// let stats = receive_oru_message(message, &mut repo, &ReceiverConfig::default()).unwrap();
/// assert_eq!(stats.reports, 1);
/// assert_eq!(stats.results, 1);
/// ```
pub fn receive_oru_message<R>(
    message: &str,
    repository: &mut R,
    config: &ReceiverConfig,
) -> ReceiveResult<ReceiveStats>
where
    R: CategoryLookup + OrderRepository + ResultRepository + DocumentStore,
{
    let delimiters = Delimiters::resolve(message)?;

    // Embedded documents need the category id, and a missing category is
    // a configuration problem; check it before touching any segment.
    let category_id = repository.category_id(&config.category_name).ok_or_else(|| {
        ReceiveError::CategoryNotConfigured {
            name: config.category_name.clone(),
        }
    })?;

    let mut receiver = MessageReceiver::new(repository, category_id);
    for segment in tokenize(message, &delimiters) {
        receiver.dispatch(&segment)?;
    }
    Ok(receiver.finish())
}

struct MessageReceiver<'a, R> {
    repository: &'a mut R,
    category_id: CategoryId,
    context: Context,
    encounter: Option<EncounterId>,
    order_id: OrderId,
    /// Order fetched once per order-control group.
    order: Option<ProcedureOrder>,
    matcher: OrderLineMatcher,
    report: Option<ProcedureReport>,
    /// Identifier of the flushed report, assigned when the first
    /// observation forces the flush.
    report_id: Option<ReportId>,
    /// Report date of the most recently opened report, for embedded
    /// file segments that arrive after the report buffer is gone.
    last_report_date: String,
    result: Option<ProcedureResult>,
    stats: ReceiveStats,
}

impl<'a, R> MessageReceiver<'a, R>
where
    R: CategoryLookup + OrderRepository + ResultRepository + DocumentStore,
{
    fn new(repository: &'a mut R, category_id: CategoryId) -> Self {
        Self {
            repository,
            category_id,
            context: Context::None,
            encounter: None,
            order_id: 0,
            order: None,
            matcher: OrderLineMatcher::new(),
            report: None,
            report_id: None,
            last_report_date: String::new(),
            result: None,
            stats: ReceiveStats::default(),
        }
    }

    fn dispatch(&mut self, segment: &Segment<'_>) -> ReceiveResult<()> {
        match segment.kind() {
            "MSH" => self.handle_header(segment),
            "PID" => self.handle_patient(segment),
            "PV1" => self.handle_visit(segment),
            "ORC" => self.handle_order_control(segment),
            "OBR" => self.handle_report_request(segment),
            "OBX" => self.handle_observation(segment),
            "ZEF" => self.handle_embedded_file(segment),
            "NTE" => self.handle_note(segment),
            other => Err(ReceiveError::UnknownSegment {
                name: other.to_string(),
            }),
        }
    }

    /// Final flush at end of message.
    fn finish(mut self) -> ReceiveStats {
        self.flush_result();
        // Does something only if there was a report with no results.
        self.flush_report();
        self.stats
    }

    fn handle_header(&mut self, segment: &Segment<'_>) -> ReceiveResult<()> {
        self.context = Context::Header;
        let message_type = segment.field(8);
        if message_type != "ORU^R01" {
            return Err(ReceiveError::UnsupportedMessageType {
                received: message_type.to_string(),
            });
        }
        self.stats.message_id = segment.field(9).to_string();
        Ok(())
    }

    fn handle_patient(&mut self, segment: &Segment<'_>) -> ReceiveResult<()> {
        self.context = Context::Patient;
        self.flush_result();
        // Does something only if there was a report with no results.
        self.flush_report();
        self.stats.patient.ssn = segment.field(4).to_string();
        self.stats.patient.date_of_birth = segment.field(7).to_string();
        self.stats.patient.last_name = segment.component(5, 0).to_string();
        self.stats.patient.first_name = segment.component(5, 1).to_string();
        Ok(())
    }

    /// Records the placer encounter number if present. Does not change
    /// context.
    fn handle_visit(&mut self, segment: &Segment<'_>) -> ReceiveResult<()> {
        if !segment.field(19).is_empty() {
            self.encounter = match segment.component(19, 0).parse::<EncounterId>() {
                Ok(value) if value != 0 => Some(value),
                _ => None,
            };
        }
        Ok(())
    }

    fn handle_order_control(&mut self, segment: &Segment<'_>) -> ReceiveResult<()> {
        self.context = Context::OrderRequest;
        self.flush_result();
        // Does something only if there was a report with no results.
        self.flush_report();
        self.order = None;
        self.matcher.reset();
        if !segment.field(2).is_empty() {
            self.order_id = int_field(segment.field(2));
        }
        Ok(())
    }

    fn handle_report_request(&mut self, segment: &Segment<'_>) -> ReceiveResult<()> {
        self.context = Context::ReportRequest;
        self.flush_result();
        // Does something only if there was a report with no results.
        self.flush_report();
        self.report_id = None;
        if !segment.field(2).is_empty() {
            self.order_id = int_field(segment.field(2));
        }
        let procedure_code = segment.component(4, 0).to_string();
        let procedure_name = segment.component(4, 1).to_string();
        let status = report_status(segment.field(25));

        if self.order.is_none() {
            let order = self
                .repository
                .fetch_order(self.order_id)
                .ok_or(ReceiveError::OrderNotFound {
                    order_id: self.order_id,
                })?;
            if let Some(message_encounter) = self.encounter {
                if order.encounter_id != Some(message_encounter) {
                    return Err(ReceiveError::EncounterMismatch {
                        order_id: self.order_id,
                        order_encounter: order.encounter_id.unwrap_or(0),
                        message_encounter,
                    });
                }
            }
            self.matcher.reset();
            self.order = Some(order);
        }

        let line = self.matcher.select(
            self.repository,
            self.order_id,
            &procedure_code,
            &procedure_name,
        );

        self.last_report_date = normalize_date(segment.field(22));
        self.report = Some(ProcedureReport {
            order_id: self.order_id,
            order_sequence: line.sequence,
            date_collected: normalize_datetime(segment.field(7)),
            date_report: self.last_report_date.clone(),
            status,
            notes: String::new(),
        });
        Ok(())
    }

    fn handle_observation(&mut self, segment: &Segment<'_>) -> ReceiveResult<()> {
        self.context = Context::Result;
        self.flush_result();
        if self.report_id.is_none() {
            self.report_id = self.flush_report();
        }

        let value_type = segment.field(2);
        let raw_value = segment.field(5);
        let mut result = self.open_result(data_type_of(value_type));
        result.result_code = unescape(segment.component(3, 0));
        result.result_text = unescape(segment.component(3, 1));
        result.date = normalize_datetime(segment.field(14));
        result.facility = unescape(segment.field(15));
        result.units = unescape(segment.field(6));
        result.range = unescape(segment.field(7));
        result.abnormal = abnormal_flag(segment.field(8));
        result.status = report_status(segment.field(11));

        if value_type == "ED" {
            // Results as an embedded document: store a patient document
            // in the configured category.
            let parts = segment.components(5);
            let extension = parts.first().copied().unwrap_or("").to_lowercase();
            let encoding = parts.get(3).copied().unwrap_or("");
            let data = parts.get(4).copied().unwrap_or("");
            let bytes = decode_payload(encoding, data)?;
            result.document_id = Some(self.store_document(&extension, bytes)?);
        } else if raw_value.len() > LONG_TEXT_LIMIT {
            // The value can be a very long run of text; the first line
            // of comments is reserved for such things.
            result.data_type = ResultDataType::LongText;
            result.comments = unescape(raw_value);
            result.comments.push(COMMENT_DELIMITER);
        } else {
            result.value = unescape(raw_value);
        }

        self.result = Some(result);
        Ok(())
    }

    /// An embedded-file segment is treated like an observation carrying
    /// a Base64 PDF document.
    fn handle_embedded_file(&mut self, segment: &Segment<'_>) -> ReceiveResult<()> {
        self.context = Context::Result;
        self.flush_result();
        if self.report_id.is_none() {
            self.report_id = self.flush_report();
        }

        let bytes = decode_payload("Base64", segment.field(2))?;
        let mut result = self.open_result(ResultDataType::Embedded);
        result.document_id = Some(self.store_document("pdf", bytes)?);
        result.date = self.last_report_date.clone();
        self.result = Some(result);
        Ok(())
    }

    fn handle_note(&mut self, segment: &Segment<'_>) -> ReceiveResult<()> {
        match self.context {
            // Order-level notes are not recorded anywhere yet.
            Context::OrderRequest => Ok(()),
            Context::ReportRequest => {
                if let Some(report) = self.report.as_mut() {
                    report.notes.push_str(&unescape(segment.field(3)));
                    report.notes.push(COMMENT_DELIMITER);
                }
                Ok(())
            }
            Context::Result => {
                if let Some(result) = self.result.as_mut() {
                    result.comments.push_str(&unescape(segment.field(3)));
                    result.comments.push(COMMENT_DELIMITER);
                }
                Ok(())
            }
            _ => Err(ReceiveError::UnknownSegment {
                name: segment.kind().to_string(),
            }),
        }
    }

    /// A fresh result buffer bound to the current report. The comment
    /// buffer starts with its reserved first line.
    fn open_result(&self, data_type: ResultDataType) -> ProcedureResult {
        ProcedureResult {
            report_id: self.report_id,
            data_type,
            result_code: String::new(),
            result_text: String::new(),
            value: String::new(),
            document_id: None,
            date: String::new(),
            facility: String::new(),
            units: String::new(),
            range: String::new(),
            abnormal: AbnormalFlag::Normal,
            status: ReportStatus::Other(String::new()),
            comments: COMMENT_DELIMITER.to_string(),
        }
    }

    /// Hands the open result to the repository, if any, and clears the
    /// buffer. Flushing an already-empty buffer is a no-op.
    fn flush_result(&mut self) {
        if let Some(result) = self.result.take() {
            self.repository.insert_result(&result);
            self.stats.results += 1;
        }
    }

    /// Hands the open report to the repository, if any, and clears the
    /// buffer, returning the generated report id.
    fn flush_report(&mut self) -> Option<ReportId> {
        let report = self.report.take()?;
        let id = self.repository.insert_report(&report);
        self.stats.reports += 1;
        Some(id)
    }

    fn store_document(&mut self, extension: &str, bytes: Vec<u8>) -> ReceiveResult<DocumentId> {
        let filename = format!("{}.{}", Local::now().format("%Y%m%d_%H%M%S"), extension);
        let patient_id = self
            .order
            .as_ref()
            .map(|order| order.patient_id)
            .unwrap_or_default();
        let id = self
            .repository
            .create_document(
                patient_id,
                self.category_id,
                &filename,
                media_type(extension),
                bytes,
            )
            .map_err(|reason| ReceiveError::DocumentStore { filename, reason })?;
        self.stats.documents += 1;
        Ok(id)
    }
}

/// Maps a declared value type to its data-type classification. Types
/// outside the known vocabulary are carried as short text.
fn data_type_of(value_type: &str) -> ResultDataType {
    value_type
        .chars()
        .next()
        .and_then(ResultDataType::from_code)
        .unwrap_or(ResultDataType::Text)
}

fn abnormal_flag(code: &str) -> AbnormalFlag {
    AbnormalFlag::from_code(code).unwrap_or_else(|| AbnormalFlag::Other(unescape(code)))
}

fn report_status(code: &str) -> ReportStatus {
    ReportStatus::from_code(code).unwrap_or_else(|| ReportStatus::Other(unescape(code)))
}

fn int_field(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;
    use base64::{engine::general_purpose, Engine as _};

    const HEADER: &str = "MSH|^~\\&|LAB|ACME||CLINIC|201304010900||ORU^R01|MSG0001|P|2.3";

    fn repo() -> InMemoryRepository {
        let mut repo = InMemoryRepository::new();
        repo.add_category("Lab Report");
        repo.add_order(ProcedureOrder {
            id: 4021,
            patient_id: 7,
            encounter_id: Some(55),
        });
        repo.add_line_item(4021, "CBC", "Complete Blood Count");
        repo
    }

    fn receive(repo: &mut InMemoryRepository, segments: &[&str]) -> ReceiveResult<ReceiveStats> {
        receive_oru_message(&segments.join("\r"), repo, &ReceiverConfig::default())
    }

    fn obr(code: &str, name: &str) -> String {
        let mut fields = vec![String::new(); 26];
        fields[0] = "OBR".into();
        fields[1] = "1".into();
        fields[2] = "4021".into();
        fields[4] = format!("{code}^{name}");
        fields[7] = "201304010930".into();
        fields[22] = "20130402".into();
        fields[25] = "F".into();
        fields.join("|")
    }

    fn obx(value_type: &str, value: &str) -> String {
        let mut fields = vec![String::new(); 16];
        fields[0] = "OBX".into();
        fields[1] = "1".into();
        fields[2] = value_type.into();
        fields[3] = "718-7^Hemoglobin".into();
        fields[5] = value.into();
        fields[6] = "g/dL".into();
        fields[7] = "12.0-16.0".into();
        fields[8] = "H".into();
        fields[11] = "F".into();
        fields[14] = "201304010930".into();
        fields[15] = "Acme Lab".into();
        fields.join("|")
    }

    #[test]
    fn test_minimal_message_persists_one_report_and_result() {
        let mut repo = repo();
        let stats = receive(
            &mut repo,
            &[
                HEADER,
                "PID|1||12345|123-45-6789|DOE^JANE||19800101",
                "ORC|RE|4021",
                &obr("CBC", "Complete Blood Count"),
                &obx("NM", "13.4"),
            ],
        )
        .unwrap();

        assert_eq!(stats.message_id, "MSG0001");
        assert_eq!(stats.patient.last_name, "DOE");
        assert_eq!(stats.patient.first_name, "JANE");
        assert_eq!(stats.reports, 1);
        assert_eq!(stats.results, 1);

        let (report_id, report) = &repo.reports()[0];
        assert_eq!(report.order_id, 4021);
        assert_eq!(report.order_sequence, 1);
        assert_eq!(report.date_collected, "2013-04-01 09:30:00");
        assert_eq!(report.date_report, "2013-04-02");
        assert_eq!(report.status, ReportStatus::Final);

        let result = &repo.results()[0];
        assert_eq!(result.report_id, Some(*report_id));
        assert_eq!(result.data_type, ResultDataType::Numeric);
        assert_eq!(result.result_code, "718-7");
        assert_eq!(result.result_text, "Hemoglobin");
        assert_eq!(result.value, "13.4");
        assert_eq!(result.units, "g/dL");
        assert_eq!(result.range, "12.0-16.0");
        assert_eq!(result.abnormal, AbnormalFlag::High);
        assert_eq!(result.status, ReportStatus::Final);
        assert_eq!(result.facility, "Acme Lab");
        assert_eq!(result.comments, "\n");
    }

    #[test]
    fn test_wrong_message_type_is_rejected() {
        let mut repo = repo();
        let err = receive(
            &mut repo,
            &["MSH|^~\\&|LAB|ACME||CLINIC|201304010900||ADT^A01|MSG0001|P|2.3"],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ReceiveError::UnsupportedMessageType {
                received: "ADT^A01".into()
            }
        );
    }

    #[test]
    fn test_unknown_order_is_rejected() {
        let mut repo = repo();
        let err = receive(
            &mut repo,
            &[HEADER, "ORC|RE|9999", &obr("CBC", "Complete Blood Count")],
        )
        .unwrap_err();
        assert_eq!(err, ReceiveError::OrderNotFound { order_id: 9999 });
        assert!(repo.reports().is_empty());
    }

    #[test]
    fn test_encounter_mismatch_is_rejected() {
        let mut repo = repo();
        let visit = format!("PV1{}99", "|".repeat(19));
        let err = receive(
            &mut repo,
            &[HEADER, &visit, "ORC|RE|4021", &obr("CBC", "CBC")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ReceiveError::EncounterMismatch {
                order_id: 4021,
                order_encounter: 55,
                message_encounter: 99,
            }
        );
    }

    #[test]
    fn test_matching_encounter_is_accepted() {
        let mut repo = repo();
        let visit = format!("PV1{}55", "|".repeat(19));
        let stats = receive(
            &mut repo,
            &[HEADER, &visit, "ORC|RE|4021", &obr("CBC", "CBC")],
        )
        .unwrap();
        assert_eq!(stats.reports, 1);
    }

    #[test]
    fn test_misplaced_segment_aborts_without_flushing() {
        let mut repo = repo();
        let err = receive(
            &mut repo,
            &[
                HEADER,
                "ORC|RE|4021",
                &obr("CBC", "CBC"),
                "QRD|some|query",
                &obx("NM", "13.4"),
            ],
        )
        .unwrap_err();
        assert_eq!(err, ReceiveError::UnknownSegment { name: "QRD".into() });
        // The open report was never flushed and the trailing result was
        // never reached.
        assert!(repo.reports().is_empty());
        assert!(repo.results().is_empty());
    }

    #[test]
    fn test_note_outside_any_note_context_is_misplaced() {
        let mut repo = repo();
        let err = receive(
            &mut repo,
            &[HEADER, "PID|1||12345", "NTE|1||out of place"],
        )
        .unwrap_err();
        assert_eq!(err, ReceiveError::UnknownSegment { name: "NTE".into() });
    }

    #[test]
    fn test_report_without_results_is_still_recorded() {
        let mut repo = repo();
        let stats = receive(&mut repo, &[HEADER, "ORC|RE|4021", &obr("CBC", "CBC")]).unwrap();
        assert_eq!(stats.reports, 1);
        assert_eq!(stats.results, 0);
        assert_eq!(repo.reports().len(), 1);
    }

    #[test]
    fn test_notes_accumulate_on_report_and_result() {
        let mut repo = repo();
        receive(
            &mut repo,
            &[
                HEADER,
                "ORC|RE|4021",
                "NTE|1||order level note",
                &obr("CBC", "CBC"),
                "NTE|1||specimen hemolyzed",
                "NTE|2||recollection advised",
                &obx("NM", "13.4"),
                "NTE|1||verified manually",
            ],
        )
        .unwrap();

        let (_, report) = &repo.reports()[0];
        assert_eq!(report.notes, "specimen hemolyzed\nrecollection advised\n");

        let result = &repo.results()[0];
        assert_eq!(result.comments, "\nverified manually\n");
    }

    #[test]
    fn test_long_value_moves_to_comment_buffer() {
        let mut repo = repo();
        let long_value = "x".repeat(201);
        receive(
            &mut repo,
            &[
                HEADER,
                "ORC|RE|4021",
                &obr("CBC", "CBC"),
                &obx("TX", &long_value),
            ],
        )
        .unwrap();

        let result = &repo.results()[0];
        assert_eq!(result.data_type, ResultDataType::LongText);
        assert_eq!(result.value, "");
        assert_eq!(result.comments, format!("{long_value}\n"));
    }

    #[test]
    fn test_value_of_exactly_two_hundred_characters_stays_inline() {
        let mut repo = repo();
        let value = "x".repeat(200);
        receive(
            &mut repo,
            &[HEADER, "ORC|RE|4021", &obr("CBC", "CBC"), &obx("ST", &value)],
        )
        .unwrap();

        let result = &repo.results()[0];
        assert_eq!(result.data_type, ResultDataType::Text);
        assert_eq!(result.value, value);
        assert_eq!(result.comments, "\n");
    }

    #[test]
    fn test_repeated_code_reports_walk_the_order_lines() {
        let mut repo = repo();
        repo.add_line_item(4021, "GLU", "Glucose");
        repo.add_line_item(4021, "GLU", "Glucose repeat");

        receive(
            &mut repo,
            &[
                HEADER,
                "ORC|RE|4021",
                &obr("GLU", "Glucose"),
                &obr("GLU", "Glucose"),
                &obr("GLU", "Glucose"),
            ],
        )
        .unwrap();

        let sequences: Vec<u32> = repo
            .reports()
            .iter()
            .map(|(_, report)| report.order_sequence)
            .collect();
        assert_eq!(sequences, vec![2, 3, 2]);
    }

    #[test]
    fn test_unordered_code_creates_ad_hoc_line() {
        let mut repo = repo();
        receive(
            &mut repo,
            &[HEADER, "ORC|RE|4021", &obr("HBA1C", "Hemoglobin A1c")],
        )
        .unwrap();

        let line = repo.line_items(4021).last().unwrap();
        assert!(line.is_ad_hoc());
        assert_eq!(line.procedure_code, "HBA1C");
        assert_eq!(repo.reports()[0].1.order_sequence, line.sequence);
    }

    #[test]
    fn test_embedded_document_is_stored() {
        let mut repo = repo();
        let payload = general_purpose::STANDARD.encode(b"%PDF-1.4 report");
        let value = format!("pdf^^^Base64^{payload}");
        receive(
            &mut repo,
            &[HEADER, "ORC|RE|4021", &obr("CBC", "CBC"), &obx("ED", &value)],
        )
        .unwrap();

        let result = &repo.results()[0];
        assert_eq!(result.data_type, ResultDataType::Embedded);
        assert_eq!(result.value, "");

        let document = &repo.documents()[0];
        assert_eq!(result.document_id, Some(document.id));
        assert_eq!(document.patient_id, 7);
        assert_eq!(document.media_type, "application/pdf");
        assert_eq!(document.bytes, b"%PDF-1.4 report");
        assert!(document.filename.ends_with(".pdf"));
    }

    #[test]
    fn test_embedded_document_with_bad_encoding_aborts() {
        let mut repo = repo();
        let err = receive(
            &mut repo,
            &[
                HEADER,
                "ORC|RE|4021",
                &obr("CBC", "CBC"),
                &obx("ED", "pdf^^^Uuencode^abc"),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ReceiveError::InvalidEncoding {
                encoding: "Uuencode".into()
            }
        );
        // The report was already flushed to obtain its id; that row
        // stays persisted.
        assert_eq!(repo.reports().len(), 1);
        assert!(repo.results().is_empty());
    }

    #[test]
    fn test_embedded_file_segment_acts_like_an_observation() {
        let mut repo = repo();
        let payload = general_purpose::STANDARD.encode(b"%PDF-1.4 scan");
        let zef = format!("ZEF|1|{payload}");
        let stats = receive(
            &mut repo,
            &[HEADER, "ORC|RE|4021", &obr("CBC", "CBC"), &zef],
        )
        .unwrap();

        assert_eq!(stats.documents, 1);
        let result = &repo.results()[0];
        assert_eq!(result.data_type, ResultDataType::Embedded);
        assert_eq!(result.date, "2013-04-02");
        assert_eq!(result.report_id, Some(repo.reports()[0].0));
        assert_eq!(repo.documents()[0].media_type, "application/pdf");
    }

    #[test]
    fn test_missing_category_aborts_before_parsing() {
        let mut repo = InMemoryRepository::new();
        repo.add_order(ProcedureOrder {
            id: 4021,
            patient_id: 7,
            encounter_id: None,
        });
        let err = receive(&mut repo, &[HEADER, "ORC|RE|4021"]).unwrap_err();
        assert_eq!(
            err,
            ReceiveError::CategoryNotConfigured {
                name: "Lab Report".into()
            }
        );
    }

    #[test]
    fn test_lab_specific_abnormal_flag_passes_through() {
        let mut repo = repo();
        let mut fields: Vec<String> = obx("NM", "positive")
            .split('|')
            .map(str::to_string)
            .collect();
        fields[8] = r"DETECTED \T\ CONFIRMED".into();
        let segment = fields.join("|");
        receive(
            &mut repo,
            &[HEADER, "ORC|RE|4021", &obr("CBC", "CBC"), &segment],
        )
        .unwrap();

        assert_eq!(
            repo.results()[0].abnormal,
            AbnormalFlag::Other("DETECTED & CONFIRMED".into())
        );
    }

    #[test]
    fn test_second_report_group_reuses_cached_order() {
        let mut repo = repo();
        repo.add_line_item(4021, "CMP", "Metabolic Panel");
        let stats = receive(
            &mut repo,
            &[
                HEADER,
                "ORC|RE|4021",
                &obr("CBC", "CBC"),
                &obx("NM", "13.4"),
                &obr("CMP", "Metabolic Panel"),
                &obx("NM", "4.1"),
            ],
        )
        .unwrap();

        assert_eq!(stats.reports, 2);
        assert_eq!(stats.results, 2);
        // Each result points at its own report.
        assert_eq!(repo.results()[0].report_id, Some(repo.reports()[0].0));
        assert_eq!(repo.results()[1].report_id, Some(repo.reports()[1].0));
    }
}
