//! Collaborator contracts and an in-memory implementation.
//!
//! The receiver never talks to storage directly; it works against the
//! four small traits in this module. `InMemoryRepository` implements
//! all of them and backs the unit tests and the intake binary.

use std::collections::HashMap;

use oru_types::{
    CategoryId, DocumentId, OrderId, OrderLineItem, PatientId, ProcedureOrder, ProcedureReport,
    ProcedureResult, ProcedureSource, ReportId,
};

/// Resolves a document category name to its identifier.
pub trait CategoryLookup {
    /// Returns the id for `name`, or `None` when the category is not
    /// configured.
    fn category_id(&self, name: &str) -> Option<CategoryId>;
}

/// Read/insert access to placed orders and their line items.
pub trait OrderRepository {
    /// Fetches an order by id.
    fn fetch_order(&self, id: OrderId) -> Option<ProcedureOrder>;

    /// Finds the order line a result should attach to.
    ///
    /// Among the order's lines with the given procedure code, lines
    /// with `sequence <= last_sequence` sort after those with a greater
    /// sequence; ties break by ascending sequence and the first match
    /// wins. With `last_sequence` of zero this selects the smallest
    /// sequence overall.
    fn find_line_item(
        &self,
        order_id: OrderId,
        procedure_code: &str,
        last_sequence: u32,
    ) -> Option<OrderLineItem>;

    /// Inserts a new line item on an order, assigning the next free
    /// sequence number, and returns the created line.
    fn insert_line_item(
        &mut self,
        order_id: OrderId,
        procedure_code: &str,
        procedure_name: &str,
        source: ProcedureSource,
    ) -> OrderLineItem;
}

/// Insert access to persisted reports and results.
pub trait ResultRepository {
    /// Inserts a report row and returns its generated identifier.
    fn insert_report(&mut self, report: &ProcedureReport) -> ReportId;

    /// Inserts a result row.
    fn insert_result(&mut self, result: &ProcedureResult);
}

/// Creates opaque document blobs for embedded payloads.
pub trait DocumentStore {
    /// Stores `bytes` as a new document and returns its identifier, or
    /// a failure reason.
    fn create_document(
        &mut self,
        patient_id: PatientId,
        category_id: CategoryId,
        filename: &str,
        media_type: &str,
        bytes: Vec<u8>,
    ) -> Result<DocumentId, String>;
}

/// A document blob held by [`InMemoryRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    /// Generated identifier.
    pub id: DocumentId,
    /// Patient the document belongs to.
    pub patient_id: PatientId,
    /// Category the document was filed under.
    pub category_id: CategoryId,
    /// Generated filename.
    pub filename: String,
    /// Media type derived from the filename extension.
    pub media_type: String,
    /// Decoded payload bytes.
    pub bytes: Vec<u8>,
}

/// In-memory implementation of every collaborator contract.
///
/// # Example
///
/// ```
/// use oru_receiver::InMemoryRepository;
/// use oru_types::ProcedureOrder;
///
/// let mut repo = InMemoryRepository::new();
/// repo.add_category("Lab Report");
/// repo.add_order(ProcedureOrder { id: 1, patient_id: 7, encounter_id: None });
/// repo.add_line_item(1, "CBC", "Complete Blood Count");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    categories: HashMap<String, CategoryId>,
    orders: HashMap<OrderId, ProcedureOrder>,
    line_items: HashMap<OrderId, Vec<OrderLineItem>>,
    reports: Vec<(ReportId, ProcedureReport)>,
    results: Vec<ProcedureResult>,
    documents: Vec<StoredDocument>,
}

impl InMemoryRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures a document category, returning its id.
    pub fn add_category(&mut self, name: &str) -> CategoryId {
        let next = self.categories.len() as CategoryId + 1;
        *self.categories.entry(name.to_string()).or_insert(next)
    }

    /// Seeds a placed order.
    pub fn add_order(&mut self, order: ProcedureOrder) {
        self.orders.insert(order.id, order);
    }

    /// Seeds an originally ordered line item on an order.
    pub fn add_line_item(&mut self, order_id: OrderId, code: &str, name: &str) {
        self.insert_line_item(order_id, code, name, ProcedureSource::Original);
    }

    /// All line items recorded for an order, in sequence order.
    pub fn line_items(&self, order_id: OrderId) -> &[OrderLineItem] {
        self.line_items.get(&order_id).map_or(&[], Vec::as_slice)
    }

    /// All persisted reports with their generated ids.
    pub fn reports(&self) -> &[(ReportId, ProcedureReport)] {
        &self.reports
    }

    /// All persisted results.
    pub fn results(&self) -> &[ProcedureResult] {
        &self.results
    }

    /// All stored documents.
    pub fn documents(&self) -> &[StoredDocument] {
        &self.documents
    }
}

impl CategoryLookup for InMemoryRepository {
    fn category_id(&self, name: &str) -> Option<CategoryId> {
        self.categories.get(name).copied()
    }
}

impl OrderRepository for InMemoryRepository {
    fn fetch_order(&self, id: OrderId) -> Option<ProcedureOrder> {
        self.orders.get(&id).cloned()
    }

    fn find_line_item(
        &self,
        order_id: OrderId,
        procedure_code: &str,
        last_sequence: u32,
    ) -> Option<OrderLineItem> {
        self.line_items
            .get(&order_id)?
            .iter()
            .filter(|item| item.procedure_code == procedure_code)
            .min_by_key(|item| (item.sequence <= last_sequence, item.sequence))
            .cloned()
    }

    fn insert_line_item(
        &mut self,
        order_id: OrderId,
        procedure_code: &str,
        procedure_name: &str,
        source: ProcedureSource,
    ) -> OrderLineItem {
        let items = self.line_items.entry(order_id).or_default();
        let sequence = items.iter().map(|item| item.sequence).max().unwrap_or(0) + 1;
        let item = OrderLineItem {
            order_id,
            procedure_code: procedure_code.to_string(),
            procedure_name: procedure_name.to_string(),
            sequence,
            source,
        };
        items.push(item.clone());
        item
    }
}

impl ResultRepository for InMemoryRepository {
    fn insert_report(&mut self, report: &ProcedureReport) -> ReportId {
        let id = self.reports.len() as ReportId + 1;
        self.reports.push((id, report.clone()));
        id
    }

    fn insert_result(&mut self, result: &ProcedureResult) {
        self.results.push(result.clone());
    }
}

impl DocumentStore for InMemoryRepository {
    fn create_document(
        &mut self,
        patient_id: PatientId,
        category_id: CategoryId,
        filename: &str,
        media_type: &str,
        bytes: Vec<u8>,
    ) -> Result<DocumentId, String> {
        let id = self.documents.len() as DocumentId + 1;
        self.documents.push(StoredDocument {
            id,
            patient_id,
            category_id,
            filename: filename.to_string(),
            media_type: media_type.to_string(),
            bytes,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_with_lines(codes: &[&str]) -> InMemoryRepository {
        let mut repo = InMemoryRepository::new();
        repo.add_order(ProcedureOrder {
            id: 1,
            patient_id: 7,
            encounter_id: None,
        });
        for code in codes {
            repo.add_line_item(1, code, "test");
        }
        repo
    }

    #[test]
    fn test_sequences_assigned_in_insertion_order() {
        let repo = repo_with_lines(&["CBC", "CMP", "CBC"]);
        let sequences: Vec<u32> = repo.line_items(1).iter().map(|i| i.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn test_find_prefers_sequence_above_marker() {
        let repo = repo_with_lines(&["CBC", "CMP", "CBC"]);

        let first = repo.find_line_item(1, "CBC", 0).unwrap();
        assert_eq!(first.sequence, 1);

        let second = repo.find_line_item(1, "CBC", 1).unwrap();
        assert_eq!(second.sequence, 3);
    }

    #[test]
    fn test_find_wraps_when_no_greater_sequence_remains() {
        let repo = repo_with_lines(&["CBC", "CMP", "CBC"]);
        let wrapped = repo.find_line_item(1, "CBC", 3).unwrap();
        assert_eq!(wrapped.sequence, 1);
    }

    #[test]
    fn test_find_unknown_code_returns_none() {
        let repo = repo_with_lines(&["CBC"]);
        assert!(repo.find_line_item(1, "TSH", 0).is_none());
        assert!(repo.find_line_item(99, "CBC", 0).is_none());
    }

    #[test]
    fn test_category_lookup() {
        let mut repo = InMemoryRepository::new();
        let id = repo.add_category("Lab Report");
        assert_eq!(repo.category_id("Lab Report"), Some(id));
        assert_eq!(repo.category_id("Radiology"), None);
    }

    #[test]
    fn test_report_ids_are_sequential() {
        let mut repo = InMemoryRepository::new();
        let report = ProcedureReport {
            order_id: 1,
            order_sequence: 1,
            date_collected: "2013-04-01".into(),
            date_report: "2013-04-02".into(),
            status: oru_types::ReportStatus::Final,
            notes: String::new(),
        };
        assert_eq!(repo.insert_report(&report), 1);
        assert_eq!(repo.insert_report(&report), 2);
    }
}
