//! # oru-receiver
//!
//! Segment parser and order matcher for inbound HL7 ORU^R01 lab
//! results.
//!
//! The crate turns raw message text into persisted report and result
//! records: it resolves the message's own delimiter scheme, walks its
//! segments in order, keeps report/result buffers in flight while note
//! segments accumulate, matches each report to the right line of the
//! placed order, and extracts embedded document payloads. Persistence
//! is abstracted behind small collaborator traits; an in-memory
//! implementation backs the tests and the intake binary.
//!
//! ## Usage
//!
//! ```rust
//! use oru_receiver::{receive_oru_message, InMemoryRepository, ReceiverConfig};
//! use oru_types::ProcedureOrder;
//!
//! let mut repo = InMemoryRepository::new();
//! repo.add_category("Lab Report");
//! repo.add_order(ProcedureOrder { id: 7, patient_id: 1, encounter_id: None });
//! repo.add_line_item(7, "TSH", "Thyroid Stimulating Hormone");
//!
//! let message = "MSH|^~\\&|LAB|ACME||CLINIC|201304010900||ORU^R01|MSG0002|P|2.3\r\
//!     ORC|RE|7\r\
//!     OBR|1|7||TSH^Thyroid Stimulating Hormone|||201304010930|||||||||||||||20130402|||F\r\
//!     OBX|1|NM|3016-3^TSH||2.1|mIU/L|0.4-4.0||||F";
//!
//! let stats = receive_oru_message(message, &mut repo, &ReceiverConfig::default())?;
//! assert_eq!(stats.results, 1);
//! # Ok::<(), oru_receiver::ReceiveError>(())
//! ```

#![warn(missing_docs)]

mod datetime;
mod escape;
mod matcher;
mod payload;
mod receiver;
mod repository;
mod segment;
mod types;

// Re-export oru-types for convenience
pub use oru_types;

pub use datetime::{normalize_date, normalize_datetime, ZERO_DATETIME};
pub use escape::unescape;
pub use matcher::OrderLineMatcher;
pub use payload::{decode_payload, media_type};
pub use receiver::receive_oru_message;
pub use repository::{
    CategoryLookup, DocumentStore, InMemoryRepository, OrderRepository, ResultRepository,
    StoredDocument,
};
pub use segment::{tokenize, Delimiters, Segment};
pub use types::{PatientIdentity, ReceiveError, ReceiveResult, ReceiveStats, ReceiverConfig};
