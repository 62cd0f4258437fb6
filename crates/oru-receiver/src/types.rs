//! Receiver-specific types for message processing.

use oru_types::OrderId;
use thiserror::Error;

/// Errors that can occur while receiving a result message.
///
/// Any of these aborts processing of the remaining segments. Rows
/// already handed to the repository earlier in the same message stay
/// persisted; callers doing batch accounting must treat a failed
/// message as possibly partially applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReceiveError {
    /// Message does not begin with a well-formed MSH header segment.
    #[error("input does not begin with an MSH segment")]
    MalformedHeader,

    /// Message is not an ORU^R01 observation result.
    #[error("message type '{received}' does not seem valid")]
    UnsupportedMessageType {
        /// The message type field as received.
        received: String,
    },

    /// The referenced procedure order does not exist.
    #[error("procedure order '{order_id}' was not found")]
    OrderNotFound {
        /// The order id the message referenced.
        order_id: OrderId,
    },

    /// The message's encounter number does not match the order's.
    #[error(
        "encounter '{order_encounter}' for order '{order_id}' does not \
         match the message encounter '{message_encounter}'"
    )]
    EncounterMismatch {
        /// The order whose encounter was checked.
        order_id: OrderId,
        /// Encounter recorded on the order, zero if none.
        order_encounter: i64,
        /// Encounter supplied in the message's visit segment.
        message_encounter: i64,
    },

    /// A segment type with no handler for the current context.
    #[error("segment name '{name}' is misplaced or unknown")]
    UnknownSegment {
        /// The offending segment type tag.
        name: String,
    },

    /// An embedded payload declared an unusable encoding or failed to
    /// decode.
    #[error("invalid encapsulated data encoding type: {encoding}")]
    InvalidEncoding {
        /// The encoding tag as received.
        encoding: String,
    },

    /// The document category for lab results is not configured.
    #[error("document category for lab results does not exist: {name}")]
    CategoryNotConfigured {
        /// The category name that was looked up.
        name: String,
    },

    /// The document store refused to create a document.
    #[error("document '{filename}' could not be stored: {reason}")]
    DocumentStore {
        /// Generated filename of the rejected document.
        filename: String,
        /// Failure reason reported by the store.
        reason: String,
    },
}

/// Result type for receive operations.
pub type ReceiveResult<T> = Result<T, ReceiveError>;

/// Configuration for message receiving.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Name of the document category that embedded result documents are
    /// filed under.
    pub category_name: String,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            category_name: "Lab Report".to_string(),
        }
    }
}

/// Identifying fields extracted from the message's patient segment.
///
/// The receiver itself only verifies encounter numbers; these fields
/// are surfaced so callers can cross-check the patient against the
/// matched order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientIdentity {
    /// Social security number as received.
    pub ssn: String,
    /// Date of birth in compact `YYYYMMDD` form as received.
    pub date_of_birth: String,
    /// Patient last name.
    pub last_name: String,
    /// Patient first name.
    pub first_name: String,
}

/// Counts from processing one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiveStats {
    /// Message control id from the header segment.
    pub message_id: String,
    /// Patient identity from the message's patient segment.
    pub patient: PatientIdentity,
    /// Report rows handed to the repository.
    pub reports: usize,
    /// Result rows handed to the repository.
    pub results: usize,
    /// Documents created for embedded payloads.
    pub documents: usize,
}
