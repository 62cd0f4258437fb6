//! Identifier aliases for lab result records.
//!
//! All collaborating stores key their rows with 64-bit signed integers,
//! so the aliases exist to keep signatures readable rather than to add
//! newtype safety.

/// Identifier of a placed procedure order.
///
/// # Examples
///
/// ```
/// use oru_types::OrderId;
///
/// let order: OrderId = 4021;
/// assert_eq!(order, 4021);
/// ```
pub type OrderId = i64;

/// Identifier of a patient.
pub type PatientId = i64;

/// Identifier of the encounter (visit) an order was placed under.
pub type EncounterId = i64;

/// Identifier of a persisted procedure report row.
pub type ReportId = i64;

/// Identifier of a stored document blob.
pub type DocumentId = i64;

/// Identifier of a document category.
pub type CategoryId = i64;
