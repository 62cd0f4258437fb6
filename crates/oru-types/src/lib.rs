//! # oru-types
//!
//! Type definitions for HL7 ORU lab result records.
//!
//! This crate provides the data model shared by the result receiver and
//! its hosting binaries: procedure orders and their line items, report
//! and result records, and the coded-value enums used by both.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Disable this feature for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use oru_types::{AbnormalFlag, OrderLineItem, ProcedureSource, ReportStatus};
//!
//! let line = OrderLineItem {
//!     order_id: 4021,
//!     procedure_code: "CBC".to_string(),
//!     procedure_name: "Complete Blood Count".to_string(),
//!     sequence: 1,
//!     source: ProcedureSource::Original,
//! };
//!
//! assert!(!line.is_ad_hoc());
//! assert_eq!(ReportStatus::from_code("F"), Some(ReportStatus::Final));
//! assert_eq!(AbnormalFlag::from_code("LL"), Some(AbnormalFlag::CriticallyLow));
//! ```
//!
//! ## Without Serde
//!
//! To use this crate without serde (zero dependencies):
//!
//! ```toml
//! [dependencies]
//! oru-types = { version = "0.1", default-features = false }
//! ```

#![warn(missing_docs)]

mod enums;
mod ids;
mod order;
mod report;
mod result;

// Re-export all public types at crate root
pub use enums::{AbnormalFlag, EncodingType, ProcedureSource, ReportStatus, ResultDataType};
pub use ids::{CategoryId, DocumentId, EncounterId, OrderId, PatientId, ReportId};
pub use order::{OrderLineItem, ProcedureOrder};
pub use report::ProcedureReport;
pub use result::ProcedureResult;
