//! Procedure order types.
//!
//! This module provides the `ProcedureOrder` and `OrderLineItem` structs
//! describing a previously placed order and its individual procedure
//! lines. Both are read from the order repository while results are
//! matched; the receiver only ever creates new ad-hoc line items.

use crate::{EncounterId, OrderId, PatientId, ProcedureSource};

/// A previously placed procedure order.
///
/// Results can only be received against an order that already exists;
/// electronic results for manual (unrecorded) orders are rejected.
///
/// # Examples
///
/// ```
/// use oru_types::ProcedureOrder;
///
/// let order = ProcedureOrder {
///     id: 4021,
///     patient_id: 7,
///     encounter_id: Some(55),
/// };
///
/// assert_eq!(order.encounter_id, Some(55));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcedureOrder {
    /// Unique identifier of this order.
    pub id: OrderId,
    /// Patient the order was placed for.
    pub patient_id: PatientId,
    /// Encounter the order was placed under, when recorded.
    pub encounter_id: Option<EncounterId>,
}

/// One ordered procedure within a placed order.
///
/// Line items are identified by their sequence number within the order.
/// The same procedure code may appear on several lines; sequence numbers
/// disambiguate repeated codes when results arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderLineItem {
    /// Order this line belongs to.
    pub order_id: OrderId,
    /// Procedure code as ordered.
    pub procedure_code: String,
    /// Display name of the procedure.
    pub procedure_name: String,
    /// Position of this line within the order, starting at 1.
    pub sequence: u32,
    /// Whether the line was originally ordered or added during result
    /// receipt.
    pub source: ProcedureSource,
}

impl OrderLineItem {
    /// Returns true if this line was added while results were received
    /// rather than being part of the original order.
    pub fn is_ad_hoc(&self) -> bool {
        self.source == ProcedureSource::ResultReceipt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ad_hoc_detection() {
        let ordered = OrderLineItem {
            order_id: 1,
            procedure_code: "CBC".into(),
            procedure_name: "Complete Blood Count".into(),
            sequence: 1,
            source: ProcedureSource::Original,
        };
        let reflex = OrderLineItem {
            sequence: 2,
            source: ProcedureSource::ResultReceipt,
            ..ordered.clone()
        };

        assert!(!ordered.is_ad_hoc());
        assert!(reflex.is_ad_hoc());
    }
}
