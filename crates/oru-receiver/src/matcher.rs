//! Order line matching for incoming results.
//!
//! An order may contain the same procedure code on several lines. The
//! matcher assumes repeated results arrive in the same relative order
//! as the lines were placed, and walks the sequence numbers
//! accordingly. Codes that were never ordered at all become ad-hoc
//! lines, recorded as added during result receipt.

use std::collections::HashMap;

use oru_types::{OrderId, OrderLineItem, ProcedureSource};

use crate::repository::OrderRepository;

/// Selects the order line each incoming result belongs to.
///
/// Tracks, per procedure code, the sequence number selected last so
/// repeated codes advance through their lines. The tracking is scoped
/// to a single order; [`OrderLineMatcher::reset`] clears it whenever a
/// new order group begins.
#[derive(Debug, Default)]
pub struct OrderLineMatcher {
    last_sequence_by_code: HashMap<String, u32>,
}

impl OrderLineMatcher {
    /// Creates a matcher with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the per-code history; call when a new order group starts.
    pub fn reset(&mut self) {
        self.last_sequence_by_code.clear();
    }

    /// Selects (or creates) the line item on `order_id` for a result
    /// carrying `procedure_code`.
    ///
    /// Picks the line whose sequence is the smallest one greater than
    /// the last sequence used for this code, wrapping to the smallest
    /// overall when none remains. Unknown codes are inserted as ad-hoc
    /// lines first. The selected sequence becomes the new marker for
    /// the code.
    pub fn select<R: OrderRepository>(
        &mut self,
        repository: &mut R,
        order_id: OrderId,
        procedure_code: &str,
        procedure_name: &str,
    ) -> OrderLineItem {
        let last_sequence = self
            .last_sequence_by_code
            .get(procedure_code)
            .copied()
            .unwrap_or(0);

        let item = repository
            .find_line_item(order_id, procedure_code, last_sequence)
            .unwrap_or_else(|| {
                // Not in the order: added after it was sent, either as a
                // manual request from the physician or as a reflex from
                // the lab.
                repository.insert_line_item(
                    order_id,
                    procedure_code,
                    procedure_name,
                    ProcedureSource::ResultReceipt,
                )
            });

        self.last_sequence_by_code
            .insert(procedure_code.to_string(), item.sequence);
        item
    }
}
