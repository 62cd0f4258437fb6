//! Delimiter resolution and segment tokenization.
//!
//! A message declares its own field, component, and repetition
//! separators in the MSH header; only the segment separator is fixed.
//! Segments borrow from the message text, so tokenization allocates
//! nothing but the field index.

use crate::types::{ReceiveError, ReceiveResult};

/// The delimiter set of one message.
///
/// Resolved once from the header and immutable afterwards. All four
/// separators are required to be distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    /// Segment separator, always a carriage return.
    pub segment: char,
    /// Field separator, the character following the MSH tag (typically `|`).
    pub field: char,
    /// Component separator (typically `^`).
    pub component: char,
    /// Repetition separator (typically `~`).
    pub repetition: char,
}

impl Delimiters {
    /// Resolves the delimiter set from the start of a message.
    ///
    /// The message must begin with `MSH`; the field separator is the
    /// byte immediately after the tag and the component and repetition
    /// separators are the first two bytes of the header's own first
    /// field, which declares them inline.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiveError::MalformedHeader`] if the message does not
    /// begin with an MSH tag, the separator positions are missing or
    /// non-ASCII, or the four separators are not distinct.
    pub fn resolve(message: &str) -> ReceiveResult<Self> {
        let bytes = message.as_bytes();
        if bytes.len() < 6 || &bytes[0..3] != b"MSH" {
            return Err(ReceiveError::MalformedHeader);
        }
        if !bytes[3..6].iter().all(u8::is_ascii) {
            return Err(ReceiveError::MalformedHeader);
        }

        let delimiters = Self {
            segment: '\r',
            field: bytes[3] as char,
            component: bytes[4] as char,
            repetition: bytes[5] as char,
        };
        if !delimiters.are_distinct() {
            return Err(ReceiveError::MalformedHeader);
        }
        Ok(delimiters)
    }

    fn are_distinct(&self) -> bool {
        let set = [self.segment, self.field, self.component, self.repetition];
        set.iter()
            .enumerate()
            .all(|(i, c)| set[i + 1..].iter().all(|other| other != c))
    }
}

/// One tokenized segment: an ordered sequence of field strings.
///
/// Field 0 is the 3-character segment type tag. Fields borrow from the
/// message text and are read-only once tokenized.
#[derive(Debug, Clone)]
pub struct Segment<'a> {
    fields: Vec<&'a str>,
    component: char,
}

impl<'a> Segment<'a> {
    fn new(raw: &'a str, delimiters: &Delimiters) -> Self {
        Self {
            fields: raw.split(delimiters.field).collect(),
            component: delimiters.component,
        }
    }

    /// The segment type tag (field 0).
    pub fn kind(&self) -> &'a str {
        self.fields[0]
    }

    /// Returns field `index`, or the empty string when the segment is
    /// shorter than that.
    pub fn field(&self, index: usize) -> &'a str {
        self.fields.get(index).copied().unwrap_or("")
    }

    /// Splits field `index` on the component separator.
    pub fn components(&self, index: usize) -> Vec<&'a str> {
        self.field(index).split(self.component).collect()
    }

    /// Returns component `position` of field `index`, or the empty
    /// string when absent.
    pub fn component(&self, index: usize, position: usize) -> &'a str {
        self.components(index).get(position).copied().unwrap_or("")
    }
}

/// Splits a message into its non-empty segments, in order.
pub fn tokenize<'a>(message: &'a str, delimiters: &Delimiters) -> Vec<Segment<'a>> {
    message
        .split(delimiters.segment)
        .filter(|raw| !raw.is_empty())
        .map(|raw| Segment::new(raw, delimiters))
        .collect()
}
