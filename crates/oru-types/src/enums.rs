//! Coded-value enumeration types.
//!
//! This module provides enum representations for the small fixed
//! vocabularies carried in result messages: abnormal flags, report
//! statuses, result data types, order-line sources, and embedded
//! payload encodings.

/// Abnormal-result flag reported with an observation (OBX-8).
///
/// Lab-specific free-text flags that are not part of the standard
/// vocabulary are preserved in the `Other` variant.
///
/// # Examples
///
/// ```
/// use oru_types::AbnormalFlag;
///
/// let flag = AbnormalFlag::from_code("HH");
/// assert_eq!(flag, Some(AbnormalFlag::CriticallyHigh));
/// assert_eq!(AbnormalFlag::from_code("*"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbnormalFlag {
    /// Result within the reference range.
    Normal,
    /// Abnormal result, direction unspecified.
    Abnormal,
    /// Above the reference range.
    High,
    /// Below the reference range.
    Low,
    /// Critically above the reference range.
    CriticallyHigh,
    /// Critically below the reference range.
    CriticallyLow,
    /// Lab-specific flag text outside the standard vocabulary.
    Other(String),
}

impl AbnormalFlag {
    /// Creates an AbnormalFlag from its HL7 code.
    ///
    /// Returns `None` if the code is not part of the standard vocabulary;
    /// callers decide how to carry such values into `Other`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "" => Some(Self::Normal),
            "A" => Some(Self::Abnormal),
            "H" => Some(Self::High),
            "L" => Some(Self::Low),
            "HH" => Some(Self::CriticallyHigh),
            "LL" => Some(Self::CriticallyLow),
            _ => None,
        }
    }

    /// Returns the stored word for this flag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Normal => "normal",
            Self::Abnormal => "abnormal",
            Self::High => "high",
            Self::Low => "low",
            Self::CriticallyHigh => "critically high",
            Self::CriticallyLow => "critically low",
            Self::Other(text) => text,
        }
    }
}

/// Status of a report or of a single result (OBR-25 / OBX-11).
///
/// # Examples
///
/// ```
/// use oru_types::ReportStatus;
///
/// let status = ReportStatus::from_code("F");
/// assert_eq!(status, Some(ReportStatus::Final));
/// assert_eq!(ReportStatus::Final.as_str(), "final");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReportStatus {
    /// Final, verified result.
    Final,
    /// Preliminary result, may still change.
    Preliminary,
    /// Correction of a previously reported result.
    Corrected,
    /// Lab-specific status text outside the standard vocabulary.
    Other(String),
}

impl ReportStatus {
    /// Creates a ReportStatus from its HL7 code.
    ///
    /// Returns `None` if the code is not part of the standard vocabulary.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "F" => Some(Self::Final),
            "P" => Some(Self::Preliminary),
            "C" => Some(Self::Corrected),
            _ => None,
        }
    }

    /// Returns the stored word for this status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Final => "final",
            Self::Preliminary => "preliminary",
            Self::Corrected => "corrected",
            Self::Other(text) => text,
        }
    }
}

/// Classification of a single result's value (derived from OBX-2).
///
/// # Examples
///
/// ```
/// use oru_types::ResultDataType;
///
/// assert_eq!(ResultDataType::from_code('N'), Some(ResultDataType::Numeric));
/// assert_eq!(ResultDataType::Embedded.as_char(), 'E');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResultDataType {
    /// Numeric value.
    Numeric,
    /// Short string value.
    Text,
    /// Formatted free text.
    FreeText,
    /// Embedded document payload stored as a document blob.
    Embedded,
    /// Long free text carried in the comment buffer instead of the value.
    LongText,
}

impl ResultDataType {
    /// Creates a ResultDataType from its single-letter code.
    ///
    /// Returns `None` if the letter doesn't match a known data type.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'N' => Some(Self::Numeric),
            'S' => Some(Self::Text),
            'F' => Some(Self::FreeText),
            'E' => Some(Self::Embedded),
            'L' => Some(Self::LongText),
            _ => None,
        }
    }

    /// Returns the single-letter code for this data type.
    pub fn as_char(self) -> char {
        match self {
            Self::Numeric => 'N',
            Self::Text => 'S',
            Self::FreeText => 'F',
            Self::Embedded => 'E',
            Self::LongText => 'L',
        }
    }
}

/// Origin of an order line item.
///
/// Distinguishes procedures placed with the original order from those
/// added while results were being received (physician add-ons and lab
/// reflex tests).
///
/// # Examples
///
/// ```
/// use oru_types::ProcedureSource;
///
/// assert_eq!(ProcedureSource::from_code("2"), Some(ProcedureSource::ResultReceipt));
/// assert_eq!(ProcedureSource::Original.as_code(), "1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProcedureSource {
    /// Part of the order as originally placed.
    Original,
    /// Added while result messages were being received.
    ResultReceipt,
}

impl ProcedureSource {
    /// Creates a ProcedureSource from its stored code.
    ///
    /// Returns `None` if the code doesn't match a known source.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::Original),
            "2" => Some(Self::ResultReceipt),
            _ => None,
        }
    }

    /// Returns the stored code for this source.
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Original => "1",
            Self::ResultReceipt => "2",
        }
    }
}

/// Encoding of an embedded payload (OBX-5 component 3).
///
/// # Examples
///
/// ```
/// use oru_types::EncodingType;
///
/// assert_eq!(EncodingType::from_tag("Base64"), Some(EncodingType::Base64));
/// assert_eq!(EncodingType::from_tag("quoted-printable"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncodingType {
    /// Standard Base64.
    Base64,
    /// Plain text, subject to escape decoding.
    Text,
    /// Consecutive two-character hexadecimal pairs.
    Hex,
}

impl EncodingType {
    /// Creates an EncodingType from its message tag.
    ///
    /// Returns `None` for unrecognized tags; those are decode failures.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Base64" => Some(Self::Base64),
            "A" => Some(Self::Text),
            "Hex" => Some(Self::Hex),
            _ => None,
        }
    }
}
