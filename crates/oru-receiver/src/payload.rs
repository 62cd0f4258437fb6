//! Embedded payload decoding.
//!
//! Results can carry a whole document inside a field, declared with an
//! encoding tag. Decoded bytes are handed to the document store; the
//! media type is guessed from the file extension the lab sent along.

use base64::{engine::general_purpose, Engine as _};
use oru_types::EncodingType;

use crate::escape::unescape;
use crate::types::{ReceiveError, ReceiveResult};

/// Decodes an embedded payload according to its declared encoding tag.
///
/// `Base64` is a standard Base64 decode; `A` is plain text passed
/// through the escape codec; `Hex` decodes consecutive two-character
/// pairs, silently dropping a trailing odd nibble.
///
/// # Errors
///
/// Returns [`ReceiveError::InvalidEncoding`] for unrecognized tags and
/// for data that does not decode under the declared encoding.
pub fn decode_payload(tag: &str, data: &str) -> ReceiveResult<Vec<u8>> {
    let invalid = || ReceiveError::InvalidEncoding {
        encoding: tag.to_string(),
    };

    match EncodingType::from_tag(tag) {
        Some(EncodingType::Base64) => general_purpose::STANDARD
            .decode(data)
            .map_err(|_| invalid()),
        Some(EncodingType::Text) => Ok(unescape(data).into_bytes()),
        Some(EncodingType::Hex) => {
            let bytes = data.as_bytes();
            let even = &bytes[..bytes.len() - bytes.len() % 2];
            hex::decode(even).map_err(|_| invalid())
        }
        None => Err(invalid()),
    }
}

/// Maps a lower-case file extension to a media type.
///
/// The extension comes from the first component of the encapsulated
/// value, which is a convention rather than part of the standard;
/// anything unrecognized is treated as opaque binary.
pub fn media_type(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "rtf" => "application/rtf",
        "txt" => "text/plain",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_decode() {
        assert_eq!(
            decode_payload("Base64", "bGFiIHJlcG9ydA==").unwrap(),
            b"lab report"
        );
    }

    #[test]
    fn test_invalid_base64_is_an_encoding_error() {
        assert_eq!(
            decode_payload("Base64", "not*valid*base64"),
            Err(ReceiveError::InvalidEncoding {
                encoding: "Base64".into()
            })
        );
    }

    #[test]
    fn test_plain_text_passes_through_escape_codec() {
        assert_eq!(
            decode_payload("A", r"CBC \T\ diff").unwrap(),
            b"CBC & diff"
        );
    }

    #[test]
    fn test_hex_decode() {
        assert_eq!(decode_payload("Hex", "48656c6c6f").unwrap(), b"Hello");
    }

    #[test]
    fn test_hex_odd_length_drops_trailing_nibble() {
        assert_eq!(decode_payload("Hex", "48656c6c6fa").unwrap(), b"Hello");
        assert_eq!(decode_payload("Hex", "4").unwrap(), b"");
    }

    #[test]
    fn test_unknown_tag_is_an_encoding_error() {
        assert_eq!(
            decode_payload("quoted-printable", "data"),
            Err(ReceiveError::InvalidEncoding {
                encoding: "quoted-printable".into()
            })
        );
    }

    #[test]
    fn test_media_type_table() {
        assert_eq!(media_type("pdf"), "application/pdf");
        assert_eq!(media_type("doc"), "application/msword");
        assert_eq!(media_type("rtf"), "application/rtf");
        assert_eq!(media_type("txt"), "text/plain");
        assert_eq!(media_type("zip"), "application/zip");
        assert_eq!(media_type("tiff"), "application/octet-stream");
    }
}
