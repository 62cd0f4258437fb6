//! In-field escape sequence decoding.
//!
//! Field values escape the delimiter characters they cannot contain
//! literally. The sequences are backslash-framed tokens; decoding is a
//! fixed substitution list whose order matters.

/// Decodes the escape sequences of a single field value.
///
/// Substitutions run in a fixed order; the escape-character token `\E\`
/// must be replaced last so that backslashes it produces are not
/// mistaken for the start of another token.
///
/// # Examples
///
/// ```
/// use oru_receiver::unescape;
///
/// assert_eq!(unescape(r"glucose \F\ fasting"), "glucose | fasting");
/// assert_eq!(unescape(r"\E\"), "\\");
/// ```
pub fn unescape(value: &str) -> String {
    value
        .replace(r"\S\", "^")
        .replace(r"\F\", "|")
        .replace(r"\R\", "~")
        .replace(r"\T\", "&")
        .replace(r"\X0d\", "\r")
        .replace(r"\E\", "\\")
}
