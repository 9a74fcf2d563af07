//! Input sanitation for user-supplied identifiers.
//!
//! Every identifier that reaches a request URL, a search query, or a
//! subprocess argument goes through [`clean_identifier`] first.

/// Remove newline and quote characters, then surrounding whitespace.
///
/// Characters are deleted outright rather than escaped; the result is safe
/// to interpolate into request URLs and resolver arguments. Always succeeds,
/// including on empty input.
pub fn clean_identifier(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\'' | '"'))
        .collect::<String>()
        .trim()
        .to_string()
}
