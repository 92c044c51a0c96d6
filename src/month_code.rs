//! Futures delivery-month codes.

use std::borrow::Cow;

/// Standard futures month-code table, January through December.
pub const MONTH_CODES: [(char, &str); 12] = [
    ('F', "Jan"),
    ('G', "Feb"),
    ('H', "Mar"),
    ('J', "Apr"),
    ('K', "May"),
    ('M', "Jun"),
    ('N', "Jul"),
    ('Q', "Aug"),
    ('U', "Sep"),
    ('V', "Oct"),
    ('X', "Nov"),
    ('Z', "Dec"),
];

/// Returns the three-letter month abbreviation for a month code, if recognised.
#[must_use]
pub fn month_abbrev(code: char) -> Option<&'static str> {
    MONTH_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, month)| *month)
}

/// Translates a month code to its abbreviation.
///
/// Unrecognised codes are returned unchanged, so `'W'` becomes `"W"`.
#[must_use]
pub fn translate(code: char) -> Cow<'static, str> {
    match month_abbrev(code) {
        Some(month) => Cow::Borrowed(month),
        None => Cow::Owned(code.to_string()),
    }
}
