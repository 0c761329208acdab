//! Unit-line address normalization.
//!
//! Customers type the secondary address line free-form ("apt204", "204Unit",
//! "unit 12", ...). Suppliers reject orders whose unit lines don't match
//! their expected "Unit N" format, so the line is canonicalized before it is
//! placed on the purchase order. This is a best-effort, lossy heuristic.

use std::sync::LazyLock;

use regex::Regex;

static LEADING_DIGITS_THEN_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)unit").expect("valid regex"));
static UNIT_THEN_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"unit(\d*)").expect("valid regex"));
static FIRST_DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Canonicalize a free-text unit/suite line to "Unit N" form.
///
/// Rules, applied in order:
/// 1. Blank input passes through unchanged.
/// 2. The input is lowercased and stripped of all whitespace.
/// 3. `<digits>unit...` becomes `Unit <digits>`.
/// 4. If no "unit" token appears anywhere, the first run of digits (if any)
///    becomes `Unit <digits>`; with no digits at all the output is `Unit`.
/// 5. Otherwise the embedded `unit<digits>` is rewritten to `Unit <digits>`.
#[must_use]
pub fn normalize_unit_line(raw: &str) -> String {
    if raw.trim().is_empty() {
        return raw.to_string();
    }

    let squeezed: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if let Some(caps) = LEADING_DIGITS_THEN_UNIT.captures(&squeezed) {
        return format!("Unit {}", &caps[1]);
    }

    match UNIT_THEN_DIGITS.captures(&squeezed) {
        None => FIRST_DIGIT_RUN.find(&squeezed).map_or_else(
            || "Unit".to_string(),
            |digits| format!("Unit {}", digits.as_str()),
        ),
        Some(caps) => {
            let digits = &caps[1];
            if digits.is_empty() {
                "Unit".to_string()
            } else {
                format!("Unit {digits}")
            }
        }
    }
}
