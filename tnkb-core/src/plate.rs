//! Plate normalization and parsing.
//!
//! A TNKB plate is a one or two letter region code, one to four digits and a
//! one to three letter suffix, e.g. `B 1234 ABC`. Spaces between the groups
//! are optional on input; normalized plates always carry exactly one.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ports::TnkbError;

static PLATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z]{1,2}) ?([0-9]{1,4}) ?([A-Z]{1,3})$").expect("plate pattern is valid")
});

const EXPECTED_FORMAT: &str = "expected '[A-Z]{1,2} [0-9]{1,4} [A-Z]{1,3}' (e.g. 'B 1234 ABC')";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Components of a normalized plate number.
pub struct PlateParts {
    /// Region prefix, one or two uppercase letters.
    pub region_code: String,
    /// Registration number, one to four digits.
    pub digits: String,
    /// Trailing series letters, one to three uppercase letters.
    pub suffix: String,
}

impl fmt::Display for PlateParts {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {} {}", self.region_code, self.digits, self.suffix)
    }
}

/// Normalize a raw plate into its canonical `"<code> <digits> <suffix>"` form.
///
/// Input is uppercased and whitespace runs are collapsed before matching.
///
/// # Errors
///
/// Returns [`TnkbError::InvalidPlate`] when the input is blank or does not
/// match the plate pattern as a whole.
pub fn normalize(raw: &str) -> Result<String, TnkbError> {
    if raw.trim().is_empty() {
        return Err(TnkbError::InvalidPlate(
            "plate number cannot be empty".to_owned(),
        ));
    }

    let collapsed = raw
        .to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let parts = split(&collapsed).ok_or_else(|| {
        TnkbError::InvalidPlate(format!("invalid plate format '{collapsed}', {EXPECTED_FORMAT}"))
    })?;

    Ok(parts.to_string())
}

/// Split a normalized plate into its components.
///
/// # Errors
///
/// Returns [`TnkbError::InvalidPlate`] when the plate does not match the pattern.
pub fn parse(normalized: &str) -> Result<PlateParts, TnkbError> {
    split(normalized)
        .ok_or_else(|| TnkbError::InvalidPlate(format!("cannot parse plate '{normalized}'")))
}

/// Whether the raw input is a well-formed plate.
#[must_use]
pub fn is_valid(raw: &str) -> bool {
    normalize(raw).and_then(|plate| parse(&plate)).is_ok()
}

fn split(plate: &str) -> Option<PlateParts> {
    let captures = PLATE_PATTERN.captures(plate)?;
    let group = |index: usize| captures.get(index).map(|found| found.as_str().to_owned());

    Some(PlateParts {
        region_code: group(1)?,
        digits: group(2)?,
        suffix: group(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_spacing() {
        assert_eq!(normalize("b1234abc").expect("valid"), "B 1234 ABC");
        assert_eq!(normalize("  b   1234\tabc ").expect("valid"), "B 1234 ABC");
        assert_eq!(normalize("AB 5 CDE").expect("valid"), "AB 5 CDE");
        assert_eq!(normalize("d1a").expect("valid"), "D 1 A");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["b1234abc", "AB 5 CDE", "  kb 77  x", "DK1234XY"] {
            let once = normalize(raw).expect("valid");
            let twice = normalize(&once).expect("still valid");
            assert_eq!(once, twice, "normalizing {raw:?} twice changed it");
        }
    }

    #[test]
    fn rejects_empty_input() {
        for raw in ["", "   ", "\t\n"] {
            let err = normalize(raw).expect_err("blank input");
            assert!(
                err.to_string().contains("empty"),
                "unexpected message: {err}"
            );
        }
    }

    #[test]
    fn rejects_malformed_plates() {
        let rejected = [
            "INVALID",
            "12345",
            "ABC",
            "XYZ",
            "ABC 1234 DE",
            "B 12345 ABC",
            "B 1234 ABCD",
            "B 1234",
            "B-1234-ABC",
            "B 1234 ABC!",
            "xB 1234 ABC",
            "B 1 2 A",
            "B ١٢٣ ABC",
        ];
        for raw in rejected {
            assert!(
                matches!(normalize(raw), Err(TnkbError::InvalidPlate(_))),
                "{raw:?} should be rejected"
            );
            assert!(!is_valid(raw), "{raw:?} should not validate");
        }
    }

    #[test]
    fn parses_components() {
        let parts = parse("AB 5 CDE").expect("valid");
        assert_eq!(
            parts,
            PlateParts {
                region_code: "AB".to_owned(),
                digits: "5".to_owned(),
                suffix: "CDE".to_owned(),
            }
        );
        assert_eq!(parts.to_string(), "AB 5 CDE");
    }

    #[test]
    fn parse_rechecks_the_pattern() {
        assert!(matches!(
            parse("b 1234 abc"),
            Err(TnkbError::InvalidPlate(_))
        ));
    }
}
