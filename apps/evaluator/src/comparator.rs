use std::fmt;

use serde::Serialize;

/// Per-row outcome, written to the report as `TRUE` / `FALSE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "TRUE")]
    Pass,
    #[serde(rename = "FALSE")]
    Fail,
}

impl Verdict {
    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Pass => "TRUE",
            Verdict::Fail => "FALSE",
        })
    }
}

/// Case-insensitive exact match between the expected and actual attribute strings.
///
/// Whitespace and punctuation are compared as-is, so a reply carrying the right
/// data in a different surface format (e.g. phone digit grouping) still fails.
pub fn evaluate(expected: &str, actual: &str) -> Verdict {
    if expected.to_lowercase() == actual.to_lowercase() {
        Verdict::Pass
    } else {
        Verdict::Fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::INVALID_FORMAT;

    #[test]
    fn test_case_insensitive_match() {
        assert_eq!(
            evaluate(
                "Email: a@b.com | Phone: N/A | Move date: N/A",
                "email: A@B.COM | phone: n/a | move date: n/a"
            ),
            Verdict::Pass
        );
    }

    #[test]
    fn test_whitespace_difference_fails() {
        assert_eq!(
            evaluate(
                "Email: N/A | Phone: 111, 222 | Move date: N/A",
                "Email: N/A | Phone: 111,222 | Move date: N/A"
            ),
            Verdict::Fail
        );
    }

    #[test]
    fn test_invalid_format_fails_against_real_expectation() {
        assert_eq!(
            evaluate("Email: N/A | Phone: N/A | Move date: N/A", INVALID_FORMAT),
            Verdict::Fail
        );
    }

    #[test]
    fn test_invalid_format_matches_literal_expectation() {
        assert_eq!(evaluate("invalid FORMAT", INVALID_FORMAT), Verdict::Pass);
    }

    #[test]
    fn test_verdict_renders_as_upper_case_bool() {
        assert_eq!(Verdict::Pass.to_string(), "TRUE");
        assert_eq!(Verdict::Fail.to_string(), "FALSE");
        assert!(Verdict::Pass.is_pass());
        assert!(!Verdict::Fail.is_pass());
    }
}
