/// The outcome of checking a student's answer for units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitCheckResult {
    /// Whether one of the expected units appears in the answer.
    pub units_match: bool,

    /// Lists the expected units when none of them appear.
    pub detail: Option<String>,
}

impl UnitCheckResult {
    /// A passing result.
    pub fn pass() -> Self {
        Self { units_match: true, detail: None }
    }
}

/// Checks that at least one of the expected units appears in the raw text of an answer.
///
/// The check is a case-insensitive substring search, so `m` is found in `5 km/h`. No units
/// expected always passes.
pub fn check_units(raw: &str, expected: Option<&[String]>) -> UnitCheckResult {
    let expected = match expected {
        Some(expected) if !expected.is_empty() => expected,
        _ => return UnitCheckResult::pass(),
    };

    let haystack = raw.to_lowercase();
    if expected.iter().any(|unit| haystack.contains(&unit.to_lowercase())) {
        UnitCheckResult::pass()
    } else {
        UnitCheckResult {
            units_match: false,
            detail: Some(format!("Expected units: {}", expected.join(", "))),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn check(raw: &str, units: &[&str]) -> UnitCheckResult {
        let units = units.iter().map(|unit| unit.to_string()).collect::<Vec<_>>();
        check_units(raw, Some(units.as_slice()))
    }

    #[test]
    fn found() {
        assert_eq!(check("the answer is 5 m/s", &["m/s"]), UnitCheckResult::pass());
        assert_eq!(check("9.8 M/S^2", &["kg", "m/s"]), UnitCheckResult::pass());
    }

    #[test]
    fn missing() {
        assert_eq!(check("the answer is 5 km/h", &["m/s", "mph"]), UnitCheckResult {
            units_match: false,
            detail: Some("Expected units: m/s, mph".to_owned()),
        });
    }

    #[test]
    fn detail_keeps_casing() {
        let result = check("5", &["kPa", "N"]);
        assert_eq!(result.detail.as_deref(), Some("Expected units: kPa, N"));
    }

    #[test]
    fn lexical_match() {
        // `m` is inside `km`
        assert_eq!(check("5 km", &["m"]), UnitCheckResult::pass());
    }

    #[test]
    fn nothing_expected() {
        assert_eq!(check_units("5", None), UnitCheckResult::pass());
        assert_eq!(check("5", &[]), UnitCheckResult::pass());
    }
}
