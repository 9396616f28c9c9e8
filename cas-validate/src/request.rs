use crate::{
    equivalence::check_equivalence,
    error::ParseError,
    form::parse,
    units::check_units,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A request to validate a student's answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidationRequest {
    /// The student's answer.
    pub student_expression: String,

    /// The correct answer.
    pub reference_expression: String,

    /// Names of the variables in the answers. These are informational only.
    #[serde(default)]
    pub variables: Option<Vec<String>>,

    /// Units, one of which must appear in the student's answer.
    #[serde(default)]
    pub expected_units: Option<Vec<String>>,
}

/// The result of validating a student's answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidationResponse {
    /// Whether the answers are equivalent.
    pub equivalent: bool,

    /// `"Expressions are equivalent"` or `"Expressions differ"`.
    pub equivalence_detail: String,

    /// Whether the expected units were found.
    pub units_match: bool,

    /// Lists the expected units if they were not found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units_detail: Option<String>,
}

/// Validates a student's answer against the reference answer.
///
/// Only a malformed answer is an error. The student's answer is parsed first, so its error is
/// reported if both are malformed.
pub fn validate(request: &ValidationRequest) -> Result<ValidationResponse, ParseError> {
    if let Some(variables) = &request.variables {
        debug!(?variables, "declared variables");
    }

    let student = parse(&request.student_expression)?;
    let reference = parse(&request.reference_expression)?;

    let equivalence = check_equivalence(&student, &reference);
    let units = check_units(&request.student_expression, request.expected_units.as_deref());
    debug!(
        equivalent = equivalence.equivalent,
        method = ?equivalence.method,
        units_match = units.units_match,
        "validated answer",
    );

    Ok(ValidationResponse {
        equivalent: equivalence.equivalent,
        equivalence_detail: equivalence.detail().to_owned(),
        units_match: units.units_match,
        units_detail: units.detail,
    })
}
