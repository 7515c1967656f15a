//! CSV export of the candidate dataset

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt::Write;

use crate::fixtures::Candidate;
use crate::AppState;

/// Fixed column order; changing this changes the export format
const COLUMNS: [&str; 6] = [
    "name",
    "years_experience",
    "education",
    "qualification_score",
    "bias_flags",
    "country",
];

/// GET /api/export
///
/// Serves the full normalized collection as a CSV attachment. An empty
/// collection yields the header row only.
pub async fn export_csv(State(state): State<AppState>) -> Result<Response, ExportError> {
    let csv = candidates_to_csv(state.store.get_all())
        .map_err(|e| ExportError(format!("CSV serialization failed: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=individuals.csv",
            ),
        ],
        csv,
    )
        .into_response())
}

/// Serialize candidates to CSV with RFC-4180-style quoting
pub fn candidates_to_csv(candidates: &[Candidate]) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{}", COLUMNS.join(","))?;

    for candidate in candidates {
        let row = [
            escape_field(&candidate.name),
            candidate.years_experience.to_string(),
            escape_field(candidate.education.as_str()),
            candidate.qualification_score.to_string(),
            escape_field(&candidate.bias_flags.join(";")),
            escape_field(&candidate.country),
        ];
        writeln!(out, "{}", row.join(","))?;
    }

    Ok(out)
}

/// Quote a field when it contains a comma, quote, or newline
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// 500 response carrying the serialization failure message
#[derive(Debug)]
pub struct ExportError(pub String);

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.0,
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::EducationLevel;

    fn candidate(name: &str) -> Candidate {
        Candidate {
            name: name.to_string(),
            years_experience: 6,
            education: EducationLevel::Masters,
            qualification_score: 72.5,
            bias_flags: vec!["gender".to_string(), "migrant".to_string()],
            country: "france".to_string(),
        }
    }

    #[test]
    fn empty_collection_yields_header_only() {
        let csv = candidates_to_csv(&[]).expect("csv");
        assert_eq!(
            csv,
            "name,years_experience,education,qualification_score,bias_flags,country\n"
        );
    }

    #[test]
    fn rows_follow_the_fixed_column_order() {
        let csv = candidates_to_csv(&[candidate("Ana")]).expect("csv");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Ana,6,Masters,72.5,gender;migrant,france");
    }

    #[test]
    fn fields_with_commas_and_quotes_are_escaped() {
        let mut tricky = candidate("Doe, Jane \"JJ\"");
        tricky.bias_flags = vec![];
        let csv = candidates_to_csv(&[tricky]).expect("csv");
        assert!(csv.contains("\"Doe, Jane \"\"JJ\"\"\",6,Masters,72.5,,france"));
    }

    #[test]
    fn export_is_deterministic() {
        let input = [candidate("A"), candidate("B")];
        assert_eq!(
            candidates_to_csv(&input).expect("csv"),
            candidates_to_csv(&input).expect("csv")
        );
    }
}
