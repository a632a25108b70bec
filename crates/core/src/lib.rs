//! # Intake Core
//!
//! Core logic for turning a referral document's text into a spreadsheet row.
//!
//! This crate contains pure data operations:
//! - Authorization status classification and field extraction from the document's lines
//! - The [`Referral`] record
//! - Formatting a referral into cell updates for the intake sheet
//! - Startup configuration (sheet location, operator mapping)
//!
//! **No I/O collaborators**: PDF text extraction lives in `intake-document` and the
//! spreadsheet client in `intake-sheets`.

pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod formatter;
pub mod referral;
pub mod rules;
pub mod status;

#[cfg(test)]
mod fixtures;

pub use config::{IntakeConfig, OperatorDirectory};
pub use error::{IntakeError, IntakeResult};
pub use extractor::{Extractor, PatientIdentity};
pub use formatter::{CellUpdate, CellValue, ColumnLayout, RecordFormatter};
pub use referral::Referral;
pub use rules::{DateRules, LineRule, RuleTable};
pub use status::AuthorizationState;

// Re-export the validated primitives used in the public API.
pub use referral_types::{HcpcsCode, NonEmptyText, TextError};

/// Extract a referral from document lines with the default template rules.
///
/// # Errors
///
/// Returns an [`IntakeError`] naming the field that failed; no partial record is produced.
pub fn extract_referral<S: AsRef<str>>(
    lines: &[S],
    operator_identity: NonEmptyText,
) -> IntakeResult<Referral> {
    Extractor::default().extract(lines, operator_identity)
}

/// Format `referral` for `row` with the default sheet layout.
pub fn format_referral(referral: &Referral, row: u32) -> IntakeResult<Vec<CellUpdate>> {
    RecordFormatter::default().format(referral, row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracted_referral_formats_into_a_row() {
        let lines = fixtures::authorized().lines();
        let operator = NonEmptyText::new("Justice").unwrap();
        let referral = extract_referral(&lines, operator).expect("extract");
        let cells = format_referral(&referral, 12).expect("format");

        let codes: Vec<String> = cells
            .iter()
            .filter(|c| c.col >= 11)
            .map(|c| c.value.to_string())
            .collect();
        assert_eq!(codes, ["A4604", "E0601"]);
        assert!(cells.iter().all(|c| c.row == 12));
    }

    #[test]
    fn referral_round_trips_through_json() {
        let lines = fixtures::denied().lines();
        let operator = NonEmptyText::new("Charles").unwrap();
        let referral = extract_referral(&lines, operator).unwrap();

        let json = serde_json::to_string(&referral).unwrap();
        assert!(json.contains("\"status\":\"DENIED\""));
        let back: Referral = serde_json::from_str(&json).unwrap();
        assert_eq!(back, referral);
    }

    #[test]
    fn unknown_status_in_json_is_rejected() {
        let json = r#"{
            "operator_identity": "Charles",
            "reference_number": "1",
            "received_date": "03/01/2024",
            "is_urgent": true,
            "status": "PENDING",
            "patient_name": "Jane Doe",
            "patient_identifier": "MRN1",
            "date_of_birth": null,
            "procedure_codes": []
        }"#;
        let err = serde_json::from_str::<Referral>(json).expect_err("unknown status");
        assert!(err.to_string().contains("PENDING"));
    }
}
