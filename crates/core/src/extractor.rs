//! Field extraction from a referral's text lines.
//!
//! The input is the ordered line sequence of one document, each line still carrying its
//! `\n` terminator. The authorization status is classified first; it decides which
//! rules apply to the received date and date of birth.

use crate::constants::{MANUAL_REVIEW_SENTINEL, PROCEDURE_CODE_PATTERN, ROUTINE_LABEL};
use crate::error::{IntakeError, IntakeResult};
use crate::referral::Referral;
use crate::rules::{LineRule, RuleTable};
use crate::status::AuthorizationState;
use referral_types::{HcpcsCode, NonEmptyText};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static PROCEDURE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(PROCEDURE_CODE_PATTERN).expect("procedure code pattern is valid")
});

/// Patient name and identifier read from the patient line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientIdentity {
    pub name: String,
    pub identifier: String,
}

/// Builds [`Referral`] records from document lines using a [`RuleTable`].
#[derive(Clone, Debug, Default)]
pub struct Extractor {
    rules: RuleTable,
}

impl Extractor {
    pub fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Extract a complete referral.
    ///
    /// Any field failure aborts the whole document; no partial record is returned.
    ///
    /// # Errors
    ///
    /// Returns an [`IntakeError`] naming the field that could not be extracted, or
    /// [`IntakeError::UnrecognisedStatus`] if the status line matches no known label.
    pub fn extract<S: AsRef<str>>(
        &self,
        lines: &[S],
        operator_identity: NonEmptyText,
    ) -> IntakeResult<Referral> {
        let status = self.status(lines)?;
        let reference_number = self.reference_number(lines)?;
        let received_date = self.received_date(lines, status)?;
        let is_urgent = self.is_urgent(lines)?;
        let patient = self.patient(lines)?;
        let date_of_birth = self.date_of_birth(lines, status)?;
        let procedure_codes = procedure_codes(lines)?;

        tracing::debug!(
            %status,
            reference_number = %reference_number,
            codes = procedure_codes.len(),
            "extracted referral"
        );

        Ok(Referral {
            operator_identity,
            reference_number,
            received_date,
            is_urgent,
            status,
            patient_name: patient.name,
            patient_identifier: patient.identifier,
            date_of_birth,
            procedure_codes,
        })
    }

    /// Classify the document's authorization status.
    pub fn status<S: AsRef<str>>(&self, lines: &[S]) -> IntakeResult<AuthorizationState> {
        let text = required(&self.rules.status, lines, "status")?;
        AuthorizationState::classify(&text).ok_or(IntakeError::UnrecognisedStatus { text })
    }

    pub fn reference_number<S: AsRef<str>>(&self, lines: &[S]) -> IntakeResult<String> {
        required(&self.rules.reference_number, lines, "reference_number")
    }

    /// Read the received date from the line used by the `status` layout.
    ///
    /// Only authorized and denied layouts have a known received-date position.
    pub fn received_date<S: AsRef<str>>(
        &self,
        lines: &[S],
        status: AuthorizationState,
    ) -> IntakeResult<String> {
        const FIELD: &str = "received_date";
        match self.rules.date_rules(status) {
            Some(rules) => required(&rules.received_date, lines, FIELD),
            None => Err(IntakeError::UnsupportedStatus {
                field: FIELD,
                status,
            }),
        }
    }

    /// Anything other than exactly "Routine" is urgent.
    pub fn is_urgent<S: AsRef<str>>(&self, lines: &[S]) -> IntakeResult<bool> {
        let urgency = required(&self.rules.urgency, lines, "urgency")?;
        Ok(urgency != ROUTINE_LABEL)
    }

    /// Read "Last, First ... (identifier)" and reorder the name to "First Last".
    ///
    /// An identifier containing `<` comes from a redaction overlay and is replaced by the
    /// manual review sentinel.
    pub fn patient<S: AsRef<str>>(&self, lines: &[S]) -> IntakeResult<PatientIdentity> {
        const FIELD: &str = "patient_name";
        let line = required(&self.rules.patient, lines, FIELD)?;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let (last, first) = match tokens.as_slice() {
            [last, first, ..] => (*last, *first),
            _ => {
                return Err(IntakeError::MissingToken {
                    field: FIELD,
                    index: line_index(&self.rules.patient),
                    token: 1,
                })
            }
        };
        let name = format!("{first} {last}").replace(',', "");

        let raw_identifier = tokens[tokens.len() - 1];
        let identifier = if raw_identifier.contains('<') {
            tracing::warn!(
                raw = raw_identifier,
                "patient identifier is obscured, flagging for manual review"
            );
            MANUAL_REVIEW_SENTINEL.to_string()
        } else {
            raw_identifier.trim_start_matches('(').replace(')', "")
        };

        Ok(PatientIdentity { name, identifier })
    }

    /// Locate the date of birth for the `status` layout.
    ///
    /// Authorized documents take the line after the first "Birth: " anchor; denied
    /// documents take the value on the last line containing "Birth:". Other layouts have
    /// no date of birth.
    pub fn date_of_birth<S: AsRef<str>>(
        &self,
        lines: &[S],
        status: AuthorizationState,
    ) -> IntakeResult<Option<String>> {
        match self.rules.date_rules(status) {
            Some(rules) => rules.date_of_birth.locate(lines, "date_of_birth"),
            None => Ok(None),
        }
    }
}

/// Collect every procedure code that ends a line, anywhere in the document.
pub fn procedure_codes<S: AsRef<str>>(lines: &[S]) -> IntakeResult<BTreeSet<HcpcsCode>> {
    let mut codes = BTreeSet::new();
    for line in lines {
        for found in PROCEDURE_CODE_RE.find_iter(line.as_ref()) {
            codes.insert(HcpcsCode::new(found.as_str())?);
        }
    }
    Ok(codes)
}

fn required<S: AsRef<str>>(
    rule: &LineRule,
    lines: &[S],
    field: &'static str,
) -> IntakeResult<String> {
    rule.locate(lines, field)?
        .ok_or(IntakeError::FieldNotFound { field })
}

fn line_index(rule: &LineRule) -> usize {
    match *rule {
        LineRule::Fixed { index } | LineRule::Token { index, .. } => index,
        LineRule::AnchorThenNext { from, .. } | LineRule::AnchorSplit { from, .. } => from,
    }
}
