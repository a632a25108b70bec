//! The extracted referral record.

use crate::status::AuthorizationState;
use referral_types::{HcpcsCode, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One referral document, normalised for the intake sheet.
///
/// Created once by the extractor and handed unmodified to the formatter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
    /// Display name of the person running the intake.
    pub operator_identity: NonEmptyText,
    pub reference_number: String,
    /// Kept verbatim; the format differs between templates.
    pub received_date: String,
    pub is_urgent: bool,
    pub status: AuthorizationState,
    /// "First Last" order.
    pub patient_name: String,
    /// Medical record number, or the manual review sentinel.
    pub patient_identifier: String,
    pub date_of_birth: Option<String>,
    /// Deduplicated, in lexicographic order.
    pub procedure_codes: BTreeSet<HcpcsCode>,
}

impl Referral {
    /// Write the record to the log, one field per line.
    pub fn log(&self) {
        let urgency = if self.is_urgent { "Urgent" } else { "Routine" };
        let codes: Vec<&str> = self.procedure_codes.iter().map(HcpcsCode::as_str).collect();

        tracing::info!("Caller: {}", self.operator_identity);
        tracing::info!("Referral: {}", self.reference_number);
        tracing::info!("Date received: {}", self.received_date);
        tracing::info!("Urgency: {}", urgency);
        tracing::info!("Auth. Status: {}", self.status);
        tracing::info!("Patient name: {}", self.patient_name);
        tracing::info!("Patient MRN: {}", self.patient_identifier);
        tracing::info!(
            "Patient Date of Birth: {}",
            self.date_of_birth.as_deref().unwrap_or("<none>")
        );
        tracing::info!("HCPCS code(s): {}", codes.join(", "));
    }
}
