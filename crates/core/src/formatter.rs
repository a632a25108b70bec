//! Conversion of a [`Referral`] into cell updates for the intake sheet.
//!
//! The sheet has a fixed column layout, a status dropdown with a closed vocabulary and
//! three procedure code columns. When the codes do not fit, the last code column carries a
//! `true` flag meaning "more codes exist than are shown".

use crate::constants::{CODE_SLOTS, STATUS_DROPDOWN};
use crate::error::{IntakeError, IntakeResult};
use crate::referral::Referral;
use crate::status::AuthorizationState;
use serde::{Deserialize, Serialize};

/// A value written to one cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Bool(bool),
    /// Serialised as `null`, which leaves the cell untouched.
    Empty,
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Bool(true) => f.write_str("TRUE"),
            CellValue::Bool(false) => f.write_str("FALSE"),
            CellValue::Empty => Ok(()),
        }
    }
}

/// One cell write, 1-based row and column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellUpdate {
    pub row: u32,
    pub col: u32,
    pub value: CellValue,
}

/// 1-based sheet columns for each referral field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnLayout {
    pub operator_identity: u32,
    pub reference_number: u32,
    pub received_date: u32,
    pub is_urgent: u32,
    pub status: u32,
    pub patient_name: u32,
    pub patient_identifier: u32,
    pub date_of_birth: u32,
    /// First of [`CODE_SLOTS`] consecutive columns.
    pub procedure_codes: u32,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            operator_identity: 1,
            reference_number: 2,
            received_date: 3,
            is_urgent: 4,
            status: 6,
            patient_name: 8,
            patient_identifier: 9,
            date_of_birth: 10,
            procedure_codes: 11,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RecordFormatter {
    layout: ColumnLayout,
    status_vocabulary: Vec<String>,
}

impl Default for RecordFormatter {
    fn default() -> Self {
        Self::new(ColumnLayout::default())
    }
}

impl RecordFormatter {
    pub fn new(layout: ColumnLayout) -> Self {
        Self {
            layout,
            status_vocabulary: STATUS_DROPDOWN.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the accepted status labels, for sheets whose dropdown differs.
    pub fn with_status_vocabulary<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.status_vocabulary = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Map a status to its dropdown label.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidStatus`] naming the label and the accepted set when the
    /// label is not in the sheet's dropdown vocabulary.
    pub fn normalize_status(&self, status: AuthorizationState) -> IntakeResult<&'static str> {
        let label = status.label();
        if self.status_vocabulary.iter().any(|accepted| accepted == label) {
            Ok(label)
        } else {
            Err(IntakeError::InvalidStatus {
                value: label.to_string(),
                accepted: self.status_vocabulary.clone(),
            })
        }
    }

    /// Produce the cell updates for `referral` on `row`, in column order.
    pub fn format(&self, referral: &Referral, row: u32) -> IntakeResult<Vec<CellUpdate>> {
        let layout = &self.layout;
        let status = self.normalize_status(referral.status)?;

        let date_of_birth = match &referral.date_of_birth {
            Some(dob) => CellValue::from(dob.as_str()),
            None => CellValue::Empty,
        };

        let mut cells = vec![
            (layout.operator_identity, CellValue::from(referral.operator_identity.as_str())),
            (layout.reference_number, referral.reference_number.as_str().into()),
            (layout.received_date, referral.received_date.as_str().into()),
            (layout.is_urgent, referral.is_urgent.into()),
            (layout.status, status.into()),
            (layout.patient_name, referral.patient_name.as_str().into()),
            (layout.patient_identifier, referral.patient_identifier.as_str().into()),
            (layout.date_of_birth, date_of_birth),
        ];

        for (offset, value) in code_slots(referral).into_iter().enumerate() {
            cells.push((layout.procedure_codes + offset as u32, value));
        }

        cells.sort_by_key(|(col, _)| *col);

        Ok(cells
            .into_iter()
            .map(|(col, value)| CellUpdate { row, col, value })
            .collect())
    }
}

/// Values for the procedure code columns.
///
/// With fewer codes than slots each code gets its own column. Otherwise the first
/// `CODE_SLOTS - 1` codes are shown and the last slot holds `true`.
fn code_slots(referral: &Referral) -> Vec<CellValue> {
    let codes = referral.procedure_codes.iter().map(|c| CellValue::from(c.as_str()));

    if referral.procedure_codes.len() < CODE_SLOTS {
        return codes.collect();
    }

    codes
        .take(CODE_SLOTS - 1)
        .chain(std::iter::once(CellValue::Bool(true)))
        .collect()
}
