//! # Intake Sheets
//!
//! The spreadsheet side of intake: where a referral row goes and how it gets there.
//!
//! - [`TabularSink`] abstracts the sheet: read all values, write a batch of cells.
//! - [`GoogleSheetsClient`] talks to the Google Sheets values API.
//! - [`MemorySink`] keeps the sheet in memory for tests and dry runs.
//! - [`submit_referral`] finds the next writable row and writes a formatted referral to it.

mod a1;
mod google;
mod memory;

pub use a1::{column_letters, rowcol_to_a1};
pub use google::GoogleSheetsClient;
pub use memory::MemorySink;

use intake_core::{CellUpdate, IntakeError, RecordFormatter, Referral};

/// Errors returned while reading from or writing to a sheet.
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("unable to find writeable row")]
    NoWritableRow,

    #[error("sheet request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sheet API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid cell position row {row}, column {col}")]
    InvalidCell { row: u32, col: u32 },

    #[error(transparent)]
    Intake(#[from] IntakeError),
}

pub type SheetsResult<T> = Result<T, SheetsError>;

/// A tabular store that accepts referral rows.
pub trait TabularSink {
    /// All populated rows, top to bottom. Rows may be ragged; missing cells are empty.
    fn all_values(&self) -> SheetsResult<Vec<Vec<String>>>;

    /// Write every update in one request.
    fn batch_update(&self, updates: &[CellUpdate]) -> SheetsResult<()>;
}

/// Find the row to write the next referral to.
///
/// Scanning upward from the last populated row, returns the 1-based number of the first
/// row whose marker column (column A) is empty. The header row is never chosen.
pub fn find_last_empty_row(values: &[Vec<String>]) -> Option<u32> {
    (1..values.len())
        .rev()
        .find(|&index| {
            values[index]
                .first()
                .map_or(true, |marker| marker.is_empty())
        })
        .map(|index| index as u32 + 1)
}

/// Write `referral` to the next writable row of `sink` and return that row.
///
/// # Errors
///
/// Returns [`SheetsError::NoWritableRow`] if every row below the header is taken, an
/// [`SheetsError::Intake`] if the referral cannot be formatted, or a transport error.
pub fn submit_referral<S: TabularSink + ?Sized>(
    sink: &S,
    formatter: &RecordFormatter,
    referral: &Referral,
) -> SheetsResult<u32> {
    let values = sink.all_values()?;
    let row = find_last_empty_row(&values).ok_or(SheetsError::NoWritableRow)?;

    let cells = formatter.format(referral, row)?;
    sink.batch_update(&cells)?;

    tracing::info!(
        row,
        cells = cells.len(),
        reference_number = %referral.reference_number,
        "wrote referral to sheet"
    );
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::{AuthorizationState, CellValue, HcpcsCode, NonEmptyText};

    fn rows(markers: &[&str]) -> Vec<Vec<String>> {
        markers
            .iter()
            .map(|m| vec![m.to_string(), "x".to_string()])
            .collect()
    }

    fn referral() -> Referral {
        Referral {
            operator_identity: NonEmptyText::new("Justice").unwrap(),
            reference_number: "8842021".into(),
            received_date: "03/01/2024".into(),
            is_urgent: true,
            status: AuthorizationState::Denied,
            patient_name: "Jane Doe".into(),
            patient_identifier: "MRN12345".into(),
            date_of_birth: None,
            procedure_codes: ["E0601", "A4604", "L3000", "K0001"]
                .iter()
                .map(|c| HcpcsCode::new(c).unwrap())
                .collect(),
        }
    }

    #[test]
    fn picks_lowest_empty_marker_row() {
        let values = rows(&["Operator", "Justice", "", "", "Charles"]);
        assert_eq!(find_last_empty_row(&values), Some(4));
    }

    #[test]
    fn treats_missing_marker_cell_as_empty() {
        let mut values = rows(&["Operator", "Justice"]);
        values.push(vec![]);
        values.push(vec!["Charles".into()]);
        assert_eq!(find_last_empty_row(&values), Some(3));
    }

    #[test]
    fn never_picks_the_header_row() {
        assert_eq!(find_last_empty_row(&rows(&["", "Justice", "Charles"])), None);
        assert_eq!(find_last_empty_row(&rows(&[""])), None);
        assert_eq!(find_last_empty_row(&[]), None);
    }

    #[test]
    fn submits_to_next_writable_row() {
        let sink = MemorySink::with_rows(rows(&["Operator", "Justice", "", "Charles"]));
        let row = submit_referral(&sink, &RecordFormatter::default(), &referral())
            .expect("submit");
        assert_eq!(row, 3);

        let written = sink.updates();
        assert!(written.iter().all(|c| c.row == 3));
        assert_eq!(sink.cell(3, 6), Some("Denied".to_string()));
        assert_eq!(sink.cell(3, 4), Some("TRUE".to_string()));
        assert_eq!(sink.cell(3, 11), Some("A4604".to_string()));
        assert_eq!(sink.cell(3, 12), Some("E0601".to_string()));
        assert_eq!(sink.cell(3, 13), Some("TRUE".to_string()));
        assert!(written
            .iter()
            .any(|c| c.col == 10 && c.value == CellValue::Empty));
    }

    #[test]
    fn consecutive_submissions_fill_upward() {
        let sink = MemorySink::with_rows(rows(&["Operator", "", "", "Charles"]));
        let formatter = RecordFormatter::default();

        assert_eq!(submit_referral(&sink, &formatter, &referral()).unwrap(), 3);
        assert_eq!(sink.cell(3, 1).as_deref(), Some("Justice"));
        assert_eq!(submit_referral(&sink, &formatter, &referral()).unwrap(), 2);
        assert!(matches!(
            submit_referral(&sink, &formatter, &referral()),
            Err(SheetsError::NoWritableRow)
        ));
    }

    #[test]
    fn full_sheet_is_an_error() {
        let sink = MemorySink::with_rows(rows(&["Operator", "Justice"]));
        let err = submit_referral(&sink, &RecordFormatter::default(), &referral())
            .expect_err("no empty row");
        assert!(matches!(err, SheetsError::NoWritableRow));
        assert!(sink.updates().is_empty());
    }

    #[test]
    fn formatting_failure_writes_nothing() {
        let sink = MemorySink::with_rows(rows(&["Operator", ""]));
        let formatter = RecordFormatter::default().with_status_vocabulary(["Authorized"]);
        let err = submit_referral(&sink, &formatter, &referral()).expect_err("Denied rejected");
        assert!(matches!(
            err,
            SheetsError::Intake(IntakeError::InvalidStatus { .. })
        ));
        assert!(sink.updates().is_empty());
    }
}
