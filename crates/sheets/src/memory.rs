use crate::{rowcol_to_a1, SheetsResult, TabularSink};
use intake_core::{CellUpdate, CellValue};
use std::cell::RefCell;

/// An in-memory sheet.
///
/// Keeps cell text as the sheet would display it and records every update it receives.
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: RefCell<Vec<Vec<String>>>,
    updates: RefCell<Vec<CellUpdate>>,
}

impl MemorySink {
    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: RefCell::new(rows),
            updates: RefCell::new(Vec::new()),
        }
    }

    /// Every update received so far, in order.
    pub fn updates(&self) -> Vec<CellUpdate> {
        self.updates.borrow().clone()
    }

    /// Displayed text of a 1-based cell, if the sheet extends that far.
    pub fn cell(&self, row: u32, col: u32) -> Option<String> {
        let rows = self.rows.borrow();
        let r = rows.get(usize::try_from(row).ok()?.checked_sub(1)?)?;
        r.get(usize::try_from(col).ok()?.checked_sub(1)?).cloned()
    }
}

impl TabularSink for MemorySink {
    fn all_values(&self) -> SheetsResult<Vec<Vec<String>>> {
        Ok(self.rows.borrow().clone())
    }

    fn batch_update(&self, updates: &[CellUpdate]) -> SheetsResult<()> {
        for update in updates {
            rowcol_to_a1(update.row, update.col)?;
        }

        let mut rows = self.rows.borrow_mut();
        for update in updates {
            // null leaves the cell untouched
            if update.value == CellValue::Empty {
                continue;
            }
            let r = update.row as usize - 1;
            let c = update.col as usize - 1;
            if rows.len() <= r {
                rows.resize_with(r + 1, Vec::new);
            }
            if rows[r].len() <= c {
                rows[r].resize(c + 1, String::new());
            }
            rows[r][c] = update.value.to_string();
        }

        self.updates.borrow_mut().extend_from_slice(updates);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SheetsError;

    #[test]
    fn writes_extend_ragged_rows() {
        let sink = MemorySink::with_rows(vec![vec!["Operator".into()]]);
        sink.batch_update(&[
            CellUpdate {
                row: 3,
                col: 2,
                value: CellValue::from("8842021"),
            },
            CellUpdate {
                row: 3,
                col: 4,
                value: CellValue::Bool(false),
            },
        ])
        .expect("update");

        assert_eq!(sink.cell(3, 2).as_deref(), Some("8842021"));
        assert_eq!(sink.cell(3, 3).as_deref(), Some(""));
        assert_eq!(sink.cell(3, 4).as_deref(), Some("FALSE"));
        assert_eq!(sink.cell(2, 1), None);
        assert_eq!(sink.updates().len(), 2);
    }

    #[test]
    fn rejects_zero_based_positions_without_writing() {
        let sink = MemorySink::default();
        let err = sink
            .batch_update(&[
                CellUpdate {
                    row: 1,
                    col: 1,
                    value: CellValue::from("ok"),
                },
                CellUpdate {
                    row: 0,
                    col: 1,
                    value: CellValue::from("bad"),
                },
            ])
            .expect_err("row 0 is invalid");
        assert!(matches!(err, SheetsError::InvalidCell { row: 0, col: 1 }));
        assert!(sink.updates().is_empty());
        assert_eq!(sink.cell(1, 1), None);
    }
}
