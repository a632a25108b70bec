//! A1 notation for 1-based cell positions.

use crate::{SheetsError, SheetsResult};

/// Column letters for a 1-based column number (`1` → `A`, `27` → `AA`).
pub fn column_letters(col: u32) -> Option<String> {
    if col == 0 {
        return None;
    }

    let mut letters = Vec::new();
    let mut n = col;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push(char::from(b'A' + rem));
        n = (n - 1) / 26;
    }
    Some(letters.into_iter().rev().collect())
}

/// A1 label for a 1-based row and column (`(12, 11)` → `K12`).
pub fn rowcol_to_a1(row: u32, col: u32) -> SheetsResult<String> {
    match (row, column_letters(col)) {
        (1.., Some(letters)) => Ok(format!("{letters}{row}")),
        _ => Err(SheetsError::InvalidCell { row, col }),
    }
}
