//! Write cursor and A1-style cell address parsing.

use std::fmt;

/// Position where the next block starts. Both coordinates are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteCursor {
    pub row: usize,
    pub column: usize,
}

impl WriteCursor {
    pub const ORIGIN: WriteCursor = WriteCursor { row: 1, column: 1 };

    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Move down `rows` rows; the column is fixed for the whole run.
    pub fn advance(self, rows: usize) -> Self {
        Self {
            row: self.row + rows,
            column: self.column,
        }
    }
}

impl Default for WriteCursor {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for WriteCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.column), self.row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("empty address")]
    Empty,

    #[error("malformed address")]
    Malformed,

    #[error("row and column must be at least 1")]
    Zero,
}

/// Column number (1-based) to letters: 1 → A, 27 → AA.
pub fn column_letters(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Parse an A1-style address into (row, column).
///
/// Accepts `B3`, `$B$3`, lowercase letters, an optional `Sheet!` prefix and
/// a range (`B3:D9`), of which only the top-left cell is used. Bounds are
/// not checked here; that is the grid's job.
pub fn parse_a1(address: &str) -> Result<(usize, usize), AddressError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(AddressError::Empty);
    }
    let without_sheet = match trimmed.rfind('!') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    };
    let cell = without_sheet.split(':').next().unwrap_or_default();
    let cell: String = cell.chars().filter(|c| *c != '$').collect();

    let split = cell
        .find(|c: char| c.is_ascii_digit())
        .ok_or(AddressError::Malformed)?;
    let (letters, digits) = cell.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AddressError::Malformed);
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AddressError::Malformed);
    }

    let mut column: usize = 0;
    for c in letters.chars() {
        let value = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        column = column
            .checked_mul(26)
            .and_then(|v| v.checked_add(value))
            .ok_or(AddressError::Malformed)?;
    }
    let row: usize = digits.parse().map_err(|_| AddressError::Malformed)?;
    if row == 0 || column == 0 {
        return Err(AddressError::Zero);
    }
    Ok((row, column))
}
