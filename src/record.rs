use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date format used by the source sheet (`DD/MM/YYYY`).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Columns the source table must provide, in the fixed internal order.
///
/// The sheet may list them in any order and may carry extra columns;
/// everything outside this list is discarded during normalization.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "Date", "Name", "Phone", "thuTuc", "Status", "Done", "CTV", "User", "Password",
];

/// One row of collaborator activity, normalized from the raw sheet.
///
/// `login_user`/`login_password` are credential columns co-located with
/// activity data in the source sheet. That layout is inherited as-is for
/// behavioral parity with the upstream data model; they are never rendered
/// in the display table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Calendar date of the activity (no time component)
    pub date: NaiveDate,

    /// Customer name, free text
    pub name: String,

    /// Customer phone, free text
    pub phone: String,

    /// Service/procedure type, free text
    pub procedure: String,

    /// Case/document state; opaque label, only tallied
    pub status: String,

    /// Payment state; opaque label except for the paid marker
    pub payment_state: String,

    /// Collaborator (CTV) this row belongs to
    pub collaborator_id: String,

    /// Login name stored on the row
    pub login_user: String,

    /// Plaintext password stored on the row
    pub login_password: String,
}

impl Record {
    /// Render the record's date back in the sheet's `DD/MM/YYYY` format.
    pub fn display_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Result of normalizing a raw table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Records with a valid date, restricted to the required columns
    pub records: Vec<Record>,

    /// Data rows discarded because their date cell did not parse
    pub dropped_rows: usize,
}

/// Errors produced while normalizing a fetched table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// One or more required columns are absent from the header row
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Convert a raw table into typed records.
///
/// The first row is the header; remaining rows are data. Lookup is by
/// header name, so source column order does not matter. Rows whose date
/// cell fails to parse under [`DATE_FORMAT`] are dropped entirely and
/// counted in [`Normalized::dropped_rows`] — a bad date never defaults to
/// "today" and never produces a half-populated record.
///
/// # Arguments
/// * `table` - Rectangular table of strings, header first
///
/// # Returns
/// * `Ok(Normalized)` - Valid records plus the dropped-row count
/// * `Err(NormalizeError::MissingColumns)` - Naming every absent column
///
/// # Examples
/// ```
/// use ctv_dashboard::record::normalize;
///
/// let table = vec![
///     vec!["Date", "Name", "Phone", "thuTuc", "Status", "Done", "CTV", "User", "Password"]
///         .into_iter().map(String::from).collect::<Vec<_>>(),
///     vec!["05/01/2024", "Lan", "0901", "visa", "Mới", "Đã thanh toán", "ctv01", "lan", "pw"]
///         .into_iter().map(String::from).collect::<Vec<_>>(),
/// ];
/// let normalized = normalize(&table).unwrap();
/// assert_eq!(normalized.records.len(), 1);
/// assert_eq!(normalized.records[0].display_date(), "05/01/2024");
/// ```
pub fn normalize(table: &[Vec<String>]) -> Result<Normalized, NormalizeError> {
    // No rows, or header only: empty result, not an error
    let Some(header) = table.first() else {
        return Ok(Normalized::default());
    };

    let mut indices = Vec::with_capacity(REQUIRED_COLUMNS.len());
    let mut missing = Vec::new();
    for name in REQUIRED_COLUMNS {
        match header.iter().position(|cell| cell == name) {
            Some(idx) => indices.push(idx),
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(NormalizeError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    let mut dropped_rows = 0usize;

    for row in &table[1..] {
        // The Sheets API omits trailing empty cells, so a short row is a
        // row with empty values, not a malformed one.
        let cell = |idx: usize| row.get(indices[idx]).map(String::as_str).unwrap_or("");

        let date = match NaiveDate::parse_from_str(cell(0), DATE_FORMAT) {
            Ok(date) => date,
            Err(_) => {
                dropped_rows += 1;
                continue;
            }
        };

        records.push(Record {
            date,
            name: cell(1).to_string(),
            phone: cell(2).to_string(),
            procedure: cell(3).to_string(),
            status: cell(4).to_string(),
            payment_state: cell(5).to_string(),
            collaborator_id: cell(6).to_string(),
            login_user: cell(7).to_string(),
            login_password: cell(8).to_string(),
        });
    }

    if dropped_rows > 0 {
        log::warn!("dropped {} rows with unparseable dates", dropped_rows);
    }

    Ok(Normalized {
        records,
        dropped_rows,
    })
}
