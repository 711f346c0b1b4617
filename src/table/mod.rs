mod normalize;
mod roles;

pub use normalize::{normalize, normalize_column_name, parse_amount, parse_date};
pub use roles::ColumnRole;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Table as produced by ingestion: header strings plus raw text cells.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Short rows are padded with empty cells; extra cells are dropped.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }
}

/// A typed cell after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Date(NaiveDateTime),
    Amount(Decimal),
    Text(String),
    Missing,
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    pub fn as_amount(&self) -> Option<Decimal> {
        match self {
            CellValue::Amount(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

static MISSING: CellValue = CellValue::Missing;

/// Normalized ledger: unique snake_case column names and typed rows.
///
/// Rows are stored positionally; `rows[i][j]` belongs to `columns[j]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RecordTable {
    /// Builds a table, padding or truncating rows to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Missing);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row {
            table: self,
            cells,
        })
    }

    /// Returns a new table holding only the rows accepted by `keep`.
    pub fn filter_rows<F>(&self, mut keep: F) -> RecordTable
    where
        F: FnMut(&Row<'_>) -> bool,
    {
        let rows = self
            .rows()
            .filter(|row| keep(row))
            .map(|row| row.cells.to_vec())
            .collect();
        RecordTable {
            columns: self.columns.clone(),
            rows,
        }
    }
}

/// Borrowed view of one row that allows lookup by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a RecordTable,
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    /// Cell for `column`, or `Missing` when the table has no such column.
    pub fn get(&self, column: &str) -> &'a CellValue {
        match self.table.column_index(column) {
            Some(idx) => &self.cells[idx],
            None => &MISSING,
        }
    }

    pub fn cells(&self) -> &'a [CellValue] {
        self.cells
    }
}
