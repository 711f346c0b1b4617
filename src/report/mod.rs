mod columns;
mod money;
mod summary;

pub use columns::{default_columns, display_label, RenderSpec};
pub use money::{format_currency, format_date, parse_currency, CURRENCY_PREFIX};
pub use summary::{AgingSummary, SummaryView};

use chrono::{NaiveDate, NaiveDateTime};

use crate::filter::FilterContext;
use crate::table::{CellValue, ColumnRole, RecordTable};

/// Status value that gets the highlight, compared case-insensitively.
pub const OPEN_STATUS: &str = "em aberto";

pub const NO_DATA_PLACEHOLDER: &str = "Nenhum dado disponível para exibição.";

/// Clock inputs for one render. Passed in so output is reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportContext {
    pub today: NaiveDate,
    pub generated_at: NaiveDateTime,
}

impl ReportContext {
    pub fn now() -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            today: now.date(),
            generated_at: now,
        }
    }
}

/// Background class of a body row. Depends only on the global row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShade {
    Plain,
    Alternate,
}

impl RowShade {
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            RowShade::Plain
        } else {
            RowShade::Alternate
        }
    }
}

pub fn is_open_status(text: &str) -> bool {
    text.to_lowercase() == OPEN_STATUS
}

/// Text of a cell as it appears in the report body.
pub fn stringify_cell(cell: &CellValue, column: &str) -> String {
    match cell {
        CellValue::Missing => String::new(),
        CellValue::Date(dt) => format_date(dt.date()),
        CellValue::Amount(v) if ColumnRole::Amount.matches(column) => format_currency(*v),
        CellValue::Amount(v) => v.to_string(),
        CellValue::Text(s) => s.clone(),
    }
}

/// Everything a renderer needs, computed once and shared by both output
/// formats so their data is identical.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedReport {
    pub filter_lines: Vec<String>,
    pub summary: Option<AgingSummary>,
    pub spec: RenderSpec,
    pub rows: Vec<Vec<String>>,
    pub status_column: Option<usize>,
    pub generated_at: NaiveDateTime,
}

impl PreparedReport {
    pub fn prepare(
        table: &RecordTable,
        filter: &FilterContext,
        selected: &[String],
        ctx: &ReportContext,
    ) -> Self {
        let spec = RenderSpec::resolve(selected, table);
        let summary = AgingSummary::compute(table, ctx.today);

        let rows = table
            .rows()
            .map(|row| {
                spec.columns
                    .iter()
                    .map(|col| stringify_cell(row.get(col), col))
                    .collect()
            })
            .collect();

        let status_column = ColumnRole::Status
            .resolve_in(spec.columns.as_slice())
            .and_then(|name| spec.columns.iter().position(|c| c == name));

        Self {
            filter_lines: filter.describe(),
            summary,
            spec,
            rows,
            status_column,
            generated_at: ctx.generated_at,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.spec.labels
    }

    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty() && !self.spec.is_empty()
    }

    /// Whether the body cell at (`row`, `col`) gets the open-status fill.
    pub fn is_highlighted(&self, row: usize, col: usize) -> bool {
        self.status_column == Some(col)
            && self
                .rows
                .get(row)
                .and_then(|cells| cells.get(col))
                .is_some_and(|text| is_open_status(text))
    }

    /// Monetary columns (label carries the currency marker) align right.
    pub fn is_right_aligned(&self, col: usize) -> bool {
        self.spec
            .labels
            .get(col)
            .is_some_and(|label| label.contains(CURRENCY_PREFIX.trim_end()))
    }

    /// All highlighted cells as (row, column) pairs, in row order.
    pub fn highlighted_cells(&self) -> Vec<(usize, usize)> {
        let Some(col) = self.status_column else {
            return Vec::new();
        };
        (0..self.rows.len())
            .filter(|&row| self.is_highlighted(row, col))
            .map(|row| (row, col))
            .collect()
    }
}
