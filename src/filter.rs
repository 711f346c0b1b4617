use chrono::NaiveDate;
use log::warn;

use crate::report::format_date;
use crate::table::{CellValue, ColumnRole, RecordTable};

/// Scope of a report. Rendered as prose; the core never re-validates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterContext {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub client: Option<String>,
    pub category: Option<String>,
}

impl FilterContext {
    /// Build a filter context. A start date after the end date is clamped
    /// to the end date.
    pub fn new(
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        client: Option<String>,
        category: Option<String>,
    ) -> Self {
        let start_date = match (start_date, end_date) {
            (Some(start), Some(end)) if start > end => {
                warn!(
                    "Start date {} is after end date {}; using {} for both",
                    format_date(start),
                    format_date(end),
                    format_date(end)
                );
                Some(end)
            }
            _ => start_date,
        };

        Self {
            start_date,
            end_date,
            client,
            category,
        }
    }

    /// Human-readable lines describing the active filters.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            lines.push(format!(
                "Período: {} a {}",
                format_date(start),
                format_date(end)
            ));
        }
        if let Some(client) = &self.client {
            lines.push(format!("Cliente: {client}"));
        }
        if let Some(category) = &self.category {
            lines.push(format!("Categoria: {category}"));
        }
        lines
    }
}

/// Earliest and latest due date in `table`, if it has a due-date column
/// with at least one parsed value.
pub fn date_bounds(table: &RecordTable) -> Option<(NaiveDate, NaiveDate)> {
    let due_col = ColumnRole::DueDate.resolve(table)?;
    let dates = table.rows().filter_map(|row| row.get(due_col).as_date());

    dates.fold(None, |acc, dt| {
        let d = dt.date();
        match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        }
    })
}

fn text_equals(cell: &CellValue, expected: &str) -> bool {
    match cell {
        CellValue::Text(s) => s == expected,
        CellValue::Amount(v) => v.to_string() == expected,
        _ => false,
    }
}

/// Rows of `table` that fall inside `filter`.
///
/// The date range applies to the due-date column and is inclusive. Client
/// and category match exactly. Filters whose column is absent are ignored.
pub fn apply(table: &RecordTable, filter: &FilterContext) -> RecordTable {
    let due_col = ColumnRole::DueDate.resolve(table);
    let client_col = ColumnRole::Client.resolve(table);
    let category_col = ColumnRole::Category.resolve(table);

    table.filter_rows(|row| {
        if let Some(col) = due_col {
            if filter.start_date.is_some() || filter.end_date.is_some() {
                let Some(due) = row.get(col).as_date().map(|dt| dt.date()) else {
                    return false;
                };
                if filter.start_date.is_some_and(|start| due < start) {
                    return false;
                }
                if filter.end_date.is_some_and(|end| due > end) {
                    return false;
                }
            }
        }

        if let (Some(col), Some(client)) = (client_col, &filter.client) {
            if !text_equals(row.get(col), client) {
                return false;
            }
        }

        if let (Some(col), Some(category)) = (category_col, &filter.category) {
            if !text_equals(row.get(col), category) {
                return false;
            }
        }

        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{normalize, RawTable};
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn ledger() -> RecordTable {
        let rows = [
            ["2025-05-01", "Empresa ABC", "Serviços", "100"],
            ["2025-05-10", "Cliente XYZ", "Produtos", "200"],
            ["2025-05-20", "Empresa ABC", "Produtos", "300"],
            ["", "Empresa ABC", "Serviços", "400"],
        ];
        normalize(&RawTable::new(
            vec![
                "Vencimento".into(),
                "Cliente".into(),
                "Categoria".into(),
                "Valor".into(),
            ],
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        ))
    }

    #[test]
    fn test_start_after_end_is_clamped() {
        let f = FilterContext::new(Some(d(2025, 6, 1)), Some(d(2025, 5, 1)), None, None);
        assert_eq!(f.start_date, Some(d(2025, 5, 1)));
    }

    #[test]
    fn test_describe() {
        let f = FilterContext::new(
            Some(d(2025, 5, 1)),
            Some(d(2025, 5, 31)),
            Some("Empresa ABC".into()),
            Some("Serviços".into()),
        );
        assert_eq!(
            f.describe(),
            vec![
                "Período: 01/05/2025 a 31/05/2025".to_string(),
                "Cliente: Empresa ABC".to_string(),
                "Categoria: Serviços".to_string(),
            ]
        );
    }

    #[test]
    fn test_period_needs_both_bounds_to_be_described() {
        let f = FilterContext::new(Some(d(2025, 5, 1)), None, None, None);
        assert!(f.describe().is_empty());
    }

    #[test]
    fn test_apply_date_range_is_inclusive() {
        let f = FilterContext::new(Some(d(2025, 5, 1)), Some(d(2025, 5, 10)), None, None);
        let filtered = apply(&ledger(), &f);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_apply_client_and_category() {
        let f = FilterContext::new(None, None, Some("Empresa ABC".into()), Some("Serviços".into()));
        let filtered = apply(&ledger(), &f);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_no_filter_keeps_everything() {
        let filtered = apply(&ledger(), &FilterContext::default());
        assert_eq!(filtered, ledger());
    }

    #[test]
    fn test_date_bounds() {
        assert_eq!(date_bounds(&ledger()), Some((d(2025, 5, 1), d(2025, 5, 20))));
    }
}
