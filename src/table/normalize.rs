use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;
use rust_decimal::Decimal;

use super::{CellValue, ColumnRole, RawTable, RecordTable};

/// Numeric columns that are not the active amount role but are still coerced.
const EXTRA_VALUE_COLUMNS: &[&str] = &["valor_recebido"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

// Month-first before day-first for slashed dates; day-first only kicks in
// when the leading field cannot be a month.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Coercion {
    Date,
    Number,
    Text,
}

fn coercion_for(column: &str) -> Coercion {
    if ColumnRole::DueDate.matches(column) || ColumnRole::ReceiptDate.matches(column) {
        Coercion::Date
    } else if ColumnRole::Amount.matches(column) || EXTRA_VALUE_COLUMNS.contains(&column) {
        Coercion::Number
    } else {
        Coercion::Text
    }
}

/// Lowercase, trim and replace spaces with underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.to_lowercase().trim().replace(' ', "_")
}

/// Parse a date or date-time cell. Returns `None` for anything unrecognised.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a plain or scientific-notation number into an exact decimal.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

fn unique_columns(headers: &[String]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(headers.len());

    for header in headers {
        let base = normalize_column_name(header);
        let mut name = base.clone();
        let mut n = 2;
        while taken.contains(&name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        taken.insert(name.clone());
        out.push(name);
    }

    out
}

/// Build a typed [`RecordTable`] from raw ingested cells.
///
/// Known date and value columns are coerced; cells that fail to parse
/// become [`CellValue::Missing`]. Column order and row count are preserved.
pub fn normalize(raw: &RawTable) -> RecordTable {
    let columns = unique_columns(&raw.headers);
    let kinds: Vec<Coercion> = columns.iter().map(|c| coercion_for(c)).collect();
    let mut unparsable = vec![0usize; columns.len()];

    let rows = raw
        .rows
        .iter()
        .map(|raw_row| {
            kinds
                .iter()
                .enumerate()
                .map(|(j, kind)| {
                    let text = raw_row.get(j).map(String::as_str).unwrap_or("");
                    if text.trim().is_empty() {
                        return CellValue::Missing;
                    }
                    let cell = match kind {
                        Coercion::Date => parse_date(text).map(CellValue::Date),
                        Coercion::Number => parse_amount(text).map(CellValue::Amount),
                        Coercion::Text => Some(CellValue::Text(text.to_string())),
                    };
                    cell.unwrap_or_else(|| {
                        unparsable[j] += 1;
                        CellValue::Missing
                    })
                })
                .collect()
        })
        .collect();

    for (column, count) in columns.iter().zip(&unparsable) {
        if *count > 0 {
            debug!("Column '{column}': {count} unparsable value(s) set to missing");
        }
    }

    RecordTable::new(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_column_names_are_normalized() {
        let table = normalize(&raw(&[" Data Vencimento ", "VALOR", "Nome Cliente"], &[]));
        assert_eq!(
            table.columns(),
            &["data_vencimento", "valor", "nome_cliente"]
        );
    }

    #[test]
    fn test_duplicate_names_get_suffix() {
        let table = normalize(&raw(&["Valor", "valor ", "valor_2"], &[]));
        assert_eq!(table.columns(), &["valor", "valor_2", "valor_2_2"]);
    }

    #[test]
    fn test_known_columns_are_coerced() {
        let table = normalize(&raw(
            &["Vencimento", "Valor", "Descricao"],
            &[&["2025-05-01", "1500.50", "Consultoria"]],
        ));
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("vencimento"), &CellValue::Date(date(2025, 5, 1)));
        assert_eq!(
            row.get("valor"),
            &CellValue::Amount(Decimal::new(150050, 2))
        );
        assert_eq!(
            row.get("descricao"),
            &CellValue::Text("Consultoria".to_string())
        );
    }

    #[test]
    fn test_unparsable_values_become_missing() {
        let table = normalize(&raw(
            &["vencimento", "valor", "valor_recebido"],
            &[&["not a date", "1.500,00", "abc"], &["", "", ""]],
        ));
        for row in table.rows() {
            assert!(row.get("vencimento").is_missing());
            assert!(row.get("valor").is_missing());
            assert!(row.get("valor_recebido").is_missing());
        }
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_unknown_columns_stay_text() {
        let table = normalize(&raw(&["codigo"], &[&["2025-01-01"]]));
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("codigo").as_text(), Some("2025-01-01"));
    }

    #[test]
    fn test_parse_date_forms() {
        assert_eq!(parse_date("2025-03-05"), Some(date(2025, 3, 5)));
        assert_eq!(parse_date("03/05/2025"), Some(date(2025, 3, 5)));
        assert_eq!(parse_date("25/03/2025"), Some(date(2025, 3, 25)));
        assert_eq!(parse_date("25-03-2025"), Some(date(2025, 3, 25)));
        assert_eq!(parse_date("2025/03/05"), Some(date(2025, 3, 5)));
        assert_eq!(
            parse_date("2025-03-05 14:30:00"),
            NaiveDate::from_ymd_opt(2025, 3, 5).unwrap().and_hms_opt(14, 30, 0)
        );
        assert_eq!(parse_date("31/31/2025"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_amount_forms() {
        assert_eq!(parse_amount(" 100 "), Some(Decimal::new(100, 0)));
        assert_eq!(parse_amount("-3.25"), Some(Decimal::new(-325, 2)));
        assert_eq!(parse_amount("1.5e3"), Some(Decimal::new(1500, 0)));
        assert_eq!(parse_amount("R$ 10"), None);
        assert_eq!(parse_amount("1.500,00"), None);
    }

    #[test]
    fn test_input_is_untouched() {
        let input = raw(&["Valor"], &[&["x"]]);
        let _ = normalize(&input);
        assert_eq!(input.headers, vec!["Valor".to_string()]);
        assert_eq!(input.rows, vec![vec!["x".to_string()]]);
    }
}
