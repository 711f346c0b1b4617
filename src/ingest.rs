//! Reading CSV and spreadsheet files into a [`RawTable`].

use calamine::{open_workbook_auto, Data, Reader};
use log::debug;
use std::path::Path;

use crate::error::{ReportError, Result};
use crate::table::RawTable;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Load the first sheet (or the whole CSV) at `path`, first row as headers.
pub fn load_raw_table(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        return Err(ReportError::InputNotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let table = if extension == "csv" {
        read_csv(path)?
    } else if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        read_spreadsheet(path)?
    } else {
        return Err(ReportError::UnsupportedFormat(path.to_path_buf()));
    };

    debug!(
        "Loaded {} row(s) x {} column(s) from {}",
        table.rows.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)?;

    let headers = reader.headers()?.iter().map(String::from).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(RawTable::new(headers, rows))
}

fn read_spreadsheet(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ReportError::EmptyWorkbook(path.to_path_buf()))?;
    let range = workbook.worksheet_range(&first)?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .ok_or_else(|| ReportError::EmptyWorkbook(path.to_path_buf()))?
        .iter()
        .map(cell_text)
        .collect();
    let rows = rows.map(|row| row.iter().map(cell_text).collect()).collect();

    Ok(RawTable::new(headers, rows))
}

/// Text form of a spreadsheet cell, in the shape the normalizer parses.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#{e:?}"),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}
