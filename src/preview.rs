//! Terminal rendering of a prepared report.

use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::report::{AgingSummary, PreparedReport, NO_DATA_PLACEHOLDER};

#[derive(Tabled)]
struct SummaryLine {
    #[tabled(rename = "Resumo Financeiro")]
    label: &'static str,
    #[tabled(rename = "Valor")]
    value: String,
}

pub fn render_summary(summary: &AgingSummary) -> String {
    let rows: Vec<SummaryLine> = summary
        .formatted_lines()
        .into_iter()
        .map(|(label, value)| SummaryLine { label, value })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Detail table, cut to the first `limit` rows when given.
pub fn render_table(report: &PreparedReport, limit: Option<usize>) -> String {
    if !report.has_rows() {
        return NO_DATA_PLACEHOLDER.to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(report.labels().iter().cloned());
    let shown = limit.unwrap_or(report.rows.len());
    for row in report.rows.iter().take(shown) {
        builder.push_record(row.iter().cloned());
    }
    builder.build().with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterContext;
    use crate::report::ReportContext;
    use crate::table::{normalize, RawTable};
    use chrono::NaiveDate;

    fn report(rows: Vec<Vec<String>>) -> PreparedReport {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let ctx = ReportContext {
            today,
            generated_at: today.and_hms_opt(9, 30, 0).unwrap(),
        };
        let table = normalize(&RawTable::new(
            vec!["cliente".into(), "valor".into()],
            rows,
        ));
        PreparedReport::prepare(&table, &FilterContext::default(), &[], &ctx)
    }

    #[test]
    fn test_table_has_labels_and_rows() {
        let out = render_table(
            &report(vec![
                vec!["Empresa ABC".into(), "1500".into()],
                vec!["Cliente XYZ".into(), "20".into()],
            ]),
            None,
        );
        assert!(out.contains("Cliente"));
        assert!(out.contains("Valor (R$)"));
        assert!(out.contains("R$ 1.500,00"));
        assert!(out.contains("Cliente XYZ"));
    }

    #[test]
    fn test_limit() {
        let out = render_table(
            &report(vec![
                vec!["Empresa ABC".into(), "1".into()],
                vec!["Cliente XYZ".into(), "2".into()],
            ]),
            Some(1),
        );
        assert!(out.contains("Empresa ABC"));
        assert!(!out.contains("Cliente XYZ"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(render_table(&report(vec![]), None), NO_DATA_PLACEHOLDER);
    }

    #[test]
    fn test_summary_lines() {
        let summary = AgingSummary {
            total: rust_decimal::Decimal::new(35000, 2),
            ..Default::default()
        };
        let out = render_summary(&summary);
        assert!(out.contains("Vencidos (R$)"));
        assert!(out.contains("R$ 350,00"));
    }
}
