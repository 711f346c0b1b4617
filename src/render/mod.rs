pub mod html;
pub mod layout;

pub use html::HtmlRenderer;

use chrono::NaiveDateTime;
use log::info;

use crate::config::Branding;
use crate::filter::FilterContext;
use crate::pdf::PdfRenderer;
use crate::report::{PreparedReport, ReportContext};
use crate::table::RecordTable;

/// Output mode of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Paginated A4 landscape document
    #[default]
    Pdf,
    /// Single flowing HTML page
    Html,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Html => "html",
        }
    }
}

/// A back end that turns a prepared report into document bytes.
///
/// Rendering never fails: every edge case of the data has a defined output.
pub trait DocumentRenderer {
    fn format(&self) -> OutputFormat;
    fn render(&self, report: &PreparedReport) -> Vec<u8>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Suggested file name, e.g. `Relatorio_Ilume_20250615_093000.pdf`.
pub fn report_filename(format: OutputFormat, generated_at: NaiveDateTime) -> String {
    format!(
        "Relatorio_Ilume_{}.{}",
        generated_at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

pub fn renderer_for(format: OutputFormat, branding: &Branding) -> Box<dyn DocumentRenderer> {
    match format {
        OutputFormat::Pdf => Box::new(PdfRenderer::new(branding.clone())),
        OutputFormat::Html => Box::new(HtmlRenderer::new(branding.clone())),
    }
}

/// Compose filters, aging summary and detail table into one document.
///
/// `table` is expected to be filtered already; `filter` is only described.
pub fn assemble(
    table: &RecordTable,
    filter: &FilterContext,
    selected: &[String],
    format: OutputFormat,
    ctx: &ReportContext,
    branding: &Branding,
) -> RenderedDocument {
    let report = PreparedReport::prepare(table, filter, selected, ctx);
    let renderer = renderer_for(format, branding);
    let bytes = renderer.render(&report);

    info!(
        "Rendered {} report: {} row(s), {} column(s), {} bytes",
        format.extension(),
        report.rows.len(),
        report.labels().len(),
        bytes.len()
    );

    RenderedDocument {
        format: renderer.format(),
        bytes,
        filename: report_filename(format, ctx.generated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{normalize, RawTable};
    use chrono::NaiveDate;

    fn ctx() -> ReportContext {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        ReportContext {
            today,
            generated_at: today.and_hms_opt(9, 30, 0).unwrap(),
        }
    }

    fn table() -> RecordTable {
        normalize(&RawTable::new(
            vec!["Vencimento".into(), "Cliente".into(), "Valor".into(), "Situacao".into()],
            vec![
                vec!["2025-06-14".into(), "Empresa ABC".into(), "100".into(), "Em aberto".into()],
                vec!["2025-06-15".into(), "Cliente XYZ".into(), "50".into(), "Pago".into()],
                vec!["2025-06-16".into(), "Empresa ABC".into(), "200".into(), "Em aberto".into()],
            ],
        ))
    }

    #[test]
    fn test_filename() {
        let name = report_filename(OutputFormat::Pdf, ctx().generated_at);
        assert_eq!(name, "Relatorio_Ilume_20250615_093000.pdf");
        let name = report_filename(OutputFormat::Html, ctx().generated_at);
        assert_eq!(name, "Relatorio_Ilume_20250615_093000.html");
    }

    #[test]
    fn test_assemble_pdf() {
        let doc = assemble(
            &table(),
            &FilterContext::default(),
            &[],
            OutputFormat::Pdf,
            &ctx(),
            &Branding::default(),
        );
        assert_eq!(doc.format, OutputFormat::Pdf);
        assert!(doc.bytes.starts_with(b"%PDF-"));
        assert!(doc.filename.ends_with(".pdf"));
    }

    #[test]
    fn test_assemble_html_carries_the_same_data() {
        let doc = assemble(
            &table(),
            &FilterContext::default(),
            &[],
            OutputFormat::Html,
            &ctx(),
            &Branding::default(),
        );
        let html = String::from_utf8(doc.bytes).unwrap();
        for expected in ["R$ 100,00", "R$ 50,00", "R$ 200,00", "R$ 350,00", "Empresa ABC"] {
            assert!(html.contains(expected), "missing {expected}");
        }
        assert_eq!(html.matches("class=\"em-aberto\"").count(), 2);
    }

    #[test]
    fn test_assemble_is_deterministic() {
        for format in [OutputFormat::Pdf, OutputFormat::Html] {
            let render = || {
                assemble(
                    &table(),
                    &FilterContext::default(),
                    &[],
                    format,
                    &ctx(),
                    &Branding::default(),
                )
            };
            assert_eq!(render(), render());
        }
    }
}
