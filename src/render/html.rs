use super::{DocumentRenderer, OutputFormat};
use crate::config::Branding;
use crate::report::{AgingSummary, PreparedReport, RowShade, NO_DATA_PLACEHOLDER};

/// Embedded stylesheet; color placeholders are replaced from the branding.
const STYLESHEET: &str = r##"
body {
    font-family: Arial, sans-serif;
    margin: 0;
    padding: 0;
}
.header {
    background-color: PRIMARY_COLOR;
    color: white;
    padding: 20px;
    text-align: center;
}
.container {
    padding: 20px;
}
.filters {
    margin-bottom: 20px;
}
.summary {
    background-color: SUMMARY_COLOR;
    padding: 15px;
    margin-bottom: 20px;
    border-radius: 5px;
}
table {
    width: 100%;
    border-collapse: collapse;
    margin-top: 20px;
}
th {
    background-color: PRIMARY_COLOR;
    color: white;
    padding: 10px;
    text-align: center;
}
td {
    padding: 8px;
    border-bottom: 1px solid #ddd;
}
.summary td.num, td.num {
    text-align: right;
}
tr.row-odd {
    background-color: #f0f0f0;
}
td.em-aberto {
    background-color: ACCENT_COLOR;
    color: white;
}
footer {
    color: #808080;
    font-style: italic;
    font-size: 0.8em;
    text-align: center;
    padding: 10px;
}
"##;

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Single-page HTML renderer. Same rows, order, shading and highlights as
/// the PDF output, without pagination.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    branding: Branding,
}

impl HtmlRenderer {
    pub fn new(branding: Branding) -> Self {
        Self { branding }
    }

    fn stylesheet(&self) -> String {
        STYLESHEET
            .replace("PRIMARY_COLOR", &self.branding.primary_color.to_string())
            .replace("ACCENT_COLOR", &self.branding.accent_color.to_string())
            .replace("SUMMARY_COLOR", &self.branding.summary_color.to_string())
    }

    pub fn render_html(&self, report: &PreparedReport) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str("<title>Relatório Financeiro Ilume</title>\n");
        html.push_str(&format!("<style>{}</style>\n", self.stylesheet()));
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!(
            "<div class=\"header\"><h1>{}</h1></div>\n",
            escape(&self.branding.title)
        ));
        html.push_str("<div class=\"container\">\n");

        if !report.filter_lines.is_empty() {
            html.push_str("<div class=\"filters\"><h2>Filtros aplicados</h2><ul>\n");
            for line in &report.filter_lines {
                html.push_str(&format!("<li>{}</li>\n", escape(line)));
            }
            html.push_str("</ul></div>\n");
        }

        if let Some(summary) = &report.summary {
            write_summary(&mut html, summary);
        }

        html.push_str("<h2>Detalhamento</h2>\n");
        if report.has_rows() {
            write_table(&mut html, report);
        } else {
            html.push_str(&format!("<p class=\"empty\">{}</p>\n", escape(NO_DATA_PLACEHOLDER)));
        }

        html.push_str("</div>\n");
        html.push_str(&format!(
            "<footer>{} - Relatório gerado em {}</footer>\n",
            escape(&self.branding.company),
            report.generated_at.format("%d/%m/%Y %H:%M")
        ));
        html.push_str("</body>\n</html>\n");
        html
    }
}

fn write_summary(html: &mut String, summary: &AgingSummary) {
    html.push_str("<div class=\"summary\"><h2>Resumo Financeiro</h2><table>\n");
    for (label, value) in summary.formatted_lines() {
        html.push_str(&format!(
            "<tr><td><strong>{}</strong></td><td class=\"num\">{}</td></tr>\n",
            escape(label),
            escape(&value)
        ));
    }
    html.push_str("</table></div>\n");
}

fn write_table(html: &mut String, report: &PreparedReport) {
    html.push_str("<table>\n<tr>");
    for label in report.labels() {
        html.push_str(&format!("<th>{}</th>", escape(label)));
    }
    html.push_str("</tr>\n");

    for (i, row) in report.rows.iter().enumerate() {
        let class = match RowShade::for_index(i) {
            RowShade::Plain => "row-even",
            RowShade::Alternate => "row-odd",
        };
        html.push_str(&format!("<tr class=\"{class}\">"));
        for (j, text) in row.iter().enumerate() {
            if report.is_highlighted(i, j) {
                html.push_str(&format!("<td class=\"em-aberto\">{}</td>", escape(text)));
            } else if report.is_right_aligned(j) {
                html.push_str(&format!("<td class=\"num\">{}</td>", escape(text)));
            } else {
                html.push_str(&format!("<td>{}</td>", escape(text)));
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
}

impl DocumentRenderer for HtmlRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Html
    }

    fn render(&self, report: &PreparedReport) -> Vec<u8> {
        self.render_html(report).into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterContext;
    use crate::report::ReportContext;
    use crate::table::{normalize, RawTable};
    use chrono::NaiveDate;

    fn ctx() -> ReportContext {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        ReportContext {
            today,
            generated_at: today.and_hms_opt(9, 30, 0).unwrap(),
        }
    }

    fn render(headers: &[&str], rows: Vec<Vec<&str>>, filter: FilterContext) -> String {
        let table = normalize(&RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        ));
        let report = PreparedReport::prepare(&table, &filter, &[], &ctx());
        HtmlRenderer::new(Branding::default()).render_html(&report)
    }

    #[test]
    fn test_footer_and_header_banner() {
        let html = render(&["valor"], vec![vec!["1"]], FilterContext::default());
        assert!(html.contains(
            "<div class=\"header\"><h1>Relatório de Contas a Receber</h1></div>\n"
        ));
        assert!(html.contains("<footer>Ilume Finanças - Relatório gerado em 15/06/2025 09:30</footer>\n"));
        assert!(html.ends_with("</body>\n</html>\n"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>A & B</b>"), "&lt;b&gt;A &amp; B&lt;/b&gt;");
        assert_eq!(escape("\"x\" 'y'"), "&quot;x&quot; &#39;y&#39;");
    }

    #[test]
    fn test_scenario_highlights_and_parity() {
        let html = render(
            &["vencimento", "valor", "situacao"],
            vec![
                vec!["2025-06-14", "100", "Em aberto"],
                vec!["2025-06-15", "50", "Pago"],
                vec!["2025-06-16", "200", "EM ABERTO"],
            ],
            FilterContext::default(),
        );
        assert_eq!(html.matches("<td class=\"em-aberto\">").count(), 2);
        assert_eq!(html.matches("<tr class=\"row-even\">").count(), 2);
        assert_eq!(html.matches("<tr class=\"row-odd\">").count(), 1);
        assert!(html.contains("<td class=\"num\">R$ 350,00</td>"));
        assert!(html.contains("<th>Valor (R$)</th>"));
        assert!(html.contains("background-color: #6F387C"));
        assert!(!html.contains("PRIMARY_COLOR"));
    }

    #[test]
    fn test_cell_text_is_escaped() {
        let html = render(
            &["descricao", "valor"],
            vec![vec!["<script>alert(1)</script>", "1"]],
            FilterContext::default(),
        );
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_empty_table_shows_placeholder() {
        let html = render(&["vencimento", "valor"], vec![], FilterContext::default());
        assert!(html.contains(NO_DATA_PLACEHOLDER));
        assert!(!html.contains("<th>"));
    }

    #[test]
    fn test_filters_section() {
        let plain = render(&["valor"], vec![vec!["1"]], FilterContext::default());
        assert!(!plain.contains("Filtros aplicados"));

        let filter = FilterContext::new(None, None, Some("Empresa <ABC>".into()), None);
        let html = render(&["valor"], vec![vec!["1"]], filter);
        assert!(html.contains("<li>Cliente: Empresa &lt;ABC&gt;</li>"));
    }
}
