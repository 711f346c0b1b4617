mod font;

pub use font::{encode_winansi, Font};

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::config::{Branding, Rgb};
use crate::render::layout::{Align, PageGeometry, RowKind, TableLayout};
use crate::render::{DocumentRenderer, OutputFormat};
use crate::report::{AgingSummary, PreparedReport, RowShade, NO_DATA_PLACEHOLDER};

const PT_PER_MM: f32 = 72.0 / 25.4;
const CELL_PADDING: f32 = 1.0;
const LINE_WIDTH_MM: f32 = 0.2;

const ALTERNATE_ROW: Rgb = Rgb::gray(240);
const BORDER: Rgb = Rgb::gray(200);
const FOOTER_TEXT: Rgb = Rgb::gray(128);

const HEADER_BAND_HEIGHT: f32 = 20.0;
const FOOTER_OFFSET: f32 = 15.0;
const SUMMARY_LINE_HEIGHT: f32 = 8.0;

#[derive(Debug, Clone, Copy)]
struct CellStyle {
    font: Font,
    size: f32,
    color: Rgb,
    fill: Option<Rgb>,
    border: bool,
    align: Align,
}

impl CellStyle {
    fn text(font: Font, size: f32, color: Rgb) -> Self {
        Self {
            font,
            size,
            color,
            fill: None,
            border: false,
            align: Align::Left,
        }
    }

    fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    fn filled(mut self, fill: Rgb) -> Self {
        self.fill = Some(fill);
        self.border = true;
        self
    }
}

/// One page's content stream. Coordinates are mm from the top-left.
struct Canvas {
    content: Content,
    height: f32,
}

impl Canvas {
    fn new(geometry: &PageGeometry) -> Self {
        let mut content = Content::new();
        content.set_line_width(LINE_WIDTH_MM * PT_PER_MM);
        Self {
            content,
            height: geometry.height,
        }
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Option<Rgb>, border: Option<Rgb>) {
        if fill.is_none() && border.is_none() {
            return;
        }
        self.content.save_state();
        if let Some(color) = fill {
            let (r, g, b) = color.unit();
            self.content.set_fill_rgb(r, g, b);
        }
        if let Some(color) = border {
            let (r, g, b) = color.unit();
            self.content.set_stroke_rgb(r, g, b);
        }
        self.content.rect(
            x * PT_PER_MM,
            (self.height - y - h) * PT_PER_MM,
            w * PT_PER_MM,
            h * PT_PER_MM,
        );
        match (fill, border) {
            (Some(_), Some(_)) => self.content.fill_nonzero_and_stroke(),
            (Some(_), None) => self.content.fill_nonzero(),
            _ => self.content.stroke(),
        };
        self.content.restore_state();
    }

    fn text(&mut self, x: f32, baseline: f32, text: &str, font: Font, size: f32, color: Rgb) {
        let bytes = encode_winansi(text);
        let (r, g, b) = color.unit();
        self.content.save_state();
        self.content.set_fill_rgb(r, g, b);
        self.content
            .begin_text()
            .set_font(Name(font.resource_name()), size)
            .next_line(x * PT_PER_MM, (self.height - baseline) * PT_PER_MM)
            .show(Str(&bytes))
            .end_text();
        self.content.restore_state();
    }

    /// Box with optional fill and border, text vertically centred inside.
    fn cell(&mut self, x: f32, y: f32, w: f32, h: f32, text: &str, style: &CellStyle) {
        let border = style.border.then_some(BORDER);
        self.rect(x, y, w, h, style.fill, border);
        if text.is_empty() {
            return;
        }

        let text_w = style.font.text_width(text, style.size) / PT_PER_MM;
        let text_x = match style.align {
            Align::Left => x + CELL_PADDING,
            Align::Center => x + (w - text_w) / 2.0,
            Align::Right => x + w - CELL_PADDING - text_w,
        };
        let baseline = y + h / 2.0 + 0.3 * style.size / PT_PER_MM;
        self.text(text_x, baseline, text, style.font, style.size, style.color);
    }
}

/// Result of a paginated render.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Paginated A4-landscape renderer.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    branding: Branding,
    geometry: PageGeometry,
}

impl PdfRenderer {
    pub fn new(branding: Branding) -> Self {
        Self {
            branding,
            geometry: PageGeometry::A4_LANDSCAPE,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn render_document(&self, report: &PreparedReport) -> PdfDocument {
        let mut writer = PageWriter::new(self, report);

        if !report.filter_lines.is_empty() {
            writer.filters(&report.filter_lines);
        }
        if let Some(summary) = &report.summary {
            writer.summary(summary);
        }
        writer.title("Detalhamento");
        if report.has_rows() {
            writer.table(report);
        } else {
            writer.placeholder();
        }

        let pages = writer.finish();
        let page_count = pages.len();
        PdfDocument {
            bytes: self.assemble(pages),
            page_count,
        }
    }

    fn assemble(&self, pages: Vec<Canvas>) -> Vec<u8> {
        let mut pdf = Pdf::new();
        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let pages_id = alloc.bump();
        let info_id = alloc.bump();
        let font_ids: Vec<(Font, Ref)> = Font::ALL.iter().map(|f| (*f, alloc.bump())).collect();
        let page_ids: Vec<(Ref, Ref)> = pages.iter().map(|_| (alloc.bump(), alloc.bump())).collect();

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().map(|(page_id, _)| *page_id))
            .count(page_ids.len() as i32);
        pdf.document_info(info_id)
            .title(TextStr(&self.branding.title))
            .author(TextStr(&self.branding.company))
            .producer(TextStr("ilume-report"));

        for (font, id) in &font_ids {
            pdf.type1_font(*id)
                .base_font(Name(font.base_font()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        let media_box = Rect::new(
            0.0,
            0.0,
            self.geometry.width * PT_PER_MM,
            self.geometry.height * PT_PER_MM,
        );
        for (canvas, (page_id, content_id)) in pages.into_iter().zip(&page_ids) {
            {
                let mut page = pdf.page(*page_id);
                page.media_box(media_box)
                    .parent(pages_id)
                    .contents(*content_id);
                let mut resources = page.resources();
                let mut fonts = resources.fonts();
                for (font, id) in &font_ids {
                    fonts.pair(Name(font.resource_name()), *id);
                }
            }
            pdf.stream(*content_id, &canvas.content.finish());
        }

        pdf.finish()
    }
}

impl DocumentRenderer for PdfRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Pdf
    }

    fn render(&self, report: &PreparedReport) -> Vec<u8> {
        self.render_document(report).bytes
    }
}

/// Cursor over the pages of one document.
struct PageWriter<'a> {
    renderer: &'a PdfRenderer,
    report: &'a PreparedReport,
    done: Vec<Canvas>,
    current: Canvas,
    y: f32,
}

impl<'a> PageWriter<'a> {
    fn new(renderer: &'a PdfRenderer, report: &'a PreparedReport) -> Self {
        let mut writer = Self {
            renderer,
            report,
            done: Vec::new(),
            current: Canvas::new(&renderer.geometry),
            y: renderer.geometry.content_top,
        };
        writer.decorate();
        writer
    }

    fn geometry(&self) -> &'a PageGeometry {
        &self.renderer.geometry
    }

    fn branding(&self) -> &'a Branding {
        &self.renderer.branding
    }

    /// Header band and footer, drawn on every page.
    fn decorate(&mut self) {
        let g = *self.geometry();
        let branding = self.branding();
        let page_no = self.done.len() + 1;

        self.current
            .rect(0.0, 0.0, g.width, HEADER_BAND_HEIGHT, Some(branding.primary_color), None);
        self.current.cell(
            g.margin_left,
            10.0,
            g.table_width,
            15.0,
            &branding.title,
            &CellStyle::text(Font::Bold, 16.0, Rgb::WHITE).aligned(Align::Center),
        );

        let footer_y = g.height - FOOTER_OFFSET;
        let generated = self.report.generated_at.format("%d/%m/%Y %H:%M");
        let footer = CellStyle::text(Font::Italic, 8.0, FOOTER_TEXT);
        self.current.cell(
            g.margin_left,
            footer_y,
            g.table_width,
            10.0,
            &format!("{} - Relatório gerado em {}", branding.company, generated),
            &footer.aligned(Align::Center),
        );
        self.current.cell(
            g.margin_left,
            footer_y,
            g.table_width,
            10.0,
            &format!("Página {page_no}"),
            &footer.aligned(Align::Right),
        );
    }

    fn add_page(&mut self) {
        let next = Canvas::new(self.geometry());
        self.done.push(std::mem::replace(&mut self.current, next));
        self.y = self.geometry().content_top;
        self.decorate();
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y + height > self.geometry().break_line {
            self.add_page();
        }
    }

    fn title(&mut self, text: &str) {
        self.ensure_space(12.0);
        let style = CellStyle::text(Font::Bold, 14.0, self.branding().primary_color);
        let g = *self.geometry();
        self.current.cell(g.margin_left, self.y, g.table_width, 10.0, text, &style);
        self.y += 12.0;
    }

    fn filters(&mut self, lines: &[String]) {
        self.title("Filtros aplicados:");
        let g = *self.geometry();
        let style = CellStyle::text(Font::Regular, 10.0, Rgb::BLACK);
        for line in lines {
            self.ensure_space(6.0);
            self.current.cell(g.margin_left, self.y, 40.0, 6.0, "•", &style);
            self.current
                .cell(g.margin_left + 40.0, self.y, g.table_width - 40.0, 6.0, line, &style);
            self.y += 6.0;
        }
        self.y += 5.0;
    }

    fn summary(&mut self, summary: &AgingSummary) {
        let lines = summary.formatted_lines();
        let box_height = lines.len() as f32 * SUMMARY_LINE_HEIGHT + 10.0;
        self.ensure_space(box_height);

        let g = *self.geometry();
        let branding = self.branding();
        let top = self.y;
        self.current.rect(
            g.margin_left,
            top,
            g.table_width,
            box_height,
            Some(branding.summary_color),
            Some(BORDER),
        );
        self.current.cell(
            g.margin_left + 5.0,
            top + 5.0,
            g.table_width - 5.0,
            SUMMARY_LINE_HEIGHT,
            "Resumo Financeiro",
            &CellStyle::text(Font::Bold, 12.0, branding.primary_color),
        );

        let style = CellStyle::text(Font::Regular, 10.0, Rgb::BLACK);
        for (i, (label, value)) in lines.iter().enumerate() {
            let line_y = top + 15.0 + i as f32 * SUMMARY_LINE_HEIGHT;
            self.current
                .cell(g.margin_left + 10.0, line_y, 130.0, SUMMARY_LINE_HEIGHT, label, &style);
            self.current.cell(
                g.margin_left + 140.0,
                line_y,
                130.0,
                SUMMARY_LINE_HEIGHT,
                value,
                &style.aligned(Align::Right),
            );
        }

        self.y = top + box_height + 10.0;
    }

    fn placeholder(&mut self) {
        let g = *self.geometry();
        self.current.cell(
            g.margin_left,
            self.y,
            g.table_width,
            10.0,
            NO_DATA_PLACEHOLDER,
            &CellStyle::text(Font::Regular, 10.0, Rgb::BLACK),
        );
        self.y += 10.0;
    }

    fn table(&mut self, report: &PreparedReport) {
        let g = *self.geometry();
        let branding = self.branding();
        let layout = TableLayout::paginate(report.labels(), report.rows.len(), self.y, &g);
        let offsets = layout.column_offsets(g.margin_left);

        let header_style = CellStyle::text(Font::Bold, 10.0, Rgb::WHITE)
            .aligned(Align::Center)
            .filled(branding.primary_color);
        let body_style = CellStyle::text(Font::Regular, 9.0, Rgb::BLACK);
        let open_style = CellStyle::text(Font::Regular, 9.0, Rgb::WHITE).filled(branding.accent_color);

        for page in &layout.pages {
            if page.new_page {
                self.add_page();
            }
            for placed in &page.rows {
                match placed.kind {
                    RowKind::Header => {
                        for (j, label) in report.labels().iter().enumerate() {
                            self.current.cell(
                                offsets[j],
                                placed.y,
                                layout.widths[j],
                                placed.height,
                                label,
                                &header_style,
                            );
                        }
                    }
                    RowKind::Body(i) => {
                        let shade = match RowShade::for_index(i) {
                            RowShade::Plain => Rgb::WHITE,
                            RowShade::Alternate => ALTERNATE_ROW,
                        };
                        for (j, text) in report.rows[i].iter().enumerate() {
                            let style = if report.is_highlighted(i, j) {
                                open_style
                            } else {
                                let align = if report.is_right_aligned(j) {
                                    Align::Right
                                } else {
                                    Align::Left
                                };
                                body_style.aligned(align).filled(shade)
                            };
                            self.current.cell(
                                offsets[j],
                                placed.y,
                                layout.widths[j],
                                placed.height,
                                text,
                                &style,
                            );
                        }
                    }
                }
            }
        }

        self.y = layout.end_y;
    }

    fn finish(mut self) -> Vec<Canvas> {
        self.done.push(self.current);
        self.done
    }
}
