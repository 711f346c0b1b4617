//! Page-independent table layout: column widths and pagination.
//!
//! All measurements are millimetres, measured from the top-left corner of
//! the page.

/// Fixed canvas for paginated output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub table_width: f32,
    /// First usable y below the header band.
    pub content_top: f32,
    /// A body row whose bottom edge would pass this line moves to the next page.
    pub break_line: f32,
    pub header_row_height: f32,
    pub body_row_height: f32,
}

impl PageGeometry {
    pub const A4_LANDSCAPE: PageGeometry = PageGeometry {
        width: 297.0,
        height: 210.0,
        margin_left: 10.0,
        table_width: 277.0,
        content_top: 29.0,
        break_line: 195.0,
        header_row_height: 10.0,
        body_row_height: 6.0,
    };

    /// Body rows that fit on a page whose table starts at `content_top`.
    /// Even for the A4 canvas, so every full page starts on a plain row.
    pub fn rows_per_page(&self) -> usize {
        let usable = self.break_line - self.content_top - self.header_row_height;
        (usable / self.body_row_height).floor().max(1.0) as usize
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4_LANDSCAPE
    }
}

/// Columns with a fixed width; every other column shares what is left.
const FIXED_WIDTHS: &[(&str, f32)] = &[
    ("Descrição", 50.0),
    ("Cliente", 40.0),
    ("Valor (R$)", 25.0),
    ("A Receber (R$)", 25.0),
    ("Situação", 20.0),
];

fn fixed_width(label: &str) -> Option<f32> {
    FIXED_WIDTHS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, w)| *w)
}

/// Width of each column for a table `table_width` wide.
pub fn column_widths(labels: &[String], table_width: f32) -> Vec<f32> {
    let fixed_total: f32 = labels.iter().filter_map(|l| fixed_width(l)).sum();
    let flexible = labels.iter().filter(|l| fixed_width(l).is_none()).count();
    let share = if flexible > 0 {
        ((table_width - fixed_total) / flexible as f32).max(0.0)
    } else {
        0.0
    };

    labels
        .iter()
        .map(|l| fixed_width(l).unwrap_or(share))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    /// Body row with its global (0-based) index.
    Body(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedRow {
    pub kind: RowKind,
    pub y: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    /// The renderer must open a fresh page before drawing these rows.
    pub new_page: bool,
    pub rows: Vec<PlacedRow>,
}

/// Positions of every header and body row of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub widths: Vec<f32>,
    pub pages: Vec<TablePage>,
    /// Cursor position after the last row.
    pub end_y: f32,
}

impl TableLayout {
    /// Lay out `row_count` body rows starting at `start_y` on the current page.
    ///
    /// The header row is repeated at the top of every page the table spans.
    pub fn paginate(
        labels: &[String],
        row_count: usize,
        start_y: f32,
        geometry: &PageGeometry,
    ) -> Self {
        let widths = column_widths(labels, geometry.table_width);
        let header_h = geometry.header_row_height;
        let body_h = geometry.body_row_height;

        // Don't leave a lone header at the bottom of a page.
        let first_fits = start_y + header_h + body_h <= geometry.break_line;
        let mut y = if first_fits { start_y } else { geometry.content_top };
        let mut page = TablePage {
            new_page: !first_fits,
            rows: vec![PlacedRow {
                kind: RowKind::Header,
                y,
                height: header_h,
            }],
        };
        y += header_h;

        let mut pages = Vec::new();
        for index in 0..row_count {
            if y + body_h > geometry.break_line {
                pages.push(page);
                y = geometry.content_top;
                page = TablePage {
                    new_page: true,
                    rows: vec![PlacedRow {
                        kind: RowKind::Header,
                        y,
                        height: header_h,
                    }],
                };
                y += header_h;
            }
            page.rows.push(PlacedRow {
                kind: RowKind::Body(index),
                y,
                height: body_h,
            });
            y += body_h;
        }
        pages.push(page);

        Self {
            widths,
            pages,
            end_y: y,
        }
    }

    pub fn header_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| &p.rows)
            .filter(|r| r.kind == RowKind::Header)
            .count()
    }

    /// Left edge of each column.
    pub fn column_offsets(&self, margin_left: f32) -> Vec<f32> {
        self.widths
            .iter()
            .scan(margin_left, |x, w| {
                let left = *x;
                *x += w;
                Some(left)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RowShade;

    fn labels(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn geometry() -> PageGeometry {
        PageGeometry::A4_LANDSCAPE
    }

    #[test]
    fn test_rows_per_page() {
        assert_eq!(geometry().rows_per_page(), 26);
    }

    #[test]
    fn test_fixed_and_shared_widths() {
        let widths = column_widths(
            &labels(&["Vencimento", "Descrição", "Cliente", "Valor (R$)", "Situação"]),
            277.0,
        );
        assert_eq!(widths, vec![142.0, 50.0, 40.0, 25.0, 20.0]);
        assert_eq!(widths.iter().sum::<f32>(), 277.0);
    }

    #[test]
    fn test_all_flexible_widths_are_equal() {
        let widths = column_widths(&labels(&["A", "B", "C", "D"]), 100.0);
        assert_eq!(widths, vec![25.0; 4]);
    }

    #[test]
    fn test_all_fixed_widths() {
        let widths = column_widths(&labels(&["Cliente", "Situação"]), 277.0);
        assert_eq!(widths, vec![40.0, 20.0]);
    }

    #[test]
    fn test_header_once_per_page() {
        let g = geometry();
        let per_page = g.rows_per_page();
        for k in [1, 25, 26, 27, 52, 53, 137, 1000] {
            let layout = TableLayout::paginate(&labels(&["A", "B"]), k, g.content_top, &g);
            let expected_pages = k.div_ceil(per_page);
            assert_eq!(layout.pages.len(), expected_pages, "k={k}");
            assert_eq!(layout.header_count(), expected_pages, "k={k}");
            for page in &layout.pages {
                assert_eq!(page.rows[0].kind, RowKind::Header);
                assert_eq!(
                    page.rows.iter().filter(|r| r.kind == RowKind::Header).count(),
                    1
                );
            }
        }
    }

    #[test]
    fn test_rows_stay_above_break_line() {
        let g = geometry();
        let layout = TableLayout::paginate(&labels(&["A"]), 300, 70.0, &g);
        for page in &layout.pages {
            for row in &page.rows {
                assert!(row.y + row.height <= g.break_line);
            }
        }
        let bodies: Vec<usize> = layout
            .pages
            .iter()
            .flat_map(|p| &p.rows)
            .filter_map(|r| match r.kind {
                RowKind::Body(i) => Some(i),
                RowKind::Header => None,
            })
            .collect();
        assert_eq!(bodies, (0..300).collect::<Vec<_>>());
    }

    #[test]
    fn test_first_page_starts_below_preamble() {
        let g = geometry();
        let layout = TableLayout::paginate(&labels(&["A"]), 30, 137.0, &g);
        assert!(!layout.pages[0].new_page);
        assert_eq!(layout.pages[0].rows[0].y, 137.0);
        // (195 - 147) / 6 = 8 rows on the first page
        assert_eq!(layout.pages[0].rows.len(), 1 + 8);
        assert!(layout.pages[1].new_page);
        assert_eq!(layout.pages[1].rows[0].y, g.content_top);
    }

    #[test]
    fn test_table_moves_when_header_would_be_orphaned() {
        let g = geometry();
        let layout = TableLayout::paginate(&labels(&["A"]), 3, 185.0, &g);
        assert_eq!(layout.pages.len(), 1);
        assert!(layout.pages[0].new_page);
        assert_eq!(layout.pages[0].rows[0].y, g.content_top);
    }

    #[test]
    fn test_shade_does_not_reset_across_pages() {
        let g = geometry();
        let per_page = g.rows_per_page();
        let layout = TableLayout::paginate(&labels(&["A"]), per_page * 3, g.content_top, &g);
        let first_of_page: Vec<usize> = layout
            .pages
            .iter()
            .filter_map(|p| match p.rows[1].kind {
                RowKind::Body(i) => Some(i),
                RowKind::Header => None,
            })
            .collect();
        assert_eq!(first_of_page, vec![0, per_page, per_page * 2]);
        assert_eq!(RowShade::for_index(0), RowShade::for_index(per_page));
    }

    #[test]
    fn test_parity_continues_after_short_first_page() {
        let g = geometry();
        // header ends at 153; seven rows fit before the break line
        let layout = TableLayout::paginate(&labels(&["A"]), 10, 143.0, &g);
        assert_eq!(layout.pages[0].rows.len(), 1 + 7);
        assert_eq!(layout.pages[1].rows[1].kind, RowKind::Body(7));
        assert_eq!(RowShade::for_index(7), RowShade::Alternate);
    }

    #[test]
    fn test_empty_table_has_only_header() {
        let g = geometry();
        let layout = TableLayout::paginate(&labels(&["A"]), 0, g.content_top, &g);
        assert_eq!(layout.pages.len(), 1);
        assert_eq!(layout.header_count(), 1);
        assert_eq!(layout.end_y, g.content_top + g.header_row_height);
    }

    #[test]
    fn test_column_offsets() {
        let layout = TableLayout::paginate(&labels(&["A", "Cliente"]), 0, 29.0, &geometry());
        assert_eq!(layout.column_offsets(10.0), vec![10.0, 247.0]);
    }
}
