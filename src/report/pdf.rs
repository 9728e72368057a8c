use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};
use std::io::BufWriter;

use super::{Report, ReportError, HEADERS};

pub const DEFAULT_PDF_NAME: &str = "inventory_report.pdf";

// US Letter, landscape
const PAGE_WIDTH: f32 = 279.4;
const PAGE_HEIGHT: f32 = 215.9;
const MARGIN: f32 = 12.7;

const TITLE_SIZE: f32 = 16.0;
const TEXT_SIZE: f32 = 10.0;
const ROW_HEIGHT: f32 = 6.0;

/// Left edge of each column, as a fraction of the printable width.
const COLUMNS: [f32; 7] = [0.0, 0.26, 0.50, 0.60, 0.71, 0.82, 0.92];

struct Pages {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    page: usize,
}

impl Pages {
    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.font };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn rule(&self) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(self.y)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(self.y)), false),
            ],
            is_closed: false,
        });
    }

    fn row(&mut self, cells: &[String], bold: bool) {
        let width = PAGE_WIDTH - 2.0 * MARGIN;
        for (cell, offset) in cells.iter().zip(COLUMNS.iter()) {
            self.text(cell, TEXT_SIZE, MARGIN + offset * width, bold);
        }
        self.y -= ROW_HEIGHT;
    }

    fn header(&mut self) {
        let cells: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
        self.row(&cells, true);
        self.y += ROW_HEIGHT - 1.5;
        self.rule();
        self.y -= ROW_HEIGHT - 1.5;
    }

    /// Starts a new page when fewer than `needed` millimetres remain.
    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed >= MARGIN {
            return;
        }
        self.page += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Page {}", self.page),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN - TEXT_SIZE * 0.35;
        self.header();
    }
}

pub(super) fn render(report: &Report) -> Result<Vec<u8>, ReportError> {
    render_pages(report).map(|(bytes, _)| bytes)
}

/// Renders the document, returning its bytes and page count.
fn render_pages(report: &Report) -> Result<(Vec<u8>, usize), ReportError> {
    let (doc, page, layer) = PdfDocument::new(
        "Inventory report",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Page 1",
    );
    let layer = doc.get_page(page).get_layer(layer);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    let mut pages = Pages {
        doc,
        layer,
        font,
        bold,
        y: PAGE_HEIGHT - MARGIN - TITLE_SIZE * 0.35,
        page: 1,
    };

    pages.text("Inventory report", TITLE_SIZE, MARGIN, true);
    pages.y -= 7.0;
    let generated = format!(
        "Generated {}",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    pages.text(&generated, TEXT_SIZE, MARGIN, false);
    pages.y -= 10.0;
    pages.header();

    for row in &report.rows {
        pages.ensure_room(ROW_HEIGHT);
        pages.row(&row.cells(), false);
    }

    pages.ensure_room(ROW_HEIGHT * 2.0);
    pages.y += ROW_HEIGHT - 1.5;
    pages.rule();
    pages.y -= ROW_HEIGHT;
    let total = format!("Grand total: {}", report.grand_total_display());
    pages.text(&total, TEXT_SIZE + 2.0, MARGIN, true);

    tracing::debug!(
        "Rendered report with {} row(s) on {} page(s)",
        report.rows.len(),
        pages.page
    );

    let page_count = pages.page;
    let mut writer = BufWriter::new(Vec::<u8>::new());
    pages
        .doc
        .save(&mut writer)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    Ok((bytes, page_count))
}
