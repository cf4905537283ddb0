// ==========================================
// Wood QC Report - Report document model
// ==========================================
// Responsibility: composed pages as absolutely positioned drawing ops
// Units: millimetres from the top-left corner of an A4 page
// Lifecycle: built once by the canvas, immutable afterwards
// ==========================================

use crate::report::encoding;
use crate::report::font_metrics::FontFace;
use crate::report::image::EmbeddedImage;
use crate::report::pdf_writer::PdfWriter;

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// WinAnsi-encoded text starting at `x_mm` on the given baseline.
    Text {
        x_mm: f64,
        baseline_mm: f64,
        face: FontFace,
        size_pt: f64,
        bytes: Vec<u8>,
    },
    /// Stroked rectangle outline.
    Rect {
        x_mm: f64,
        y_mm: f64,
        w_mm: f64,
        h_mm: f64,
    },
    /// Reference into `ReportDocument::images`.
    Image {
        image: usize,
        x_mm: f64,
        y_mm: f64,
        w_mm: f64,
        h_mm: f64,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Page text in drawing order, one entry per text op.
    pub fn text_runs(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { bytes, .. } => Some(encoding::decode(bytes)),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportDocument {
    pub pages: Vec<Page>,
    pub images: Vec<EmbeddedImage>,
}

impl ReportDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every text run of every page, joined by newlines.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .flat_map(|page| page.text_runs())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Serialize to a self-contained PDF byte stream.
    pub fn to_pdf_bytes(&self) -> Vec<u8> {
        PdfWriter::new(self).write()
    }
}
