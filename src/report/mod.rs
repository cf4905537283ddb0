// ==========================================
// Wood QC Report - Report rendering
// ==========================================
// Responsibility: DisplayRecord → paginated A4 certificate → PDF bytes
// Text: Helvetica family, Windows-1252 single-byte encoding
// ==========================================

pub mod canvas;
pub mod document;
pub mod encoding;
pub mod font_metrics;
pub mod image;
pub mod layout;
pub mod pdf_writer;

pub use canvas::{After, Align, Canvas, PageDecorator};
pub use document::{DrawOp, Page, ReportDocument, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
pub use font_metrics::FontFace;
pub use image::{EmbeddedImage, ImageError};
pub use layout::{compose_certificate, CertificateDecorator, FieldSpec, FormCursor, TableBlock};
