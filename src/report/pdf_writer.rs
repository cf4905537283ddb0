// ==========================================
// Wood QC Report - PDF serialization
// ==========================================
// Writes a ReportDocument as uncompressed PDF 1.4.
// Object layout: 1 catalog, 2 page tree, 3 shared resources,
// 4..=7 Helvetica faces, then images, then (page, content) pairs.
// No creation date or document ID: identical documents give identical bytes.
// ==========================================

use crate::report::document::{DrawOp, ReportDocument, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::report::font_metrics::FontFace;
use crate::report::image::EmbeddedImage;

/// Points per millimetre.
pub const K: f64 = 72.0 / 25.4;

/// Stroke width of table borders, in mm.
const LINE_WIDTH_MM: f64 = 0.2;

const FIRST_FONT_OBJ: usize = 4;

pub struct PdfWriter<'d> {
    doc: &'d ReportDocument,
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl<'d> PdfWriter<'d> {
    pub fn new(doc: &'d ReportDocument) -> Self {
        Self {
            doc,
            buf: Vec::new(),
            offsets: Vec::new(),
        }
    }

    fn first_image_obj(&self) -> usize {
        FIRST_FONT_OBJ + FontFace::ALL.len()
    }

    fn page_obj(&self, index: usize) -> usize {
        self.first_image_obj() + self.doc.images.len() + index * 2
    }

    pub fn write(mut self) -> Vec<u8> {
        self.buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        self.write_catalog();
        self.write_page_tree();
        self.write_resources();
        for face in FontFace::ALL {
            self.write_font(face);
        }
        for image in &self.doc.images {
            self.write_image(image);
        }
        for page_index in 0..self.doc.pages.len() {
            self.write_page(page_index);
        }

        self.write_trailer();
        self.buf
    }

    // ==========================================
    // Objects
    // ==========================================

    fn begin_obj(&mut self) -> usize {
        self.offsets.push(self.buf.len());
        let number = self.offsets.len();
        self.push_str(&format!("{} 0 obj\n", number));
        number
    }

    fn end_obj(&mut self) {
        self.push_str("endobj\n");
    }

    fn push_str(&mut self, text: &str) {
        self.buf.extend_from_slice(text.as_bytes());
    }

    fn write_catalog(&mut self) {
        self.begin_obj();
        self.push_str("<< /Type /Catalog /Pages 2 0 R >>\n");
        self.end_obj();
    }

    fn write_page_tree(&mut self) {
        let kids: Vec<String> = (0..self.doc.pages.len())
            .map(|i| format!("{} 0 R", self.page_obj(i)))
            .collect();
        self.begin_obj();
        self.push_str(&format!(
            "<< /Type /Pages /Kids [{}] /Count {} /MediaBox [0 0 {} {}] >>\n",
            kids.join(" "),
            self.doc.pages.len(),
            num(PAGE_WIDTH_MM * K),
            num(PAGE_HEIGHT_MM * K)
        ));
        self.end_obj();
    }

    fn write_resources(&mut self) {
        let fonts: String = FontFace::ALL
            .iter()
            .enumerate()
            .map(|(i, face)| format!("/{} {} 0 R ", face.resource_name(), FIRST_FONT_OBJ + i))
            .collect();
        let images: String = (0..self.doc.images.len())
            .map(|i| format!("/I{} {} 0 R ", i + 1, self.first_image_obj() + i))
            .collect();

        self.begin_obj();
        self.push_str(&format!(
            "<< /ProcSet [/PDF /Text /ImageB /ImageC] /Font << {}>> /XObject << {}>> >>\n",
            fonts, images
        ));
        self.end_obj();
    }

    fn write_font(&mut self, face: FontFace) {
        self.begin_obj();
        self.push_str(&format!(
            "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>\n",
            face.base_font()
        ));
        self.end_obj();
    }

    fn write_image(&mut self, image: &EmbeddedImage) {
        // Adobe CMYK JPEGs are stored inverted
        let decode = if image.components == 4 {
            " /Decode [1 0 1 0 1 0 1 0]"
        } else {
            ""
        };
        self.begin_obj();
        self.push_str(&format!(
            "<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /{} \
             /BitsPerComponent 8{} /Filter /DCTDecode /Length {} >>\nstream\n",
            image.width_px,
            image.height_px,
            image.color_space(),
            decode,
            image.data.len()
        ));
        self.buf.extend_from_slice(&image.data);
        self.push_str("\nendstream\n");
        self.end_obj();
    }

    fn write_page(&mut self, index: usize) {
        let content_obj = self.page_obj(index) + 1;
        self.begin_obj();
        self.push_str(&format!(
            "<< /Type /Page /Parent 2 0 R /Resources 3 0 R /Contents {} 0 R >>\n",
            content_obj
        ));
        self.end_obj();

        let content = self.content_stream(index);
        self.begin_obj();
        self.push_str(&format!("<< /Length {} >>\nstream\n", content.len()));
        self.buf.extend_from_slice(&content);
        self.push_str("\nendstream\n");
        self.end_obj();
    }

    fn content_stream(&self, index: usize) -> Vec<u8> {
        let mut out = format!("{} w\n0 G\n0 g", num(LINE_WIDTH_MM * K)).into_bytes();

        for op in &self.doc.pages[index].ops {
            out.push(b'\n');
            match op {
                DrawOp::Text {
                    x_mm,
                    baseline_mm,
                    face,
                    size_pt,
                    bytes,
                } => {
                    let head = format!(
                        "BT /{} {} Tf {} {} Td (",
                        face.resource_name(),
                        num(*size_pt),
                        num(x_mm * K),
                        num((PAGE_HEIGHT_MM - baseline_mm) * K)
                    );
                    out.extend_from_slice(head.as_bytes());
                    out.extend_from_slice(&escape(bytes));
                    out.extend_from_slice(b") Tj ET");
                }
                DrawOp::Rect {
                    x_mm,
                    y_mm,
                    w_mm,
                    h_mm,
                } => {
                    let rect = format!(
                        "{} {} {} {} re S",
                        num(x_mm * K),
                        num((PAGE_HEIGHT_MM - y_mm) * K),
                        num(w_mm * K),
                        num(-h_mm * K)
                    );
                    out.extend_from_slice(rect.as_bytes());
                }
                DrawOp::Image {
                    image,
                    x_mm,
                    y_mm,
                    w_mm,
                    h_mm,
                } => {
                    let draw = format!(
                        "q {} 0 0 {} {} {} cm /I{} Do Q",
                        num(w_mm * K),
                        num(h_mm * K),
                        num(x_mm * K),
                        num((PAGE_HEIGHT_MM - (y_mm + h_mm)) * K),
                        image + 1
                    );
                    out.extend_from_slice(draw.as_bytes());
                }
            }
        }
        out
    }

    fn write_trailer(&mut self) {
        let xref_offset = self.buf.len();
        let size = self.offsets.len() + 1;
        let entries: String = self
            .offsets
            .iter()
            .map(|offset| format!("{:010} 00000 n \n", offset))
            .collect();
        self.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", size));
        self.push_str(&entries);
        self.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, xref_offset
        ));
    }
}

/// Two decimals, never "-0.00".
fn num(value: f64) -> String {
    let text = format!("{:.2}", value);
    if text == "-0.00" {
        "0.00".to_string()
    } else {
        text
    }
}

/// PDF literal-string escaping; non-printable bytes as octal.
fn escape(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for b in bytes {
        match *b {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(*b);
            }
            0x20..=0x7E => out.push(*b),
            other => out.extend_from_slice(format!("\\{:03o}", other).as_bytes()),
        }
    }
    out
}
