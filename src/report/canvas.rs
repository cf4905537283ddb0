// ==========================================
// Wood QC Report - Drawing canvas
// ==========================================
// Responsibility: cursor-driven page drawing in millimetres
// - cells: bordered boxes with one aligned line of text
// - multi-line cells: greedy word wrap inside a fixed width
// - automatic page break below the bottom margin
// - per-page header/footer through a PageDecorator
// ==========================================

use crate::report::document::{DrawOp, Page, ReportDocument, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::report::encoding;
use crate::report::font_metrics::FontFace;
use crate::report::image::EmbeddedImage;
use crate::report::pdf_writer::K;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const MARGIN_MM: f64 = 10.0;
pub const CELL_MARGIN_MM: f64 = 1.0;
pub const AUTO_BREAK_MARGIN_MM: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Where the cursor goes after a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum After {
    /// To the right edge of the cell.
    Right,
    /// To the left margin of the next line.
    NextLine,
    /// Straight below the cell's left edge.
    Below,
}

/// Content repeated on every page.
pub trait PageDecorator {
    fn header(&self, canvas: &mut Canvas);
    fn footer(&self, canvas: &mut Canvas);
}

#[derive(Clone, Copy)]
enum Decoration {
    Header,
    Footer,
}

pub struct Canvas {
    pages: Vec<Page>,
    images: Vec<EmbeddedImage>,
    image_cache: Vec<(PathBuf, Option<usize>)>,
    decorator: Option<Box<dyn PageDecorator>>,
    x: f64,
    y: f64,
    face: FontFace,
    size_pt: f64,
    auto_break: bool,
    break_margin: f64,
    decorating: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            images: Vec::new(),
            image_cache: Vec::new(),
            decorator: None,
            x: MARGIN_MM,
            y: MARGIN_MM,
            face: FontFace::Regular,
            size_pt: 10.0,
            auto_break: true,
            break_margin: AUTO_BREAK_MARGIN_MM,
            decorating: false,
        }
    }

    pub fn with_decorator(mut self, decorator: Box<dyn PageDecorator>) -> Self {
        self.decorator = Some(decorator);
        self
    }

    pub fn set_auto_page_break(&mut self, enabled: bool, margin_mm: f64) {
        self.auto_break = enabled;
        self.break_margin = margin_mm;
    }

    // ==========================================
    // Pages
    // ==========================================

    pub fn add_page(&mut self) {
        let font = (self.face, self.size_pt);
        if !self.pages.is_empty() {
            self.decorate(Decoration::Footer);
        }
        self.pages.push(Page::default());
        self.x = MARGIN_MM;
        self.y = MARGIN_MM;
        self.decorate(Decoration::Header);
        self.face = font.0;
        self.size_pt = font.1;
        debug!(page = self.pages.len(), "page added");
    }

    /// The decorator is lifted out while it draws; auto-break stays off meanwhile.
    fn decorate(&mut self, which: Decoration) {
        let Some(decorator) = self.decorator.take() else {
            return;
        };
        let font = (self.face, self.size_pt);
        self.decorating = true;
        match which {
            Decoration::Header => decorator.header(self),
            Decoration::Footer => decorator.footer(self),
        }
        self.decorating = false;
        self.face = font.0;
        self.size_pt = font.1;
        self.decorator = Some(decorator);
    }

    /// 1-based number of the page being drawn.
    pub fn page_no(&self) -> usize {
        self.pages.len()
    }

    /// y beyond which content triggers a page break.
    pub fn page_break_trigger(&self) -> f64 {
        PAGE_HEIGHT_MM - self.break_margin
    }

    pub fn finish(mut self) -> ReportDocument {
        if self.pages.is_empty() {
            self.add_page();
        }
        self.decorate(Decoration::Footer);
        ReportDocument {
            pages: self.pages,
            images: self.images,
        }
    }

    fn push(&mut self, op: DrawOp) {
        if self.pages.is_empty() {
            self.add_page();
        }
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    // ==========================================
    // Cursor and font
    // ==========================================

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    /// Moves to the left margin; negative values count from the page bottom.
    pub fn set_y(&mut self, y: f64) {
        self.x = MARGIN_MM;
        self.y = if y < 0.0 { PAGE_HEIGHT_MM + y } else { y };
    }

    pub fn set_xy(&mut self, x: f64, y: f64) {
        self.set_y(y);
        self.x = x;
    }

    pub fn ln(&mut self, h: f64) {
        self.x = MARGIN_MM;
        self.y += h;
    }

    pub fn set_font(&mut self, face: FontFace, size_pt: f64) {
        self.face = face;
        self.size_pt = size_pt;
    }

    pub fn font(&self) -> (FontFace, f64) {
        (self.face, self.size_pt)
    }

    fn font_size_mm(&self) -> f64 {
        self.size_pt / K
    }

    fn bytes_width(&self, bytes: &[u8]) -> f64 {
        self.face.text_width(bytes) as f64 * self.size_pt / 1000.0 / K
    }

    /// Baseline of one line of text vertically centred in a box of height `h` at `y`.
    pub fn baseline(&self, y: f64, h: f64) -> f64 {
        y + 0.5 * h + 0.3 * self.font_size_mm()
    }

    /// Width of `text` in the current font, in mm.
    pub fn string_width(&self, text: &str) -> f64 {
        self.bytes_width(&encoding::encode(text))
    }

    // ==========================================
    // Drawing
    // ==========================================

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.push(DrawOp::Rect {
            x_mm: x,
            y_mm: y,
            w_mm: w,
            h_mm: h,
        });
    }

    /// Raw text at an explicit baseline; the cursor does not move.
    pub fn text(&mut self, x: f64, baseline: f64, text: &str) {
        let bytes = encoding::encode(text);
        if bytes.is_empty() {
            return;
        }
        self.push(DrawOp::Text {
            x_mm: x,
            baseline_mm: baseline,
            face: self.face,
            size_pt: self.size_pt,
            bytes,
        });
    }

    /// One-line cell; `w <= 0` extends to the right margin. Overlong text is clipped.
    pub fn cell(&mut self, w: f64, h: f64, text: &str, border: bool, after: After, align: Align) {
        let line: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        self.cell_bytes(w, h, encoding::encode(&line), border, after, align);
    }

    fn cell_bytes(&mut self, w: f64, h: f64, bytes: Vec<u8>, border: bool, after: After, align: Align) {
        if self.pages.is_empty() {
            self.add_page();
        }
        if self.auto_break && !self.decorating && self.y + h > self.page_break_trigger() {
            let x = self.x;
            self.add_page();
            self.x = x;
        }
        let w = if w <= 0.0 {
            PAGE_WIDTH_MM - MARGIN_MM - self.x
        } else {
            w
        };

        if border {
            self.rect(self.x, self.y, w, h);
        }

        let bytes = self.clip(bytes, w - 2.0 * CELL_MARGIN_MM);
        if !bytes.is_empty() {
            let text_w = self.bytes_width(&bytes);
            let dx = match align {
                Align::Left => CELL_MARGIN_MM,
                Align::Center => (w - text_w) / 2.0,
                Align::Right => w - CELL_MARGIN_MM - text_w,
            };
            let baseline = self.baseline(self.y, h);
            self.push(DrawOp::Text {
                x_mm: self.x + dx,
                baseline_mm: baseline,
                face: self.face,
                size_pt: self.size_pt,
                bytes,
            });
        }

        match after {
            After::Right => self.x += w,
            After::NextLine => {
                self.x = MARGIN_MM;
                self.y += h;
            }
            After::Below => self.y += h,
        }
    }

    fn clip(&self, mut bytes: Vec<u8>, max_w: f64) -> Vec<u8> {
        while !bytes.is_empty() && self.bytes_width(&bytes) > max_w {
            bytes.pop();
        }
        bytes
    }

    /// Wrapped text, one `h`-high line per row. Returns the number of lines;
    /// the cursor ends at the left margin below the last line.
    pub fn multi_cell(&mut self, w: f64, h: f64, text: &str, border: bool, align: Align) -> usize {
        let w = if w <= 0.0 {
            PAGE_WIDTH_MM - MARGIN_MM - self.x
        } else {
            w
        };
        let lines = self.wrap(text, w - 2.0 * CELL_MARGIN_MM);
        let count = lines.len();
        let x = self.x;
        for line in lines {
            self.x = x;
            self.cell_bytes(w, h, line, border, After::Below, align);
        }
        self.x = MARGIN_MM;
        count
    }

    /// Wrapped text inside a frame at least `min_h` tall. A block that crosses
    /// the break line gets one frame per page, each closed at the break line;
    /// the cursor ends at the left margin below the last frame.
    pub fn framed_multi_cell(&mut self, w: f64, h: f64, text: &str, min_h: f64, align: Align) -> usize {
        if self.pages.is_empty() {
            self.add_page();
        }
        let w = if w <= 0.0 {
            PAGE_WIDTH_MM - MARGIN_MM - self.x
        } else {
            w
        };
        let lines = self.wrap(text, w - 2.0 * CELL_MARGIN_MM);
        let count = lines.len();
        let x = self.x;
        let mut frame_top = self.y;
        let mut continued = false;

        for line in lines {
            if self.auto_break && !self.decorating && self.y + h > self.page_break_trigger() {
                let bottom = self.page_break_trigger();
                if bottom > frame_top {
                    self.rect(x, frame_top, w, bottom - frame_top);
                }
                self.add_page();
                frame_top = self.y;
                continued = true;
            }
            self.x = x;
            self.cell_bytes(w, h, line, false, After::Below, align);
        }

        // min_h sizes the block as a whole, not its continuation
        let mut frame_h = if continued {
            self.y - frame_top
        } else {
            (self.y - frame_top).max(min_h)
        };
        if self.auto_break && !self.decorating {
            frame_h = frame_h.min(self.page_break_trigger() - frame_top).max(0.0);
        }
        self.rect(x, frame_top, w, frame_h);

        self.x = MARGIN_MM;
        self.y = frame_top + frame_h;
        count
    }

    /// Number of lines `text` needs at width `w` in the current font.
    pub fn line_count(&self, w: f64, text: &str) -> usize {
        self.wrap(text, w - 2.0 * CELL_MARGIN_MM).len()
    }

    /// Greedy word wrap on encoded bytes; words wider than a line are split.
    fn wrap(&self, text: &str, max_w: f64) -> Vec<Vec<u8>> {
        let space_w = self.bytes_width(b" ");
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let bytes = encoding::encode(paragraph.trim_end_matches('\r'));
            let mut line: Vec<u8> = Vec::new();
            let mut line_w = 0.0;

            for word in bytes.split(|b| *b == b' ').filter(|w| !w.is_empty()) {
                let word_w = self.bytes_width(word);
                let needed = if line.is_empty() {
                    word_w
                } else {
                    line_w + space_w + word_w
                };
                if needed <= max_w {
                    if !line.is_empty() {
                        line.push(b' ');
                    }
                    line.extend_from_slice(word);
                    line_w = needed;
                    continue;
                }

                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_w = 0.0;
                }
                if word_w <= max_w {
                    line.extend_from_slice(word);
                    line_w = word_w;
                    continue;
                }
                for b in word {
                    let glyph_w = self.bytes_width(&[*b]);
                    if !line.is_empty() && line_w + glyph_w > max_w {
                        lines.push(std::mem::take(&mut line));
                        line_w = 0.0;
                    }
                    line.push(*b);
                    line_w += glyph_w;
                }
            }
            lines.push(line);
        }

        lines
    }

    /// Best-effort image at (x, y) with the given width; returns false when skipped.
    pub fn image(&mut self, path: &Path, x: f64, y: f64, w: f64) -> bool {
        let cached = self
            .image_cache
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, index)| *index);

        let index = match cached {
            Some(index) => index,
            None => {
                let loaded = match EmbeddedImage::load(path) {
                    Ok(image) => {
                        self.images.push(image);
                        Some(self.images.len() - 1)
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "image skipped");
                        None
                    }
                };
                self.image_cache.push((path.to_path_buf(), loaded));
                loaded
            }
        };

        let Some(index) = index else {
            return false;
        };
        let h = self.images[index].height_for_width(w);
        self.push(DrawOp::Image {
            image: index,
            x_mm: x,
            y_mm: y,
            w_mm: w,
            h_mm: h,
        });
        true
    }
}
