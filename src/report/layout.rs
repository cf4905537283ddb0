// ==========================================
// Wood QC Report - Certificate layout
// ==========================================
// Responsibility: place a DisplayRecord on A4 pages
// Building blocks:
// - FieldSpec / FormCursor: label above a bordered value, rows advanced by a cursor
// - TableBlock: merged header cells, fixed-height rows, running cursor
// - draw_formula_label: oxide formula with subscript digits as one cell
// - CertificateDecorator: logos and title on top, page number at the bottom
// ==========================================

use crate::config::ReportProfile;
use crate::domain::{Compound, FormulaPart};
use crate::engine::display::DisplayRecord;
use crate::report::canvas::{After, Align, Canvas, PageDecorator, CELL_MARGIN_MM, MARGIN_MM};
use crate::report::document::{ReportDocument, PAGE_HEIGHT_MM};
use crate::report::font_metrics::FontFace;

const LABEL_HEIGHT: f64 = 3.0;
const VALUE_HEIGHT: f64 = 6.0;
const WRAP_LINE_HEIGHT: f64 = 4.0;
const BODY_SIZE: f64 = 8.0;
const SUBSCRIPT_SIZE: f64 = 5.0;
const SUBSCRIPT_DROP: f64 = 1.5;
const SECTION_SIZE: f64 = 9.0;
const CONTENT_WIDTH: f64 = 190.0;
const MIN_WRAPPED_BOX: f64 = 12.0;

// ==========================================
// Labeled fields
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub label: String,
    pub value: String,
    pub x: f64,
    pub dy: f64,
    pub w: f64,
    pub h: f64,
    pub align: Align,
    pub multi_line: bool,
    pub bold_value: bool,
}

impl FieldSpec {
    pub fn new(label: &str, value: &str, x: f64, w: f64) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            x,
            dy: 0.0,
            w,
            h: VALUE_HEIGHT,
            align: Align::Left,
            multi_line: false,
            bold_value: false,
        }
    }

    /// Vertical offset from the cursor row.
    pub fn offset(mut self, dy: f64) -> Self {
        self.dy = dy;
        self
    }

    pub fn height(mut self, h: f64) -> Self {
        self.h = h;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn multi_line(mut self) -> Self {
        self.multi_line = true;
        self
    }

    pub fn bold_value(mut self) -> Self {
        self.bold_value = true;
        self
    }

    /// Label plus value box.
    pub fn total_height(&self) -> f64 {
        LABEL_HEIGHT + self.h
    }

    /// Space that must be left on the page before the field starts. Wrapped
    /// values only need their first lines; the rest may continue overleaf.
    pub fn space_needed(&self) -> f64 {
        if self.multi_line {
            LABEL_HEIGHT + self.h.min(MIN_WRAPPED_BOX)
        } else {
            self.total_height()
        }
    }
}

/// Small bold label directly above a bordered value cell. Multi-line values
/// wrap inside a frame of at least the field's height, split at page breaks.
pub fn labeled_field(canvas: &mut Canvas, spec: &FieldSpec, y: f64) {
    canvas.set_xy(spec.x, y);
    canvas.set_font(FontFace::Bold, BODY_SIZE);
    canvas.cell(spec.w, LABEL_HEIGHT, &spec.label, false, After::Right, Align::Left);

    canvas.set_xy(spec.x, y + LABEL_HEIGHT);
    let face = if spec.bold_value {
        FontFace::Bold
    } else {
        FontFace::Regular
    };
    canvas.set_font(face, BODY_SIZE);
    if spec.multi_line {
        canvas.framed_multi_cell(spec.w, WRAP_LINE_HEIGHT, &spec.value, spec.h, spec.align);
    } else {
        canvas.cell(spec.w, spec.h, &spec.value, true, After::Right, spec.align);
    }
}

/// Box height that fits `text` wrapped at `w`, never below `min_h`.
pub fn wrapped_height(canvas: &mut Canvas, text: &str, w: f64, min_h: f64) -> f64 {
    let saved = canvas.font();
    canvas.set_font(FontFace::Regular, BODY_SIZE);
    let lines = canvas.line_count(w, text);
    canvas.set_font(saved.0, saved.1);
    (lines as f64 * WRAP_LINE_HEIGHT).max(min_h)
}

// ==========================================
// FormCursor - vertical flow between sections
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormCursor {
    y: f64,
}

impl FormCursor {
    pub fn at(y: f64) -> Self {
        Self { y }
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn advance(&mut self, dy: f64) {
        self.y += dy;
    }

    /// Continue from wherever the canvas cursor ended.
    pub fn sync(&mut self, canvas: &Canvas, gap: f64) {
        self.y = canvas.y() + gap;
    }

    /// Start a new page when `needed` mm would cross the break line.
    pub fn ensure_space(&mut self, canvas: &mut Canvas, needed: f64) {
        if self.y + needed > canvas.page_break_trigger() {
            canvas.add_page();
            self.y = canvas.y() + 3.0;
        }
    }

    pub fn section_title(&mut self, canvas: &mut Canvas, title: &str) {
        self.ensure_space(canvas, 5.0 + LABEL_HEIGHT + VALUE_HEIGHT);
        canvas.set_y(self.y);
        canvas.set_font(FontFace::Bold, SECTION_SIZE);
        canvas.cell(0.0, 5.0, title, false, After::NextLine, Align::Left);
    }

    /// One row of fields sharing the cursor's y.
    pub fn place_row(&mut self, canvas: &mut Canvas, fields: &[FieldSpec]) {
        let needed = fields
            .iter()
            .map(|f| f.dy + f.space_needed())
            .fold(0.0, f64::max);
        self.ensure_space(canvas, needed);
        for field in fields {
            labeled_field(canvas, field, self.y + field.dy);
        }
    }
}

// ==========================================
// TableBlock
// ==========================================

/// Header cell positioned relative to the table origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderCell<'a> {
    pub dx: f64,
    pub dy: f64,
    pub w: f64,
    pub h: f64,
    pub text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowCell<'a> {
    Text { w: f64, text: &'a str, align: Align },
    Formula { w: f64, compound: Compound },
    /// Leave the slot to a cell spanning several rows.
    Skip(f64),
}

pub struct TableBlock {
    x: f64,
    y: f64,
    row_height: f64,
}

impl TableBlock {
    pub fn begin(x: f64, y: f64, row_height: f64) -> Self {
        Self { x, y, row_height }
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Keep the next `needed` mm of the table on one page.
    pub fn ensure_space(&mut self, canvas: &mut Canvas, needed: f64) {
        if self.y + needed > canvas.page_break_trigger() {
            canvas.add_page();
            self.y = canvas.y() + 3.0;
        }
    }

    /// Full-width bordered caption.
    pub fn caption(&mut self, canvas: &mut Canvas, w: f64, h: f64, text: &str) {
        canvas.set_xy(self.x, self.y);
        canvas.set_font(FontFace::Bold, SECTION_SIZE);
        canvas.cell(w, h, text, true, After::Right, Align::Center);
        self.y += h;
    }

    /// Header cells of differing heights simulate merged headers.
    pub fn header(&mut self, canvas: &mut Canvas, cells: &[HeaderCell<'_>], height: f64) {
        for cell in cells {
            canvas.set_xy(self.x + cell.dx, self.y + cell.dy);
            canvas.cell(cell.w, cell.h, cell.text, true, After::Right, Align::Center);
        }
        self.y += height;
    }

    /// Cell covering `rows` data rows from the current row down.
    pub fn spanning_cell(&self, canvas: &mut Canvas, dx: f64, w: f64, rows: usize, text: &str) {
        canvas.set_xy(self.x + dx, self.y);
        canvas.cell(w, self.row_height * rows as f64, text, true, After::Right, Align::Center);
    }

    pub fn row(&mut self, canvas: &mut Canvas, cells: &[RowCell<'_>]) {
        self.ensure_space(canvas, self.row_height);
        let mut x = self.x;
        for cell in cells {
            match *cell {
                RowCell::Text { w, text, align } => {
                    canvas.set_xy(x, self.y);
                    canvas.cell(w, self.row_height, text, true, After::Right, align);
                    x += w;
                }
                RowCell::Formula { w, compound } => {
                    draw_formula_label(canvas, compound, x, self.y, w, self.row_height);
                    x += w;
                }
                RowCell::Skip(w) => x += w,
            }
        }
        self.y += self.row_height;
        canvas.set_xy(MARGIN_MM, self.y);
    }
}

// ==========================================
// Chemical formula label
// ==========================================

/// "Teor de CrO₃ (Cromo)" as (text, subscript) segments.
fn formula_segments(compound: Compound) -> Vec<(String, bool)> {
    let mut segments = vec![("Teor de ".to_string(), false)];
    for part in compound.oxide_formula() {
        match part {
            FormulaPart::Base(text) => segments.push((text.to_string(), false)),
            FormulaPart::Sub(text) => segments.push((text.to_string(), true)),
        }
    }
    segments.push((format!(" ({})", compound.display_name()), false));
    segments
}

/// Segments share one baseline; subscripts are smaller and dropped. Each
/// advance is measured in its own size so the label reads as one run,
/// framed by a single bordered cell.
pub fn draw_formula_label(canvas: &mut Canvas, compound: Compound, x: f64, y: f64, w: f64, h: f64) {
    let saved = canvas.font();
    canvas.set_font(FontFace::Regular, BODY_SIZE);
    let baseline = canvas.baseline(y, h);

    let mut cursor_x = x + CELL_MARGIN_MM;
    for (text, subscript) in formula_segments(compound) {
        let (size, drop) = if subscript {
            (SUBSCRIPT_SIZE, SUBSCRIPT_DROP)
        } else {
            (BODY_SIZE, 0.0)
        };
        canvas.set_font(FontFace::Regular, size);
        canvas.text(cursor_x, baseline + drop, &text);
        cursor_x += canvas.string_width(&text);
    }

    canvas.set_font(saved.0, saved.1);
    canvas.set_xy(x, y);
    canvas.cell(w, h, "", true, After::Right, Align::Left);
}

// ==========================================
// CertificateDecorator
// ==========================================
pub struct CertificateDecorator {
    profile: ReportProfile,
}

impl CertificateDecorator {
    pub fn new(profile: &ReportProfile) -> Self {
        Self {
            profile: profile.clone(),
        }
    }
}

impl PageDecorator for CertificateDecorator {
    fn header(&self, canvas: &mut Canvas) {
        for logo in &self.profile.logos {
            canvas.image(&self.profile.logo_path(logo), logo.x_mm, logo.y_mm, logo.width_mm);
        }
        canvas.set_y(12.0);
        canvas.set_font(FontFace::Bold, 14.0);
        canvas.cell(0.0, 10.0, &self.profile.title, false, After::NextLine, Align::Center);
    }

    fn footer(&self, canvas: &mut Canvas) {
        canvas.set_y(-15.0);
        canvas.set_font(FontFace::Italic, 6.0);
        let label = format!("{} {}", self.profile.page_label, canvas.page_no());
        canvas.cell(0.0, 10.0, &label, false, After::Right, Align::Center);
    }
}

// ==========================================
// Certificate
// ==========================================

/// Lay out the whole certificate for one sample.
pub fn compose_certificate(display: &DisplayRecord, profile: &ReportProfile) -> ReportDocument {
    let mut canvas = Canvas::new().with_decorator(Box::new(CertificateDecorator::new(profile)));
    canvas.set_font(FontFace::Regular, BODY_SIZE);
    canvas.add_page();

    let mut cursor = FormCursor::at(30.0);

    // ===== Identification =====
    cursor.place_row(
        &mut canvas,
        &[
            FieldSpec::new("Data de Entrada", &display.entry_date, 10.0, 40.0).centered(),
            FieldSpec::new("Número ID", &display.sample_id, 150.0, 50.0)
                .offset(-5.0)
                .centered(),
            FieldSpec::new("Data de Emissão", &display.issue_date, 150.0, 50.0)
                .offset(8.0)
                .centered(),
        ],
    );

    // ===== Client =====
    cursor.advance(20.0);
    cursor.section_title(&mut canvas, "DADOS DO CLIENTE");
    cursor.advance(6.0);
    cursor.place_row(
        &mut canvas,
        &[FieldSpec::new("Cliente", &display.client_name, 10.0, CONTENT_WIDTH)],
    );
    cursor.advance(11.0);
    cursor.place_row(
        &mut canvas,
        &[
            FieldSpec::new("Cidade/UF", &display.city_state, 10.0, 90.0),
            FieldSpec::new("E-mail", &display.email, 105.0, 95.0),
        ],
    );

    // ===== Sample =====
    cursor.advance(15.0);
    cursor.section_title(&mut canvas, "IDENTIFICAÇÃO DA AMOSTRA");
    cursor.advance(6.0);
    cursor.place_row(
        &mut canvas,
        &[FieldSpec::new("Ref. Cliente", &display.client_reference, 10.0, CONTENT_WIDTH)],
    );
    cursor.advance(11.0);
    cursor.place_row(
        &mut canvas,
        &[
            FieldSpec::new("Madeira", &display.wood, 10.0, 90.0),
            FieldSpec::new("Produto", &display.product, 105.0, 95.0),
        ],
    );
    cursor.advance(11.0);
    cursor.place_row(
        &mut canvas,
        &[
            FieldSpec::new("Aplicação", &display.application, 10.0, 60.0),
            FieldSpec::new("Norma ABNT", &display.standard, 75.0, 60.0),
            FieldSpec::new("Retenção Esp. (kg/m³)", &display.expected_retention, 140.0, 60.0).centered(),
        ],
    );
    cursor.advance(11.0);
    cursor.place_row(
        &mut canvas,
        &[FieldSpec::new("Parecer", &display.verdict, 140.0, 60.0)
            .centered()
            .bold_value()],
    );

    // ===== Physical measurements =====
    cursor.advance(15.0);
    cursor.section_title(&mut canvas, "MEDIDAS FÍSICAS");
    cursor.advance(6.0);
    let physical = &display.physical;
    cursor.place_row(
        &mut canvas,
        &[
            FieldSpec::new("Diâmetro médio (cm)", &physical.avg_diameter_cm, 10.0, 36.0).centered(),
            FieldSpec::new("Comprimento médio (cm)", &physical.avg_length_cm, 48.5, 36.0).centered(),
            FieldSpec::new("Massa média (g)", &physical.avg_mass_g, 87.0, 36.0).centered(),
            FieldSpec::new("Volume (cm³)", &physical.volume_cm3, 125.5, 36.0).centered(),
            FieldSpec::new("Densidade (kg/m³)", &physical.density_kg_m3, 164.0, 36.0).centered(),
        ],
    );

    // ===== Retention table =====
    cursor.advance(15.0);
    retention_table(&mut canvas, &mut cursor, display, profile);

    // ===== Penetration =====
    cursor.advance(5.0);
    penetration_section(&mut canvas, &mut cursor, display);

    // ===== Observations =====
    cursor.advance(5.0);
    if !display.observation.is_empty() {
        cursor.place_row(
            &mut canvas,
            &[FieldSpec::new("Observações", &display.observation, 10.0, CONTENT_WIDTH)
                .height(MIN_WRAPPED_BOX)
                .multi_line()
                .bold_value()],
        );
        cursor.sync(&canvas, 0.0);
    }

    // ===== Signature =====
    let signature_y = PAGE_HEIGHT_MM - 35.0;
    if cursor.y().max(canvas.y()) > signature_y {
        canvas.add_page();
    }
    canvas.set_y(-35.0);
    canvas.set_font(FontFace::Regular, SECTION_SIZE);
    canvas.cell(0.0, 5.0, &profile.supervisor_line, false, After::NextLine, Align::Center);

    canvas.finish()
}

fn retention_table(canvas: &mut Canvas, cursor: &mut FormCursor, display: &DisplayRecord, profile: &ReportProfile) {
    const ROW: f64 = 6.0;
    let rows = display.compounds.len();

    let mut table = TableBlock::begin(10.0, cursor.y(), ROW);
    // caption + header + compound rows + total row
    table.ensure_space(canvas, 6.0 + 10.0 + ROW * (rows + 1) as f64);
    table.caption(canvas, CONTENT_WIDTH, 6.0, "RESULTADOS DE RETENÇÃO");

    canvas.set_font(FontFace::Bold, 7.0);
    table.header(
        canvas,
        &[
            HeaderCell { dx: 0.0, dy: 0.0, w: 40.0, h: 10.0, text: "Ingredientes ativos" },
            HeaderCell { dx: 40.0, dy: 0.0, w: 30.0, h: 10.0, text: "Resultado (kg/m3)" },
            HeaderCell { dx: 70.0, dy: 0.0, w: 80.0, h: 5.0, text: "Balanceamento químico" },
            HeaderCell { dx: 150.0, dy: 0.0, w: 40.0, h: 10.0, text: "Método" },
            HeaderCell { dx: 70.0, dy: 5.0, w: 30.0, h: 5.0, text: "Resultados (%)" },
            HeaderCell { dx: 100.0, dy: 5.0, w: 50.0, h: 5.0, text: "Padrões" },
        ],
        10.0,
    );

    canvas.set_font(FontFace::Regular, BODY_SIZE);
    table.spanning_cell(canvas, 150.0, 40.0, rows, &profile.method_label);
    for row in &display.compounds {
        table.row(
            canvas,
            &[
                RowCell::Formula { w: 40.0, compound: row.compound },
                RowCell::Text { w: 30.0, text: &row.retention_kg_m3, align: Align::Center },
                RowCell::Text { w: 30.0, text: &row.balance_percent, align: Align::Center },
                RowCell::Text { w: 25.0, text: &row.standard_min, align: Align::Center },
                RowCell::Text { w: 25.0, text: &row.standard_max, align: Align::Center },
                RowCell::Skip(40.0),
            ],
        );
    }

    canvas.set_font(FontFace::Bold, BODY_SIZE);
    table.row(
        canvas,
        &[
            RowCell::Text { w: 40.0, text: "RETENÇÃO TOTAL", align: Align::Left },
            RowCell::Text { w: 30.0, text: &display.total_retention, align: Align::Center },
            RowCell::Text { w: 30.0, text: &display.total_balance, align: Align::Center },
            RowCell::Text { w: 90.0, text: &profile.note, align: Align::Center },
        ],
    );

    *cursor = FormCursor::at(table.y());
}

fn penetration_section(canvas: &mut Canvas, cursor: &mut FormCursor, display: &DisplayRecord) {
    let description_h = wrapped_height(canvas, &display.penetration_description, 100.0, MIN_WRAPPED_BOX);
    cursor.ensure_space(canvas, 7.0 + LABEL_HEIGHT + description_h.min(MIN_WRAPPED_BOX));

    canvas.set_y(cursor.y());
    canvas.set_font(FontFace::Bold, SECTION_SIZE);
    canvas.cell(CONTENT_WIDTH, 6.0, "RESULTADOS DE PENETRAÇÃO", false, After::NextLine, Align::Center);
    cursor.advance(7.0);

    cursor.place_row(
        canvas,
        &[
            FieldSpec::new("Grau", &display.grade, 10.0, 30.0).centered(),
            FieldSpec::new("Tipo", &display.grade_type, 45.0, 50.0).centered(),
            FieldSpec::new("Descrição", &display.penetration_description, 100.0, 100.0)
                .height(description_h)
                .multi_line(),
        ],
    );
    // the description is drawn last, so the canvas sits below its frame
    cursor.sync(canvas, 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComplianceRules;
    use crate::domain::{CanonicalField, CanonicalRecord, DerivedMetrics, RawValue};
    use crate::importer::value_normalizer::ValueNormalizer;
    use crate::report::canvas::AUTO_BREAK_MARGIN_MM;
    use crate::report::document::DrawOp;

    fn blank_profile() -> ReportProfile {
        ReportProfile {
            logos: Vec::new(),
            ..ReportProfile::default()
        }
    }

    fn display_for(fields: CanonicalRecord) -> DisplayRecord {
        DisplayRecord::build(
            &fields,
            &DerivedMetrics::default(),
            &ValueNormalizer::default(),
            &ComplianceRules::default(),
        )
    }

    #[test]
    fn test_formula_segments() {
        let arsenic: Vec<(String, bool)> = formula_segments(Compound::Arsenic);
        let subs: Vec<&str> = arsenic
            .iter()
            .filter(|(_, sub)| *sub)
            .map(|(t, _)| t.as_str())
            .collect();
        assert_eq!(subs, vec!["2", "5"]);
        assert_eq!(arsenic.first().unwrap().0, "Teor de ");
        assert_eq!(arsenic.last().unwrap().0, " (Arsênio)");
        assert!(formula_segments(Compound::Copper).iter().all(|(_, sub)| !sub));
    }

    #[test]
    fn test_formula_label_chains_segments() {
        let mut canvas = Canvas::new();
        canvas.add_page();
        draw_formula_label(&mut canvas, Compound::Chromium, 10.0, 100.0, 40.0, 6.0);
        let doc = canvas.finish();

        let texts: Vec<(f64, f64, f64)> = doc.pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x_mm, baseline_mm, size_pt, .. } => Some((*x_mm, *baseline_mm, *size_pt)),
                _ => None,
            })
            .collect();
        assert_eq!(texts.len(), 4);
        // x strictly increasing, subscript smaller and lower
        assert!(texts.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(texts[2].2, SUBSCRIPT_SIZE);
        assert!((texts[2].1 - texts[1].1 - SUBSCRIPT_DROP).abs() < 1e-9);
        assert!(doc.pages[0].ops.contains(&DrawOp::Rect {
            x_mm: 10.0,
            y_mm: 100.0,
            w_mm: 40.0,
            h_mm: 6.0
        }));
    }

    #[test]
    fn test_table_block_rows_advance() {
        let mut canvas = Canvas::new();
        canvas.add_page();
        let mut table = TableBlock::begin(10.0, 50.0, 6.0);
        table.header(
            &mut canvas,
            &[HeaderCell { dx: 0.0, dy: 0.0, w: 40.0, h: 10.0, text: "A" }],
            10.0,
        );
        table.row(&mut canvas, &[RowCell::Text { w: 40.0, text: "x", align: Align::Left }]);
        table.row(&mut canvas, &[RowCell::Skip(40.0)]);
        assert_eq!(table.y(), 72.0);
    }

    #[test]
    fn test_certificate_contains_sections() {
        let fields = CanonicalRecord::new()
            .with(CanonicalField::SampleId, "A-01")
            .with(CanonicalField::ClientName, "Serraria Boa Vista")
            .with(CanonicalField::Observation, RawValue::text("Amostra recebida úmida."));
        let doc = compose_certificate(&display_for(fields), &blank_profile());
        let text = doc.plain_text();

        for expected in [
            "Relatório de Ensaio",
            "DADOS DO CLIENTE",
            "Serraria Boa Vista",
            "A-01",
            "RESULTADOS DE RETENÇÃO",
            "RETENÇÃO TOTAL",
            "Metodo UFV 01",
            "RESULTADOS DE PENETRAÇÃO",
            "Observações",
            "Amostra recebida úmida.",
            "Página 1",
        ] {
            assert!(text.contains(expected), "missing {:?}", expected);
        }
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_blank_certificate_renders_placeholders() {
        let doc = compose_certificate(&display_for(CanonicalRecord::new()), &blank_profile());
        let runs = doc.pages[0].text_runs();
        assert!(runs.iter().filter(|r| r.as_str() == "-").count() >= 2);
        assert!(!runs.iter().any(|r| r == "Observações"));
    }

    #[test]
    fn test_long_observation_paginates() {
        let long = "Amostra com rachaduras longitudinais e nós soltos. ".repeat(120);
        let fields = CanonicalRecord::new().with(CanonicalField::Observation, RawValue::text(long));
        let doc = compose_certificate(&display_for(fields), &blank_profile());

        assert!(doc.page_count() >= 2);
        let last = doc.pages.last().unwrap().text_runs();
        assert!(last.contains(&format!("Página {}", doc.page_count())));
        assert!(last.iter().any(|r| r.contains("Supervisor")));
    }

    #[test]
    fn test_long_observation_frames_stay_on_page() {
        let long = "Amostra com rachaduras longitudinais e nos soltos. ".repeat(300);
        let fields = CanonicalRecord::new().with(CanonicalField::Observation, RawValue::text(long));
        let doc = compose_certificate(&display_for(fields), &blank_profile());
        let limit = PAGE_HEIGHT_MM - AUTO_BREAK_MARGIN_MM + 1e-9;

        for (index, page) in doc.pages.iter().enumerate() {
            for op in &page.ops {
                if let DrawOp::Rect { y_mm, h_mm, .. } = op {
                    assert!(y_mm + h_mm <= limit, "page {} rect {} + {}", index + 1, y_mm, h_mm);
                }
            }
            // every page carrying observation text carries its frame too
            if page.text_runs().iter().any(|r| r.contains("rachaduras")) {
                assert!(page.ops.iter().any(|op| matches!(
                    op,
                    DrawOp::Rect { x_mm, w_mm, .. } if *x_mm == 10.0 && *w_mm == CONTENT_WIDTH
                )));
            }
        }
        assert!(doc.page_count() >= 3);
        let last = doc.pages.last().unwrap().text_runs();
        assert!(last.iter().any(|r| r.contains("Supervisor")));
    }
}
