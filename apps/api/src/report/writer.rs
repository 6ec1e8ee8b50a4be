use std::io::BufWriter;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};

// US letter, one inch margins.
const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN: f32 = 25.4;
const CONTENT_TOP: f32 = PAGE_HEIGHT - MARGIN - 8.0;
const CONTENT_BOTTOM: f32 = MARGIN;
const BODY_INDENT: f32 = 7.0;
const SCORE_CELL_WIDTH: f32 = 50.8;
const SCORE_CELL_HEIGHT: f32 = 16.0;

const PT_TO_MM: f32 = 0.352_78;
// Average Helvetica advance as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;

const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);
const GRAY: (f32, f32, f32) = (0.5, 0.5, 0.5);
const SLATE: (f32, f32, f32) = (0.294, 0.333, 0.388);
const INK: (f32, f32, f32) = (0.122, 0.161, 0.216);
const RULE: (f32, f32, f32) = (0.898, 0.906, 0.922);
const GRID: (f32, f32, f32) = (0.827, 0.827, 0.827);

#[derive(Debug, Clone, Copy)]
pub enum Style {
    Title,
    Heading,
    Question,
    Note,
}

impl Style {
    fn size(self) -> f32 {
        match self {
            Style::Title => 24.0,
            Style::Heading => 14.0,
            Style::Question | Style::Note => 12.0,
        }
    }

    fn leading(self) -> f32 {
        self.size() * 1.2 * PT_TO_MM
    }

    fn color(self) -> (f32, f32, f32) {
        match self {
            Style::Title | Style::Heading => BLACK,
            Style::Question => INK,
            Style::Note => SLATE,
        }
    }
}

/// Cursor-based page writer. Starts a new page whenever the next block
/// would cross the bottom margin.
pub struct ReportWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
    y: f32,
    page: u32,
}

impl ReportWriter {
    pub fn new(title: &str) -> anyhow::Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow::anyhow!("PDF font error: {e}"))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| anyhow::anyhow!("PDF font error: {e}"))?;
        let oblique = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(|e| anyhow::anyhow!("PDF font error: {e}"))?;

        let mut writer = Self {
            doc,
            layer,
            regular,
            bold,
            oblique,
            y: CONTENT_TOP,
            page: 1,
        };
        writer.decorate_page();
        Ok(writer)
    }

    pub fn space(&mut self, mm: f32) {
        self.y -= mm;
    }

    pub fn heading(&mut self, text: &str) {
        // Keep the heading with at least two lines of what follows.
        self.ensure_space(Style::Heading.leading() + 2.0 * Style::Note.leading() + 10.0);
        self.space(3.0);
        self.paragraph(text, Style::Heading, 0.0);
        self.space(4.0);
    }

    pub fn centered(&mut self, text: &str, style: Style) {
        let width = PAGE_WIDTH - 2.0 * MARGIN;
        for line in wrap_text(text, chars_per_line(width, style.size())) {
            self.ensure_space(style.leading());
            self.y -= style.leading();
            let x = (PAGE_WIDTH - text_width(&line, style.size())) / 2.0;
            self.draw(&line, style, x.max(MARGIN), self.y);
        }
    }

    pub fn paragraph(&mut self, text: &str, style: Style, indent: f32) {
        let width = PAGE_WIDTH - 2.0 * MARGIN - indent;
        for line in wrap_text(text, chars_per_line(width, style.size())) {
            self.ensure_space(style.leading());
            self.y -= style.leading();
            self.draw(&line, style, MARGIN + indent, self.y);
        }
    }

    /// A numbered question and its optional answer, kept on one page when they fit.
    pub fn question_block(&mut self, question: &str, answer: Option<&str>) {
        let width = PAGE_WIDTH - 2.0 * MARGIN;
        let q_lines = wrap_text(question, chars_per_line(width, Style::Question.size())).len();
        let a_lines = answer
            .map(|a| wrap_text(a, chars_per_line(width - BODY_INDENT, Style::Note.size())).len())
            .unwrap_or(0);
        let block = q_lines as f32 * Style::Question.leading()
            + a_lines as f32 * Style::Note.leading()
            + 2.0;
        self.ensure_space(block.min(CONTENT_TOP - CONTENT_BOTTOM));

        self.paragraph(question, Style::Question, 0.0);
        if let Some(answer) = answer {
            self.space(2.0);
            self.paragraph(answer, Style::Note, BODY_INDENT);
        }
        self.space(5.0);
    }

    /// A bordered row of cells, each a bold value over a caption.
    pub fn score_row(&mut self, cells: &[(String, &str)]) {
        self.ensure_space(SCORE_CELL_HEIGHT + 2.0);
        let total = SCORE_CELL_WIDTH * cells.len() as f32;
        let left = (PAGE_WIDTH - total) / 2.0;
        let top = self.y;
        let bottom = top - SCORE_CELL_HEIGHT;

        self.layer.set_outline_color(rgb(GRID));
        self.layer.set_outline_thickness(0.5);
        for i in 0..cells.len() {
            let x = left + SCORE_CELL_WIDTH * i as f32;
            self.stroke(
                vec![
                    (x, top),
                    (x + SCORE_CELL_WIDTH, top),
                    (x + SCORE_CELL_WIDTH, bottom),
                    (x, bottom),
                ],
                true,
            );
        }

        for (i, (value, caption)) in cells.iter().enumerate() {
            let center = left + SCORE_CELL_WIDTH * (i as f32 + 0.5);
            let value_x = center - text_width(value, Style::Question.size()) / 2.0;
            self.layer.set_fill_color(rgb(BLACK));
            self.layer.use_text(
                value.as_str(),
                Style::Question.size(),
                Mm(value_x),
                Mm(top - 6.5),
                &self.bold,
            );
            let caption_x = center - text_width(caption, 10.0) / 2.0;
            self.layer.set_fill_color(rgb(SLATE));
            self.layer
                .use_text(*caption, 10.0, Mm(caption_x), Mm(top - 12.0), &self.oblique);
        }
        self.y = bottom - 2.0;
    }

    /// Serializes the document. Returns the bytes and the number of pages.
    pub fn finish(self) -> anyhow::Result<(Vec<u8>, u32)> {
        let pages = self.page;
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| anyhow::anyhow!("PDF save error: {e}"))?;
        let bytes = buf
            .into_inner()
            .map_err(|e| anyhow::anyhow!("PDF buffer error: {e}"))?;
        Ok((bytes, pages))
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < CONTENT_BOTTOM {
            self.new_page();
        }
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Layer {}", self.page + 1));
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.page += 1;
        self.y = CONTENT_TOP;
        self.decorate_page();
    }

    fn decorate_page(&mut self) {
        let brand_y = PAGE_HEIGHT - 19.05;
        self.layer.set_fill_color(rgb(BLACK));
        self.layer
            .use_text("Builder", 18.0, Mm(MARGIN), Mm(brand_y), &self.bold);
        self.layer.set_fill_color(rgb(GRAY));
        self.layer
            .use_text(".io", 12.0, Mm(MARGIN + 22.9), Mm(brand_y), &self.regular);

        let rule_y = PAGE_HEIGHT - MARGIN;
        self.layer.set_outline_color(rgb(RULE));
        self.layer.set_outline_thickness(1.0);
        self.stroke(vec![(MARGIN, rule_y), (PAGE_WIDTH - MARGIN, rule_y)], false);

        let footer = format!("Page {}", self.page);
        let x = (PAGE_WIDTH - text_width(&footer, 10.0)) / 2.0;
        self.layer.set_fill_color(rgb(GRAY));
        self.layer
            .use_text(footer, 10.0, Mm(x), Mm(19.05), &self.regular);
    }

    fn draw(&self, text: &str, style: Style, x: f32, y: f32) {
        let font = match style {
            Style::Title | Style::Heading | Style::Question => &self.bold,
            Style::Note => &self.oblique,
        };
        self.layer.set_fill_color(rgb(style.color()));
        self.layer.use_text(text, style.size(), Mm(x), Mm(y), font);
    }

    fn stroke(&self, points: Vec<(f32, f32)>, closed: bool) {
        self.layer.add_line(Line {
            points: points
                .into_iter()
                .map(|(x, y)| (Point::new(Mm(x), Mm(y)), false))
                .collect(),
            is_closed: closed,
        });
    }
}

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn text_width(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * AVG_GLYPH_EM * PT_TO_MM
}

fn chars_per_line(width_mm: f32, size_pt: f32) -> usize {
    ((width_mm / (size_pt * AVG_GLYPH_EM * PT_TO_MM)) as usize).max(10)
}

/// Greedy word wrap. Words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(max_chars.max(1)) {
            let piece: String = piece.iter().collect();
            let piece_len = piece.chars().count();
            if current_len > 0 && current_len + 1 + piece_len > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(&piece);
            current_len += piece_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text() {
        assert_eq!(
            wrap_text("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
        assert_eq!(wrap_text("", 10), vec![""]);
        assert_eq!(wrap_text("abcdefghijkl", 5), vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn test_lines_fit_the_page() {
        let n = chars_per_line(PAGE_WIDTH - 2.0 * MARGIN, 12.0);
        assert!(text_width(&"x".repeat(n), 12.0) <= PAGE_WIDTH - 2.0 * MARGIN);
    }
}
