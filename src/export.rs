//! Writes a design plan to disk as text, JSON or PDF.
//!
//! Each format has one fixed filename inside the export directory and every
//! export overwrites it.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex,
    PdfPageIndex,
};
use tracing::info;

use crate::constants::{JSON_DESIGN_PLAN_KEY, JSON_FILENAME, PDF_FILENAME, TXT_FILENAME};

/// Output formats offered as downloads.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExportFormat {
    /// `design_plan.pdf`
    Pdf,
    /// `design_plan.txt`
    Txt,
    /// `design_plan.json`
    Json,
}

impl ExportFormat {
    /// Formats in the order the download buttons are shown.
    pub const ALL: [ExportFormat; 3] = [Self::Pdf, Self::Txt, Self::Json];

    /// Fixed filename for this format.
    pub fn filename(self) -> &'static str {
        match self {
            Self::Pdf => PDF_FILENAME,
            Self::Txt => TXT_FILENAME,
            Self::Json => JSON_FILENAME,
        }
    }

    /// MIME type served with the download.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Txt => "text/plain; charset=utf-8",
            Self::Json => "application/json",
        }
    }

    /// Path segment used in `/export/{format}`.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
            Self::Json => "json",
        }
    }

    /// Upper-case name for button labels.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Txt => "TXT",
            Self::Json => "JSON",
        }
    }
}

/// Returned when a path segment names no known format.
#[derive(Debug, Eq, PartialEq)]
pub struct UnknownFormat(pub String);

impl std::fmt::Display for UnknownFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown export format: {}", self.0)
    }
}

impl std::error::Error for UnknownFormat {}

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.slug() == value)
            .ok_or_else(|| UnknownFormat(value.to_string()))
    }
}

/// A written export: where it went and exactly what was written.
///
/// The file is shared by every visitor, so `bytes` is what should be handed
/// back to the caller, not a re-read of `path`.
#[derive(Clone, Debug)]
pub struct ExportArtifact {
    /// Format of the artifact.
    pub format: ExportFormat,
    /// File written, `<dir>/<format.filename()>`.
    pub path: PathBuf,
    /// Contents of the file as written by this call.
    pub bytes: Vec<u8>,
}

/// Failure while producing an export artifact.
#[derive(Debug)]
pub enum ExportError {
    /// Writing the file failed.
    Io(std::io::Error),
    /// JSON encoding failed.
    Json(serde_json::Error),
    /// PDF rendering failed.
    Pdf(printpdf::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "Failed to write export: {err}"),
            Self::Json(err) => write!(f, "Failed to encode JSON export: {err}"),
            Self::Pdf(err) => write!(f, "Failed to render PDF export: {err}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<printpdf::Error> for ExportError {
    fn from(err: printpdf::Error) -> Self {
        Self::Pdf(err)
    }
}

async fn write_artifact(
    dir: &Path,
    format: ExportFormat,
    bytes: Vec<u8>,
) -> Result<ExportArtifact, ExportError> {
    let path = dir.join(format.filename());
    tokio::fs::write(&path, &bytes).await?;
    Ok(ExportArtifact {
        format,
        path,
        bytes,
    })
}

/// Writes `text` in `format` under `dir`.
pub async fn export(
    dir: &Path,
    text: &str,
    format: ExportFormat,
) -> Result<ExportArtifact, ExportError> {
    let artifact = match format {
        ExportFormat::Pdf => export_pdf(dir, text).await?,
        ExportFormat::Txt => export_txt(dir, text).await?,
        ExportFormat::Json => export_json(dir, text).await?,
    };
    info!(
        "Exported design plan to {} ({} bytes)",
        artifact.path.display(),
        artifact.bytes.len()
    );
    Ok(artifact)
}

/// Writes `text` verbatim as UTF-8.
pub async fn export_txt(dir: &Path, text: &str) -> Result<ExportArtifact, ExportError> {
    write_artifact(dir, ExportFormat::Txt, text.as_bytes().to_vec()).await
}

/// Writes `{"design_plan": text}`.
pub async fn export_json(dir: &Path, text: &str) -> Result<ExportArtifact, ExportError> {
    let mut body = serde_json::Map::new();
    body.insert(
        JSON_DESIGN_PLAN_KEY.to_string(),
        serde_json::Value::String(text.to_string()),
    );
    let bytes = serde_json::to_vec(&serde_json::Value::Object(body))?;
    write_artifact(dir, ExportFormat::Json, bytes).await
}

/// Renders `text` onto A4 pages in 12pt Helvetica and writes the PDF.
pub async fn export_pdf(dir: &Path, text: &str) -> Result<ExportArtifact, ExportError> {
    let bytes = render_pdf(text)?;
    write_artifact(dir, ExportFormat::Pdf, bytes).await
}

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const BOTTOM_MARGIN_MM: f32 = 15.0;
const CELL_PADDING_MM: f32 = 1.0;
const LINE_HEIGHT_MM: f32 = 10.0;
const FONT_SIZE_PT: f32 = 12.0;
const MM_PER_PT: f32 = 25.4 / 72.0;
const LAYER_NAME: &str = "Layer 1";

/// Width available for text on one line.
const TEXT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM - 2.0 * CELL_PADDING_MM;

/// Lines that fit above the bottom margin.
const LINES_PER_PAGE: usize =
    ((PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM - MARGIN_MM) / LINE_HEIGHT_MM) as usize;

/// Helvetica advance widths for ' '..='~', in 1/1000 em.
const HELVETICA_ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Helvetica advance widths for U+00A0..=U+00FF, which WinAnsi maps one to one.
const HELVETICA_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // A0..AF
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // B0..BF
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // C0..CF
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // D0..DF
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // E0..EF
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // F0..FF
];

/// Helvetica width of `ch`, or `None` when WinAnsi has no code for it.
fn glyph_width(ch: char) -> Option<u16> {
    let code = ch as u32;
    match code {
        0x20..=0x7e => HELVETICA_ASCII_WIDTHS.get((code - 0x20) as usize).copied(),
        0xa0..=0xff => HELVETICA_LATIN1_WIDTHS.get((code - 0xa0) as usize).copied(),
        _ => match ch {
            '\u{20ac}' | '\u{0192}' | '\u{2020}' | '\u{2021}' => Some(556),
            '\u{201a}' | '\u{2018}' | '\u{2019}' => Some(222),
            '\u{201e}' | '\u{201c}' | '\u{201d}' => Some(333),
            '\u{02c6}' | '\u{2039}' | '\u{203a}' | '\u{02dc}' => Some(333),
            '\u{2026}' | '\u{2030}' | '\u{0152}' | '\u{2014}' | '\u{2122}' => Some(1000),
            '\u{0160}' | '\u{0178}' => Some(667),
            '\u{017d}' => Some(611),
            '\u{0161}' | '\u{017e}' => Some(500),
            '\u{0153}' => Some(944),
            '\u{2022}' => Some(350),
            '\u{2013}' => Some(556),
            _ => None,
        },
    }
}

fn char_width_mm(ch: char) -> f32 {
    let units = glyph_width(ch).unwrap_or(556);
    f32::from(units) / 1000.0 * FONT_SIZE_PT * MM_PER_PT
}

fn text_width_mm(text: &str) -> f32 {
    text.chars().map(char_width_mm).sum()
}

/// Maps text onto what the built-in font can draw: WinAnsi characters pass
/// through, a few look-alikes are substituted, the rest become `?`.
fn to_font_charset(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\n' => out.push(ch),
            '\t' => out.push_str("    "),
            '\r' => {}
            _ if glyph_width(ch).is_some() => out.push(ch),
            '\u{2032}' => out.push('\''),
            '\u{2033}' => out.push('"'),
            '\u{2010}' | '\u{2011}' | '\u{2212}' => out.push('-'),
            '\u{2012}' | '\u{2015}' => out.push('\u{2013}'),
            '\u{2002}'..='\u{200a}' | '\u{202f}' => out.push(' '),
            _ => out.push('?'),
        }
    }
    out
}

/// Wraps one paragraph at spaces, splitting words that are wider than a line.
/// Leading spaces are kept so indented lists stay indented.
fn wrap_paragraph(paragraph: &str, max_width: f32, lines: &mut Vec<String>) {
    let space = char_width_mm(' ');
    let mut line = String::new();
    let mut line_width = 0.0;
    let mut at_line_start = true;
    for word in paragraph.split(' ') {
        let word_width = text_width_mm(word);
        let fits = if at_line_start {
            word_width <= max_width
        } else {
            line_width + space + word_width <= max_width
        };
        if fits {
            if !at_line_start {
                line.push(' ');
                line_width += space;
            }
            line.push_str(word);
            line_width += word_width;
            at_line_start = false;
            continue;
        }

        if !at_line_start {
            lines.push(std::mem::take(&mut line));
            line_width = 0.0;
        }
        for ch in word.chars() {
            let width = char_width_mm(ch);
            if !line.is_empty() && line_width + width > max_width {
                lines.push(std::mem::take(&mut line));
                line_width = 0.0;
            }
            line.push(ch);
            line_width += width;
        }
        at_line_start = false;
    }
    lines.push(line);
}

/// Splits `text` into pages of wrapped lines.
fn layout_pages(text: &str) -> Vec<Vec<String>> {
    let text = to_font_charset(text);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph, TEXT_WIDTH_MM, &mut lines);
    }
    lines
        .chunks(LINES_PER_PAGE)
        .map(<[String]>::to_vec)
        .collect()
}

fn write_page(
    doc: &PdfDocumentReference,
    font: &IndirectFontRef,
    (page, layer): (PdfPageIndex, PdfLayerIndex),
    lines: &[String],
) {
    let layer = doc.get_page(page).get_layer(layer);
    // Baseline sits mid-cell, shifted down by 0.3 of the font size.
    let baseline_offset = LINE_HEIGHT_MM / 2.0 + 0.3 * FONT_SIZE_PT * MM_PER_PT;
    for (index, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let top = MARGIN_MM + LINE_HEIGHT_MM * index as f32;
        layer.use_text(
            line.as_str(),
            FONT_SIZE_PT,
            Mm(MARGIN_MM + CELL_PADDING_MM),
            Mm(PAGE_HEIGHT_MM - top - baseline_offset),
            font,
        );
    }
}

fn render_pdf(text: &str) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "Design Plan",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        LAYER_NAME,
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    let pages = layout_pages(text);
    let mut target = (first_page, first_layer);
    for (index, lines) in pages.iter().enumerate() {
        if index > 0 {
            target = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
        }
        write_page(&doc, &font, target, lines);
    }

    Ok(doc.save_to_bytes()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_line() {
        let pages = layout_pages("A cosy two storey home.");
        assert_eq!(pages, vec![vec!["A cosy two storey home.".to_string()]]);
    }

    #[test]
    fn newlines_start_new_lines() {
        let pages = layout_pages("Ground floor\r\n\nFirst floor");
        assert_eq!(
            pages[0],
            vec![
                "Ground floor".to_string(),
                String::new(),
                "First floor".to_string()
            ]
        );
    }

    #[test]
    fn long_paragraph_wraps_within_width() {
        let text = "kitchen ".repeat(80);
        let pages = layout_pages(text.trim_end());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].len() > 1);
        for line in &pages[0] {
            assert!(text_width_mm(line) <= TEXT_WIDTH_MM);
            assert!(!line.starts_with(' '));
        }
        let rejoined = pages[0].join(" ");
        assert_eq!(rejoined, text.trim_end());
    }

    #[test]
    fn unbreakable_word_is_split() {
        let word = "W".repeat(200);
        let pages = layout_pages(&word);
        assert!(pages[0].len() > 1);
        assert_eq!(pages[0].concat(), word);
        for line in &pages[0] {
            assert!(text_width_mm(line) <= TEXT_WIDTH_MM);
        }
    }

    #[test]
    fn pages_break_above_bottom_margin() {
        assert_eq!(LINES_PER_PAGE, 27);
        let text = vec!["room"; 60].join("\n");
        let pages = layout_pages(&text);
        assert_eq!(
            pages.iter().map(Vec::len).collect::<Vec<_>>(),
            vec![27, 27, 6]
        );
    }

    #[test]
    fn winansi_characters_pass_through() {
        assert_eq!(
            to_font_charset("Caf\u{e9} terrace, 20 m\u{b2} at 25\u{b0}C, \u{a3}40k"),
            "Caf\u{e9} terrace, 20 m\u{b2} at 25\u{b0}C, \u{a3}40k"
        );
        assert_eq!(
            to_font_charset("\u{201c}Open\u{201d} \u{2013} it\u{2019}s\u{2026} \u{20ac}5 \u{2022} \u{153}uvre"),
            "\u{201c}Open\u{201d} \u{2013} it\u{2019}s\u{2026} \u{20ac}5 \u{2022} \u{153}uvre"
        );
    }

    #[test]
    fn undrawable_characters_are_replaced() {
        assert_eq!(
            to_font_charset("a\u{2212}b\tc \u{4e2d}\u{1f3e1}\r\n"),
            "a-b    c ??\n"
        );
    }

    #[test]
    fn latin1_widths_follow_helvetica() {
        assert_eq!(glyph_width('\u{e9}'), glyph_width('e'));
        assert_eq!(glyph_width('\u{c9}'), glyph_width('E'));
        assert_eq!(glyph_width('\u{b0}'), Some(400));
        assert_eq!(glyph_width('\u{2014}'), Some(1000));
        assert_eq!(glyph_width('\u{4e2d}'), None);
    }

    #[test]
    fn leading_indent_is_kept() {
        let pages = layout_pages("Rooms:\n    - indented bullet\n  * two");
        assert_eq!(
            pages[0],
            vec![
                "Rooms:".to_string(),
                "    - indented bullet".to_string(),
                "  * two".to_string()
            ]
        );
    }

    #[test]
    fn format_metadata() {
        assert_eq!(ExportFormat::Pdf.filename(), "design_plan.pdf");
        assert_eq!(ExportFormat::Txt.filename(), "design_plan.txt");
        assert_eq!(ExportFormat::Json.filename(), "design_plan.json");
        assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert_eq!("pdf".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
        assert_eq!(
            "docx".parse::<ExportFormat>(),
            Err(UnknownFormat("docx".to_string()))
        );
        assert!("PDF".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn rendered_pdf_has_header() {
        let bytes = render_pdf("Hello\nW\u{f6}rld \u{2013} \u{e9}t\u{e9}").expect("render pdf");
        assert!(bytes.starts_with(b"%PDF"));
    }
}
