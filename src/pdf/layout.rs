//! A4 portrait page composition in millimeters
//!
//! The composer keeps a vertical cursor that runs top-down in page
//! millimeters; every primitive converts to PDF points (bottom-left
//! origin) at emission time. Pages share one resources dictionary.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::images::EmbeddedImage;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 15.0;
pub const TOP_START: f32 = 20.0;
/// Content never runs into the bottom strip reserved for the footer
pub const BOTTOM_RESERVE: f32 = 20.0;

const MM_TO_PT: f32 = 72.0 / 25.4;

/// Usable width between the margins
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Oblique,
}

impl FontStyle {
    fn resource_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
            FontStyle::Oblique => "F3",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            FontStyle::Regular => "Helvetica",
            FontStyle::Bold => "Helvetica-Bold",
            FontStyle::Oblique => "Helvetica-Oblique",
        }
    }
}

struct PageDraft {
    operations: Vec<Operation>,
}

/// Builds page content streams and assembles the final document
pub struct Composer {
    doc: Document,
    finished_pages: Vec<PageDraft>,
    current: PageDraft,
    xobjects: Vec<(String, ObjectId)>,
    /// Distance from the top edge to the next baseline, in mm
    pub cursor: f32,
}

impl Composer {
    pub fn new() -> Self {
        Self {
            doc: Document::with_version("1.5"),
            finished_pages: Vec::new(),
            current: PageDraft {
                operations: Vec::new(),
            },
            xobjects: Vec::new(),
            cursor: TOP_START,
        }
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Start a new page when the next block would cross into the
    /// footer strip.
    pub fn ensure_space(&mut self, needed: f32) {
        if self.cursor + needed > PAGE_HEIGHT - BOTTOM_RESERVE {
            self.new_page();
        }
    }

    pub fn new_page(&mut self) {
        let done = std::mem::replace(
            &mut self.current,
            PageDraft {
                operations: Vec::new(),
            },
        );
        self.finished_pages.push(done);
        self.cursor = TOP_START;
    }

    fn page_count(&self) -> usize {
        self.finished_pages.len() + 1
    }

    pub fn advance(&mut self, mm: f32) {
        self.cursor += mm;
    }

    /// Draw text with its baseline at the cursor; does not advance
    pub fn text(&mut self, x: f32, size: f32, style: FontStyle, color: (f32, f32, f32), text: &str) {
        let y = self.cursor;
        self.text_at(x, y, size, style, color, text);
    }

    /// Draw text at an absolute vertical position (used by the footer)
    pub fn text_at(
        &mut self,
        x: f32,
        y: f32,
        size: f32,
        style: FontStyle,
        color: (f32, f32, f32),
        text: &str,
    ) {
        let ops = &mut self.current_page().operations;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![style.resource_name().into(), size.into()],
        ));
        ops.push(Operation::new(
            "rg",
            vec![color.0.into(), color.1.into(), color.2.into()],
        ));
        ops.push(Operation::new(
            "Td",
            vec![pt(x).into(), pt_y(y).into()],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(winansi(text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    /// Horizontal rule across the content width at the cursor
    pub fn rule(&mut self, color: (f32, f32, f32)) {
        let y = pt_y(self.cursor);
        let ops = &mut self.current_page().operations;
        ops.push(Operation::new(
            "RG",
            vec![color.0.into(), color.1.into(), color.2.into()],
        ));
        ops.push(Operation::new("w", vec![0.5.into()]));
        ops.push(Operation::new("m", vec![pt(MARGIN).into(), y.into()]));
        ops.push(Operation::new(
            "l",
            vec![pt(PAGE_WIDTH - MARGIN).into(), y.into()],
        ));
        ops.push(Operation::new("S", vec![]));
    }

    /// Paint an embedded image with its top edge at the cursor
    pub fn image(&mut self, img: &EmbeddedImage, x: f32, width: f32, height: f32) {
        let name = format!("Im{}", self.xobjects.len() + 1);
        self.xobjects.push((name.clone(), img.id));

        let y_bottom = pt_y(self.cursor + height);
        let ops = &mut self.current_page().operations;
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "cm",
            vec![
                (width * MM_TO_PT).into(),
                0.into(),
                0.into(),
                (height * MM_TO_PT).into(),
                pt(x).into(),
                y_bottom.into(),
            ],
        ));
        ops.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        ops.push(Operation::new("Q", vec![]));
    }

    /// Break text into lines that fit the given width, splitting on
    /// whitespace. Width estimation uses the Helvetica half-em rule of
    /// thumb, which is generous enough for body copy.
    pub fn wrap(text: &str, max_width: f32, size: f32) -> Vec<String> {
        let char_width = text_width("M", size);
        let max_chars = (max_width / char_width).max(1.0) as usize;

        let mut lines = Vec::new();
        let mut current = String::new();
        for word in text.split_whitespace() {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars
            {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Build the page tree, fonts, and catalog and hand back the
    /// finished document.
    pub fn finish(mut self) -> Result<Document, lopdf::Error> {
        let font_ids: Vec<(&str, ObjectId)> =
            [FontStyle::Regular, FontStyle::Bold, FontStyle::Oblique]
                .into_iter()
                .map(|style| {
                    let id = self.doc.add_object(dictionary! {
                        "Type" => "Font",
                        "Subtype" => "Type1",
                        "BaseFont" => style.base_font(),
                        "Encoding" => "WinAnsiEncoding",
                    });
                    (style.resource_name(), id)
                })
                .collect();

        let mut fonts = Dictionary::new();
        for (name, id) in font_ids {
            fonts.set(name, Object::Reference(id));
        }
        let mut xobjects = Dictionary::new();
        for (name, id) in &self.xobjects {
            xobjects.set(name.as_bytes(), Object::Reference(*id));
        }
        let resources_id = self.doc.add_object(dictionary! {
            "Font" => fonts,
            "XObject" => xobjects,
        });

        let pages_id = self.doc.new_object_id();
        let mut drafts = std::mem::take(&mut self.finished_pages);
        drafts.push(self.current);

        let mut kids = Vec::new();
        for draft in drafts {
            let content = Content {
                operations: draft.operations,
            };
            let bytes = content.encode()?;
            let content_id = self
                .doc
                .add_object(Stream::new(Dictionary::new(), bytes));
            let page_id = self.doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "Contents" => Object::Reference(content_id),
                "Resources" => Object::Reference(resources_id),
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    (PAGE_WIDTH * MM_TO_PT).into(),
                    (PAGE_HEIGHT * MM_TO_PT).into(),
                ],
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        self.doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        self.doc.trailer.set("Root", catalog_id);
        Ok(self.doc)
    }

    fn current_page(&mut self) -> &mut PageDraft {
        &mut self.current
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

/// Approximate rendered width of a Helvetica string in mm
/// (half an em per character).
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5 / MM_TO_PT
}

fn pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// Flip the top-down mm cursor into the PDF bottom-left point space
fn pt_y(mm: f32) -> f32 {
    (PAGE_HEIGHT - mm) * MM_TO_PT
}

/// Helvetica strings go out in WinAnsi; anything outside Latin-1
/// degrades to '?'. German umlauts and ß all fit.
fn winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xFF {
                code as u8
            } else {
                b'?'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_space_starts_a_new_page() {
        let mut composer = Composer::new();
        composer.cursor = PAGE_HEIGHT - BOTTOM_RESERVE - 10.0;
        composer.ensure_space(5.0);
        assert_eq!(composer.page_count(), 1);

        composer.ensure_space(50.0);
        assert_eq!(composer.page_count(), 2);
        assert_eq!(composer.cursor, TOP_START);
    }

    #[test]
    fn test_winansi_keeps_german_characters() {
        let bytes = winansi("Schäden prüfen: ß");
        assert!(bytes.contains(&0xE4)); // ä
        assert!(bytes.contains(&0xFC)); // ü
        assert!(bytes.contains(&0xDF)); // ß
        assert!(!bytes.contains(&b'?'));
    }

    #[test]
    fn test_winansi_degrades_non_latin() {
        assert_eq!(winansi("→"), vec![b'?']);
    }

    #[test]
    fn test_wrap_splits_on_word_boundaries() {
        let lines = Composer::wrap("ein zwei drei vier fünf sechs sieben", 20.0, 10.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(!line.starts_with(' '));
            assert!(!line.ends_with(' '));
        }
        assert_eq!(
            lines.join(" "),
            "ein zwei drei vier fünf sechs sieben"
        );
    }

    #[test]
    fn test_wrap_short_text_is_single_line() {
        let lines = Composer::wrap("kurz", 180.0, 10.0);
        assert_eq!(lines, vec!["kurz".to_string()]);
    }

    #[test]
    fn test_finish_produces_a_document_with_pages() {
        let mut composer = Composer::new();
        composer.text(MARGIN, 12.0, FontStyle::Bold, (0.0, 0.0, 0.0), "Titel");
        composer.new_page();
        composer.text(MARGIN, 10.0, FontStyle::Regular, (0.0, 0.0, 0.0), "Seite 2");

        let doc = composer.finish().unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }
}
