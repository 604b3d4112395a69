//! Minimal PDF document assembler.
//!
//! [`PdfCanvas`] places grayscale images and single lines of text on pages of a fixed
//! size. Coordinates are PDF points with the origin at the bottom-left corner of the
//! page, y growing upward.

use super::{PageSize, write_atomically};
use crate::error::{GenerationError, GenerationResult};
use camino::Utf8Path;
use image::GrayImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

const FONT_NAME: &str = "F1";

#[derive(Default)]
struct PageContent {
    operations: Vec<Operation>,
    xobjects: Dictionary,
}

/// Multi-page PDF under construction
pub struct PdfCanvas {
    doc: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    page_size: PageSize,
    page_ids: Vec<ObjectId>,
    current: PageContent,
    image_count: usize,
}

impl PdfCanvas {
    /// Start a document with one empty page
    pub fn new(page_size: PageSize) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        Self {
            doc,
            pages_id,
            font_id,
            page_size,
            page_ids: Vec::new(),
            current: PageContent::default(),
            image_count: 0,
        }
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Number of pages, including the one being drawn
    pub fn page_count(&self) -> usize {
        self.page_ids.len() + 1
    }

    /// Draw `image` scaled into the box with lower-left corner (`x`, `y`)
    pub fn place_image(&mut self, image: &GrayImage, x: f32, y: f32, width: f32, height: f32) {
        self.image_count += 1;
        let name = format!("Im{}", self.image_count);

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width() as i64,
                "Height" => image.height() as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            image.as_raw().clone(),
        );
        let image_id = self.doc.add_object(stream);
        self.current.xobjects.set(name.as_bytes(), image_id);

        self.current.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(width),
                    0.into(),
                    0.into(),
                    Object::Real(height),
                    Object::Real(x),
                    Object::Real(y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Draw one line of Helvetica text with its baseline starting at (`x`, `y`)
    pub fn place_text(&mut self, text: &str, x: f32, y: f32, size: f32) {
        self.current.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![FONT_NAME.into(), Object::Real(size)]),
            Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Finish the current page and start a new empty one
    pub fn new_page(&mut self) -> GenerationResult<()> {
        self.flush_page()
    }

    fn flush_page(&mut self) -> GenerationResult<()> {
        let page = std::mem::take(&mut self.current);
        let content = Content {
            operations: page.operations,
        };
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode()?));

        let resources = dictionary! {
            "Font" => dictionary! { FONT_NAME => self.font_id },
            "XObject" => page.xobjects,
        };

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(self.page_size.width),
                Object::Real(self.page_size.height),
            ],
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Serialize the finished document to PDF bytes
    pub fn finish(mut self) -> GenerationResult<Vec<u8>> {
        self.flush_page()?;

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| GenerationError::Render(format!("PDF serialization failed: {}", e)))?;
        Ok(bytes)
    }

    /// Finish the document and write it to `path`
    pub fn save(self, path: &Utf8Path) -> GenerationResult<()> {
        let bytes = self.finish()?;
        write_atomically(path, &bytes)?;
        tracing::debug!("Saved PDF to {}", path);
        Ok(())
    }
}
