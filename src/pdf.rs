//! PDF backend for [`Canvas`], built on printpdf's standard fonts.

use crate::canvas::Canvas;
use crate::error::{LabelError, Result};
use crate::page::{pt_to_mm, PageSize};
use crate::style::{Font, TextStyle};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Rgb,
};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{debug, info};

const LAYER_NAME: &str = "Labels";

fn builtin(font: Font) -> BuiltinFont {
    match font {
        Font::Helvetica => BuiltinFont::Helvetica,
        Font::HelveticaBold => BuiltinFont::HelveticaBold,
        Font::HelveticaOblique => BuiltinFont::HelveticaOblique,
        Font::HelveticaBoldOblique => BuiltinFont::HelveticaBoldOblique,
        Font::TimesRoman => BuiltinFont::TimesRoman,
        Font::TimesBold => BuiltinFont::TimesBold,
        Font::TimesItalic => BuiltinFont::TimesItalic,
        Font::TimesBoldItalic => BuiltinFont::TimesBoldItalic,
        Font::Courier => BuiltinFont::Courier,
        Font::CourierBold => BuiltinFont::CourierBold,
        Font::CourierOblique => BuiltinFont::CourierOblique,
        Font::CourierBoldOblique => BuiltinFont::CourierBoldOblique,
    }
}

/// Writes labels to a PDF file.
///
/// Pages are created lazily on first use, so a page committed with
/// [`Canvas::show_page`] before anything is drawn comes out blank. The
/// origin stack is tracked here and applied to every text position.
pub struct PdfCanvas {
    doc: Option<PdfDocumentReference>,
    output: PathBuf,
    page_size: PageSize,
    layer: Option<PdfLayerReference>,
    fonts: HashMap<Font, IndirectFontRef>,
    origin: (f32, f32),
    saved: Vec<(f32, f32)>,
    pages: usize,
}

impl PdfCanvas {
    pub fn new(title: &str, output: impl Into<PathBuf>, page_size: PageSize) -> Self {
        Self {
            doc: Some(PdfDocument::empty(title)),
            output: output.into(),
            page_size,
            layer: None,
            fonts: HashMap::new(),
            origin: (0.0, 0.0),
            saved: Vec::new(),
            pages: 0,
        }
    }

    /// Pages committed so far
    pub fn page_count(&self) -> usize {
        self.pages
    }

    fn document(&self) -> Result<&PdfDocumentReference> {
        self.doc
            .as_ref()
            .ok_or_else(|| LabelError::PdfError("document already saved".to_string()))
    }

    fn layer(&mut self) -> Result<PdfLayerReference> {
        if let Some(layer) = &self.layer {
            return Ok(layer.clone());
        }
        let doc = self.document()?;
        let (page, layer) = doc.add_page(
            Mm(pt_to_mm(self.page_size.width)),
            Mm(pt_to_mm(self.page_size.height)),
            LAYER_NAME,
        );
        let layer = doc.get_page(page).get_layer(layer);
        self.layer = Some(layer.clone());
        Ok(layer)
    }

    fn font(&mut self, font: Font) -> Result<IndirectFontRef> {
        if let Some(font_ref) = self.fonts.get(&font) {
            return Ok(font_ref.clone());
        }
        debug!("embedding standard font {}", font.name());
        let font_ref = self
            .document()?
            .add_builtin_font(builtin(font))
            .map_err(|e| LabelError::PdfError(e.to_string()))?;
        self.fonts.insert(font, font_ref.clone());
        Ok(font_ref)
    }
}

impl Canvas for PdfCanvas {
    fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
    }

    fn save_state(&mut self) -> Result<()> {
        self.layer()?.save_graphics_state();
        self.saved.push(self.origin);
        Ok(())
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.origin = (self.origin.0 + dx, self.origin.1 + dy);
    }

    fn restore_state(&mut self) {
        if let Some(layer) = &self.layer {
            layer.restore_graphics_state();
        }
        self.origin = self.saved.pop().unwrap_or((0.0, 0.0));
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<()> {
        let font = self.font(style.font)?;
        let layer = self.layer()?;
        let colour = style.colour;

        layer.set_fill_color(Color::Rgb(Rgb::new(colour.r, colour.g, colour.b, None)));
        layer.use_text(
            text,
            style.font_size,
            Mm(pt_to_mm(self.origin.0 + x)),
            Mm(pt_to_mm(self.origin.1 + y)),
            &font,
        );
        Ok(())
    }

    fn show_page(&mut self) -> Result<()> {
        if self.layer.is_none() {
            // Nothing drawn yet: commit a blank page
            self.layer()?;
        }
        self.layer = None;
        self.saved.clear();
        self.origin = (0.0, 0.0);
        self.pages += 1;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.layer = None;
        let doc = self
            .doc
            .take()
            .ok_or_else(|| LabelError::PdfError("document already saved".to_string()))?;

        let file = File::create(&self.output)?;
        let mut writer = BufWriter::new(file);
        doc.save(&mut writer)
            .map_err(|e| LabelError::PdfError(e.to_string()))?;
        info!("wrote {} page(s) to {}", self.pages, self.output.display());

        Ok(())
    }
}
