//! Card export to single-page PDF documents
//!
//! Each face is exported on its own: one rendered bitmap centered on an A4
//! portrait page, a caption near the top, and the text printed on that face
//! under the image. The front lists the motto and membership details, the
//! back lists the contact fields and the verification link.

use super::card_render::{CardRenderer, PhotoSource, run_blocking};
use crate::config::CardConfig;
use crate::models::{CardSide, IdCard};
use crate::utils::error::{PortalError, Result};
use image::{DynamicImage, RgbImage};
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};
use std::sync::Arc;
use tracing::{debug, info};

/// A4 portrait, in millimetres
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

const CAPTION_TOP_MM: f32 = 30.0;
const CAPTION_SIZE: f32 = 16.0;
const TEXT_SIZE: f32 = 10.0;
const LINE_SPACING_MM: f32 = 5.0;
const TEXT_GAP_MM: f32 = 8.0;
const MAX_TEXT_LINES: usize = 8;
/// Points to millimetres
const PT_TO_MM: f32 = 0.3528;

/// Finished export
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    pub const CONTENT_TYPE: &'static str = "application/pdf";
}

/// A line of page text at a fixed position
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub size: f32,
    pub x: f32,
    pub y: f32,
}

/// Where everything goes on the page; y is measured from the bottom edge
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    pub image_x: f32,
    pub image_y: f32,
    pub image_width: f32,
    pub image_height: f32,
    pub dpi: f32,
    pub caption: PlacedText,
    pub lines: Vec<PlacedText>,
}

impl PagePlan {
    pub fn new(
        pixel_width: u32,
        pixel_height: u32,
        image_width: f32,
        caption: String,
        lines: Vec<String>,
    ) -> Self {
        let image_width = image_width.clamp(10.0, PAGE_WIDTH_MM);
        let image_height = image_width * pixel_height as f32 / pixel_width.max(1) as f32;
        let image_x = (PAGE_WIDTH_MM - image_width) / 2.0;
        let image_y = ((PAGE_HEIGHT_MM - image_height) / 2.0).max(0.0);

        let caption = PlacedText {
            x: centered_x(&caption, CAPTION_SIZE),
            y: PAGE_HEIGHT_MM - CAPTION_TOP_MM,
            size: CAPTION_SIZE,
            text: caption,
        };

        let lines = lines
            .into_iter()
            .take(MAX_TEXT_LINES)
            .enumerate()
            .map(|(i, text)| PlacedText {
                x: centered_x(&text, TEXT_SIZE),
                y: image_y - TEXT_GAP_MM - i as f32 * LINE_SPACING_MM,
                size: TEXT_SIZE,
                text,
            })
            .filter(|line| line.y > 0.0)
            .collect();

        Self {
            image_x,
            image_y,
            image_width,
            image_height,
            dpi: pixel_width as f32 * 25.4 / image_width,
            caption,
            lines,
        }
    }
}

/// Approximate left edge for centering Helvetica text
fn centered_x(text: &str, size: f32) -> f32 {
    let width = text.chars().count() as f32 * size * 0.5 * PT_TO_MM;
    ((PAGE_WIDTH_MM - width) / 2.0).max(10.0)
}

/// Keep file names to ASCII letters, digits, `-` and `_`
fn file_safe(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Renders card faces and wraps them into PDF pages
#[derive(Debug, Clone)]
pub struct CardExporter {
    renderer: CardRenderer,
    organization: String,
    image_width_mm: f32,
}

impl CardExporter {
    pub fn new(config: &CardConfig, photos: Arc<dyn PhotoSource>) -> Self {
        Self {
            renderer: CardRenderer::new(config, photos),
            organization: config.organization.clone(),
            image_width_mm: config.export_width_mm,
        }
    }

    pub fn renderer(&self) -> &CardRenderer {
        &self.renderer
    }

    /// `{ORG}_ID_{member_id}_{side}.pdf`
    pub fn filename(&self, card: &IdCard, side: CardSide) -> String {
        format!(
            "{}_ID_{}_{}.pdf",
            file_safe(&self.organization),
            file_safe(&card.member_id),
            side.as_str()
        )
    }

    /// `{ORG} OFFICIAL ID (FRONT|BACK)`
    pub fn caption(&self, side: CardSide) -> String {
        format!("{} OFFICIAL ID ({})", self.organization, side.label())
    }

    /// Text printed under the card image, blank fields skipped
    pub fn text_lines(&self, card: &IdCard, side: CardSide) -> Vec<String> {
        fn labelled<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<String> {
            fields
                .into_iter()
                .filter(|(_, value)| !value.trim().is_empty())
                .map(|(label, value)| format!("{}: {}", label, value.trim()))
                .collect()
        }

        match side {
            CardSide::Front => {
                let validity = match (card.issued_date.trim(), card.expiry_date.trim()) {
                    ("", "") => None,
                    (issued, "") => Some(format!("Issued: {}", issued)),
                    ("", expiry) => Some(format!("Expires: {}", expiry)),
                    (issued, expiry) => Some(format!("Valid: {} to {}", issued, expiry)),
                };
                let motto = card.motto.trim();

                (!motto.is_empty())
                    .then(|| format!("\"{}\"", motto))
                    .into_iter()
                    .chain(labelled([
                        ("Name", card.full_name.as_str()),
                        ("Position", card.position.as_str()),
                        ("Member ID", card.member_id.as_str()),
                        ("Batch", card.batch.as_str()),
                    ]))
                    .chain(validity)
                    .chain(labelled([("Secretary", card.secretary_name.as_str())]))
                    .collect()
            }
            CardSide::Back => {
                let mut lines = labelled([
                    ("Email", card.email.as_str()),
                    ("Phone", card.phone.as_str()),
                ]);
                lines.push(format!("Verify: {}", self.renderer.verify_link(&card.uid)));
                lines
            }
        }
    }

    /// Layout of the export page for a face of the given pixel size
    pub fn page_plan(&self, card: &IdCard, side: CardSide, width: u32, height: u32) -> PagePlan {
        PagePlan::new(
            width,
            height,
            self.image_width_mm,
            self.caption(side),
            self.text_lines(card, side),
        )
    }

    /// Render one face and wrap it in a single-page PDF
    pub async fn export(&self, card: &IdCard, side: CardSide) -> Result<ExportedDocument> {
        let face = self.renderer.render(card, side).await?;
        let plan = self.page_plan(card, side, face.width(), face.height());
        let bytes = run_blocking(move || Self::compose(plan, face)).await?;
        let filename = self.filename(card, side);

        info!(uid = %card.uid, side = %side, size = bytes.len(), "Exported ID card");
        Ok(ExportedDocument { filename, bytes })
    }

    fn compose(plan: PagePlan, face: RgbImage) -> Result<Vec<u8>> {
        debug!(image_x = plan.image_x, image_y = plan.image_y, dpi = plan.dpi, "Composing export page");

        let (doc, page, layer) = PdfDocument::new(
            plan.caption.text.as_str(),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Card",
        );
        let layer = doc.get_page(page).get_layer(layer);
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PortalError::export(format!("Failed to load font: {}", e)))?;

        Image::from_dynamic_image(&DynamicImage::ImageRgb8(face)).add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(plan.image_x)),
                translate_y: Some(Mm(plan.image_y)),
                dpi: Some(plan.dpi),
                ..Default::default()
            },
        );

        for text in std::iter::once(&plan.caption).chain(plan.lines.iter()) {
            layer.use_text(text.text.as_str(), text.size, Mm(text.x), Mm(text.y), &font);
        }

        doc.save_to_bytes()
            .map_err(|e| PortalError::export(format!("Failed to write PDF: {}", e)))
    }
}
