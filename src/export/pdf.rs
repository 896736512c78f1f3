//! Raster-to-PDF export strategy
//!
//! Rasterizes the SVG rendition of the certificate at twice its natural size,
//! embeds the bitmap into a single A4 landscape page and hands the bytes back
//! as the artifact.

use std::io::{BufWriter, Cursor};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use log::{debug, info};
use printpdf::{ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, Px};
use tokio::sync::OnceCell;
use usvg::fontdb;

use super::{Artifact, ExportOutcome, ExportStrategy};
use crate::preview::raster::{self, Bitmap};
use crate::preview::RenderTarget;
use crate::{Error, GeneratorConfig, Result, StrategyKind};

/// A4 landscape
pub const PAGE_WIDTH_MM: f32 = 297.0;
pub const PAGE_HEIGHT_MM: f32 = 210.0;

/// Placement of an image on the page, in millimetres from the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Fit an `img_w` x `img_h` image into the page minus `margin` on every side,
/// keeping its aspect ratio and centering it.
pub fn fit_to_page(img_w: u32, img_h: u32, page_w: f32, page_h: f32, margin: f32) -> Placement {
    let box_w = (page_w - 2.0 * margin).max(1.0);
    let box_h = (page_h - 2.0 * margin).max(1.0);
    let img_aspect = img_w.max(1) as f32 / img_h.max(1) as f32;
    let box_aspect = box_w / box_h;

    let (width, height) = if img_aspect > box_aspect {
        (box_w, box_w / img_aspect)
    } else {
        (box_h * img_aspect, box_h)
    };
    Placement {
        x: (page_w - width) / 2.0,
        y: (page_h - height) / 2.0,
        width,
        height,
    }
}

/// Build a one-page PDF holding `bitmap`.
pub fn bitmap_to_pdf(bitmap: Bitmap, title: &str, margin_mm: f32) -> Result<Vec<u8>> {
    let placement = fit_to_page(bitmap.width, bitmap.height, PAGE_WIDTH_MM, PAGE_HEIGHT_MM, margin_mm);
    let (doc, page, layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let layer = doc.get_page(page).get_layer(layer);

    // printpdf sizes images by dpi; pick the one that maps the bitmap width
    // onto the placement width.
    let dpi = bitmap.width as f32 / (placement.width / 25.4);
    let image = Image::from(ImageXObject {
        width: Px(bitmap.width as usize),
        height: Px(bitmap.height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: bitmap.rgb,
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });
    image.add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(placement.x)),
            translate_y: Some(Mm(placement.y)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );

    let mut buf = Vec::new();
    {
        let mut writer = BufWriter::new(Cursor::new(&mut buf));
        doc.save(&mut writer)
            .map_err(|e| Error::RasterizationFailure(format!("PDF serialization failed: {}", e)))?;
    }
    Ok(buf)
}

fn join_err(e: tokio::task::JoinError) -> Error {
    Error::RasterizationFailure(format!("worker task failed: {}", e))
}

pub struct RasterExport {
    scale: f32,
    margin_mm: f32,
    fonts: OnceCell<Arc<fontdb::Database>>,
}

impl RasterExport {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            scale: config.raster_scale,
            margin_mm: config.page_margin_mm,
            fonts: OnceCell::new(),
        }
    }

    /// Font database, loaded once on a blocking thread
    async fn fonts(&self) -> Result<Arc<fontdb::Database>> {
        let fonts = self
            .fonts
            .get_or_try_init(|| async {
                let db = tokio::task::spawn_blocking(raster::load_system_fonts)
                    .await
                    .map_err(join_err)?;
                debug!("loaded {} font faces", db.len());
                Ok::<_, Error>(Arc::new(db))
            })
            .await?;
        Ok(fonts.clone())
    }

    async fn run(&self, target: &RenderTarget) -> Result<ExportOutcome> {
        target.measure()?;
        let fonts = self.fonts().await?;
        let filename = target.artifact_filename();

        let svg = target.svg.clone();
        let title = format!("Certificate - {}", target.participant_name.trim());
        let scale = self.scale;
        let margin = self.margin_mm;
        let bytes = tokio::task::spawn_blocking(move || {
            let bitmap = raster::rasterize_svg(&svg, fonts, scale)?;
            debug!("rasterized certificate at {}x{}", bitmap.width, bitmap.height);
            bitmap_to_pdf(bitmap, &title, margin)
        })
        .await
        .map_err(join_err)??;

        info!("{} ({} bytes) ready", filename, bytes.len());
        Ok(ExportOutcome {
            strategy: StrategyKind::Raster,
            artifact: Some(Artifact { filename, bytes }),
        })
    }
}

impl ExportStrategy for RasterExport {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Raster
    }

    fn export<'a>(&'a self, target: &'a RenderTarget) -> BoxFuture<'a, Result<ExportOutcome>> {
        self.run(target).boxed()
    }
}
