/// Rasterizer for the SVG rendition of the certificate

use std::sync::Arc;

use log::{debug, warn};
use usvg::fontdb;

use crate::{Error, Result};

/// Families tried, in order, for the generic `sans-serif` family
const SANS_CANDIDATES: [&str; 6] = [
    "Segoe UI",
    "Roboto",
    "Helvetica Neue",
    "Arial",
    "Liberation Sans",
    "DejaVu Sans",
];

/// An opaque RGB bitmap
#[derive(Debug, Clone)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// Tightly packed 8-bit RGB rows
    pub rgb: Vec<u8>,
}

/// Load the system font database used for text rendering.
///
/// This is blocking I/O; callers on an async runtime should run it on a
/// blocking thread.
pub fn load_system_fonts() -> fontdb::Database {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    if db.is_empty() {
        warn!("No system fonts found, certificate text will not be rendered");
        return db;
    }
    let available = |name: &str| {
        db.faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    };
    if let Some(family) = SANS_CANDIDATES.iter().find(|f| available(f)) {
        let family = family.to_string();
        debug!("using {} as sans-serif fallback", family);
        db.set_sans_serif_family(family);
    }
    db
}

/// Rasterize `svg` at `scale` onto an opaque white background.
pub fn rasterize_svg(svg: &str, fonts: Arc<fontdb::Database>, scale: f32) -> Result<Bitmap> {
    if !(scale > 0.0) {
        return Err(Error::RasterizationFailure(format!("invalid scale {}", scale)));
    }

    let tree = {
        let mut opts = usvg::Options::default();
        opts.fontdb = fonts;
        usvg::Tree::from_str(svg, &opts)
            .map_err(|e| Error::RasterizationFailure(format!("SVG parsing failed: {}", e)))?
    };

    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        Error::RasterizationFailure(format!("Failed to create pixmap ({}x{})", width, height))
    })?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    // Pixels are premultiplied; compositing over white is c + (255 - a).
    let rgb = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| {
            let cover = 255 - px[3];
            [
                px[0].saturating_add(cover),
                px[1].saturating_add(cover),
                px[2].saturating_add(cover),
            ]
        })
        .collect();

    Ok(Bitmap { width, height, rgb })
}
