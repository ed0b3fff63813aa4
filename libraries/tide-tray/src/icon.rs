//! Tray icon loading.
//!
//! SVG sources are rasterized to [`ICON_SIZE`] square; other formats are
//! decoded as-is. Anything unreadable falls back to a drawn placeholder so
//! the tray can always start.

use std::path::Path;

use image::{Rgba, RgbaImage};
use resvg::{tiny_skia, usvg};
use tracing::{debug, warn};

use crate::error::{Result, TrayError};

/// Edge length of rasterized and placeholder icons, in pixels
pub const ICON_SIZE: u32 = 64;

const PLACEHOLDER_FILL: Rgba<u8> = Rgba([66, 133, 244, 255]);
const PLACEHOLDER_GLYPH: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Straight-alpha RGBA pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayIconImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TrayIconImage {
    fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            rgba: image.into_raw(),
            width,
            height,
        }
    }

    /// RGBA at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * self.width + x) * 4) as usize;
        let mut px = [0; 4];
        px.copy_from_slice(&self.rgba[offset..offset + 4]);
        px
    }
}

/// Resolve the icon for `path`, falling back to [`placeholder`].
pub fn load_icon(path: Option<&Path>) -> TrayIconImage {
    let Some(path) = path else {
        debug!("No tray icon configured, drawing placeholder");
        return placeholder();
    };

    match decode(path) {
        Ok(icon) => icon,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Tray icon unusable, drawing placeholder");
            placeholder()
        }
    }
}

fn decode(path: &Path) -> Result<TrayIconImage> {
    let data = std::fs::read(path)?;

    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg") || ext.eq_ignore_ascii_case("svgz"));

    if is_svg {
        rasterize_svg(&data)
    } else {
        let image = image::load_from_memory(&data).map_err(|e| TrayError::Icon(e.to_string()))?;
        Ok(TrayIconImage::from_image(image.to_rgba8()))
    }
}

/// Render an SVG document to an [`ICON_SIZE`] square bitmap.
pub fn rasterize_svg(data: &[u8]) -> Result<TrayIconImage> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default())
        .map_err(|e| TrayError::Icon(e.to_string()))?;

    let mut pixmap = tiny_skia::Pixmap::new(ICON_SIZE, ICON_SIZE)
        .ok_or_else(|| TrayError::Icon("cannot allocate pixmap".into()))?;

    let size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        ICON_SIZE as f32 / size.width(),
        ICON_SIZE as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha
    let rgba = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    Ok(TrayIconImage {
        rgba,
        width: ICON_SIZE,
        height: ICON_SIZE,
    })
}

/// Blue disc with a white play triangle.
pub fn placeholder() -> TrayIconImage {
    let center = ICON_SIZE as f32 / 2.0;
    let radius = center - 4.0;
    let triangle = [(24.0, 18.0), (24.0, 46.0), (48.0, 32.0)];

    let image = RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let p = (x as f32 + 0.5, y as f32 + 0.5);
        if in_triangle(p, triangle) {
            PLACEHOLDER_GLYPH
        } else if (p.0 - center).powi(2) + (p.1 - center).powi(2) <= radius * radius {
            PLACEHOLDER_FILL
        } else {
            Rgba([0, 0, 0, 0])
        }
    });

    TrayIconImage::from_image(image)
}

fn in_triangle(p: (f32, f32), [a, b, c]: [(f32, f32); 3]) -> bool {
    let edge = |from: (f32, f32), to: (f32, f32)| {
        (to.0 - from.0) * (p.1 - from.1) - (to.1 - from.1) * (p.0 - from.0)
    };
    let (d1, d2, d3) = (edge(a, b), edge(b, c), edge(c, a));
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}
