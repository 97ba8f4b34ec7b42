//! Module matrix to raster image

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};

use crate::error::{QrError, QrResult};
use crate::options::{MAX_PIXEL_WIDTH, QrOptions};

/// Error-correction level used for every badge.
/// Changing it changes the look of every regenerated code.
pub const ERROR_CORRECTION: EcLevel = EcLevel::M;

/// Pixels per module when the requested width cannot fit the symbol
const FALLBACK_SCALE: f64 = 4.0;

/// Square grid of QR modules, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModuleGrid {
    size: usize,
    dark: Vec<bool>,
}

impl ModuleGrid {
    /// Run the QR algorithm over `payload`
    pub(crate) fn encode(payload: &str) -> QrResult<Self> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), ERROR_CORRECTION)?;
        let dark = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();
        Ok(Self {
            size: code.width(),
            dark,
        })
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.dark[row * self.size + col]
    }
}

/// Draw the grid at `options.pixel_width` with a quiet zone of `options.margin` modules.
///
/// Module size is fractional so the output hits the requested width; each
/// pixel samples the module under it.
pub(crate) fn rasterize(grid: &ModuleGrid, options: &QrOptions) -> QrResult<RgbaImage> {
    let quiet = options.margin as f64;
    let total = grid.size as f64 + 2.0 * quiet;
    let scale = if options.pixel_width as f64 >= total {
        options.pixel_width as f64 / total
    } else {
        tracing::debug!(
            pixel_width = options.pixel_width,
            modules = total,
            "requested width smaller than symbol, using fallback scale"
        );
        FALLBACK_SCALE
    };

    let side = raster_side(total * scale)?;
    let inner_start = quiet * scale;
    let inner_end = side as f64 - inner_start;
    let dark = Rgba(options.dark.to_rgba());
    let light = Rgba(options.light.to_rgba());

    Ok(RgbaImage::from_fn(side, side, |x, y| {
        let (fx, fy) = (x as f64, y as f64);
        if fx < inner_start || fy < inner_start || fx >= inner_end || fy >= inner_end {
            return light;
        }
        let col = ((fx - inner_start) / scale).floor() as usize;
        let row = ((fy - inner_start) / scale).floor() as usize;
        if grid.is_dark(row, col) { dark } else { light }
    }))
}

/// Image side for a scaled symbol, refusing anything the buffer cannot hold
fn raster_side(scaled: f64) -> QrResult<u32> {
    let side = scaled.floor();
    if !side.is_finite() || side < 1.0 || side > MAX_PIXEL_WIDTH as f64 {
        return Err(QrError::InvalidOptions(format!(
            "rendered side {side} is outside 1..={MAX_PIXEL_WIDTH} pixels"
        )));
    }
    Ok(side as u32)
}

/// PNG bytes for `image`. The encoder writes no timestamp chunk,
/// so equal pixels give equal bytes.
pub(crate) fn to_png(image: &RgbaImage) -> QrResult<Vec<u8>> {
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}
