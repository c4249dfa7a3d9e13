use crate::domain::model::{
    EncodeOptions, ErrorCorrection, OutputFormat, QrImage, QrPayload, MAX_MARGIN, MAX_WIDTH,
};
use crate::domain::ports::QrEncoder;
use crate::utils::error::{QrForgeError, Result};
use async_trait::async_trait;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;

/// Pixels per module when the requested width cannot hold the whole symbol.
const FALLBACK_SCALE: u32 = 4;

fn ec_level(level: ErrorCorrection) -> EcLevel {
    match level {
        ErrorCorrection::Low => EcLevel::L,
        ErrorCorrection::Medium => EcLevel::M,
        ErrorCorrection::Quartile => EcLevel::Q,
        ErrorCorrection::High => EcLevel::H,
    }
}

/// Maps output pixels onto symbol modules, quiet zone included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterGeometry {
    /// Symbol width in modules, without margin.
    pub modules: u32,
    pub margin: u32,
    /// Output edge length in pixels.
    pub size: u32,
}

impl RasterGeometry {
    /// Fails when the margin or width is beyond the supported range.
    pub fn new(modules: u32, options: &EncodeOptions) -> Result<Self> {
        if options.margin > MAX_MARGIN {
            return Err(QrForgeError::encoding(format!(
                "margin {} exceeds the maximum of {} modules",
                options.margin, MAX_MARGIN
            )));
        }
        if options.width > MAX_WIDTH {
            return Err(QrForgeError::encoding(format!(
                "width {} exceeds the maximum of {} pixels",
                options.width, MAX_WIDTH
            )));
        }

        let total = options
            .margin
            .checked_mul(2)
            .and_then(|quiet| quiet.checked_add(modules))
            .ok_or_else(|| QrForgeError::encoding("symbol size overflows"))?;
        let size = if options.width >= total {
            options.width
        } else {
            total
                .checked_mul(FALLBACK_SCALE)
                .ok_or_else(|| QrForgeError::encoding("image size overflows"))?
        };
        Ok(Self {
            modules,
            margin: options.margin,
            size,
        })
    }

    pub fn total_modules(&self) -> u32 {
        self.modules + 2 * self.margin
    }

    /// Symbol coordinate under pixel `px`, `None` inside the quiet zone.
    pub fn module_at(&self, px: u32) -> Option<u32> {
        let index = u64::from(px) * u64::from(self.total_modules()) / u64::from(self.size);
        let index = u32::try_from(index).ok()?;
        if index < self.margin || index >= self.margin + self.modules {
            None
        } else {
            Some(index - self.margin)
        }
    }
}

/// Encoder backed by the `qrcode` crate, rasterised with `image`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeEncoder;

impl QrCodeEncoder {
    pub fn new() -> Self {
        Self
    }

    fn symbol(payload: &str, level: ErrorCorrection) -> Result<QrCode> {
        if payload.is_empty() {
            return Err(QrForgeError::encoding("payload is empty"));
        }
        QrCode::with_error_correction_level(payload.as_bytes(), ec_level(level)).map_err(|e| {
            QrForgeError::encoding(format!(
                "{} ({} bytes at level {})",
                e,
                payload.len(),
                level
            ))
        })
    }

    /// Text rendering for terminals, two module rows per character row.
    ///
    /// Light modules are drawn as blocks so the code scans on dark
    /// backgrounds. The quiet zone follows `options.margin`.
    pub fn preview(&self, payload: &QrPayload, options: &EncodeOptions) -> Result<String> {
        let code = Self::symbol(payload.as_str(), options.error_correction)?;
        let modules = u32::try_from(code.width())
            .map_err(|_| QrForgeError::encoding("symbol too large"))?;
        let geometry = RasterGeometry::new(modules, options)?;
        let colors = code.to_colors();
        let total = geometry.total_modules();

        let dark = |x: u32, y: u32| {
            let (Some(mx), Some(my)) = (
                x.checked_sub(geometry.margin),
                y.checked_sub(geometry.margin),
            ) else {
                return false;
            };
            mx < modules && my < modules && is_dark(&colors, modules, mx, my)
        };

        let mut out = String::new();
        for y in (0..total).step_by(2) {
            for x in 0..total {
                // 超出底部的那一列當作 quiet zone
                let top_light = !dark(x, y);
                let bottom_light = y + 1 >= total || !dark(x, y + 1);
                out.push(match (top_light, bottom_light) {
                    (true, true) => '\u{2588}',
                    (true, false) => '\u{2580}',
                    (false, true) => '\u{2584}',
                    (false, false) => ' ',
                });
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Blocking encode; [`QrEncoder::encode`] runs this off the async runtime.
    pub fn encode_blocking(payload: &str, options: &EncodeOptions) -> Result<QrImage> {
        let code = Self::symbol(payload, options.error_correction)?;
        let modules = u32::try_from(code.width())
            .map_err(|_| QrForgeError::encoding("symbol too large"))?;
        let geometry = RasterGeometry::new(modules, options)?;
        tracing::debug!(
            "QR symbol: {} modules, margin {}, {}px",
            geometry.modules,
            geometry.margin,
            geometry.size
        );

        let colors = code.to_colors();
        let bytes = match options.format {
            OutputFormat::Png => render_png(&colors, &geometry)?,
            OutputFormat::Svg => render_svg(&colors, &geometry).into_bytes(),
        };

        Ok(QrImage {
            format: options.format,
            width: geometry.size,
            bytes,
        })
    }
}

fn is_dark(colors: &[Color], modules: u32, x: u32, y: u32) -> bool {
    let index = (y as usize) * (modules as usize) + x as usize;
    colors.get(index) == Some(&Color::Dark)
}

fn render_png(colors: &[Color], geometry: &RasterGeometry) -> Result<Vec<u8>> {
    // 每個像素軸只算一次對應的 module
    let axis: Vec<Option<u32>> = (0..geometry.size).map(|p| geometry.module_at(p)).collect();

    let img = GrayImage::from_fn(geometry.size, geometry.size, |x, y| {
        match (axis.get(x as usize), axis.get(y as usize)) {
            (Some(Some(mx)), Some(Some(my))) if is_dark(colors, geometry.modules, *mx, *my) => {
                Luma([0u8])
            }
            _ => Luma([255u8]),
        }
    });

    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(img).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

fn render_svg(colors: &[Color], geometry: &RasterGeometry) -> String {
    let total = geometry.total_modules();
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {1} {1}\" stroke=\"none\">\n",
        geometry.size, total
    );
    result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";
    result += "\t<path d=\"";
    let mut first = true;
    for y in 0..geometry.modules {
        for x in 0..geometry.modules {
            if is_dark(colors, geometry.modules, x, y) {
                if !first {
                    result += " ";
                }
                first = false;
                result += &format!(
                    "M{},{}h1v1h-1z",
                    x + geometry.margin,
                    y + geometry.margin
                );
            }
        }
    }
    result += "\" fill=\"#000000\"/>\n";
    result += "</svg>\n";
    result
}

#[async_trait]
impl QrEncoder for QrCodeEncoder {
    async fn encode(&self, payload: &QrPayload, options: &EncodeOptions) -> Result<QrImage> {
        let payload = payload.as_str().to_owned();
        let options = *options;
        tokio::task::spawn_blocking(move || Self::encode_blocking(&payload, &options))
            .await
            .map_err(|e| QrForgeError::encoding(format!("encoder task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_uses_requested_width() {
        let geometry = RasterGeometry::new(25, &EncodeOptions::default()).unwrap();
        assert_eq!(geometry.size, 512);
        assert_eq!(geometry.total_modules(), 29);
        assert_eq!(geometry.module_at(0), None);
        assert_eq!(geometry.module_at(511), None);
        // 512 / 29 ≈ 17.66 px per module, so pixel 36 lands in module 2 (first symbol module)
        assert_eq!(geometry.module_at(36), Some(0));
        assert_eq!(geometry.module_at(255), Some(12));
    }

    #[test]
    fn test_geometry_falls_back_to_fixed_scale() {
        let options = EncodeOptions {
            width: 10,
            ..EncodeOptions::default()
        };
        let geometry = RasterGeometry::new(21, &options).unwrap();
        assert_eq!(geometry.size, 25 * FALLBACK_SCALE);
        assert_eq!(geometry.module_at(8), Some(0));
    }

    #[test]
    fn test_png_has_requested_size() {
        let image = QrCodeEncoder::encode_blocking("https://example.com", &EncodeOptions::default())
            .unwrap();
        assert_eq!(image.format, OutputFormat::Png);
        assert_eq!(image.width, 512);

        let decoded = image::load_from_memory(&image.bytes).unwrap();
        assert_eq!(decoded.width(), 512);
        assert_eq!(decoded.height(), 512);
        // 左上角在 quiet zone 內
        assert_eq!(decoded.to_luma8().get_pixel(0, 0), &Luma([255u8]));
    }

    #[test]
    fn test_svg_output() {
        let options = EncodeOptions {
            format: OutputFormat::Svg,
            ..EncodeOptions::default()
        };
        let image = QrCodeEncoder::encode_blocking("hello", &options).unwrap();
        let svg = String::from_utf8(image.bytes).unwrap();
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(svg.contains("width=\"512\""));
        assert!(svg.contains("M2,2h1v1h-1z"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        let err = QrCodeEncoder::encode_blocking("", &EncodeOptions::default()).unwrap_err();
        assert!(matches!(err, QrForgeError::Encoding { .. }));
    }

    #[test]
    fn test_payload_over_capacity_is_rejected() {
        // Version 40-H holds at most 1273 bytes
        let payload = "x".repeat(1300);
        let err = QrCodeEncoder::encode_blocking(&payload, &EncodeOptions::default()).unwrap_err();
        assert!(matches!(err, QrForgeError::Encoding { .. }));

        let low = EncodeOptions {
            error_correction: ErrorCorrection::Low,
            ..EncodeOptions::default()
        };
        assert!(QrCodeEncoder::encode_blocking(&payload, &low).is_ok());
    }

    #[test]
    fn test_oversized_options_are_rejected() {
        let huge_margin = EncodeOptions {
            margin: u32::MAX / 2,
            ..EncodeOptions::default()
        };
        let err = QrCodeEncoder::encode_blocking("hello", &huge_margin).unwrap_err();
        assert!(matches!(err, QrForgeError::Encoding { .. }));
        assert!(err.to_string().contains("margin"));

        let huge_width = EncodeOptions {
            width: 100_000,
            ..EncodeOptions::default()
        };
        let err = QrCodeEncoder::encode_blocking("hello", &huge_width).unwrap_err();
        assert!(matches!(err, QrForgeError::Encoding { .. }));
        assert!(err.to_string().contains("width"));

        // 上限本身仍可用
        let at_limit = EncodeOptions {
            margin: MAX_MARGIN,
            width: 10,
            ..EncodeOptions::default()
        };
        let geometry = RasterGeometry::new(21, &at_limit).unwrap();
        assert_eq!(geometry.size, (21 + 2 * MAX_MARGIN) * FALLBACK_SCALE);
    }

    #[test]
    fn test_preview_renders_text() {
        let options = EncodeOptions {
            error_correction: ErrorCorrection::Medium,
            ..EncodeOptions::default()
        };
        let preview = QrCodeEncoder::new()
            .preview(&QrPayload::new("hi"), &options)
            .unwrap();
        assert!(preview.lines().count() > 10);
    }

    #[test]
    fn test_preview_follows_margin() {
        let encoder = QrCodeEncoder::new();
        let payload = QrPayload::new("hi");
        let with_margin = |margin| EncodeOptions {
            error_correction: ErrorCorrection::Medium,
            margin,
            ..EncodeOptions::default()
        };

        // "hi" at M is a version 1 symbol, 21 modules wide
        let bare = encoder.preview(&payload, &with_margin(0)).unwrap();
        assert_eq!(bare.lines().count(), 11);
        assert!(bare.lines().all(|line| line.chars().count() == 21));

        let padded = encoder.preview(&payload, &with_margin(4)).unwrap();
        assert_eq!(padded.lines().count(), 15);
        assert!(padded.lines().all(|line| line.chars().count() == 29));
        // quiet zone rows are fully light
        let first = padded.lines().next().unwrap();
        assert!(first.chars().all(|c| c == '\u{2588}'));

        let err = encoder
            .preview(&payload, &with_margin(MAX_MARGIN + 1))
            .unwrap_err();
        assert!(matches!(err, QrForgeError::Encoding { .. }));
    }
}
