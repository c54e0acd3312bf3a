//! QR codes rendered as standalone SVG documents.

use std::fmt::Write as _;

use qrcode::{Color, QrCode};

use crate::config::QrConfig;
use crate::domain::ports::{QrError, QrRenderer};

#[derive(Debug, Clone, Copy)]
pub struct SvgQrRenderer {
    size: u32,
    margin: u32,
}

impl SvgQrRenderer {
    #[must_use]
    pub fn new(config: QrConfig) -> Self {
        Self {
            size: config.size,
            margin: config.margin,
        }
    }
}

impl QrRenderer for SvgQrRenderer {
    fn render_svg(&self, data: &str) -> Result<String, QrError> {
        let code = QrCode::new(data.as_bytes()).map_err(|e| QrError::Encode(e.to_string()))?;
        let width = code.width();
        let margin = self.margin as usize;
        let extent = width + 2 * margin;

        let mut path = String::new();
        for (y, row) in code.to_colors().chunks(width).enumerate() {
            for (x, color) in row.iter().enumerate() {
                if *color == Color::Dark {
                    write!(path, "M{},{}h1v1h-1z", x + margin, y + margin)
                        .map_err(|e| QrError::Encode(e.to_string()))?;
                }
            }
        }

        Ok(format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" "#,
                r#"width="{size}" height="{size}" viewBox="0 0 {extent} {extent}" "#,
                r#"shape-rendering="crispEdges">"#,
                r##"<rect width="100%" height="100%" fill="#ffffff"/>"##,
                r##"<path fill="#000000" d="{path}"/></svg>"##
            ),
            size = self.size,
            extent = extent,
            path = path,
        ))
    }
}
