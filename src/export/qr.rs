//! QR rendering of the check-in token.

use crate::errors::AppResult;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use qrcode::render::svg;
use qrcode::{Color, QrCode};

/// Quiet zone around the symbol, in modules.
pub const QUIET_ZONE: usize = 4;

/// A rendered code: the module grid plus the text it encodes.
pub struct QrImage {
    code: QrCode,
}

impl QrImage {
    pub fn render(token: &str) -> AppResult<Self> {
        let code = QrCode::new(token.as_bytes())?;
        Ok(Self { code })
    }

    /// Modules per side, quiet zone excluded.
    pub fn width(&self) -> usize {
        self.code.width()
    }

    /// Row-major dark/light grid.
    pub fn dark_modules(&self) -> Vec<bool> {
        self.code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect()
    }

    pub fn to_svg(&self, size: u32) -> String {
        self.code
            .render::<svg::Color>()
            .min_dimensions(size, size)
            .quiet_zone(true)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build()
    }

    /// Inline image data for embedding in a document.
    pub fn data_uri(&self, size: u32) -> String {
        format!(
            "data:image/svg+xml;base64,{}",
            STANDARD.encode(self.to_svg(size))
        )
    }
}
