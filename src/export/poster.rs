//! Check-in poster: one page with the gym name, the location QR code and
//! scanning instructions. Rendered as HTML or drawn straight to PDF.

use crate::errors::AppResult;
use crate::export::notify_export_success;
use crate::export::pdf::PosterPdf;
use crate::export::qr::QrImage;
use crate::ui::messages::info;
use std::fs;
use std::path::Path;

pub const HINT: &str = "Please scan this code at entry and when leaving.";
pub const ROTATE_NOTE: &str = "Rotate this QR in the Admin app to invalidate old codes.";

/// QR edge on the printed page, in CSS px / PDF points.
pub const QR_SIZE: u32 = 300;

pub struct Poster {
    pub gym_name: String,
    pub location_name: String,
    pub printed_on: String,
    pub qr: QrImage,
}

impl Poster {
    pub fn subtitle(&self) -> String {
        format!("{} Check-In / Check-Out", self.location_name)
    }

    pub fn footer(&self) -> String {
        format!("Printed on {} • {}", self.printed_on, ROTATE_NOTE)
    }
}

/// Escape the HTML metacharacters `& < > "`.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_html(poster: &Poster) -> String {
    let gym = escape_html(&poster.gym_name);
    let location = escape_html(&poster.location_name);
    let subtitle = escape_html(&poster.subtitle());
    let footer = escape_html(&poster.footer());
    let qr = poster.qr.data_uri(QR_SIZE);

    format!(
        r#"<!doctype html>
<html>
<head>
<meta charset="utf-8" />
<title>{gym} • {location} QR</title>
<style>
  @page {{ size: A4; margin: 20mm; }}
  body {{ font-family: -apple-system, BlinkMacSystemFont, Segoe UI, Roboto, sans-serif; color: #111; }}
  .wrap {{ text-align: center; }}
  .title {{ font-size: 28px; font-weight: 800; margin: 10px 0 4px; }}
  .sub {{ font-size: 14px; color: #555; margin-bottom: 24px; }}
  .qr {{ margin: 18px auto; width: {QR_SIZE}px; height: {QR_SIZE}px; }}
  .hint {{ font-size: 16px; margin-top: 16px; }}
  .foot {{ margin-top: 40px; font-size: 12px; color: #777; }}
</style>
</head>
<body>
  <div class="wrap">
    <div class="title">{gym}</div>
    <div class="sub">{subtitle}</div>
    <img class="qr" src="{qr}" />
    <div class="hint">{HINT}</div>
    <div class="foot">{footer}</div>
  </div>
</body>
</html>
"#
    )
}

pub fn write_html(path: &Path, poster: &Poster) -> AppResult<()> {
    info(format!("Writing poster: {}", path.display()));
    fs::write(path, render_html(poster))?;
    notify_export_success("Poster (HTML)", path);
    Ok(())
}

pub fn write_pdf(path: &Path, poster: &Poster) -> AppResult<()> {
    info(format!("Writing poster: {}", path.display()));
    let mut pdf = PosterPdf::new();
    pdf.draw(poster);
    pdf.save(path)?;
    notify_export_success("Poster (PDF)", path);
    Ok(())
}
