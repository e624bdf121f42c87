use crate::export::poster::{HINT, Poster, QR_SIZE};
use crate::export::qr::QUIET_ZONE;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Average Helvetica advance as a fraction of the font size.
const AVG_CHAR_WIDTH: f32 = 0.52;

/// Max characters per footer line before wrapping.
const FOOTER_WRAP: usize = 70;

pub struct PosterPdf {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    current_content_id: Option<Ref>,

    page_w: f32,
    page_h: f32,
    margin: f32,

    next_id: i32,
    font_id: Ref,
    bold_font_id: Ref,

    title_font_size: f32,
    sub_font_size: f32,
    hint_font_size: f32,
    foot_font_size: f32,
}

impl Default for PosterPdf {
    fn default() -> Self {
        Self::new()
    }
}

impl PosterPdf {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);
        let bold_font_id = Ref::new(4);
        let next_id = 5;

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_font_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            current_content_id: None,

            // A4 in points
            page_w: 595.0,
            page_h: 842.0,
            margin: 57.0,

            next_id,
            font_id,
            bold_font_id,

            title_font_size: 28.0,
            sub_font_size: 14.0,
            hint_font_size: 16.0,
            foot_font_size: 12.0,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    fn new_page(&mut self) -> Content {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();

        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
            .contents(content_id);

        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        fonts.pair(Name(b"F1"), self.font_id);
        fonts.pair(Name(b"F2"), self.bold_font_id);
        fonts.finish();
        resources.finish();
        page.finish();

        self.current_content_id = Some(content_id);

        Content::new()
    }

    fn finalize_page(&mut self, content: Content) {
        if let Some(id) = self.current_content_id {
            self.pdf.stream(id, &content.finish());
        }
    }

    fn build_pages_tree(&mut self) {
        let mut pages = self.pdf.pages(self.pages_id);
        pages.count(self.page_refs.len() as i32);
        pages.kids(self.page_refs.clone());
    }

    fn text_width(text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * AVG_CHAR_WIDTH
    }

    /// Draw `text` horizontally centred with its baseline at `y`.
    fn draw_centered(&self, content: &mut Content, font: &[u8], size: f32, y: f32, text: &str) {
        let x = ((self.page_w - Self::text_width(text, size)) / 2.0).max(self.margin);
        content.begin_text();
        content.set_font(Name(font), size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&to_win_ansi(text)));
        content.end_text();
    }

    /// QR modules as filled squares; the light background covers the quiet zone.
    fn draw_qr(&self, content: &mut Content, poster: &Poster, top: f32) -> f32 {
        let size = QR_SIZE as f32;
        let modules = poster.qr.width();
        let cell = size / (modules + 2 * QUIET_ZONE) as f32;
        let x0 = (self.page_w - size) / 2.0;
        let y0 = top - size;

        content.save_state();
        content.set_fill_rgb(1.0, 1.0, 1.0);
        content.rect(x0, y0, size, size);
        content.fill_nonzero();

        content.set_fill_rgb(0.0, 0.0, 0.0);
        for (i, dark) in poster.qr.dark_modules().into_iter().enumerate() {
            if !dark {
                continue;
            }
            let row = i / modules;
            let col = i % modules;
            let x = x0 + (col + QUIET_ZONE) as f32 * cell;
            // PDF y grows upwards, grid rows grow downwards
            let y = top - (row + QUIET_ZONE + 1) as f32 * cell;
            content.rect(x, y, cell, cell);
        }
        content.fill_nonzero();
        content.restore_state();

        y0
    }

    /// Lay out the whole poster on a single A4 page.
    pub fn draw(&mut self, poster: &Poster) {
        let title = poster.gym_name.clone();
        self.pdf
            .document_info(Ref::new(self.next_id))
            .title(TextStr(&format!("{} • {} QR", title, poster.location_name)))
            .creator(TextStr("gymdesk"));
        self.next_id += 1;

        let mut content = self.new_page();
        let mut y = self.page_h - self.margin - self.title_font_size;

        self.draw_centered(&mut content, b"F2", self.title_font_size, y, &title);
        y -= self.sub_font_size + 14.0;

        content.save_state();
        content.set_fill_rgb(0.33, 0.33, 0.33);
        self.draw_centered(&mut content, b"F1", self.sub_font_size, y, &poster.subtitle());
        content.restore_state();
        y -= 42.0;

        y = self.draw_qr(&mut content, poster, y);
        y -= 16.0 + self.hint_font_size;

        self.draw_centered(&mut content, b"F1", self.hint_font_size, y, HINT);
        y -= 40.0 + self.foot_font_size;

        content.save_state();
        content.set_fill_rgb(0.47, 0.47, 0.47);
        for line in textwrap::wrap(&poster.footer(), FOOTER_WRAP) {
            self.draw_centered(&mut content, b"F1", self.foot_font_size, y, &line);
            y -= self.foot_font_size + 4.0;
        }
        content.restore_state();

        self.finalize_page(content);
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.build_pages_tree();
        self.pdf.finish()
    }

    pub fn save(self, path: &Path) -> std::io::Result<()> {
        let bytes = self.finish();
        let mut f = File::create(path)?;
        f.write_all(&bytes)?;
        Ok(())
    }
}

/// Encode text for the WinAnsi-encoded standard fonts; unmappable chars become `?`.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::qr::QrImage;

    #[test]
    fn win_ansi_maps_bullet_and_latin1() {
        assert_eq!(to_win_ansi("a • é"), vec![b'a', b' ', 0x95, b' ', 0xe9]);
        assert_eq!(to_win_ansi("日"), vec![b'?']);
    }

    #[test]
    fn poster_pdf_is_a_single_page_document() {
        let poster = Poster {
            gym_name: "Anvil Gym".into(),
            location_name: "Front Desk".into(),
            printed_on: "2025-01-02".into(),
            qr: QrImage::render("tok_abc").unwrap(),
        };
        let mut pdf = PosterPdf::new();
        pdf.draw(&poster);
        let bytes = pdf.finish();

        assert!(bytes.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 1"));
        assert!(text.contains("Helvetica-Bold"));
    }
}
