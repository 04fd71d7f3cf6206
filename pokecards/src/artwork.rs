//! Artwork decoding and half-block rendering.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
};
use serde::{Deserialize, Serialize};

/// Decoded artwork is shrunk to fit this many pixels per side.
pub const ARTWORK_MAX_SIDE: u32 = 64;
const ALPHA_CUTOFF: u8 = 128;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtworkImage {
    pub width: u16,
    pub height: u16,
    /// Row-major RGB, `None` for transparent pixels.
    pub pixels: Vec<Option<[u8; 3]>>,
}

pub fn decode_artwork(bytes: &[u8]) -> Result<ArtworkImage, String> {
    let image = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let image = if image.width() > ARTWORK_MAX_SIDE || image.height() > ARTWORK_MAX_SIDE {
        image.thumbnail(ARTWORK_MAX_SIDE, ARTWORK_MAX_SIDE)
    } else {
        image
    };
    let image = image.to_rgba8();
    let (width, height) = image.dimensions();
    let pixels = image
        .pixels()
        .map(|pixel| {
            let [r, g, b, a] = pixel.0;
            (a >= ALPHA_CUTOFF).then_some([r, g, b])
        })
        .collect();
    Ok(ArtworkImage {
        width: width as u16,
        height: height as u16,
        pixels,
    })
}

impl ArtworkImage {
    pub fn pixel(&self, x: u16, y: u16) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = usize::from(y) * usize::from(self.width) + usize::from(x);
        self.pixels.get(index).copied().flatten()
    }

    /// Size in cells when fitted into `cols` x `rows`, each cell holding two
    /// vertically stacked pixels.
    pub fn fit(&self, cols: u16, rows: u16) -> (u16, u16) {
        if self.width == 0 || self.height == 0 || cols == 0 || rows == 0 {
            return (0, 0);
        }
        let scale_x = f32::from(cols) / f32::from(self.width);
        let scale_y = f32::from(rows) * 2.0 / f32::from(self.height);
        let scale = scale_x.min(scale_y);
        let width = (f32::from(self.width) * scale).floor().max(1.0) as u16;
        let pixel_rows = (f32::from(self.height) * scale).floor().max(1.0) as u16;
        (width.min(cols), pixel_rows.div_ceil(2).min(rows))
    }

    /// Draws the image centered in `area`; transparent pixels show `background`.
    pub fn render(&self, area: Rect, buf: &mut Buffer, background: Color) {
        let (cols, rows) = self.fit(area.width, area.height);
        if cols == 0 || rows == 0 {
            return;
        }
        let pixel_rows = u32::from(rows) * 2;
        let offset_x = area.x + (area.width - cols) / 2;
        let offset_y = area.y + (area.height - rows) / 2;

        for row in 0..rows {
            for col in 0..cols {
                let source_x = (u32::from(col) * u32::from(self.width) / u32::from(cols)) as u16;
                let top_y = u32::from(row) * 2;
                let top = self.pixel(
                    source_x,
                    (top_y * u32::from(self.height) / pixel_rows) as u16,
                );
                let bottom = self.pixel(
                    source_x,
                    ((top_y + 1) * u32::from(self.height) / pixel_rows) as u16,
                );
                let Some(cell) = buf.cell_mut(Position::new(offset_x + col, offset_y + row))
                else {
                    continue;
                };
                match (top, bottom) {
                    (None, None) => {}
                    (Some(top), bottom) => {
                        cell.set_char('▀')
                            .set_fg(rgb(top))
                            .set_bg(bottom.map(rgb).unwrap_or(background));
                    }
                    (None, Some(bottom)) => {
                        cell.set_char('▄').set_fg(rgb(bottom)).set_bg(background);
                    }
                }
            }
        }
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}
