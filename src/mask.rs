use image::{GrayImage, Luma};
use ndarray::Array2;

/// Square binary raster: 1 inside the blob, 0 outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    pixels: Array2<u8>,
}

/// How mask values map to gray levels when saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    /// White blob on a black background.
    #[default]
    WhiteOnBlack,
    /// Black blob on a white background.
    BlackOnWhite,
}

impl Palette {
    #[inline]
    fn shade(self, value: u8) -> u8 {
        match (self, value) {
            (Palette::WhiteOnBlack, 0) | (Palette::BlackOnWhite, 1) => 0,
            _ => 255,
        }
    }
}

impl Mask {
    pub(crate) fn from_array(pixels: Array2<u8>) -> Self {
        debug_assert_eq!(pixels.nrows(), pixels.ncols());
        debug_assert!(pixels.iter().all(|&v| v <= 1));
        Mask { pixels }
    }

    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.pixels.get([row, col]).copied()
    }

    pub fn is_inside(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == Some(1)
    }

    pub fn as_array(&self) -> &Array2<u8> {
        &self.pixels
    }

    /// Number of pixels inside the blob.
    pub fn filled(&self) -> usize {
        self.pixels.iter().filter(|&&v| v == 1).count()
    }

    pub fn to_image(&self, palette: Palette) -> GrayImage {
        let side = self.height() as u32;
        GrayImage::from_fn(side, side, |x, y| {
            Luma([palette.shade(self.pixels[[y as usize, x as usize]])])
        })
    }

    /// Render two mask rows per text line with half-block characters.
    pub fn render_preview(&self) -> String {
        let side = self.height();
        let mut out = String::with_capacity((side + 1) * (side / 2 + 1) * 3);

        for top in (0..side).step_by(2) {
            for col in 0..side {
                let upper = self.is_inside(top, col);
                let lower = self.is_inside(top + 1, col);
                out.push(match (upper, lower) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                });
            }
            out.push('\n');
        }

        out
    }
}
