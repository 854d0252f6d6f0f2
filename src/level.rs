use crate::color::Rgb;
use crate::texture::TextureRef;

/// Rows of a texture column a stripe samples from, `y0..y1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TexSlice {
    pub x: usize,
    pub y0: i32,
    pub y1: i32,
}

/// Screen rows a stripe covers, `y0..y1`. Not clamped to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenSpan {
    pub y0: i32,
    pub y1: i32,
}

/// Draw instruction for one screen column of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Column {
    pub slice: TexSlice,
    pub view: ScreenSpan,
    pub tint: Rgb,
    /// `None` when nothing is drawn in this column.
    pub texture: Option<TextureRef>,
}

/// One renderable layer: a stacked wall tier or a sprite's screen footprint.
#[derive(Debug, Clone, Default)]
pub struct Level {
    columns: Vec<Column>,
}

impl Level {
    pub fn new(width: usize) -> Self {
        Self {
            columns: vec![Column::default(); width],
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, x: usize) -> Option<&Column> {
        self.columns.get(x)
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, column: Column) {
        self.columns[x] = column;
    }

    pub(crate) fn clear(&mut self) {
        self.columns.fill(Column::default());
    }

    /// Number of columns carrying a draw instruction.
    pub fn drawn_columns(&self) -> usize {
        self.columns.iter().filter(|c| c.texture.is_some()).count()
    }
}

/// Per-frame floor pixels, stored column-major so each column is one contiguous slice.
///
/// A pixel with alpha 0 was not written this frame.
#[derive(Debug, Clone)]
pub struct FloorBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl FloorBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[x * self.height + y]
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }
}
