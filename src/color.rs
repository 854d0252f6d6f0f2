/// Opaque alpha bits of a packed pixel.
pub const ALPHA: u32 = 0xFF00_0000;

#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // ARGB8 in little-endian memory, alpha fully opaque
    ALPHA | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

#[inline]
pub fn alpha(pixel: u32) -> u8 {
    (pixel >> 24) as u8
}

/// Per-channel tint applied to a stripe or a floor sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Subtracts `amount` from every channel, saturating at zero.
    pub fn darken(self, amount: u8) -> Self {
        Self {
            r: self.r.saturating_sub(amount),
            g: self.g.saturating_sub(amount),
            b: self.b.saturating_sub(amount),
        }
    }

    /// Scales the RGB channels of a packed pixel by `channel / 256`, keeping its alpha.
    #[inline]
    pub fn modulate(self, pixel: u32) -> u32 {
        let scale = |shift: u32, by: u8| (((pixel >> shift) & 0xFF) * by as u32 / 256) << shift;
        (pixel & ALPHA) | scale(16, self.r) | scale(8, self.g) | scale(0, self.b)
    }
}
