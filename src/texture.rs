use crate::color::pack_rgb;
use crate::error::{RenderError, Result};

/// Row-major `0xAARRGGBB` image. Alpha 0 marks a transparent texel.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Texture {
    pub fn new(width: usize, height: usize, pixels: Vec<u32>) -> Result<Self> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(RenderError::TextureSize {
                expected,
                found: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> u32) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn solid(width: usize, height: usize, r: u8, g: u8, b: u8) -> Self {
        Self::from_fn(width, height, |_, _| pack_rgb(r, g, b))
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Texel lookup; coordinates are clamped to the image.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[y * self.width + x]
    }
}

/// What a column's stripe is cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureRef {
    Wall(usize),
    Sprite(usize),
}

/// Every image the casters can reference.
///
/// Wall textures share one size so a column's texture coordinate can be
/// computed before its texture is chosen.
#[derive(Debug, Clone)]
pub struct TextureSet {
    walls: Vec<Texture>,
    sprites: Vec<Texture>,
    floor: Option<Texture>,
}

impl TextureSet {
    pub fn new(walls: Vec<Texture>, sprites: Vec<Texture>, floor: Option<Texture>) -> Result<Self> {
        let first = walls.first().ok_or(RenderError::NoWallTextures)?;
        let expected = (first.width, first.height);
        if expected.0 == 0 || expected.1 == 0 {
            return Err(RenderError::TextureSize {
                expected: 1,
                found: 0,
            });
        }
        for (index, tex) in walls.iter().enumerate() {
            let found = (tex.width, tex.height);
            if found != expected {
                return Err(RenderError::WallTextureSize {
                    index,
                    expected,
                    found,
                });
            }
        }
        let empty = sprites.iter().chain(floor.as_ref()).any(|t| t.pixels.is_empty());
        if empty {
            return Err(RenderError::TextureSize {
                expected: 1,
                found: 0,
            });
        }
        Ok(Self {
            walls,
            sprites,
            floor,
        })
    }

    /// Width and height shared by every wall texture.
    pub fn wall_size(&self) -> (usize, usize) {
        let first = &self.walls[0];
        (first.width, first.height)
    }

    pub fn wall(&self, id: usize) -> Option<&Texture> {
        self.walls.get(id)
    }

    pub fn sprite(&self, id: usize) -> Option<&Texture> {
        self.sprites.get(id)
    }

    pub fn floor(&self) -> Option<&Texture> {
        self.floor.as_ref()
    }

    pub fn resolve(&self, tex: TextureRef) -> Option<&Texture> {
        match tex {
            TextureRef::Wall(id) => self.wall(id),
            TextureRef::Sprite(id) => self.sprite(id),
        }
    }
}
