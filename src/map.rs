use glam::{DVec2, IVec2};

use crate::error::{RenderError, Result};

/// One band of the world: a grid of cell codes, 0 = empty, `n > 0` = wall texture `n - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<i32>, // x + y * width
}

impl Grid {
    pub fn new(width: usize, height: usize, cells: Vec<i32>) -> Result<Self> {
        let expected = width * height;
        if cells.len() != expected {
            return Err(RenderError::GridSize {
                expected,
                found: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> i32) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Cell code at `(x, y)`, `None` outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<i32> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.cells[x as usize + y as usize * self.width])
    }

    pub fn set(&mut self, x: usize, y: usize, value: i32) {
        if x < self.width && y < self.height {
            self.cells[x + y * self.width] = value;
        }
    }

    /// Largest valid cell coordinate, used to clamp rays that leave the grid.
    #[inline]
    pub fn last_cell(&self) -> IVec2 {
        IVec2::new(self.width as i32 - 1, self.height as i32 - 1)
    }

    /// Whether the cell containing world point `p` can be walked into.
    /// Anything outside the grid counts as solid.
    pub fn is_open(&self, p: DVec2) -> bool {
        let cell = p.floor();
        self.get(cell.x as i32, cell.y as i32)
            .is_some_and(|code| code <= 0)
    }
}

/// Vertical scaling of a billboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteScale {
    /// Horizontal shrink divisor.
    pub u_div: f64,
    /// Vertical shrink divisor.
    pub v_div: f64,
    /// World-space vertical offset, positive moves the sprite down.
    pub v_move: f64,
}

impl Default for SpriteScale {
    fn default() -> Self {
        Self {
            u_div: 1.0,
            v_div: 1.0,
            v_move: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub pos: DVec2,
    /// Index into [`TextureSet::sprites`](crate::texture::TextureSet).
    pub texture: usize,
    pub scale: SpriteScale,
}

impl Sprite {
    pub fn new(pos: DVec2, texture: usize) -> Self {
        Self {
            pos,
            texture,
            scale: SpriteScale::default(),
        }
    }
}

/// The world as the casters see it: three stacked grid bands plus the sprites.
#[derive(Debug, Clone)]
pub struct Map {
    base: Grid,
    mid: Grid,
    upper: Grid,
    sprites: Vec<Sprite>,
}

impl Map {
    pub fn new(base: Grid, mid: Grid, upper: Grid, sprites: Vec<Sprite>) -> Result<Self> {
        for (layer, grid) in [("mid", &mid), ("upper", &upper)] {
            if grid.size() != base.size() {
                return Err(RenderError::GridMismatch {
                    layer,
                    expected: base.size(),
                    found: grid.size(),
                });
            }
        }
        Ok(Self {
            base,
            mid,
            upper,
            sprites,
        })
    }

    /// Single-story map, the upper bands stay empty.
    pub fn flat(base: Grid, sprites: Vec<Sprite>) -> Self {
        let (w, h) = base.size();
        Self {
            base,
            mid: Grid::empty(w, h),
            upper: Grid::empty(w, h),
            sprites,
        }
    }

    pub fn base(&self) -> &Grid {
        &self.base
    }

    /// Grid band rendered at `level`; everything above the mid band keeps reusing the upper one.
    pub fn grid_for_level(&self, level: usize) -> &Grid {
        match level {
            0 => &self.base,
            1 => &self.mid,
            _ => &self.upper,
        }
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }
}
