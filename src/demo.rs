use glam::DVec2;
use tilecaster::{Grid, Map, Result, Sprite, SpriteScale, Texture, TextureSet, pack_rgb};

const TEX: usize = 64;
const SIZE: usize = 24;

/// Wall palette, indexed by texture id. Ids 1..=4 are the house faces.
const WALL_COLORS: [(u8, u8, u8); 6] = [
    (150, 150, 150),
    (170, 90, 60),
    (190, 170, 120),
    (110, 80, 60),
    (160, 120, 90),
    (70, 110, 160),
];

fn brick(base: (u8, u8, u8)) -> Texture {
    let (r, g, b) = base;
    let mortar = pack_rgb(r / 3, g / 3, b / 3);
    Texture::from_fn(TEX, TEX, |x, y| {
        let row = y / 8;
        let offset = if row % 2 == 0 { 0 } else { 8 };
        if y % 8 == 0 || (x + offset) % 16 == 0 {
            mortar
        } else {
            // cheap per-brick variation
            let v = ((x + offset) / 16 * 7 + row * 13) % 5 * 6;
            pack_rgb(r.saturating_sub(v as u8), g.saturating_sub(v as u8), b)
        }
    })
}

fn floor_tiles() -> Texture {
    Texture::from_fn(TEX, TEX, |x, y| {
        if x % 32 == 0 || y % 32 == 0 {
            pack_rgb(40, 40, 40)
        } else if (x / 32 + y / 32) % 2 == 0 {
            pack_rgb(120, 110, 100)
        } else {
            pack_rgb(95, 90, 85)
        }
    })
}

/// Round shape on a transparent background.
fn blob(color: (u8, u8, u8), radius: f64) -> Texture {
    let c = TEX as f64 / 2.0;
    Texture::from_fn(TEX, TEX, |x, y| {
        let d = DVec2::new(x as f64 + 0.5 - c, y as f64 + 0.5 - c).length();
        if d > radius {
            return 0;
        }
        let lit = 1.0 - 0.5 * d / radius;
        let scale = |v: u8| (v as f64 * lit) as u8;
        pack_rgb(scale(color.0), scale(color.1), scale(color.2))
    })
}

/// Tall post standing on the floor.
fn pillar() -> Texture {
    Texture::from_fn(TEX, TEX, |x, _| {
        if (24..40).contains(&x) {
            let shade = 140 + (x as u8 - 24) * 4;
            pack_rgb(shade, shade, shade)
        } else {
            0
        }
    })
}

pub fn textures() -> Result<TextureSet> {
    let walls = WALL_COLORS.iter().copied().map(brick).collect();
    let sprites = vec![blob((220, 180, 60), 14.0), pillar(), blob((80, 200, 90), 26.0)];
    TextureSet::new(walls, sprites, Some(floor_tiles()))
}

fn rect(grid: &mut Grid, x0: usize, y0: usize, x1: usize, y1: usize, code: i32) {
    for x in x0..=x1 {
        for y in y0..=y1 {
            grid.set(x, y, code);
        }
    }
}

pub fn map() -> Result<Map> {
    let mut base = Grid::from_fn(SIZE, SIZE, |x, y| {
        if x == 0 || y == 0 || x == SIZE - 1 || y == SIZE - 1 {
            1
        } else {
            0
        }
    });
    let mut mid = Grid::empty(SIZE, SIZE);
    let mut upper = Grid::empty(SIZE, SIZE);

    // two-story house
    rect(&mut base, 6, 14, 9, 18, 2);
    rect(&mut base, 7, 15, 8, 17, 0);
    base.set(9, 16, 0);
    rect(&mut mid, 6, 14, 9, 18, 3);

    // tower
    rect(&mut base, 15, 4, 16, 5, 6);
    rect(&mut mid, 15, 4, 16, 5, 6);
    rect(&mut upper, 15, 4, 16, 5, 5);

    // low wall segments
    rect(&mut base, 12, 10, 12, 13, 1);
    rect(&mut base, 4, 6, 7, 6, 4);

    let mut sprites = vec![
        Sprite::new(DVec2::new(20.5, 11.5), 1),
        Sprite::new(DVec2::new(18.5, 4.5), 1),
        Sprite::new(DVec2::new(10.5, 8.5), 2),
        Sprite::new(DVec2::new(3.5, 20.5), 2),
    ];
    for (i, x) in [14.5, 16.5, 18.5].into_iter().enumerate() {
        sprites.push(Sprite {
            pos: DVec2::new(x, 16.5 + i as f64 * 0.5),
            texture: 0,
            scale: SpriteScale {
                u_div: 2.0,
                v_div: 2.0,
                v_move: 64.0,
            },
        });
    }

    Map::new(base, mid, upper, sprites)
}
