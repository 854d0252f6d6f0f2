use glam::DVec2;

use crate::camera::View;
use crate::level::{Column, Level, ScreenSpan, TexSlice};
use crate::map::Sprite;
use crate::texture::{Texture, TextureRef};

/// Per-frame render state of one sorted sprite slot.
///
/// Records live in an arena that is reset every frame; a record becomes
/// active on the first screen column that accepts its sprite. An inactive
/// record always holds an empty level.
#[derive(Debug, Clone, Default)]
pub struct SpriteRecord {
    level: Level,
    sprite: Option<usize>,
}

impl SpriteRecord {
    pub(crate) fn new(width: usize) -> Self {
        Self {
            level: Level::new(width),
            sprite: None,
        }
    }

    /// Index of the sprite drawn this frame, `None` if it is hidden or off-screen.
    pub fn sprite(&self) -> Option<usize> {
        self.sprite
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub(crate) fn reset(&mut self) {
        if self.sprite.take().is_some() {
            self.level.clear();
        }
    }

    fn activate(&mut self, sprite: usize) -> &mut Level {
        if self.sprite.is_none() {
            self.sprite = Some(sprite);
        }
        &mut self.level
    }
}

/// Squared distance of every sprite to `pos`, with `order` reset to identity.
pub(crate) fn measure(sprites: &[Sprite], pos: DVec2, order: &mut [usize], distance: &mut [f64]) {
    for (i, sprite) in sprites.iter().enumerate() {
        order[i] = i;
        distance[i] = pos.distance_squared(sprite.pos);
    }
}

/// Comb sort of `(order, distance)` pairs, farthest first.
pub(crate) fn comb_sort(order: &mut [usize], distance: &mut [f64]) {
    let amount = order.len().min(distance.len());
    let mut gap = amount;
    let mut swapped = false;
    while gap > 1 || swapped {
        // shrink factor 1.3
        gap = (gap * 10) / 13;
        if gap == 9 || gap == 10 {
            gap = 11;
        }
        gap = gap.max(1);

        swapped = false;
        for i in 0..amount.saturating_sub(gap) {
            let j = i + gap;
            if distance[i] < distance[j] {
                distance.swap(i, j);
                order.swap(i, j);
                swapped = true;
            }
        }
    }
}

/// Projects one billboard and writes the columns where it sits in front of the walls.
pub(crate) fn cast_sprite(
    view: &View,
    index: usize,
    sprite: &Sprite,
    texture: &Texture,
    depth: &[f64],
    record: &mut SpriteRecord,
) {
    let rel = sprite.pos - view.pos;

    // inverse of the camera matrix [plane dir]
    let inv_det = 1.0 / (view.plane.x * view.dir.y - view.dir.x * view.plane.y);
    let transform_x = inv_det * (view.dir.y * rel.x - view.dir.x * rel.y);
    // depth inside the screen
    let transform_y = inv_det * (-view.plane.y * rel.x + view.plane.x * rel.y);

    if transform_y <= 0.0 {
        return;
    }

    let w = view.width as i32;
    let h = view.height as i32;
    let scale = &sprite.scale;

    let screen_x = (w as f64 / 2.0 * (1.0 + transform_x / transform_y)) as i32;
    let v_move_screen = (scale.v_move / transform_y) as i32;

    // transform_y is already the perpendicular depth, no fisheye correction needed
    let sprite_height = ((h as f64 / transform_y).abs() / scale.v_div) as i32;
    let sprite_width = ((h as f64 / transform_y).abs() / scale.u_div) as i32;
    if sprite_height <= 0 || sprite_width <= 0 {
        return;
    }

    let draw_start_y = (h / 2 - sprite_height / 2).saturating_add(v_move_screen).max(0);
    let draw_end_y = (sprite_height / 2 + h / 2).saturating_add(v_move_screen).min(h - 1);

    let left = screen_x.saturating_sub(sprite_width / 2);
    let draw_start_x = left.max(0);
    let draw_end_x = screen_x.saturating_add(sprite_width / 2).min(w - 1);

    let tex_w = texture.width() as i64;
    let tex_h = texture.height() as i64;
    let sprite_height = sprite_height as i64;

    // vertical texture range is the same for every column; 256 and 128 keep it in integers
    let tex_row = |screen_y: i32| {
        let d = (screen_y as i64 - v_move_screen as i64) * 256 - h as i64 * 128 + sprite_height * 128;
        ((d * tex_h) / sprite_height) / 256
    };
    let tex_start_y = tex_row(draw_start_y);
    let tex_end_y = tex_row(draw_end_y - 1);
    let rows_valid = tex_start_y >= 0 && tex_start_y < tex_end_y && tex_end_y < tex_h;

    let tint = view.light.light(transform_y);

    for stripe in draw_start_x..draw_end_x {
        let x = stripe as usize;
        if transform_y >= depth[x] {
            continue;
        }

        let level = record.activate(index);

        let tex_x = (256 * (stripe - left) as i64 * tex_w / sprite_width as i64) / 256;
        if tex_x < 0 || tex_x >= tex_w || !rows_valid {
            continue;
        }

        level.set(
            x,
            Column {
                slice: TexSlice {
                    x: tex_x as usize,
                    y0: tex_start_y as i32 + 1,
                    y1: tex_end_y as i32,
                },
                view: ScreenSpan {
                    y0: draw_start_y + 1,
                    y1: draw_end_y,
                },
                tint,
                texture: Some(TextureRef::Sprite(sprite.texture)),
            },
        );
    }
}
