use crate::camera::View;
use crate::texture::Texture;
use crate::wall::FloorSeed;

/// Fills the floor below the base-level wall of one screen column.
///
/// `column` is that column's slice of the floor buffer, one pixel per screen row.
/// Rows are interpolated between the viewer (distance 0) and the floor point
/// under the wall (`seed.distance`).
pub(crate) fn cast_floor_column(view: &View, seed: &FloorSeed, texture: &Texture, column: &mut [u32]) {
    // a negative end means the wall covers the whole column
    let draw_end = if seed.draw_end < 0 {
        view.height as i32
    } else {
        seed.draw_end
    };
    let first_row = draw_end.saturating_add(1).max(0) as usize;

    let tex_w = texture.width() as i64;
    let tex_h = texture.height() as i64;

    for y in first_row..view.height {
        let row_dist = view.cam_y[y];
        let weight = row_dist / seed.distance;
        let point = seed.wall_floor * weight + view.pos * (1.0 - weight);

        let tex_x = ((point.x * tex_w as f64) as i64).rem_euclid(tex_w) as usize;
        let tex_y = ((point.y * tex_h as f64) as i64).rem_euclid(tex_h) as usize;

        let shade = view.light.light(row_dist);
        column[y] = shade.modulate(texture.pixel(tex_x, tex_y));
    }
}
