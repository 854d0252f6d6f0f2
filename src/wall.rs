use glam::{DVec2, IVec2};

use crate::camera::View;
use crate::color::Rgb;
use crate::level::{Column, Level, ScreenSpan, TexSlice};
use crate::map::Grid;
use crate::texture::TextureRef;

/// Tint removed from faces hit on the Y-stepped side, so corners read.
const SIDE_DARKEN: u8 = 12;

/// Which grid axis the DDA stepped across on its last move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    X,
    Y,
}

/// Result of casting one column against one grid band.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WallHit {
    /// Last cell the DDA stepped into; one step outside the grid on a boundary hit.
    pub cell: IVec2,
    pub side: Side,
    /// Ray left the grid without hitting anything; the grid edge acts as the wall.
    pub boundary: bool,
    pub ray_dir: DVec2,
    pub perp_dist: f64,
    /// Fractional position of the hit along the wall face.
    pub wall_x: f64,
    pub draw_start: i32,
    pub draw_end: i32,
    pub texture: usize,
    pub tex_x: usize,
    pub tint: Rgb,
}

/// What the floor caster needs to know about a base-level column.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FloorSeed {
    /// World floor point directly below the wall hit.
    pub wall_floor: DVec2,
    pub distance: f64,
    pub draw_end: i32,
}

impl FloorSeed {
    fn from_hit(hit: &WallHit) -> Self {
        let cell = hit.cell.as_dvec2();
        let wall_floor = match hit.side {
            Side::X if hit.ray_dir.x > 0.0 => DVec2::new(cell.x, cell.y + hit.wall_x),
            Side::X => DVec2::new(cell.x + 1.0, cell.y + hit.wall_x),
            Side::Y if hit.ray_dir.y > 0.0 => DVec2::new(cell.x + hit.wall_x, cell.y),
            Side::Y => DVec2::new(cell.x + hit.wall_x, cell.y + 1.0),
        };
        Self {
            wall_floor,
            distance: hit.perp_dist,
            draw_end: hit.draw_end,
        }
    }
}

/// Texture faces of the house tiles are not symmetrical; swap them on X-side hits.
#[inline]
fn remap_texture(texture: usize, side: Side) -> usize {
    match (side, texture) {
        (Side::X, 1) | (Side::X, 3) => 4,
        (Side::X, 2) | (Side::X, 4) => 3,
        _ => texture,
    }
}

/// DDA walk of column `x` through `grid`.
///
/// See <http://lodev.org/cgtutor/raycasting.html> for the derivation.
pub(crate) fn cast_ray(view: &View, grid: &Grid, x: usize, level: usize) -> WallHit {
    let ray_dir = view.dir + view.plane * view.cam_x[x];
    let origin = view.pos;

    let mut cell = origin.floor().as_ivec2();

    // length of ray from one x or y-side to the next
    let delta = DVec2::new(ray_dir.x.recip().abs(), ray_dir.y.recip().abs());

    let step = IVec2::new(
        if ray_dir.x < 0.0 { -1 } else { 1 },
        if ray_dir.y < 0.0 { -1 } else { 1 },
    );
    // an axis the ray runs parallel to is never crossed
    let first_side = |dir: f64, origin: f64, cell: i32, delta: f64| {
        if dir == 0.0 {
            f64::INFINITY
        } else if dir < 0.0 {
            (origin - cell as f64) * delta
        } else {
            (cell as f64 + 1.0 - origin) * delta
        }
    };
    let mut side_dist = DVec2::new(
        first_side(ray_dir.x, origin.x, cell.x, delta.x),
        first_side(ray_dir.y, origin.y, cell.y, delta.y),
    );

    let (side, boundary) = loop {
        let side = if side_dist.x < side_dist.y {
            side_dist.x += delta.x;
            cell.x += step.x;
            Side::X
        } else {
            side_dist.y += delta.y;
            cell.y += step.y;
            Side::Y
        };

        match grid.get(cell.x, cell.y) {
            Some(code) if code > 0 => break (side, false),
            Some(_) => {}
            None => break (side, true),
        }
    };

    // distance along the view axis, the true ray length would give a fisheye
    let perp_dist = match side {
        Side::X => (cell.x as f64 - origin.x + (1 - step.x) as f64 / 2.0) / ray_dir.x,
        Side::Y => (cell.y as f64 - origin.y + (1 - step.y) as f64 / 2.0) / ray_dir.y,
    };

    let h = view.height as i32;
    let line_height = (view.height as f64 / perp_dist) as i32;
    // each level stacks one full wall height above the previous one
    let draw_start = (h / 2 - line_height / 2).saturating_sub(line_height.saturating_mul(level as i32));
    let draw_end = draw_start.saturating_add(line_height);

    // the edge face takes its texture from the nearest cell inside the grid
    let lookup = cell.clamp(IVec2::ZERO, grid.last_cell());
    let code = grid.get(lookup.x, lookup.y).unwrap_or(0);
    let texture = remap_texture((code - 1).max(0) as usize, side);

    let mut wall_x = match side {
        Side::X => origin.y + perp_dist * ray_dir.y,
        Side::Y => origin.x + perp_dist * ray_dir.x,
    };
    wall_x -= wall_x.floor();

    let (tex_width, _) = view.textures.wall_size();
    let mut tex_x = ((wall_x * tex_width as f64) as usize).min(tex_width - 1);
    if (side == Side::X && ray_dir.x > 0.0) || (side == Side::Y && ray_dir.y < 0.0) {
        tex_x = tex_width - tex_x - 1;
    }

    let base = match side {
        Side::X => Rgb::WHITE,
        Side::Y => Rgb::WHITE.darken(SIDE_DARKEN),
    };
    let tint = view.light.shade(base, perp_dist);

    WallHit {
        cell,
        side,
        boundary,
        ray_dir,
        perp_dist,
        wall_x,
        draw_start,
        draw_end,
        texture,
        tex_x,
        tint,
    }
}

fn write_column(view: &View, target: &mut Level, x: usize, hit: &WallHit) {
    let (_, tex_height) = view.textures.wall_size();
    target.set(
        x,
        Column {
            slice: TexSlice {
                x: hit.tex_x,
                y0: 0,
                y1: tex_height as i32,
            },
            view: ScreenSpan {
                y0: hit.draw_start,
                y1: hit.draw_end,
            },
            tint: hit.tint,
            texture: Some(TextureRef::Wall(hit.texture)),
        },
    );
}

/// Casts every column of a stacked level (`level >= 1`).
pub(crate) fn cast_level(view: &View, target: &mut Level, level: usize) {
    let grid = view.map.grid_for_level(level);
    for x in 0..view.width {
        let hit = cast_ray(view, grid, x, level);
        write_column(view, target, x, &hit);
    }
}

/// Casts the base level, filling the depth buffer and the per-column floor seeds.
///
/// Returns how many columns ran off the grid without hitting a wall.
pub(crate) fn cast_base_level(
    view: &View,
    target: &mut Level,
    depth: &mut [f64],
    seeds: &mut [FloorSeed],
) -> usize {
    let grid = view.map.base();
    let mut boundary_hits = 0;
    for x in 0..view.width {
        let hit = cast_ray(view, grid, x, 0);
        write_column(view, target, x, &hit);
        depth[x] = hit.perp_dist;
        seeds[x] = FloorSeed::from_hit(&hit);
        boundary_hits += hit.boundary as usize;
    }
    boundary_hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::tests::{ViewFixture, block_map};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn centre_column_hits_block_at_half_a_cell() {
        let fixture = ViewFixture::new(block_map(&[(5, 5)]), 320, 240);
        let view = fixture.view(DVec2::new(4.5, 5.5), DVec2::X, DVec2::new(0.0, 0.66));
        let hit = cast_ray(&view, fixture.map.base(), 160, 0);
        assert_eq!(hit.cell, IVec2::new(5, 5));
        assert_eq!(hit.side, Side::X);
        assert!(!hit.boundary);
        assert!(close(hit.perp_dist, 0.5), "perp {}", hit.perp_dist);
    }

    #[test]
    fn perpendicular_distance_matches_integer_offset() {
        let fixture = ViewFixture::new(block_map(&[(9, 3)]), 320, 240);
        let view = fixture.view(DVec2::new(5.0, 3.5), DVec2::X, DVec2::new(0.0, 0.66));
        let hit = cast_ray(&view, fixture.map.base(), 160, 0);
        assert!(close(hit.perp_dist, 4.0));
        assert_eq!(hit.line_span(), (240 / 4) as i32);
        assert_eq!(hit.draw_start, 120 - 30);
    }

    #[test]
    fn upper_levels_stack_one_wall_height_higher() {
        let fixture = ViewFixture::new(block_map(&[(6, 3)]), 320, 240);
        let view = fixture.view(DVec2::new(4.5, 3.5), DVec2::X, DVec2::new(0.0, 0.66));
        let grid = fixture.map.base();
        let ground = cast_ray(&view, grid, 160, 0);
        let second = cast_ray(&view, grid, 160, 2);
        let height = ground.line_span();
        assert_eq!(second.draw_start, ground.draw_start - 2 * height);
        assert_eq!(second.draw_end - second.draw_start, height);
    }

    fn open_grid(size: usize) -> crate::map::Map {
        crate::map::Map::flat(Grid::empty(size, size), Vec::new())
    }

    #[test]
    fn rays_leaving_an_open_grid_stop_at_the_edge() {
        let fixture = ViewFixture::new(open_grid(8), 64, 48);
        let view = fixture.view(DVec2::new(4.5, 4.5), DVec2::NEG_X, DVec2::new(0.0, 0.66));
        let hit = cast_ray(&view, fixture.map.base(), 32, 0);
        assert!(hit.boundary);
        assert_eq!(hit.cell, IVec2::new(-1, 4));
        assert!(close(hit.perp_dist, 4.5));
        assert_eq!(hit.texture, 0);
    }

    #[test]
    fn edge_cell_camera_sees_the_border_in_front() {
        let fixture = ViewFixture::new(open_grid(8), 64, 48);
        let views = [
            fixture.view(DVec2::new(4.5, 7.5), DVec2::Y, DVec2::new(-0.66, 0.0)),
            fixture.view(DVec2::new(0.5, 4.5), DVec2::NEG_X, DVec2::new(0.0, 0.66)),
        ];
        for view in &views {
            let hit = cast_ray(view, fixture.map.base(), 32, 0);
            assert!(hit.boundary);
            assert!(close(hit.perp_dist, 0.5), "perp {}", hit.perp_dist);
            assert!(hit.draw_start < hit.draw_end);
            assert_eq!(hit.line_span(), 96);
            assert_eq!(hit.tint, Rgb::WHITE);
        }

        // the floor seed lands on the border line, not behind the camera
        let hit = cast_ray(&views[0], fixture.map.base(), 32, 0);
        let seed = FloorSeed::from_hit(&hit);
        assert!(close(seed.wall_floor.y, 8.0));
        assert!(close(seed.distance, 0.5));
    }

    /// Texture column of the centre ray for a camera at `pos` looking along `dir`.
    fn centre_tex_x(blocks: &[(usize, usize)], pos: DVec2, dir: DVec2) -> (Side, usize) {
        let fixture = ViewFixture::new(block_map(blocks), 320, 240);
        let view = fixture.view(pos, dir, dir.perp() * 0.66);
        let hit = cast_ray(&view, fixture.map.base(), 160, 0);
        (hit.side, hit.tex_x)
    }

    #[test]
    fn texture_column_mirrors_by_side_and_direction() {
        // every hit lands a quarter of the way along the face: column 16 of 64
        assert_eq!(centre_tex_x(&[(7, 5)], DVec2::new(4.5, 5.25), DVec2::X), (Side::X, 47));
        assert_eq!(centre_tex_x(&[(5, 5)], DVec2::new(8.5, 5.25), DVec2::NEG_X), (Side::X, 16));
        assert_eq!(centre_tex_x(&[(5, 7)], DVec2::new(5.25, 4.5), DVec2::Y), (Side::Y, 16));
        assert_eq!(centre_tex_x(&[(5, 5)], DVec2::new(5.25, 8.5), DVec2::NEG_Y), (Side::Y, 47));
    }

    #[test]
    fn level_column_carries_the_texture_column() {
        let fixture = ViewFixture::new(block_map(&[(7, 5)]), 320, 240);
        let view = fixture.view(DVec2::new(4.5, 5.25), DVec2::X, DVec2::new(0.0, 0.66));
        let mut level = Level::new(320);
        cast_level(&view, &mut level, 0);
        let column = level.column(160).unwrap();
        assert_eq!(column.slice, TexSlice { x: 47, y0: 0, y1: 64 });
        assert_eq!(column.texture, Some(TextureRef::Wall(0)));
    }

    #[test]
    fn y_side_hits_are_darker() {
        let fixture = ViewFixture::new(block_map(&[(4, 14)]), 320, 240);
        let view = fixture.view(DVec2::new(4.5, 5.0), DVec2::Y, DVec2::new(-0.66, 0.0));
        let hit = cast_ray(&view, fixture.map.base(), 160, 0);
        assert_eq!(hit.side, Side::Y);
        assert!(close(hit.perp_dist, 9.0));
        assert_eq!(hit.tint, Rgb::new(243, 243, 243));
    }

    #[test]
    fn house_faces_swap_only_on_x_side() {
        assert_eq!(remap_texture(1, Side::X), 4);
        assert_eq!(remap_texture(2, Side::X), 3);
        assert_eq!(remap_texture(3, Side::X), 4);
        assert_eq!(remap_texture(4, Side::X), 3);
        assert_eq!(remap_texture(5, Side::X), 5);
        assert_eq!(remap_texture(3, Side::Y), 3);
    }

    #[test]
    fn floor_seed_sits_on_the_near_face() {
        let fixture = ViewFixture::new(block_map(&[(7, 2)]), 320, 240);
        let view = fixture.view(DVec2::new(4.5, 2.25), DVec2::X, DVec2::new(0.0, 0.66));
        let hit = cast_ray(&view, fixture.map.base(), 160, 0);
        let seed = FloorSeed::from_hit(&hit);
        assert!(close(seed.wall_floor.x, 7.0));
        assert!(close(seed.wall_floor.y, 2.25));
        assert!(close(seed.distance, 2.5));
    }

    impl WallHit {
        fn line_span(&self) -> i32 {
            self.draw_end - self.draw_start
        }
    }
}
