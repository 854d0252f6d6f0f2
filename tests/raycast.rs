use std::sync::Arc;

use glam::DVec2;
use tilecaster::{
    Camera, CameraConfig, Grid, Map, Sprite, Texture, TextureRef, TextureSet, alpha, pack_rgb,
};

fn textures() -> Arc<TextureSet> {
    let walls = (0..5)
        .map(|i| Texture::solid(64, 64, 50 * i as u8, 80, 120))
        .collect();
    let sprites = vec![
        Texture::solid(64, 64, 255, 255, 0),
        Texture::solid(32, 32, 0, 255, 255),
    ];
    let floor = Texture::from_fn(8, 8, |x, y| {
        if (x / 4 + y / 4) % 2 == 0 {
            pack_rgb(120, 120, 120)
        } else {
            pack_rgb(60, 60, 60)
        }
    });
    Arc::new(TextureSet::new(walls, sprites, Some(floor)).unwrap())
}

fn grid_with(blocks: &[(usize, usize)]) -> Grid {
    let mut grid = Grid::empty(24, 24);
    for &(x, y) in blocks {
        grid.set(x, y, 1);
    }
    grid
}

fn config(pos: DVec2, plane: DVec2) -> CameraConfig {
    CameraConfig {
        position: pos,
        direction: DVec2::X,
        plane,
        worker_threads: Some(4),
        ..CameraConfig::default()
    }
}

fn camera(map: Map, pos: DVec2, plane: DVec2) -> Camera {
    Camera::new(config(pos, plane), 320, 240, Arc::new(map), textures()).unwrap()
}

#[test]
fn block_straight_ahead_sits_half_a_cell_away() {
    let map = Map::flat(grid_with(&[(5, 5)]), Vec::new());
    let camera = camera(map, DVec2::new(4.5, 5.5), DVec2::new(0.0, 0.66));

    assert!((camera.depth_buffer()[160] - 0.5).abs() < 1e-9);
    let centre = camera.levels()[0].column(160).unwrap();
    assert_eq!(centre.texture, Some(TextureRef::Wall(0)));
    assert_eq!(centre.view.y1 - centre.view.y0, 480);
}

#[test]
fn wall_hides_sprite_until_it_is_removed() {
    let sprites = vec![Sprite::new(DVec2::new(6.5, 5.5), 0)];
    let pos = DVec2::new(2.5, 5.5);
    let plane = DVec2::new(0.0, 0.5);

    let walled = camera(
        Map::flat(grid_with(&[(4, 5)]), sprites.clone()),
        pos,
        plane,
    );
    assert!(walled.depth_buffer()[160] < 4.0);
    assert_eq!(walled.visible_sprites().count(), 0);

    let open = camera(Map::flat(grid_with(&[]), sprites), pos, plane);
    let records: Vec<_> = open.visible_sprites().collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].sprite(), Some(0));
    let centre = records[0].level().column(160).unwrap();
    assert_eq!(centre.texture, Some(TextureRef::Sprite(0)));
    assert_eq!(records[0].level().drawn_columns(), 60);
}

#[test]
fn sprites_are_listed_far_to_near() {
    let sprites = vec![
        Sprite::new(DVec2::new(6.5, 5.5), 0),
        Sprite::new(DVec2::new(14.5, 5.5), 1),
        Sprite::new(DVec2::new(9.5, 5.0), 0),
        Sprite::new(DVec2::new(1.5, 5.5), 1),
    ];
    let camera = camera(
        Map::flat(grid_with(&[]), sprites),
        DVec2::new(3.5, 5.5),
        DVec2::new(0.0, 0.66),
    );

    assert_eq!(camera.sprite_order(), &[1, 2, 0, 3]);
    let distances = camera.sprite_distances();
    for pair in distances.windows(2) {
        assert!(pair[0] >= pair[1]);
    }

    // the sprite behind the camera is culled, the rest stay in sorted order
    let drawn: Vec<_> = camera.visible_sprites().filter_map(|r| r.sprite()).collect();
    assert_eq!(drawn, vec![1, 2, 0]);
    assert_eq!(camera.layers().count(), 3 + 3);
}

#[test]
fn floor_is_written_below_the_walls_only() {
    let map = Map::flat(grid_with(&[(10, 5)]), Vec::new());
    let camera = camera(map, DVec2::new(4.5, 5.5), DVec2::new(0.0, 0.66));
    let floor = camera.floor();
    let wall = camera.levels()[0].column(160).unwrap();

    for y in 0..=wall.view.y1 as usize {
        assert_eq!(alpha(floor.get(160, y)), 0, "row {y} above the floor");
    }
    for y in wall.view.y1 as usize + 1..240 {
        assert_eq!(alpha(floor.get(160, y)), 0xFF, "row {y} missing floor");
    }
}

#[test]
fn mid_band_stacks_above_the_ground() {
    let base = grid_with(&[(8, 5)]);
    let mid = grid_with(&[(8, 5)]);
    let map = Map::new(base, mid, Grid::empty(24, 24), Vec::new()).unwrap();
    let camera = camera(map, DVec2::new(4.5, 5.5), DVec2::new(0.0, 0.66));

    let ground = camera.levels()[0].column(160).unwrap().view;
    let first = camera.levels()[1].column(160).unwrap().view;
    assert_eq!(first.y1, ground.y0);
    assert_eq!(first.y1 - first.y0, ground.y1 - ground.y0);
}

#[test]
fn a_single_permit_produces_the_same_frame() {
    let sprites = vec![
        Sprite::new(DVec2::new(9.5, 6.5), 0),
        Sprite::new(DVec2::new(12.5, 4.5), 1),
    ];
    let map = Arc::new(Map::flat(grid_with(&[(15, 3), (15, 4), (16, 8)]), sprites));
    let pos = DVec2::new(4.5, 5.5);
    let plane = DVec2::new(0.0, 0.66);

    let wide = Camera::new(config(pos, plane), 200, 150, map.clone(), textures()).unwrap();
    let narrow = Camera::new(
        CameraConfig {
            gate_capacity: 1,
            worker_threads: Some(1),
            ..config(pos, plane)
        },
        200,
        150,
        map,
        textures(),
    )
    .unwrap();

    assert_eq!(narrow.scheduler().gate().available(), 1);
    assert_eq!(wide.depth_buffer(), narrow.depth_buffer());
    for (a, b) in wide.layers().zip(narrow.layers()) {
        assert_eq!(a.columns(), b.columns());
    }
    for x in 0..200 {
        for y in 0..150 {
            assert_eq!(wide.floor().get(x, y), narrow.floor().get(x, y));
        }
    }
}

#[test]
fn moving_between_frames_changes_the_view() {
    let map = Map::flat(grid_with(&[(10, 5)]), Vec::new());
    let mut camera = camera(map, DVec2::new(4.5, 5.5), DVec2::new(0.0, 0.66));
    let before = camera.depth_buffer()[160];

    camera.move_forward(0.06);
    camera.raycast();
    let after = camera.depth_buffer()[160];
    assert!((before - after - 0.06).abs() < 1e-9);
}

#[test]
fn camera_on_the_border_row_sees_the_edge_ahead() {
    let map = Map::flat(grid_with(&[]), Vec::new());
    let camera = Camera::new(
        CameraConfig {
            position: DVec2::new(4.5, 23.5),
            direction: DVec2::Y,
            plane: DVec2::new(-0.66, 0.0),
            worker_threads: Some(2),
            ..CameraConfig::default()
        },
        320,
        240,
        Arc::new(map),
        textures(),
    )
    .unwrap();

    assert!(camera.depth_buffer().iter().all(|&d| d > 0.0));
    assert!((camera.depth_buffer()[160] - 0.5).abs() < 1e-9);
    for column in camera.levels()[0].columns() {
        assert!(column.view.y0 < column.view.y1);
    }
    // nothing of the floor reaches above the horizon
    for x in 0..320 {
        for y in 0..120 {
            assert_eq!(alpha(camera.floor().get(x, y)), 0);
        }
    }
}
