use std::sync::Arc;

use glam::DVec2;

use crate::config::CameraConfig;
use crate::error::{RenderError, Result};
use crate::level::{FloorBuffer, Level};
use crate::lighting::LightModel;
use crate::map::Map;
use crate::scheduler::{GeometryTargets, Scheduler};
use crate::sprite::{self, SpriteRecord};
use crate::texture::TextureSet;
use crate::wall::FloorSeed;

/// Read-only state every cast task of a frame shares.
pub(crate) struct View<'a> {
    pub pos: DVec2,
    pub dir: DVec2,
    pub plane: DVec2,
    pub width: usize,
    pub height: usize,
    /// Column to camera-space x in `[-1, 1]`.
    pub cam_x: &'a [f64],
    /// Row to floor distance.
    pub cam_y: &'a [f64],
    pub map: &'a Map,
    pub textures: &'a TextureSet,
    pub light: LightModel,
}

/// Raycasting camera: owns the view state and every per-frame buffer.
///
/// A frame is cast by [`Camera::raycast`]. Movement happens between frames
/// through [`Camera::move_forward`], [`Camera::strafe`] and [`Camera::rotate`].
pub struct Camera {
    pub(crate) config: CameraConfig,

    pub(crate) pos: DVec2,
    pub(crate) dir: DVec2,
    pub(crate) plane: DVec2,

    width: usize,
    height: usize,

    pub(crate) map: Arc<Map>,
    textures: Arc<TextureSet>,

    cam_x: Vec<f64>,
    cam_y: Vec<f64>,

    levels: Vec<Level>,
    depth: Vec<f64>,
    seeds: Vec<FloorSeed>,
    floor: FloorBuffer,

    sprite_order: Vec<usize>,
    sprite_distance: Vec<f64>,
    sprite_records: Vec<SpriteRecord>,

    scheduler: Scheduler,
}

fn check_viewport(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyViewport { width, height });
    }
    Ok(())
}

impl Camera {
    /// Builds a camera over `map` and casts the first frame.
    pub fn new(
        config: CameraConfig,
        width: usize,
        height: usize,
        map: Arc<Map>,
        textures: Arc<TextureSet>,
    ) -> Result<Self> {
        config.validate()?;
        check_viewport(width, height)?;
        if map.base().width() == 0 || map.base().height() == 0 {
            return Err(RenderError::GridSize {
                expected: 1,
                found: 0,
            });
        }
        for (sprite, s) in map.sprites().iter().enumerate() {
            if textures.sprite(s.texture).is_none() {
                return Err(RenderError::MissingSpriteTexture {
                    sprite,
                    texture: s.texture,
                });
            }
        }

        log::info!(
            "initializing camera: {}x{} viewport, {} levels, {} sprites",
            width,
            height,
            config.level_count,
            map.sprites().len()
        );

        let scheduler = Scheduler::new(config.gate_capacity, config.worker_threads)?;
        let sprite_count = map.sprites().len();

        let mut camera = Self {
            pos: config.position,
            dir: config.direction,
            plane: config.plane,
            width,
            height,
            map,
            textures,
            cam_x: Vec::new(),
            cam_y: Vec::new(),
            levels: Vec::new(),
            depth: Vec::new(),
            seeds: Vec::new(),
            floor: FloorBuffer::new(width, height),
            sprite_order: vec![0; sprite_count],
            sprite_distance: vec![0.0; sprite_count],
            sprite_records: Vec::new(),
            scheduler,
            config,
        };
        camera.allocate_viewport();
        camera.raycast();
        Ok(camera)
    }

    /// Changes the viewport size, rebuilding the precomputed tables and frame buffers.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        check_viewport(width, height)?;
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        log::debug!(
            "camera viewport {}x{} -> {}x{}",
            self.width,
            self.height,
            width,
            height
        );
        self.width = width;
        self.height = height;
        self.allocate_viewport();
        self.raycast();
        Ok(())
    }

    fn allocate_viewport(&mut self) {
        let (w, h) = (self.width, self.height);

        self.cam_x = (0..w).map(|x| 2.0 * x as f64 / w as f64 - 1.0).collect();
        self.cam_y = (0..h)
            .map(|y| h as f64 / (2.0 * y as f64 - h as f64))
            .collect();

        self.levels = (0..self.config.level_count).map(|_| Level::new(w)).collect();
        self.depth = vec![0.0; w];
        self.seeds = vec![FloorSeed::default(); w];
        self.floor = FloorBuffer::new(w, h);
        self.sprite_records = (0..self.sprite_order.len())
            .map(|_| SpriteRecord::new(w))
            .collect();
    }

    /// Casts one frame: walls and floor, then the sorted sprites.
    ///
    /// The floor buffer is cleared first; every other output is overwritten.
    pub fn raycast(&mut self) {
        self.floor.clear();

        let view = View {
            pos: self.pos,
            dir: self.dir,
            plane: self.plane,
            width: self.width,
            height: self.height,
            cam_x: &self.cam_x,
            cam_y: &self.cam_y,
            map: &self.map,
            textures: &self.textures,
            light: self.config.light,
        };

        let boundary_hits = self.scheduler.cast_geometry(
            &view,
            GeometryTargets {
                levels: &mut self.levels,
                depth: &mut self.depth,
                seeds: &mut self.seeds,
                floor: &mut self.floor,
            },
        );

        sprite::measure(
            self.map.sprites(),
            self.pos,
            &mut self.sprite_order,
            &mut self.sprite_distance,
        );
        sprite::comb_sort(&mut self.sprite_order, &mut self.sprite_distance);

        let visible = self.scheduler.cast_sprites(
            &view,
            &self.sprite_order,
            &self.depth,
            &mut self.sprite_records,
        );

        log::trace!(
            "frame cast: {} edge columns, {}/{} sprites visible",
            boundary_hits,
            visible,
            self.sprite_records.len()
        );
    }

    /// Places the camera. `plane` must not be parallel to `dir`.
    pub fn set_pose(&mut self, pos: DVec2, dir: DVec2, plane: DVec2) -> Result<()> {
        if dir.perp_dot(plane).abs() < f64::EPSILON {
            return Err(RenderError::InvalidConfig(
                "plane must not be parallel to direction",
            ));
        }
        self.pos = pos;
        self.dir = dir;
        self.plane = plane;
        Ok(())
    }

    pub fn position(&self) -> DVec2 {
        self.pos
    }

    pub fn direction(&self) -> DVec2 {
        self.dir
    }

    pub fn plane(&self) -> DVec2 {
        self.plane
    }

    pub fn viewport(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn textures(&self) -> &TextureSet {
        &self.textures
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Stacked wall levels, ground level first.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Sprites drawn this frame, farthest first.
    pub fn visible_sprites(&self) -> impl Iterator<Item = &SpriteRecord> {
        self.sprite_records.iter().filter(|r| r.sprite().is_some())
    }

    /// Every layer in compositing order: wall levels, then sprites far to near.
    pub fn layers(&self) -> impl Iterator<Item = &Level> {
        self.levels
            .iter()
            .chain(self.visible_sprites().map(SpriteRecord::level))
    }

    pub fn floor(&self) -> &FloorBuffer {
        &self.floor
    }

    /// Nearest base-level wall distance per column.
    pub fn depth_buffer(&self) -> &[f64] {
        &self.depth
    }

    /// Sprite indices of the last frame, farthest first.
    pub fn sprite_order(&self) -> &[usize] {
        &self.sprite_order
    }

    /// Squared sprite distances, parallel to [`Camera::sprite_order`].
    pub fn sprite_distances(&self) -> &[f64] {
        &self.sprite_distance
    }
}
