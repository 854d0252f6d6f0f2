//! Tile-grid raycaster core.
//!
//! A [`Camera`] casts one frame at a time against a [`Map`] of stacked grid
//! bands: every screen column is walked through each band with a DDA, the
//! ground band also fills a floor buffer, and billboard sprites are projected
//! and clipped against the ground band's depth buffer. The output is a list
//! of [`Level`]s (per-column textured stripes) plus the [`FloorBuffer`];
//! putting those on screen is left to the caller.

mod camera;
mod color;
mod config;
mod error;
mod floor;
mod gate;
mod level;
mod lighting;
mod map;
mod movement;
mod scheduler;
mod sprite;
mod texture;
mod wall;

pub use camera::Camera;
pub use color::{ALPHA, Rgb, alpha, pack_rgb};
pub use config::CameraConfig;
pub use error::{RenderError, Result};
pub use gate::{AdmissionGate, Permit};
pub use level::{Column, FloorBuffer, Level, ScreenSpan, TexSlice};
pub use lighting::LightModel;
pub use map::{Grid, Map, Sprite, SpriteScale};
pub use scheduler::Scheduler;
pub use sprite::SpriteRecord;
pub use texture::{Texture, TextureRef, TextureSet};
