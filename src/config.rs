use glam::DVec2;

use crate::error::{RenderError, Result};
use crate::lighting::LightModel;

/// Everything a [`Camera`](crate::Camera) is tuned by.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Rate movement calls are actually issued at.
    pub target_tps: u32,
    /// Rate movement speeds are expressed in.
    pub reference_tps: f64,
    /// How far ahead, in multiples of the step, collisions are probed.
    pub collision_lookahead: f64,
    /// Cast tasks allowed to run their body at the same time.
    pub gate_capacity: usize,
    /// Worker threads of the camera's pool, `None` lets rayon decide.
    pub worker_threads: Option<usize>,
    /// Stacked wall levels; level 2 and above reuse the upper grid.
    pub level_count: usize,
    pub light: LightModel,
    pub position: DVec2,
    pub direction: DVec2,
    /// Camera plane; its length against `direction` sets the field of view.
    pub plane: DVec2,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            reference_tps: 60.0,
            collision_lookahead: 12.0,
            gate_capacity: 100,
            worker_threads: None,
            level_count: 3,
            light: LightModel::default(),
            position: DVec2::new(22.5, 11.5),
            direction: DVec2::new(-1.0, 0.0),
            plane: DVec2::new(0.0, 0.66),
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<()> {
        if self.target_tps == 0 {
            return Err(RenderError::InvalidConfig("target_tps must be positive"));
        }
        if !(self.reference_tps > 0.0) {
            return Err(RenderError::InvalidConfig("reference_tps must be positive"));
        }
        if !(self.collision_lookahead > 0.0) {
            return Err(RenderError::InvalidConfig("collision_lookahead must be positive"));
        }
        if self.gate_capacity == 0 {
            return Err(RenderError::InvalidConfig("gate_capacity must be at least 1"));
        }
        if self.worker_threads == Some(0) {
            return Err(RenderError::InvalidConfig("worker_threads must be at least 1"));
        }
        if self.level_count == 0 {
            return Err(RenderError::InvalidConfig("level_count must be at least 1"));
        }
        if self.direction.perp_dot(self.plane).abs() < f64::EPSILON {
            return Err(RenderError::InvalidConfig("plane must not be parallel to direction"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        CameraConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_degenerate_values() {
        let cases = [
            CameraConfig {
                gate_capacity: 0,
                ..CameraConfig::default()
            },
            CameraConfig {
                level_count: 0,
                ..CameraConfig::default()
            },
            CameraConfig {
                target_tps: 0,
                ..CameraConfig::default()
            },
            CameraConfig {
                plane: DVec2::new(-2.0, 0.0),
                ..CameraConfig::default()
            },
        ];
        for config in cases {
            assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));
        }
    }
}
