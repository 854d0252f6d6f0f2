use glam::DVec2;

use crate::camera::Camera;

impl Camera {
    /// Scales a per-tick speed from the reference rate to the configured tick rate.
    fn normal_speed(&self, speed: f64) -> f64 {
        speed * self.config.reference_tps / self.config.target_tps as f64
    }

    /// Moves along the facing direction; negative speeds walk backwards.
    pub fn move_forward(&mut self, speed: f64) {
        let step = self.dir * self.normal_speed(speed);
        self.slide(step);
    }

    /// Moves along the camera plane; positive speeds go towards the plane vector.
    pub fn strafe(&mut self, speed: f64) {
        let step = self.plane * self.normal_speed(speed);
        self.slide(step);
    }

    /// Turns direction and plane together, keeping the field of view.
    pub fn rotate(&mut self, angle: f64) {
        let (sin, cos) = self.normal_speed(angle).sin_cos();
        let turn = |v: DVec2| DVec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos);
        self.dir = turn(self.dir);
        self.plane = turn(self.plane);
    }

    // each axis is probed on its own so the camera slides along walls
    fn slide(&mut self, step: DVec2) {
        let lookahead = self.config.collision_lookahead;
        let grid = self.map.base();

        if grid.is_open(DVec2::new(self.pos.x + step.x * lookahead, self.pos.y)) {
            self.pos.x += step.x;
        }
        if grid.is_open(DVec2::new(self.pos.x, self.pos.y + step.y * lookahead)) {
            self.pos.y += step.y;
        }
    }
}
