use crate::color::Rgb;

/// Distance based light falloff shared by the wall, floor and sprite casters.
///
/// Works like a torch carried by the viewer: every channel loses
/// `sqrt(distance) * falloff` and gains a flat `sun` term, clamped to a byte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightModel {
    /// Negative; more negative makes the torch dimmer.
    pub falloff: f64,
    /// Global illumination added to every channel.
    pub sun: f64,
}

impl Default for LightModel {
    fn default() -> Self {
        Self {
            falloff: -100.0,
            sun: 300.0,
        }
    }
}

impl LightModel {
    #[inline]
    pub fn shade_channel(&self, base: u8, distance: f64) -> u8 {
        let lit = base as f64 + distance.sqrt() * self.falloff + self.sun;
        (lit as i32).clamp(0, 255) as u8
    }

    /// Shades `base` as seen from `distance` away.
    #[inline]
    pub fn shade(&self, base: Rgb, distance: f64) -> Rgb {
        Rgb {
            r: self.shade_channel(base.r, distance),
            g: self.shade_channel(base.g, distance),
            b: self.shade_channel(base.b, distance),
        }
    }

    /// Shade of a white surface, used as a multiplier for sampled pixels.
    #[inline]
    pub fn light(&self, distance: f64) -> Rgb {
        self.shade(Rgb::WHITE, distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturates_close_to_the_viewer() {
        let light = LightModel::default();
        assert_eq!(light.light(0.0), Rgb::WHITE);
        assert_eq!(light.light(1.0), Rgb::WHITE);
    }

    #[test]
    fn never_increases_with_distance() {
        let light = LightModel::default();
        let mut previous = 255u8;
        for step in 0..400 {
            let d = step as f64 * 0.25;
            let shade = light.shade_channel(255, d);
            assert!(shade <= previous, "shade rose at distance {d}");
            previous = shade;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn stays_within_byte_range_for_any_base() {
        let light = LightModel {
            falloff: -40.0,
            sun: 500.0,
        };
        for base in [0u8, 12, 128, 243, 255] {
            for d in [0.0, 0.5, 4.0, 100.0, 1.0e6] {
                let _ = light.shade_channel(base, d);
            }
        }
        assert_eq!(light.shade_channel(0, 0.0), 255);
        assert_eq!(light.shade_channel(255, 1.0e6), 0);
    }

    #[test]
    fn side_darkening_survives_mid_range() {
        let light = LightModel::default();
        let lit = light.shade(Rgb::WHITE, 9.0);
        let dim = light.shade(Rgb::WHITE.darken(12), 9.0);
        assert_eq!(lit.r, 255);
        assert_eq!(dim.r, 243);
    }
}
