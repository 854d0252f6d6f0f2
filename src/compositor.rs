use rayon::prelude::*;
use tilecaster::{Camera, Column, Level, TextureSet, alpha, pack_rgb};

const SKY: u32 = pack_rgb(30, 30, 70);
const GROUND: u32 = pack_rgb(40, 40, 40);

/// Texel a layer's stripe puts on row `y`, `None` if it leaves the row alone.
#[inline]
fn sample(column: &Column, y: i32, textures: &TextureSet) -> Option<u32> {
    let view = column.view;
    if y < view.y0 || y >= view.y1 {
        return None;
    }
    let texture = textures.resolve(column.texture?)?;

    let slice = column.slice;
    let rows = (slice.y1 - slice.y0) as i64;
    let ty = slice.y0 as i64 + (y - view.y0) as i64 * rows / (view.y1 - view.y0) as i64;
    let texel = texture.pixel(slice.x, ty.max(0) as usize);
    if alpha(texel) == 0 {
        return None;
    }
    Some(column.tint.modulate(texel))
}

/// Draws the camera's last frame into `fb`, which must match its viewport.
///
/// Rows are processed in parallel; every pixel walks the layers in
/// compositing order so later layers cover earlier ones.
pub fn composite(fb: &mut [u32], camera: &Camera) {
    let (width, height) = camera.viewport();
    let layers: Vec<&Level> = camera.layers().collect();
    let floor = camera.floor();
    let textures = camera.textures();
    let horizon = height / 2;

    fb.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, px) in row.iter_mut().enumerate() {
            let mut color = if y < horizon {
                SKY
            } else {
                match floor.get(x, y) {
                    f if alpha(f) == 0 => GROUND,
                    f => f,
                }
            };
            for level in &layers {
                if let Some(texel) = sample(&level.columns()[x], y as i32, textures) {
                    color = texel;
                }
            }
            *px = color;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilecaster::{Rgb, ScreenSpan, TexSlice, Texture, TextureRef};

    #[test]
    fn sample_stretches_the_slice_over_the_span() {
        let textures = TextureSet::new(
            vec![Texture::from_fn(4, 4, |_, y| pack_rgb(0, 0, (y * 10) as u8))],
            Vec::new(),
            None,
        )
        .unwrap();
        let column = Column {
            slice: TexSlice { x: 1, y0: 0, y1: 4 },
            view: ScreenSpan { y0: 10, y1: 18 },
            tint: Rgb::WHITE,
            texture: Some(TextureRef::Wall(0)),
        };
        assert_eq!(sample(&column, 9, &textures), None);
        assert_eq!(sample(&column, 18, &textures), None);
        let blue = |y| sample(&column, y, &textures).map(|px| px & 0xFF);
        assert_eq!(blue(10), Some(0));
        assert_eq!(blue(12), Some(9));
        assert_eq!(blue(17), Some(29));
    }
}
