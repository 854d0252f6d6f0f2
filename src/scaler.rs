use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Softbuffer wants the top byte of every pixel cleared.
const RGB_MASK: u32 = 0x00FF_FFFF;

/// Precomputed source row/column for every destination pixel.
pub struct ScaleLut {
    src_x: Vec<usize>,
    src_y: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            src_x: Vec::new(),
            src_y: Vec::new(),
        }
    }

    pub fn new(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> Self {
        let map = |dst: usize, src: usize| -> Vec<usize> {
            (0..dst)
                .map(|i| ((i * src) / dst.max(1)).min(src.saturating_sub(1)))
                .collect()
        };
        Self {
            src_x: map(dst_w, src_w),
            src_y: map(dst_h, src_h),
        }
    }
}

/// Parallel nearest-neighbour stretch; keeps the chunky look of the low-res frame.
/// Rows are processed in parallel for cache friendly writes
pub fn blit_nearest(dst: &mut [u32], dw: usize, src: &[u32], sw: usize, lut: &ScaleLut) {
    dst.par_chunks_mut(dw)
        .zip(lut.src_y.par_iter())
        .for_each(|(dst_row, &sy)| {
            let src_row = &src[sy * sw..(sy + 1) * sw];
            for (px, &sx) in dst_row.iter_mut().zip(&lut.src_x) {
                *px = src_row[sx] & RGB_MASK;
            }
        });
}
