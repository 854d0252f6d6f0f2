use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::camera::View;
use crate::error::Result;
use crate::floor::cast_floor_column;
use crate::gate::AdmissionGate;
use crate::level::{FloorBuffer, Level};
use crate::sprite::{self, SpriteRecord};
use crate::wall::{self, FloorSeed};

/// Runs a frame's cast work on the camera's own pool.
///
/// A frame is two fan-out/fan-in phases. Phase A casts every wall level and
/// every floor column, phase B casts every sprite. Each phase returns only
/// once all of its tasks are done, so the depth buffer written in phase A is
/// settled before any sprite reads it.
pub struct Scheduler {
    pool: ThreadPool,
    gate: AdmissionGate,
}

/// Phase A buffers, all written by the wall and floor tasks.
pub(crate) struct GeometryTargets<'a> {
    pub levels: &'a mut [Level],
    pub depth: &'a mut [f64],
    pub seeds: &'a mut [FloorSeed],
    pub floor: &'a mut FloorBuffer,
}

impl Scheduler {
    pub fn new(gate_capacity: usize, worker_threads: Option<usize>) -> Result<Self> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("caster-{i}"));
        if let Some(threads) = worker_threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;
        log::info!(
            "cast pool ready: {} threads, admission gate of {}",
            pool.current_num_threads(),
            gate_capacity
        );
        Ok(Self {
            pool,
            gate: AdmissionGate::new(gate_capacity),
        })
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// Phase A: one task per stacked level plus one task per floor column.
    ///
    /// Returns the number of base-level columns that hit the grid edge.
    pub(crate) fn cast_geometry(&self, view: &View, targets: GeometryTargets<'_>) -> usize {
        let GeometryTargets {
            levels,
            depth,
            seeds,
            floor,
        } = targets;
        let Some((base, upper)) = levels.split_first_mut() else {
            return 0;
        };
        let gate = &self.gate;
        let floor_height = floor.height();

        self.pool.install(move || {
            rayon::scope(move |s| {
                for (index, level) in (1..).zip(upper) {
                    s.spawn(move |_| {
                        let _permit = gate.acquire();
                        wall::cast_level(view, level, index);
                    });
                }

                let boundary_hits = {
                    let _permit = gate.acquire();
                    wall::cast_base_level(view, base, depth, seeds)
                };

                // floor and sprites are only rendered for the base level
                if let Some(texture) = view.textures.floor() {
                    floor
                        .pixels_mut()
                        .par_chunks_mut(floor_height)
                        .zip(seeds.par_iter())
                        .for_each(|(column, seed)| {
                            let _permit = gate.acquire();
                            cast_floor_column(view, seed, texture, column);
                        });
                }

                boundary_hits
            })
        })
    }

    /// Phase B: one task per sprite, in far-to-near slot order.
    ///
    /// Returns the number of sprites that ended up on screen.
    pub(crate) fn cast_sprites(
        &self,
        view: &View,
        order: &[usize],
        depth: &[f64],
        records: &mut [SpriteRecord],
    ) -> usize {
        let gate = &self.gate;
        let sprites = view.map.sprites();

        self.pool.install(|| {
            records
                .par_iter_mut()
                .zip(order.par_iter())
                .map(|(record, &index)| {
                    record.reset();
                    let sprite = &sprites[index];
                    let Some(texture) = view.textures.sprite(sprite.texture) else {
                        return 0;
                    };
                    let _permit = gate.acquire();
                    sprite::cast_sprite(view, index, sprite, texture, depth, record);
                    record.sprite().is_some() as usize
                })
                .sum()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_sized_pool() {
        let scheduler = Scheduler::new(4, Some(2)).unwrap();
        assert_eq!(scheduler.pool.current_num_threads(), 2);
        assert_eq!(scheduler.gate().capacity(), 4);
    }
}
