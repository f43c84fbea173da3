//! Uniform bucket index over particle positions.
//!
//! Buckets are `2.2 * radius` wide. Particle ids are counting-sorted into
//! contiguous per-bucket ranges, so a neighbor query is a 3x3 walk over
//! `bucket_start` ranges with no pointer chasing. All buffers are sized at
//! construction; `build` only overwrites them unless handed more particles
//! than the index was sized for.

use std::ops::Range;

use glam::{IVec2, Vec2};

use crate::constants::HASH_SPACING_FACTOR;

#[derive(Clone, Debug)]
pub struct SpatialHash {
    inv_spacing: f32,
    /// Buckets in X direction
    pub num_x: usize,
    /// Buckets in Y direction
    pub num_y: usize,
    /// Particles per bucket
    bucket_count: Vec<u32>,
    /// Prefix sums: bucket `b` owns `sorted_ids[bucket_start[b]..bucket_start[b + 1]]`
    bucket_start: Vec<u32>,
    /// Particle ids grouped by bucket
    sorted_ids: Vec<u32>,
}

impl SpatialHash {
    /// Create an index covering a `domain` sized area for up to `capacity`
    /// particles of the given radius.
    pub fn new(domain: Vec2, particle_radius: f32, capacity: usize) -> Self {
        let inv_spacing = 1.0 / (HASH_SPACING_FACTOR * particle_radius);
        let num_x = (domain.x * inv_spacing).floor() as usize + 1;
        let num_y = (domain.y * inv_spacing).floor() as usize + 1;
        let bucket_total = num_x * num_y;

        Self {
            inv_spacing,
            num_x,
            num_y,
            bucket_count: vec![0; bucket_total],
            bucket_start: vec![0; bucket_total + 1],
            sorted_ids: vec![0; capacity],
        }
    }

    /// Bucket spacing in world units.
    pub fn spacing(&self) -> f32 {
        1.0 / self.inv_spacing
    }

    /// Unclamped bucket coordinate of a position.
    #[inline]
    pub fn bucket_coord(&self, pos: Vec2) -> IVec2 {
        (pos * self.inv_spacing).floor().as_ivec2()
    }

    /// Bucket index of a position, clamped into the valid range.
    #[inline]
    fn bucket_of(&self, pos: Vec2) -> usize {
        let c = self.bucket_coord(pos);
        let xi = c.x.clamp(0, self.num_x as i32 - 1) as usize;
        let yi = c.y.clamp(0, self.num_y as i32 - 1) as usize;
        yi * self.num_x + xi
    }

    /// Rebuild the index from the current positions.
    pub fn build(&mut self, positions: &[Vec2]) {
        if positions.len() > self.sorted_ids.len() {
            log::warn!(
                "spatial hash sized for {} particles got {}, growing",
                self.sorted_ids.len(),
                positions.len()
            );
            self.sorted_ids.resize(positions.len(), 0);
        }

        self.bucket_count.fill(0);
        for &pos in positions {
            let b = self.bucket_of(pos);
            self.bucket_count[b] += 1;
        }

        // Running end offsets; the fill pass below walks them back to the start.
        let mut end = 0u32;
        for (start, &count) in self.bucket_start.iter_mut().zip(&self.bucket_count) {
            end += count;
            *start = end;
        }
        let bucket_total = self.bucket_count.len();
        self.bucket_start[bucket_total] = end;

        for (id, &pos) in positions.iter().enumerate() {
            let b = self.bucket_of(pos);
            self.bucket_start[b] -= 1;
            self.sorted_ids[self.bucket_start[b] as usize] = id as u32;
        }
    }

    /// Ids in bucket (xi, yi). The coordinate must be in range.
    #[inline]
    pub fn bucket(&self, xi: usize, yi: usize) -> &[u32] {
        let b = yi * self.num_x + xi;
        let range = self.bucket_start[b] as usize..self.bucket_start[b + 1] as usize;
        &self.sorted_ids[range]
    }

    /// Bucket coordinate ranges of the 3x3 neighborhood around `pos`,
    /// clipped to the index bounds.
    #[inline]
    pub fn neighborhood(&self, pos: Vec2) -> (Range<usize>, Range<usize>) {
        let c = self.bucket_coord(pos);
        let x0 = (c.x - 1).max(0) as usize;
        let y0 = (c.y - 1).max(0) as usize;
        let x1 = ((c.x + 1).min(self.num_x as i32 - 1)).max(-1);
        let y1 = ((c.y + 1).min(self.num_y as i32 - 1)).max(-1);
        (x0..(x1 + 1) as usize, y0..(y1 + 1) as usize)
    }
}
