//! Hash-based random numbers for per-pixel sampling.

use prism_math::Vec3;
use rand::{Error, Rng, RngCore, SeedableRng};

/// One round of the PCG hash (O'Neill, "PCG: A Family of Simple Fast
/// Space-Efficient Statistically Good Algorithms").
#[inline]
pub fn pcg_hash(input: u32) -> u32 {
    let state = input.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

/// A tiny generator whose whole state is one `u32`.
///
/// Each pixel of each frame gets its own generator, so rows can be traced
/// in parallel without sharing state.
#[derive(Debug, Clone)]
pub struct PcgRng {
    state: u32,
}

impl PcgRng {
    /// Generator for one pixel of one frame. Identical inputs always give
    /// the same sequence.
    pub fn for_pixel(pixel_index: u32, frame_index: u32, base_seed: u32) -> Self {
        Self {
            state: pcg_hash(pixel_index ^ pcg_hash(frame_index ^ pcg_hash(base_seed))),
        }
    }
}

impl RngCore for PcgRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.state = pcg_hash(self.state);
        self.state
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for PcgRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            state: u32::from_le_bytes(seed),
        }
    }
}

/// Vector with each component uniform in `[min, max)`.
pub fn vec3_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> Vec3 {
    Vec3::new(rng.gen_range(min..max), rng.gen_range(min..max), rng.gen_range(min..max))
}

/// Random unit vector, rejection-sampled from the unit ball and normalized.
pub fn in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = vec3_range(rng, -1.0, 1.0);
        let len_sq = p.length_squared();
        if len_sq > 1e-12 && len_sq < 1.0 {
            return p / len_sq.sqrt();
        }
    }
}
