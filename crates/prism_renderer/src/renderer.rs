//! Progressive renderer: accumulation buffer and packed RGBA output.

use std::time::Instant;

use log::{debug, info};
use prism_core::{Scene, SceneError};
use prism_math::{Ray, Vec3, Vec4};
use rayon::prelude::*;
use thiserror::Error;

use crate::camera::Camera;
use crate::integrator::trace_path;
use crate::random::{vec3_range, PcgRng};

/// Half-width of the random ray-origin offset applied when jitter is on.
const JITTER_RADIUS: f32 = 0.003;

/// Errors reported by [`Renderer`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Failed to allocate {width}x{height} render buffers")]
    Allocation { width: u32, height: u32 },

    #[error("Camera viewport {camera_width}x{camera_height} does not match renderer {width}x{height}")]
    ViewportMismatch {
        camera_width: u32,
        camera_height: u32,
        width: u32,
        height: u32,
    },

    #[error("Invalid scene: {0}")]
    Scene(#[from] SceneError),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// User-facing render controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Fraction of the viewport resolution actually traced
    pub render_scale: f32,
    /// Maximum path segments per sample
    pub max_bounces: u32,
    /// Average frames instead of showing only the latest one
    pub accumulate: bool,
    /// Randomly offset primary ray origins
    pub jitter: bool,
    /// Mixed into every pixel's random seed
    pub seed: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            render_scale: 0.5,
            max_bounces: 5,
            accumulate: true,
            jitter: false,
            seed: 0,
        }
    }
}

impl RenderSettings {
    /// True if switching from `self` to `other` invalidates accumulated
    /// samples.
    fn changes_sampling(&self, other: &RenderSettings) -> bool {
        self.max_bounces != other.max_bounces
            || self.accumulate != other.accumulate
            || self.jitter != other.jitter
            || self.seed != other.seed
    }
}

/// Pack a linear colour into `0xAABBGGRR` after clamping to `[0, 1]`.
///
/// No gamma is applied. In little-endian byte order the word reads
/// `[r, g, b, a]`.
pub fn pack_rgba(color: Vec4) -> u32 {
    let c = color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0;
    let r = c.x as u8 as u32;
    let g = c.y as u8 as u32;
    let b = c.z as u8 as u32;
    let a = c.w as u8 as u32;
    (a << 24) | (b << 16) | (g << 8) | r
}

/// Renders a scene one sample per pixel per frame, averaging frames.
///
/// Must not be resized while a render is running; both take `&mut self`.
#[derive(Debug, Default)]
pub struct Renderer {
    settings: RenderSettings,
    width: u32,
    height: u32,
    /// Packed output, row-major, row 0 at the top
    image: Vec<u32>,
    /// Per-pixel sum of frame colours
    accumulation: Vec<Vec4>,
    /// Frames summed in `accumulation`
    frame_index: u32,
    /// Frames rendered so far, accumulated or not. Seeds the per-pixel
    /// generators so every frame draws fresh samples.
    sample_index: u32,
    /// Reused by scene validation
    material_scratch: Vec<usize>,
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Direct access to the settings. Call [`Renderer::reset_frame_index`]
    /// after changing anything that affects sampling.
    pub fn settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    /// Replace the settings, restarting accumulation if sampling changed.
    pub fn set_settings(&mut self, settings: RenderSettings) {
        if self.settings.changes_sampling(&settings) {
            self.reset_frame_index();
        }
        self.settings = settings;
    }

    /// Viewport size scaled by `render_scale`, at least one pixel per
    /// non-empty axis.
    pub fn scaled_size(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = |v: u32| {
            if v == 0 {
                0
            } else {
                ((v as f32 * self.settings.render_scale).round() as u32).max(1)
            }
        };
        (scale(width), scale(height))
    }

    /// Reallocate the buffers for a new size and restart accumulation.
    ///
    /// Returns `Ok(false)` without touching anything when the size is
    /// unchanged. On allocation failure the old buffers are kept.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<bool> {
        if width == self.width && height == self.height {
            return Ok(false);
        }

        let allocation_error = RenderError::Allocation { width, height };
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| allocation_error.clone())?;

        let mut image: Vec<u32> = Vec::new();
        image.try_reserve_exact(len).map_err(|_| allocation_error.clone())?;
        image.resize(len, 0);

        let mut accumulation: Vec<Vec4> = Vec::new();
        accumulation.try_reserve_exact(len).map_err(|_| allocation_error)?;
        accumulation.resize(len, Vec4::ZERO);

        debug!("Renderer resize {}x{} -> {}x{}", self.width, self.height, width, height);
        self.width = width;
        self.height = height;
        self.image = image;
        self.accumulation = accumulation;
        self.frame_index = 0;

        Ok(true)
    }

    /// Discard accumulated samples. The next frame starts a new average.
    pub fn reset_frame_index(&mut self) {
        self.frame_index = 0;
        self.accumulation.fill(Vec4::ZERO);
    }

    /// Render one frame.
    ///
    /// The scene must validate and the camera's viewport must match the
    /// renderer's size. Rows are traced in parallel.
    pub fn render(&mut self, scene: &Scene, camera: &Camera) -> RenderResult<()> {
        scene.validate_with(&mut self.material_scratch)?;

        let expected = self.width as usize * self.height as usize;
        if camera.viewport_width() != self.width
            || camera.viewport_height() != self.height
            || camera.ray_directions().len() != expected
        {
            return Err(RenderError::ViewportMismatch {
                camera_width: camera.viewport_width(),
                camera_height: camera.viewport_height(),
                width: self.width,
                height: self.height,
            });
        }

        if expected == 0 {
            return Ok(());
        }

        let start = Instant::now();
        let settings = self.settings;
        let frame = if settings.accumulate { self.frame_index + 1 } else { 1 };
        let fresh = frame == 1;
        let sample = self.sample_index.wrapping_add(1);
        let scale = 1.0 / frame as f32;
        let width = self.width as usize;

        let origin = camera.position();
        let directions = camera.ray_directions();

        self.accumulation
            .par_chunks_mut(width)
            .zip(self.image.par_chunks_mut(width))
            .enumerate()
            .for_each(|(y, (accumulation_row, image_row))| {
                for x in 0..width {
                    let index = y * width + x;
                    let mut rng = PcgRng::for_pixel(index as u32, sample, settings.seed);

                    let mut ray = Ray::new(origin, directions[index]);
                    if settings.jitter {
                        ray.origin += vec3_range(&mut rng, -JITTER_RADIUS, JITTER_RADIUS);
                    }

                    let color = trace_path(scene, ray, settings.max_bounces, &mut rng).extend(1.0);

                    let sum = if fresh { color } else { accumulation_row[x] + color };
                    accumulation_row[x] = sum;
                    image_row[x] = pack_rgba(sum * scale);
                }
            });

        self.frame_index = frame;
        self.sample_index = sample;

        let elapsed = start.elapsed();
        if frame == 1 || frame % 100 == 0 {
            info!("Frame {} ({}x{}) in {:.2?}", frame, self.width, self.height, elapsed);
        } else {
            debug!("Frame {} ({}x{}) in {:.2?}", frame, self.width, self.height, elapsed);
        }

        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Frames currently averaged in the accumulation buffer.
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// Packed pixels, one `0xAABBGGRR` word each, row 0 at the top.
    pub fn image(&self) -> &[u32] {
        &self.image
    }

    /// The packed image as `[r, g, b, a]` bytes.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.image.iter().flat_map(|pixel| pixel.to_le_bytes()).collect()
    }

    /// Copy of the packed image with rows in bottom-up order.
    pub fn flipped_rows(&self) -> Vec<u32> {
        if self.width == 0 {
            return Vec::new();
        }
        self.image
            .chunks_exact(self.width as usize)
            .rev()
            .flatten()
            .copied()
            .collect()
    }

    /// Averaged linear colour at a pixel, before clamping and packing.
    pub fn accumulated_color(&self, x: u32, y: u32) -> Option<Vec3> {
        if x >= self.width || y >= self.height || self.frame_index == 0 {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        Some(self.accumulation[index].truncate() / self.frame_index as f32)
    }
}
