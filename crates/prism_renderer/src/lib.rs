//! Prism Renderer - progressive CPU path tracing.
//!
//! A Monte Carlo path tracer that renders a [`prism_core::Scene`] one
//! sample per pixel per frame and averages frames in an accumulation
//! buffer. Rows are traced in parallel with rayon.
//!
//! - [`Camera`] keeps view/projection state and a per-pixel ray cache
//! - [`integrator`] holds the per-path shading routines
//! - [`Renderer`] owns the accumulation and packed RGBA buffers

mod camera;
pub mod integrator;
mod random;
mod renderer;

pub use camera::{Camera, CursorMode, InputSource, Key, MouseButton, ROTATION_SPEED};
pub use integrator::{HitPayload, Intersection};
pub use random::{in_unit_sphere, pcg_hash, vec3_range, PcgRng};
pub use renderer::{pack_rgba, RenderError, RenderResult, RenderSettings, Renderer};
