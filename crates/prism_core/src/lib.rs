//! Prism Core - scene model and geometry for the Prism path tracer.
//!
//! This crate provides:
//!
//! - **Scene data**: `Scene`, `Material`, `Light`, `CameraConfig`
//! - **Geometry**: analytic shapes, signed distance fields and transforms,
//!   all behind the closed `Geometry` enum and the `Shape` trait
//! - **Scene files**: JSON loading and best-effort saving
//!
//! # Example
//!
//! ```ignore
//! use prism_core::scene_file::load_scene;
//!
//! let loaded = load_scene("scenes/default.json")?;
//! println!("Loaded {} geometry nodes, {} lights",
//!     loaded.scene.geometry.len(),
//!     loaded.scene.lights.len());
//! ```

pub mod camera_config;
pub mod geometry;
pub mod light;
pub mod material;
pub mod scene;
pub mod scene_file;

// Re-export commonly used types
pub use camera_config::CameraConfig;
pub use geometry::{Geometry, Shape, NO_HIT};
pub use light::{Light, LightKind};
pub use material::Material;
pub use scene::{Scene, SceneError};
pub use scene_file::{load_scene, load_scene_from_str, save_scene, LoadedScene, LoadError};
