//! JSON scene files.
//!
//! A scene file holds the camera, sky colour, a material table, a list of
//! geometry nodes and a list of lights:
//!
//! ```json
//! {
//!   "camera": { "position": [0, 1, 4], "direction": [0, 0, -1], "vertical_fov": 45 },
//!   "sky_color": [0.5, 0.7, 0.9],
//!   "materials": [ { "albedo": [0.8, 0.2, 0.2], "roughness": 0.5 } ],
//!   "geometry": [ { "type": "sphere", "position": [0, 0, 0], "radius": 1, "material": 0 } ],
//!   "lights": [ { "type": "directional", "direction": [-1, -1, -1], "intensity": 1 } ]
//! }
//! ```
//!
//! Only an unreadable or unparsable file and a missing material table are
//! fatal. Geometry and light entries that fail to parse are skipped with a
//! warning so the rest of the scene still loads.

use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use prism_math::Vec3;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::camera_config::{fov_from_sensor, CameraConfig};
use crate::geometry::sdf::{Operation, SdfBox, SdfConstructive, SdfHollowSphere, SdfNode, SdfPlane, SdfSphere};
use crate::geometry::{Aabb, Geometry, Plane, SdfGeometry, Shape, Sphere, Transform};
use crate::light::Light;
use crate::material::Material;
use crate::scene::{Scene, DEFAULT_SKY_COLOR};

/// Errors that abort loading or saving a scene file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No materials found; at least one material is required")]
    NoMaterials,
}

/// Result type for scene file operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// A scene together with the camera it was saved with.
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub scene: Scene,
    pub camera: CameraConfig,
}

/// Load a scene file from disk.
///
/// # Example
///
/// ```ignore
/// use prism_core::load_scene;
///
/// let loaded = load_scene("scenes/default.json")?;
/// println!("{} materials", loaded.scene.materials.len());
/// ```
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<LoadedScene> {
    let path = path.as_ref();
    info!("Loading scene: {}", path.display());

    let text = fs::read_to_string(path)?;
    load_scene_from_str(&text)
}

/// Parse a scene from JSON text.
pub fn load_scene_from_str(text: &str) -> LoadResult<LoadedScene> {
    let file: SceneFile = serde_json::from_str(text)?;

    let materials = match file.materials {
        Some(materials) if !materials.is_empty() => materials,
        _ => return Err(LoadError::NoMaterials),
    };

    let mut scene = Scene::new().with_sky_color(file.sky_color.unwrap_or(DEFAULT_SKY_COLOR));
    scene.materials = materials;

    for (i, mut entry) in file.geometry.into_iter().enumerate() {
        lowercase_type_tags(&mut entry);

        let geometry = match geometry_from_value(entry) {
            Ok(geometry) => geometry,
            Err(e) => {
                warn!("Skipping geometry entry {}: {}", i, e);
                continue;
            }
        };

        let mut indices = Vec::new();
        geometry.material_indices(&mut indices);
        if let Some(bad) = indices.iter().find(|&&m| m >= scene.materials.len()) {
            warn!(
                "Skipping {} geometry entry {}: material {} out of range ({} materials)",
                geometry.kind(),
                i,
                bad,
                scene.materials.len()
            );
            continue;
        }

        scene.add_geometry(geometry);
    }

    for (i, mut entry) in file.lights.into_iter().enumerate() {
        lowercase_type_tags(&mut entry);

        match serde_json::from_value::<Light>(entry) {
            Ok(light) => scene.add_light(light.normalized()),
            Err(e) => warn!("Skipping light entry {}: {}", i, e),
        }
    }

    let camera = file.camera.map(CameraDesc::into_config).unwrap_or_default();

    info!(
        "Loaded scene: {} geometry, {} materials, {} lights",
        scene.geometry.len(),
        scene.materials.len(),
        scene.lights.len()
    );

    Ok(LoadedScene { scene, camera })
}

/// Write the camera, sky colour, materials and lights to `path`.
///
/// Geometry is not serialized. If `path` already holds a JSON object its
/// other keys, including `geometry`, are kept so the file still loads.
pub fn save_scene<P: AsRef<Path>>(path: P, scene: &Scene, camera: &CameraConfig) -> LoadResult<()> {
    let path = path.as_ref();

    let mut root = match fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            _ => {
                warn!("Existing file {} is not a JSON object; overwriting", path.display());
                Map::new()
            }
        },
        Err(_) => {
            debug!("Creating new scene file {}", path.display());
            Map::new()
        }
    };

    root.insert("camera".to_string(), serde_json::to_value(camera)?);
    root.insert("sky_color".to_string(), serde_json::to_value(scene.sky_color)?);
    root.insert("materials".to_string(), serde_json::to_value(&scene.materials)?);
    root.insert("lights".to_string(), serde_json::to_value(&scene.lights)?);

    fs::write(path, serde_json::to_string_pretty(&Value::Object(root))?)?;
    info!("Saved scene: {}", path.display());

    Ok(())
}

/// Top level of a scene file. Geometry and lights stay raw so each entry
/// can fail on its own.
#[derive(Debug, Deserialize)]
struct SceneFile {
    camera: Option<CameraDesc>,
    sky_color: Option<Vec3>,
    materials: Option<Vec<Material>>,
    #[serde(default)]
    geometry: Vec<Value>,
    #[serde(default)]
    lights: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct CameraDesc {
    #[serde(flatten)]
    config: CameraConfig,
    /// Sensor height in mm; with `focal_length` overrides `vertical_fov`
    sensor_height: Option<f32>,
    focal_length: Option<f32>,
}

impl CameraDesc {
    fn into_config(self) -> CameraConfig {
        let mut config = self.config;
        config.forward = config.forward.try_normalize().unwrap_or(CameraConfig::default().forward);

        if let (Some(h), Some(f)) = (self.sensor_height, self.focal_length) {
            if h > 0.0 && f > 0.0 {
                config.vertical_fov = fov_from_sensor(h, f);
            } else {
                warn!("Ignoring non-positive sensor height {} / focal length {}", h, f);
            }
        }

        config
    }
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

/// Analytic geometry and transforms.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum GeometryDesc {
    Sphere {
        position: Vec3,
        radius: f32,
        #[serde(default)]
        material: usize,
    },
    Plane {
        position: Vec3,
        normal: Vec3,
        #[serde(default)]
        material: usize,
        material2: Option<usize>,
    },
    Aabb {
        min: Vec3,
        max: Vec3,
        #[serde(default)]
        material: usize,
    },
    Transform {
        #[serde(default)]
        translation: Vec3,
        /// Euler angles in degrees
        #[serde(default)]
        rotation: Vec3,
        #[serde(default = "default_scale")]
        scale: Vec3,
        child: Value,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum OperationDesc {
    Union,
    Intersection,
    Difference,
}

/// SDF nodes. Constructive children must themselves be SDF nodes.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum SdfDesc {
    SdfSphere {
        position: Vec3,
        radius: f32,
        #[serde(default)]
        material: usize,
    },
    SdfPlane {
        position: Vec3,
        normal: Vec3,
        #[serde(default)]
        material: usize,
        material2: Option<usize>,
    },
    SdfAabb {
        min: Vec3,
        max: Vec3,
        #[serde(default)]
        rounded: f32,
        #[serde(default)]
        material: usize,
    },
    SdfHollowSphere {
        position: Vec3,
        radius: f32,
        thickness: f32,
        height: f32,
        #[serde(default)]
        material: usize,
    },
    SdfConstructive {
        operation: OperationDesc,
        /// Present means the smooth variant of `operation`
        smoothing: Option<f32>,
        #[serde(default)]
        material: usize,
        left: Box<SdfDesc>,
        right: Box<SdfDesc>,
    },
}

impl SdfDesc {
    fn into_node(self) -> SdfNode {
        match self {
            SdfDesc::SdfSphere { position, radius, material } => SdfSphere::new(position, radius, material).into(),
            SdfDesc::SdfPlane {
                position,
                normal,
                material,
                material2,
            } => match material2 {
                Some(alternate) => SdfPlane::checkered(position, normal, material, alternate).into(),
                None => SdfPlane::new(position, normal, material).into(),
            },
            SdfDesc::SdfAabb {
                min,
                max,
                rounded,
                material,
            } => SdfBox::new(min, max, rounded, material).into(),
            SdfDesc::SdfHollowSphere {
                position,
                radius,
                thickness,
                height,
                material,
            } => SdfHollowSphere::new(position, radius, thickness, height, material).into(),
            SdfDesc::SdfConstructive {
                operation,
                smoothing,
                material,
                left,
                right,
            } => {
                let hard = match operation {
                    OperationDesc::Union => Operation::Union,
                    OperationDesc::Intersection => Operation::Intersection,
                    OperationDesc::Difference => Operation::Difference,
                };
                let left = left.into_node();
                let right = right.into_node();

                let constructive = match smoothing {
                    Some(k) => SdfConstructive::new(hard.smooth(), left, right, material).with_smoothing(k),
                    None => SdfConstructive::new(hard, left, right, material),
                };
                constructive.into()
            }
        }
    }
}

fn geometry_from_value(value: Value) -> Result<Geometry, serde_json::Error> {
    let is_sdf = value
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|tag| tag.starts_with("sdf"));

    if is_sdf {
        let desc: SdfDesc = serde_json::from_value(value)?;
        return Ok(SdfGeometry::new(desc.into_node()).into());
    }

    let geometry = match serde_json::from_value::<GeometryDesc>(value)? {
        GeometryDesc::Sphere { position, radius, material } => Sphere::new(position, radius, material).into(),
        GeometryDesc::Plane {
            position,
            normal,
            material,
            material2,
        } => match material2 {
            Some(alternate) => Plane::checkered(position, normal, material, alternate).into(),
            None => Plane::new(position, normal, material).into(),
        },
        GeometryDesc::Aabb { min, max, material } => Aabb::new(min, max, material).into(),
        GeometryDesc::Transform {
            translation,
            rotation,
            scale,
            child,
        } => Transform::from_trs(translation, rotation, scale, geometry_from_value(child)?).into(),
    };

    Ok(geometry)
}

/// Lowercase every `type` tag in a JSON tree so tags match case-insensitively.
fn lowercase_type_tags(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if key == "type" {
                    if let Value::String(tag) = child {
                        *tag = tag.to_lowercase();
                    }
                } else {
                    lowercase_type_tags(child);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(lowercase_type_tags),
        _ => {}
    }
}
