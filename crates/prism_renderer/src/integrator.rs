//! Path tracing against a [`Scene`].
//!
//! Nearest-hit search is a linear scan over the scene's geometry. Shading
//! is Lambertian direct lighting with shadow rays, plus emission, and a
//! diffuse bounce sampled around the surface normal.

use prism_core::geometry::sdf;
use prism_core::{Light, LightKind, Material, Scene, Shape};
use prism_math::{Ray, Vec3};
use rand::Rng;

use crate::random::in_unit_sphere;

/// Distance new rays start above a surface, along its normal.
///
/// Must exceed the sphere-march hit distance, or marched secondary rays
/// stop at their own origin.
pub const SURFACE_OFFSET: f32 = 4.0 * sdf::EPSILON;

/// The nearest surface along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Ray parameter of the hit
    pub t: f32,
    /// Index into [`Scene::geometry`]
    pub geometry: usize,
}

/// Shading inputs derived from an [`Intersection`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitPayload {
    pub world_position: Vec3,
    /// Unit normal in world space
    pub world_normal: Vec3,
    pub intersection: Intersection,
}

impl HitPayload {
    /// Origin for secondary rays, lifted off the surface.
    pub fn offset_origin(&self) -> Vec3 {
        self.world_position + self.world_normal * SURFACE_OFFSET
    }
}

/// Find the nearest geometry with a positive ray parameter.
pub fn nearest_intersection(scene: &Scene, ray: &Ray) -> Option<Intersection> {
    let mut closest: Option<Intersection> = None;

    for (index, geometry) in scene.geometry.iter().enumerate() {
        let t = geometry.intersect(ray);
        if t > 0.0 && closest.map_or(true, |c| t < c.t) {
            closest = Some(Intersection { t, geometry: index });
        }
    }

    closest
}

/// Trace a ray and build the hit payload, or `None` on a miss.
pub fn trace_ray(scene: &Scene, ray: &Ray) -> Option<HitPayload> {
    nearest_intersection(scene, ray).map(|intersection| closest_hit(scene, ray, intersection))
}

/// World position and normal for a known intersection.
pub fn closest_hit(scene: &Scene, ray: &Ray, intersection: Intersection) -> HitPayload {
    let world_position = ray.at(intersection.t);
    let world_normal = scene.geometry[intersection.geometry].normal(world_position);

    HitPayload {
        world_position,
        world_normal,
        intersection,
    }
}

/// True if anything lies along `ray` with `0 < t < max_t`.
///
/// Stops at the first such hit; no shading is done. Pass the distance to a
/// point light as `max_t` so geometry behind the light does not shadow,
/// and `f32::INFINITY` for directional lights.
pub fn trace_shadow_ray(scene: &Scene, ray: &Ray, max_t: f32) -> bool {
    scene.geometry.iter().any(|geometry| {
        let t = geometry.intersect(ray);
        t > 0.0 && t < max_t
    })
}

/// Lambertian contribution of one light at a hit, zero when occluded.
///
/// Point lights are only blocked by geometry between the surface and the
/// light; directional lights by anything along the shadow ray.
pub fn calculate_lighting(scene: &Scene, hit: &HitPayload, material: &Material, light: &Light) -> Vec3 {
    let origin = hit.offset_origin();

    let (direction, max_t) = match light.kind {
        LightKind::Point { position } => {
            let to_light = position - origin;
            (to_light.normalize_or_zero(), to_light.length())
        }
        LightKind::Directional { direction } => (-direction, f32::INFINITY),
    };

    if direction == Vec3::ZERO || trace_shadow_ray(scene, &Ray::new(origin, direction), max_t) {
        return Vec3::ZERO;
    }

    let lambert = hit.world_normal.dot(direction).max(0.0);
    material.albedo * light.color * light.intensity * lambert
}

/// Follow one path for at most `max_bounces` segments and return the
/// radiance it gathers.
///
/// Misses add the sky colour scaled by the path throughput. Hits add direct
/// lighting scaled by throughput and the material's emission times albedo,
/// then attenuate the throughput by the albedo.
pub fn trace_path<R: Rng + ?Sized>(scene: &Scene, mut ray: Ray, max_bounces: u32, rng: &mut R) -> Vec3 {
    let mut light = Vec3::ZERO;
    let mut contribution = Vec3::ONE;

    for _ in 0..max_bounces {
        let Some(hit) = trace_ray(scene, &ray) else {
            light += scene.sky_color * contribution;
            break;
        };

        let material = scene.material_at(hit.intersection.geometry, hit.world_position);

        for source in &scene.lights {
            light += calculate_lighting(scene, &hit, material, source) * contribution;
        }

        light += material.emission() * material.albedo;
        contribution *= material.albedo;

        let bounce = (in_unit_sphere(rng) + hit.world_normal)
            .try_normalize()
            .unwrap_or(hit.world_normal);
        ray = Ray::new(hit.offset_origin(), bounce);
    }

    light
}
