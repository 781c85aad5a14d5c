//! End-to-end rendering of small scenes.

use prism_core::geometry::sdf::{Operation, SdfBox, SdfConstructive, SdfSphere};
use prism_core::geometry::{Aabb, Plane, SdfGeometry, Sphere, Transform};
use prism_core::{load_scene_from_str, CameraConfig, Light, Material, Scene, Shape};
use prism_math::{Ray, Vec3};
use prism_renderer::integrator::{calculate_lighting, trace_ray};
use prism_renderer::{Camera, RenderSettings, Renderer};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn setup(width: u32, height: u32, settings: RenderSettings) -> (Renderer, Camera) {
    let mut renderer = Renderer::new(settings);
    renderer.resize(width, height).unwrap();
    let mut camera = Camera::new(&CameraConfig::default());
    camera.on_resize(width, height);
    (renderer, camera)
}

/// A red sphere in front of the default camera over a checkered floor,
/// lit by one directional light.
fn sphere_on_floor() -> Scene {
    let mut scene = Scene::new();
    let red = scene.add_material(Material::new(Vec3::new(0.8, 0.2, 0.2)));
    let white = scene.add_material(Material::new(Vec3::splat(0.9)));
    let grey = scene.add_material(Material::new(Vec3::splat(0.3)));

    scene.add_geometry(Sphere::new(Vec3::ZERO, 1.0, red));
    scene.add_geometry(Plane::checkered(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, white, grey));
    scene.add_light(Light::directional(Vec3::new(-1.0, -1.0, -1.0), 1.0));
    scene
}

#[test]
fn empty_scene_is_sky() {
    init_logger();
    let mut scene = Scene::new().with_sky_color(Vec3::new(0.5, 0.7, 0.9));
    scene.add_material(Material::default());

    let (mut renderer, camera) = setup(6, 4, RenderSettings::default());
    renderer.render(&scene, &camera).unwrap();

    for y in 0..4 {
        for x in 0..6 {
            let color = renderer.accumulated_color(x, y).unwrap();
            assert!((color - scene.sky_color).length() < 1e-6);
        }
    }

    // 0.5*255 = 127.5, 0.7*255 = 178.5, 0.9*255 = 229.5, all truncated
    let expected = u32::from_le_bytes([127, 178, 229, 255]);
    assert!(renderer.image().iter().all(|&p| p == expected));
}

#[test]
fn accumulation_converges_without_stochastic_bounces() {
    init_logger();
    let scene = sphere_on_floor();
    let settings = RenderSettings {
        max_bounces: 1,
        accumulate: true,
        jitter: false,
        ..Default::default()
    };
    let (mut renderer, camera) = setup(16, 12, settings);

    renderer.render(&scene, &camera).unwrap();
    let first: Vec<Vec3> = (0..12)
        .flat_map(|y| (0..16).map(move |x| (x, y)))
        .map(|(x, y)| renderer.accumulated_color(x, y).unwrap())
        .collect();

    for _ in 0..7 {
        renderer.render(&scene, &camera).unwrap();
    }
    assert_eq!(renderer.frame_index(), 8);

    for (i, expected) in first.iter().enumerate() {
        let (x, y) = ((i % 16) as u32, (i / 16) as u32);
        let color = renderer.accumulated_color(x, y).unwrap();
        assert!((color - *expected).length() < 1e-5, "pixel ({}, {}) drifted", x, y);
    }
}

#[test]
fn progressive_frames_accumulate_and_reset() {
    let scene = sphere_on_floor();
    let (mut renderer, camera) = setup(8, 8, RenderSettings::default());

    for expected in 1..=3 {
        renderer.render(&scene, &camera).unwrap();
        assert_eq!(renderer.frame_index(), expected);
    }

    renderer.reset_frame_index();
    renderer.render(&scene, &camera).unwrap();
    assert_eq!(renderer.frame_index(), 1);
}

#[test]
fn disabled_accumulation_pins_frame_index() {
    let scene = sphere_on_floor();
    let settings = RenderSettings {
        accumulate: false,
        ..Default::default()
    };
    let (mut renderer, camera) = setup(8, 8, settings);

    for _ in 0..4 {
        renderer.render(&scene, &camera).unwrap();
        assert_eq!(renderer.frame_index(), 1);
    }
}

#[test]
fn non_accumulated_frames_draw_fresh_samples() {
    let scene = sphere_on_floor();
    let settings = RenderSettings {
        accumulate: false,
        ..Default::default()
    };
    let (mut renderer, camera) = setup(32, 24, settings);

    renderer.render(&scene, &camera).unwrap();
    let first = renderer.image().to_vec();
    renderer.render(&scene, &camera).unwrap();

    let differing = first.iter().zip(renderer.image()).filter(|(a, b)| a != b).count();
    assert!(differing > 0);
    assert_eq!(renderer.frame_index(), 1);
}

#[test]
fn renders_are_reproducible_for_a_seed() {
    let scene = sphere_on_floor();
    let settings = RenderSettings {
        jitter: true,
        seed: 9,
        ..Default::default()
    };

    let (mut a, camera) = setup(8, 6, settings);
    let (mut b, _) = setup(8, 6, settings);
    for _ in 0..3 {
        a.render(&scene, &camera).unwrap();
        b.render(&scene, &camera).unwrap();
    }

    assert_eq!(a.image(), b.image());
}

#[test]
fn sphere_is_visible_in_the_center() {
    let scene = sphere_on_floor();
    let (mut renderer, camera) = setup(9, 9, RenderSettings::default());
    renderer.render(&scene, &camera).unwrap();

    let center = renderer.accumulated_color(4, 4).unwrap();
    let corner = renderer.accumulated_color(0, 0).unwrap();

    // The red sphere reflects more red than green; the top corner sees sky
    assert!(center.x > center.y);
    assert!((corner - scene.sky_color).length() < 1e-6);
}

#[test]
fn unoccluded_light_contributes_albedo_times_color_times_intensity() {
    let mut scene = Scene::new();
    scene.add_material(Material::new(Vec3::splat(0.5)));
    scene.add_geometry(Plane::new(Vec3::ZERO, Vec3::Y, 0));

    let light = Light::directional(Vec3::NEG_Y, 2.0).with_color(Vec3::new(1.0, 0.8, 0.6));
    let hit = trace_ray(&scene, &Ray::new(Vec3::Y, Vec3::NEG_Y)).unwrap();
    let material = scene.material_at(hit.intersection.geometry, hit.world_position);

    let color = calculate_lighting(&scene, &hit, material, &light);
    assert!((color - Vec3::new(1.0, 0.8, 0.6)).length() < 1e-6);
}

#[test]
fn occluded_light_contributes_nothing() {
    let mut scene = Scene::new();
    scene.add_material(Material::new(Vec3::splat(0.5)));
    scene.add_geometry(Plane::new(Vec3::ZERO, Vec3::Y, 0));
    scene.add_geometry(Sphere::new(Vec3::new(0.0, 3.0, 0.0), 1.0, 0));

    let hit = trace_ray(&scene, &Ray::new(Vec3::Y, Vec3::NEG_Y)).unwrap();
    assert_eq!(hit.intersection.geometry, 0);
    let material = scene.material_at(0, hit.world_position);

    let behind_directional = Light::directional(Vec3::NEG_Y, 1.0);
    let behind_point = Light::point(Vec3::new(0.0, 10.0, 0.0), 1.0);
    assert_eq!(calculate_lighting(&scene, &hit, material, &behind_directional), Vec3::ZERO);
    assert_eq!(calculate_lighting(&scene, &hit, material, &behind_point), Vec3::ZERO);

    // A point light between the floor and the occluder is not shadowed
    let in_front = Light::point(Vec3::new(0.0, 1.5, 0.0), 1.0);
    assert!(calculate_lighting(&scene, &hit, material, &in_front).x > 0.0);
}

#[test]
fn sdf_tree_shadows_itself() {
    // One SDF: a floor slab with a ball hovering above it
    let mut scene = Scene::new();
    scene.add_material(Material::new(Vec3::splat(0.5)));
    scene.add_geometry(SdfGeometry::new(SdfConstructive::new(
        Operation::Union,
        SdfBox::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0), 0.0, 0),
        SdfSphere::new(Vec3::new(0.0, 2.0, 0.0), 0.5, 0),
        0,
    )));

    let hit = trace_ray(&scene, &Ray::new(Vec3::Y, Vec3::NEG_Y)).unwrap();
    assert!(hit.world_position.y.abs() < 1e-2);
    assert!((hit.world_normal - Vec3::Y).length() < 1e-2);
    let material = scene.material_at(0, hit.world_position);

    let overhead = Light::directional(Vec3::NEG_Y, 1.0);
    assert_eq!(calculate_lighting(&scene, &hit, material, &overhead), Vec3::ZERO);

    // Light from the side reaches the floor past the ball
    let slanted = Light::directional(Vec3::new(-1.0, -1.0, 0.0), 1.0);
    assert!(calculate_lighting(&scene, &hit, material, &slanted).x > 0.0);
}

#[test]
fn material_indices_stay_in_range() {
    let mut scene = Scene::new();
    let a = scene.add_material(Material::new(Vec3::X));
    let b = scene.add_material(Material::new(Vec3::Y));
    let c = scene.add_material(Material::new(Vec3::Z));

    scene.add_geometry(Plane::checkered(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, a, b));
    scene.add_geometry(Aabb::new(Vec3::new(-2.0, -1.0, -2.0), Vec3::new(-1.0, 0.0, -1.0), c));
    scene.add_geometry(Transform::from_trs(
        Vec3::new(1.5, 0.0, 0.0),
        Vec3::new(0.0, 30.0, 0.0),
        Vec3::ONE,
        SdfGeometry::new(SdfConstructive::new(
            Operation::SmoothUnion,
            SdfSphere::new(Vec3::ZERO, 0.5, a),
            SdfSphere::new(Vec3::new(0.5, 0.0, 0.0), 0.5, b),
            c,
        )),
    ));
    assert!(scene.validate().is_ok());

    let mut camera = Camera::new(&CameraConfig::default());
    camera.on_resize(24, 16);

    let mut hits = 0;
    for direction in camera.ray_directions() {
        if let Some(hit) = trace_ray(&scene, &Ray::new(camera.position(), *direction)) {
            let index = scene.geometry[hit.intersection.geometry].material_index(hit.world_position);
            assert!(index < scene.materials.len());
            hits += 1;
        }
    }
    assert!(hits > 0);
}

#[test]
fn loaded_scene_renders() {
    init_logger();
    let loaded = load_scene_from_str(
        r#"{
            "camera": { "position": [0, 0, 4], "direction": [0, 0, -1] },
            "materials": [ { "albedo": [0.7, 0.7, 0.7] }, { "albedo": [1, 1, 1], "emission_color": [1, 1, 1], "emission_power": 3 } ],
            "geometry": [
                { "type": "sdfsphere", "position": [0, 0, 0], "radius": 1 },
                { "type": "sphere", "position": [0, 3, 0], "radius": 0.5, "material": 1 }
            ],
            "lights": [ { "type": "point", "position": [2, 2, 2], "intensity": 1.5 } ]
        }"#,
    )
    .unwrap();

    let mut camera = Camera::new(&loaded.camera);
    camera.on_resize(10, 10);
    let mut renderer = Renderer::new(RenderSettings::default());
    renderer.resize(10, 10).unwrap();

    renderer.render(&loaded.scene, &camera).unwrap();
    assert_eq!(renderer.image().len(), 100);
    assert!(renderer.accumulated_color(5, 5).unwrap().length() > 0.0);
}
