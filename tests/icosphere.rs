use blade_icosphere::{self as ico, icosphere, panel, Renderable as _};
use std::collections::HashMap;

const EPSILON: f32 = 1e-5;

#[test]
fn counts_follow_closed_form() {
    for level in panel::LEVEL_RANGE {
        let mesh = ico::generate(glam::Vec3::ZERO, 1.0, level).unwrap();
        let quads = 4usize.pow(level);
        assert_eq!(mesh.triangle_count(), 20 * quads);
        // any duplicated midpoint would push this towards 3x growth per triangle
        assert_eq!(mesh.vertex_count(), 10 * quads + 2);
    }
}

#[test]
fn vertices_on_translated_sphere() {
    let center = glam::Vec3::new(3.0, -1.5, 10.0);
    let radius = 2.75;
    for level in [0, 1, 4] {
        let mesh = ico::generate(center, radius, level).unwrap();
        for (p, n) in mesh.positions().iter().zip(mesh.normals()) {
            assert_eq!(p[3], 1.0);
            assert_eq!(n[3], 0.0);
            let local = glam::Vec3::new(p[0], p[1], p[2]) - center;
            let normal = glam::Vec3::new(n[0], n[1], n[2]);
            assert!((local.length() - radius).abs() < EPSILON * radius * 10.0);
            assert!((normal.length() - 1.0).abs() < EPSILON);
            assert!(normal.abs_diff_eq(local.normalize(), EPSILON));
        }
    }
}

#[test]
fn indices_in_bounds_and_outward() {
    let mesh = ico::generate(glam::Vec3::ZERO, 1.0, 3).unwrap();
    let count = mesh.vertex_count() as u32;
    assert!(mesh.indices().iter().all(|&i| i < count));
    for [a, b, c] in mesh.triangles() {
        let [a, b, c] = [a, b, c].map(|i| mesh.vertex(i as usize).unwrap().position);
        assert!((b - a).cross(c - a).dot(a + b + c) > 0.0);
    }
}

#[test]
fn watertight() {
    let mesh = ico::generate(glam::Vec3::ZERO, 1.0, 4).unwrap();
    let mut edges = HashMap::new();
    for [a, b, c] in mesh.triangles() {
        for (x, y) in [(a, b), (b, c), (c, a)] {
            *edges.entry((x.min(y), x.max(y))).or_insert(0u32) += 1;
        }
    }
    assert!(edges.values().all(|&n| n == 2));
    // Euler characteristic of a sphere
    let v = mesh.vertex_count() as i64;
    let e = edges.len() as i64;
    let f = mesh.triangle_count() as i64;
    assert_eq!(v - e + f, 2);
}

#[test]
fn deterministic() {
    let center = glam::Vec3::new(0.25, 0.5, -1.0);
    let first = ico::generate(center, 1.5, 4).unwrap();
    let second = ico::Icosphere::new(center, 1.5, 4).build().unwrap();
    assert_eq!(first.indices(), second.indices());
    assert_eq!(first, second);
}

#[test]
fn level_two_on_unit_sphere() {
    let mesh = ico::generate(glam::Vec3::ZERO, 1.0, 2).unwrap();
    assert_eq!(mesh.count(), 960);
    assert_eq!(mesh.vertex_count(), 162);
    assert_eq!(icosphere::vertex_count(2), Some(162));
    assert_eq!(icosphere::triangle_count(2), Some(320));
    assert!(mesh
        .vertices()
        .all(|v| (v.position.length() - 1.0).abs() < EPSILON));
}

#[test]
fn contract_violations() {
    let errors = [
        ico::generate(glam::Vec3::ZERO, 0.0, 0),
        ico::generate(glam::Vec3::ZERO, -3.0, 2),
        ico::generate(glam::Vec3::ZERO, f32::INFINITY, 2),
        ico::generate(glam::Vec3::splat(f32::NAN), 1.0, 2),
        ico::generate(glam::Vec3::ZERO, 1.0, icosphere::MAX_SUBDIVISIONS + 1),
    ];
    for result in errors {
        let err = result.unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
