use crate::{error, Icosahedron, Mesh, ShapeError};
use std::collections::HashMap;

/// Highest subdivision level accepted by the generator.
///
/// Level 10 already produces over ten million vertices.
pub const MAX_SUBDIVISIONS: u32 = 10;

/// `4^level`, or `None` once it no longer fits in `usize`.
const fn faces_per_base_face(level: u32) -> Option<usize> {
    match level.checked_mul(2) {
        Some(shift) if shift < usize::BITS => Some(1 << shift),
        _ => None,
    }
}

/// Vertices of an icosphere at `level`: `10 * 4^level + 2`.
pub const fn vertex_count(level: u32) -> Option<usize> {
    match faces_per_base_face(level) {
        Some(quads) => match quads.checked_mul(10) {
            Some(n) => n.checked_add(2),
            None => None,
        },
        None => None,
    }
}

/// Triangles of an icosphere at `level`: `20 * 4^level`.
pub const fn triangle_count(level: u32) -> Option<usize> {
    match faces_per_base_face(level) {
        Some(quads) => quads.checked_mul(20),
        None => None,
    }
}

/// Sphere built by recursively subdividing an [`Icosahedron`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Icosphere {
    pub center: glam::Vec3,
    pub radius: f32,
    pub subdivisions: u32,
}

impl Default for Icosphere {
    fn default() -> Self {
        Self {
            center: glam::Vec3::ZERO,
            radius: 1.0,
            subdivisions: 5,
        }
    }
}

impl Icosphere {
    pub fn new(center: glam::Vec3, radius: f32, subdivisions: u32) -> Self {
        Self {
            center,
            radius,
            subdivisions,
        }
    }

    pub fn build(&self) -> Result<Mesh, ShapeError> {
        error::check_center(self.center)?;
        error::check_radius(self.radius)?;
        if self.subdivisions > MAX_SUBDIVISIONS {
            return Err(ShapeError::LevelTooHigh {
                level: self.subdivisions,
                max: MAX_SUBDIVISIONS,
            });
        }

        let (units, triangles) = subdivide(self.subdivisions);

        let mut mesh = Mesh::with_capacity(units.len(), triangles.len() * 3);
        for unit in units {
            mesh.push_vertex(self.center + self.radius * unit, unit);
        }
        for tri in triangles {
            mesh.push_triangle(tri);
        }

        log::info!(
            "Created icosphere with {} subdivisions: {} vertices, {} triangles",
            self.subdivisions,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }
}

/// Build an icosphere around `center`. See [`Icosphere::build`].
pub fn generate(center: glam::Vec3, radius: f32, level: u32) -> Result<Mesh, ShapeError> {
    Icosphere::new(center, radius, level).build()
}

/// Midpoints of already split edges, keyed by the sorted index pair.
struct MidpointCache {
    map: HashMap<(u32, u32), u32>,
}

impl MidpointCache {
    fn get_or_insert(&mut self, a: u32, b: u32, vertices: &mut Vec<glam::Vec3>) -> u32 {
        let key = (a.min(b), a.max(b));
        *self.map.entry(key).or_insert_with(|| {
            let mid = (vertices[a as usize] + vertices[b as usize]).normalize();
            vertices.push(mid);
            vertices.len() as u32 - 1
        })
    }
}

/// Returns unit-sphere vertices and CCW triangles after `level` splits.
fn subdivide(level: u32) -> (Vec<glam::Vec3>, Vec<[u32; 3]>) {
    let base = Icosahedron::unit();
    let mut vertices = Vec::with_capacity(vertex_count(level).unwrap_or_default());
    vertices.extend(base.vertices.iter().map(|&v| glam::Vec3::from(v)));
    let mut triangles = base.triangles.to_vec();

    for _ in 0..level {
        // each edge is split once, and there are 3/2 edges per triangle
        let mut cache = MidpointCache {
            map: HashMap::with_capacity(triangles.len() * 3 / 2),
        };
        let mut next = Vec::with_capacity(triangles.len() * 4);
        for &[a, b, c] in triangles.iter() {
            let ab = cache.get_or_insert(a, b, &mut vertices);
            let bc = cache.get_or_insert(b, c, &mut vertices);
            let ca = cache.get_or_insert(c, a, &mut vertices);
            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }
        triangles = next;
    }

    (vertices, triangles)
}
