use crate::{error, Mesh, ShapeError};

/// Regular icosahedron with all vertices on a sphere around the origin.
///
/// Faces are wound counter-clockwise when viewed from outside.
pub struct Icosahedron {
    pub vertices: [[f32; 3]; 12],
    pub triangles: [[u32; 3]; 20],
}

impl Icosahedron {
    pub fn new(radius: f32) -> Self {
        // http://blog.andreaskahler.com/2009/06/creating-icosphere-mesh-in-code.html
        let t0 = (1.0 + 5.0f32.sqrt()) / 2.0;
        let scale = radius / (1.0 + t0 * t0).sqrt();
        let t = t0 * scale;
        let s = scale;
        Self {
            vertices: [
                [-s, t, 0.0],
                [s, t, 0.0],
                [-s, -t, 0.0],
                [s, -t, 0.0],
                [0.0, -s, t],
                [0.0, s, t],
                [0.0, -s, -t],
                [0.0, s, -t],
                [t, 0.0, -s],
                [t, 0.0, s],
                [-t, 0.0, -s],
                [-t, 0.0, s],
            ],
            triangles: [
                // 5 faces around point 0
                [0, 11, 5],
                [0, 5, 1],
                [0, 1, 7],
                [0, 7, 10],
                [0, 10, 11],
                // 5 adjacent faces
                [1, 5, 9],
                [5, 11, 4],
                [11, 10, 2],
                [10, 7, 6],
                [7, 1, 8],
                // 5 faces around point 3
                [3, 9, 4],
                [3, 4, 2],
                [3, 2, 6],
                [3, 6, 8],
                [3, 8, 9],
                // 5 adjacent faces
                [4, 9, 5],
                [2, 4, 11],
                [6, 2, 10],
                [8, 6, 7],
                [9, 8, 1],
            ],
        }
    }

    pub fn unit() -> Self {
        Self::new(1.0)
    }
}

/// Axis-aligned cube with flat-shaded faces: 4 vertices per face, 24 in total.
pub fn cube(center: glam::Vec3, size: f32) -> Result<Mesh, ShapeError> {
    error::check_center(center)?;
    error::check_size(size)?;

    // (outward normal, in-plane up direction)
    const FACES: [(glam::Vec3, glam::Vec3); 6] = [
        (glam::Vec3::X, glam::Vec3::Y),
        (glam::Vec3::NEG_X, glam::Vec3::Y),
        (glam::Vec3::Y, glam::Vec3::NEG_Z),
        (glam::Vec3::NEG_Y, glam::Vec3::Z),
        (glam::Vec3::Z, glam::Vec3::Y),
        (glam::Vec3::NEG_Z, glam::Vec3::Y),
    ];

    let half = 0.5 * size;
    let mut mesh = Mesh::with_capacity(24, 36);
    for (normal, up) in FACES {
        // `right x up == normal` keeps the winding counter-clockwise from outside.
        let right = up.cross(normal);
        let corners = [
            normal + right + up,
            normal - right + up,
            normal + right - up,
            normal - right - up,
        ];
        let base = mesh.vertex_count() as u32;
        for corner in corners {
            mesh.push_vertex(center + half * corner, normal);
        }
        mesh.push_triangle([base, base + 1, base + 2]);
        mesh.push_triangle([base + 3, base + 2, base + 1]);
    }

    log::debug!("Created cube of size {} at {}", size, center);
    Ok(mesh)
}

/// Square in the XY plane facing +Z.
pub fn quad(center: glam::Vec3, size: f32) -> Result<Mesh, ShapeError> {
    error::check_center(center)?;
    error::check_size(size)?;

    let half = 0.5 * size;
    let mut mesh = Mesh::with_capacity(4, 6);
    for (x, y) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        mesh.push_vertex(center + glam::Vec3::new(x * half, y * half, 0.0), glam::Vec3::Z);
    }
    mesh.push_triangle([0, 1, 2]);
    mesh.push_triangle([0, 2, 3]);

    log::debug!("Created quad of size {} at {}", size, center);
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Renderable as _;

    fn face_normal(mesh: &Mesh, tri: [u32; 3]) -> glam::Vec3 {
        let [a, b, c] = tri.map(|i| mesh.vertex(i as usize).unwrap().position);
        (b - a).cross(c - a)
    }

    #[test]
    fn icosahedron_on_sphere() {
        let ico = Icosahedron::new(2.5);
        for v in ico.vertices {
            let len = glam::Vec3::from(v).length();
            assert!((len - 2.5).abs() < 1e-5, "vertex at distance {}", len);
        }
    }

    #[test]
    fn icosahedron_faces_outward() {
        let ico = Icosahedron::unit();
        for [a, b, c] in ico.triangles {
            let [a, b, c] = [a, b, c].map(|i| glam::Vec3::from(ico.vertices[i as usize]));
            let n = (b - a).cross(c - a);
            assert!(n.dot(a + b + c) > 0.0);
        }
    }

    #[test]
    fn icosahedron_edges_shared_twice() {
        let ico = Icosahedron::unit();
        let mut edges = std::collections::HashMap::new();
        for [a, b, c] in ico.triangles {
            for (x, y) in [(a, b), (b, c), (c, a)] {
                *edges.entry((x.min(y), x.max(y))).or_insert(0) += 1;
            }
        }
        assert_eq!(edges.len(), 30);
        assert!(edges.values().all(|&n| n == 2));
    }

    #[test]
    fn cube_layout() {
        let center = glam::Vec3::new(1.0, -2.0, 0.5);
        let mesh = cube(center, 1.0).unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices().len(), 36);
        for v in mesh.vertices() {
            let local = v.position - center;
            assert_eq!(local.abs(), glam::Vec3::splat(0.5));
            // the normal picks the axis on which the vertex sits on the face
            assert!((local.dot(v.normal) - 0.5).abs() < 1e-6);
        }
        assert_eq!(mesh.vertex(0).unwrap().normal, glam::Vec3::X);
        assert_eq!(mesh.vertex(23).unwrap().normal, glam::Vec3::NEG_Z);
    }

    #[test]
    fn cube_faces_outward() {
        let mesh = cube(glam::Vec3::ZERO, 2.0).unwrap();
        for tri in mesh.triangles() {
            let n = face_normal(&mesh, tri);
            let expected = mesh.vertex(tri[0] as usize).unwrap().normal;
            assert!(n.normalize().abs_diff_eq(expected, 1e-6));
        }
    }

    #[test]
    fn quad_layout() {
        let mesh = quad(glam::Vec3::ZERO, 2.0).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.count(), 6);
        for tri in mesh.triangles() {
            assert!(face_normal(&mesh, tri).normalize().abs_diff_eq(glam::Vec3::Z, 1e-6));
        }
        assert_eq!(mesh.vertex(2).unwrap().position, glam::Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn invalid_sizes() {
        assert_eq!(
            cube(glam::Vec3::ZERO, 0.0),
            Err(ShapeError::InvalidSize(0.0))
        );
        assert!(matches!(
            quad(glam::Vec3::ZERO, f32::NAN),
            Err(ShapeError::InvalidSize(_))
        ));
        assert!(matches!(
            quad(glam::Vec3::new(f32::INFINITY, 0.0, 0.0), 1.0),
            Err(ShapeError::InvalidCenter(_))
        ));
    }
}
