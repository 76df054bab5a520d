/// A single vertex of a [`Mesh`], without the homogeneous padding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: glam::Vec3,
    pub normal: glam::Vec3,
}

/// Anything that can be drawn as an indexed triangle list.
///
/// Positions are homogeneous points (`w = 1`), normals are directions (`w = 0`).
pub trait Renderable {
    fn positions(&self) -> &[[f32; 4]];
    fn normals(&self) -> &[[f32; 4]];
    fn indices(&self) -> &[u32];

    /// Number of indices to draw.
    fn count(&self) -> u32 {
        self.indices().len() as u32
    }
}

/// Immutable triangle mesh produced by the shape generators.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<[f32; 4]>,
    normals: Vec<[f32; 4]>,
    indices: Vec<u32>,
}

impl Mesh {
    pub(crate) fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub(crate) fn push_vertex(&mut self, position: glam::Vec3, normal: glam::Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.extend(1.0).to_array());
        self.normals.push(normal.extend(0.0).to_array());
        index
    }

    pub(crate) fn push_triangle(&mut self, triangle: [u32; 3]) {
        debug_assert!(triangle
            .iter()
            .all(|&i| (i as usize) < self.positions.len()));
        self.indices.extend_from_slice(&triangle);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex(&self, index: usize) -> Option<Vertex> {
        let p = self.positions.get(index)?;
        let n = self.normals.get(index)?;
        Some(Vertex {
            position: glam::Vec3::new(p[0], p[1], p[2]),
            normal: glam::Vec3::new(n[0], n[1], n[2]),
        })
    }

    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        (0..self.vertex_count()).filter_map(move |i| self.vertex(i))
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

impl Renderable for Mesh {
    fn positions(&self) -> &[[f32; 4]] {
        &self.positions
    }
    fn normals(&self) -> &[[f32; 4]] {
        &self.normals
    }
    fn indices(&self) -> &[u32] {
        &self.indices
    }
}
