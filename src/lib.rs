#![allow(irrefutable_let_patterns)]

mod error;
mod gpu_mesh;
pub mod icosphere;
mod mesh;
pub mod panel;
mod shape;

pub use error::ShapeError;
pub use gpu_mesh::GpuMesh;
pub use icosphere::{generate, Icosphere};
pub use mesh::{Mesh, Renderable, Vertex};
pub use shape::{cube, quad, Icosahedron};
