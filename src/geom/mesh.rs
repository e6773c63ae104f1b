use super::{Point3, Vec3};

/// Polygon mesh as supplied by the caller: shared vertex positions and faces
/// that index into them.
///
/// Faces are usually triangles; quads and larger polygons are accepted and
/// treated as triangle fans when ray casting. The mesh is never mutated by
/// the reflection pipeline; derived data (normals, triangles, BVH) lives in
/// [`PreparedMesh`](super::PreparedMesh).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyMesh {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<Vec<u32>>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("vertex {index} has non-finite coordinates")]
    NonFiniteVertex { index: usize },
    #[error("face {face} has {count} vertices, at least 3 are required")]
    FaceTooSmall { face: usize, count: usize },
    #[error("face {face} references vertex {vertex} but the mesh has {vertex_count} vertices")]
    IndexOutOfBounds {
        face: usize,
        vertex: u32,
        vertex_count: usize,
    },
}

impl PolyMesh {
    #[must_use]
    pub fn new(vertices: Vec<[f64; 3]>, faces: Vec<Vec<u32>>) -> Self {
        Self { vertices, faces }
    }

    /// Builds a mesh from a flat triangle index list (`len % 3` leftovers are
    /// ignored).
    #[must_use]
    pub fn from_triangles(vertices: Vec<[f64; 3]>, indices: &[u32]) -> Self {
        let faces = indices.chunks_exact(3).map(<[u32]>::to_vec).collect();
        Self { vertices, faces }
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if let Some(index) = self
            .vertices
            .iter()
            .position(|v| !(v[0].is_finite() && v[1].is_finite() && v[2].is_finite()))
        {
            return Err(MeshError::NonFiniteVertex { index });
        }

        let vertex_count = self.vertices.len();
        for (face, indices) in self.faces.iter().enumerate() {
            if indices.len() < 3 {
                return Err(MeshError::FaceTooSmall {
                    face,
                    count: indices.len(),
                });
            }
            if let Some(&vertex) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfBounds {
                    face,
                    vertex,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Vertex position; the caller is responsible for a valid index.
    #[must_use]
    pub(crate) fn point(&self, index: u32) -> Point3 {
        Point3::from(self.vertices[index as usize])
    }
}

/// Unit normal of every face, in face order.
///
/// Uses Newell's method, which reduces to `(b - a) × (c - a)` for triangles
/// and stays stable for slightly non-planar quads. Faces with zero area get
/// [`Vec3::ZERO`]. Expects a validated mesh.
#[must_use]
pub fn face_normals(mesh: &PolyMesh) -> Vec<Vec3> {
    mesh.faces
        .iter()
        .map(|face| {
            newell_normal(face.iter().map(|&i| mesh.point(i)))
                .normalized()
                .unwrap_or(Vec3::ZERO)
        })
        .collect()
}

fn newell_normal(points: impl Iterator<Item = Point3> + Clone) -> Vec3 {
    let next = points.clone().cycle().skip(1);
    points.zip(next).fold(Vec3::ZERO, |acc, (cur, nxt)| {
        acc + Vec3::new(
            (cur.y - nxt.y) * (cur.z + nxt.z),
            (cur.z - nxt.z) * (cur.x + nxt.x),
            (cur.x - nxt.x) * (cur.y + nxt.y),
        )
    })
}
