use super::bvh::Bvh;
use super::mesh::{MeshError, PolyMesh, face_normals};
use super::{BBox, Point3, Tolerance, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle3 {
    pub a: Point3,
    pub b: Point3,
    pub c: Point3,
}

impl Triangle3 {
    #[must_use]
    pub const fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self { a, b, c }
    }

    /// Unnormalized normal `(b - a) × (c - a)`.
    #[must_use]
    pub fn normal(self) -> Vec3 {
        self.b.sub_point(self.a).cross(self.c.sub_point(self.a))
    }

    #[must_use]
    pub fn bbox(self) -> BBox {
        BBox::new(self.a, self.a)
            .expand_point(self.b)
            .expand_point(self.c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub t: f64,
    pub u: f64,
    pub v: f64,
}

/// Möller–Trumbore ray/triangle test.
///
/// `t` is measured in units of `dir`, which does not need to be normalized.
/// Both sides of the triangle are hit. Hits behind the origin are rejected;
/// the caller applies its own lower bound.
#[must_use]
pub fn ray_triangle_intersection(
    origin: Point3,
    dir: Vec3,
    tri: Triangle3,
    tol: Tolerance,
) -> Option<RayHit> {
    let edge1 = tri.b.sub_point(tri.a);
    let edge2 = tri.c.sub_point(tri.a);
    let h = dir.cross(edge2);
    let det = edge1.dot(h);
    let det_eps = tol.eps * edge1.length() * h.length();
    if !det.is_finite() || det.abs() <= det_eps {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = origin.sub_point(tri.a);
    let u = inv_det * s.dot(h);
    let uv_eps = tol.eps;
    if u < -uv_eps || u > 1.0 + uv_eps {
        return None;
    }

    let q = s.cross(edge1);
    let v = inv_det * dir.dot(q);
    if v < -uv_eps || u + v > 1.0 + uv_eps {
        return None;
    }

    let t = inv_det * edge2.dot(q);
    if !t.is_finite() || t < 0.0 {
        return None;
    }

    Some(RayHit { t, u, v })
}

/// Nearest hit of a ray against a [`PreparedMesh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshHit {
    /// Ray parameter in units of the cast direction.
    pub t: f64,
    pub point: Point3,
    /// Index of the struck face in the source [`PolyMesh`].
    pub face_index: usize,
    /// Index of the struck fan triangle.
    pub triangle_index: usize,
}

/// Read-only acceleration data derived from a [`PolyMesh`]: fan triangles,
/// the per-face normal table and a BVH over the triangles.
#[derive(Debug, Clone)]
pub struct PreparedMesh {
    triangles: Vec<Triangle3>,
    triangle_faces: Vec<usize>,
    normals: Vec<Vec3>,
    bvh: Option<Bvh>,
    tol: Tolerance,
}

impl PreparedMesh {
    pub fn new(mesh: &PolyMesh) -> Result<Self, MeshError> {
        Self::with_tolerance(mesh, Tolerance::default_geom())
    }

    pub fn with_tolerance(mesh: &PolyMesh, tol: Tolerance) -> Result<Self, MeshError> {
        mesh.validate()?;

        let mut triangles = Vec::with_capacity(mesh.face_count());
        let mut triangle_faces = Vec::with_capacity(mesh.face_count());
        for (face_index, face) in mesh.faces.iter().enumerate() {
            let a = mesh.point(face[0]);
            for pair in face[1..].windows(2) {
                triangles.push(Triangle3::new(a, mesh.point(pair[0]), mesh.point(pair[1])));
                triangle_faces.push(face_index);
            }
        }

        let pad = tol.eps.max(0.0);
        let bboxes: Vec<BBox> = triangles.iter().map(|t| t.bbox().expand_by(pad)).collect();
        let bvh = Bvh::build(&bboxes);

        log::debug!(
            "prepared mesh: {} faces, {} triangles",
            mesh.face_count(),
            triangles.len()
        );

        Ok(Self {
            triangles,
            triangle_faces,
            normals: face_normals(mesh),
            bvh,
            tol,
        })
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.normals.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Unit normal of `face`, or `None` for an unknown face index.
    #[must_use]
    pub fn face_normal(&self, face: usize) -> Option<Vec3> {
        self.normals.get(face).copied()
    }

    #[must_use]
    pub fn face_normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Nearest hit with `t_min <= t <= t_max` along `origin + t * dir`.
    ///
    /// Equal parameters resolve to the lowest face index, then the lowest
    /// triangle index.
    #[must_use]
    pub fn cast_ray(&self, origin: Point3, dir: Vec3, t_min: f64, t_max: f64) -> Option<MeshHit> {
        let bvh = self.bvh.as_ref()?;
        let mut best: Option<MeshHit> = None;

        bvh.query_ray(origin, dir, t_min, t_max, |tri_idx| {
            let hit = ray_triangle_intersection(origin, dir, self.triangles[tri_idx], self.tol)?;
            if hit.t < t_min || hit.t > t_max {
                return None;
            }

            let candidate = MeshHit {
                t: hit.t,
                point: origin.add_vec(dir.mul_scalar(hit.t)),
                face_index: self.triangle_faces[tri_idx],
                triangle_index: tri_idx,
            };
            if best.is_none_or(|current| precedes(&candidate, &current)) {
                best = Some(candidate);
            }
            best.map(|b| b.t)
        });

        best
    }
}

fn precedes(candidate: &MeshHit, current: &MeshHit) -> bool {
    candidate
        .t
        .total_cmp(&current.t)
        .then(candidate.face_index.cmp(&current.face_index))
        .then(candidate.triangle_index.cmp(&current.triangle_index))
        .is_lt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_triangle_interior() {
        let tri = Triangle3::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let hit = ray_triangle_intersection(
            Point3::new(0.25, 0.25, -2.0),
            Vec3::new(0.0, 0.0, 4.0),
            tri,
            Tolerance::default_geom(),
        )
        .unwrap();
        assert!((hit.t - 0.5).abs() < 1e-12);
    }

    #[test]
    fn ray_misses_behind_and_parallel() {
        let tri = Triangle3::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let tol = Tolerance::default_geom();
        assert!(
            ray_triangle_intersection(Point3::new(0.2, 0.2, 1.0), Vec3::Z, tri, tol).is_none()
        );
        assert!(
            ray_triangle_intersection(Point3::new(0.2, 0.2, 1.0), Vec3::X, tri, tol).is_none()
        );
        assert!(
            ray_triangle_intersection(Point3::new(2.0, 2.0, -1.0), Vec3::Z, tri, tol).is_none()
        );
    }
}
