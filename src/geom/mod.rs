//! Host-independent geometry kernel: vector primitives, polygon meshes, a
//! BVH-backed nearest-hit ray caster and the reflection pipeline.

mod bvh;
mod core;
mod line;
mod mesh;
mod raycast;
mod reflect;

pub use self::core::{BBox, Point3, Tolerance, Vec3};
pub use line::Line3;
pub use mesh::{MeshError, PolyMesh, face_normals};
pub use raycast::{MeshHit, PreparedMesh, RayHit, Triangle3, ray_triangle_intersection};
pub use reflect::{
    DEFAULT_HIT_EPSILON, HitRecord, RayExtent, ReflectDiagnostics, ReflectError, ReflectOptions,
    Reflection, ReflectionResult, find_hits, reflect_direction, reflect_hits, reflect_lines,
    reflect_lines_prepared,
};
