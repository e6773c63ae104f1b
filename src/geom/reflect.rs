//! Mirror reflection of line segments off a polygon mesh.
//!
//! The pipeline runs in two decoupled passes. [`find_hits`] casts every input
//! segment against the mesh and collects one [`HitRecord`] per segment that
//! strikes it. [`reflect_hits`] then turns each record into an outgoing
//! segment. [`reflect_lines`] runs both and assembles six index-aligned output
//! lists.
//!
//! # Example
//!
//! ```
//! use ghx_reflect::geom::{Line3, PolyMesh, ReflectOptions, reflect_lines};
//!
//! let mesh = PolyMesh::new(
//!     vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
//!     vec![vec![0, 1, 2], vec![0, 2, 3]],
//! );
//! let lines = [Line3::from_arrays([0.5, 0.5, -1.0], [0.5, 0.5, 1.0])];
//!
//! let result = reflect_lines(&lines, &mesh, 2.0, &ReflectOptions::default()).unwrap();
//! assert_eq!(result.len(), 1);
//! assert!((result.outgoing_segments[0].end.z + 2.0).abs() < 1e-12);
//! ```

use super::mesh::{MeshError, PolyMesh};
use super::raycast::PreparedMesh;
use super::{Line3, Point3, Tolerance, Vec3};

/// Default lower bound on the ray parameter of an accepted hit, in the
/// segment's own parametric units.
pub const DEFAULT_HIT_EPSILON: f64 = 0.001;

/// How far along a segment the intersection search reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RayExtent {
    /// Only hits with `t <= 1`, i.e. on the segment itself.
    #[default]
    Segment,
    /// Any forward hit, treating the segment as a half-infinite ray.
    Unbounded,
}

impl RayExtent {
    #[must_use]
    pub const fn t_max(self) -> f64 {
        match self {
            Self::Segment => 1.0,
            Self::Unbounded => f64::INFINITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectOptions {
    /// The first contact along a segment counts only when its ray parameter
    /// is strictly greater than this; otherwise the segment has no hit.
    pub hit_epsilon: f64,
    pub extent: RayExtent,
    /// Used by the triangle test.
    pub tolerance: Tolerance,
}

impl Default for ReflectOptions {
    fn default() -> Self {
        Self {
            hit_epsilon: DEFAULT_HIT_EPSILON,
            extent: RayExtent::Segment,
            tolerance: Tolerance::default_geom(),
        }
    }
}

impl ReflectOptions {
    #[must_use]
    pub fn with_hit_epsilon(mut self, hit_epsilon: f64) -> Self {
        self.hit_epsilon = hit_epsilon;
        self
    }

    #[must_use]
    pub fn with_extent(mut self, extent: RayExtent) -> Self {
        self.extent = extent;
        self
    }

    pub fn validate(&self) -> Result<(), ReflectError> {
        if !self.hit_epsilon.is_finite() || self.hit_epsilon < 0.0 {
            return Err(ReflectError::InvalidHitEpsilon(self.hit_epsilon));
        }
        if !self.tolerance.eps.is_finite() || self.tolerance.eps < 0.0 {
            return Err(ReflectError::InvalidTolerance(self.tolerance.eps));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReflectError {
    #[error("reference mesh is invalid: {0}")]
    Mesh(#[from] MeshError),
    #[error("hit epsilon must be finite and non-negative, got {0}")]
    InvalidHitEpsilon(f64),
    #[error("tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),
    #[error("reference length must be finite, got {0}")]
    NonFiniteLength(f64),
}

/// One input segment that struck the mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Position of the segment in the caller's input list.
    pub input_index: usize,
    pub hit_point: Point3,
    /// Parameter of the hit on the segment (`start + t * (end - start)`).
    pub ray_parameter: f64,
    pub face_index: usize,
    /// Unit normal of the struck face, as stored in the face-normal table.
    pub face_normal: Vec3,
    /// Unit direction of the input segment.
    pub incoming_direction: Vec3,
}

/// Result of reflecting one [`HitRecord`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflection {
    pub reflected_direction: Vec3,
    pub outgoing_segment: Line3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReflectDiagnostics {
    pub input_count: usize,
    pub hit_count: usize,
    pub miss_count: usize,
    /// Zero-length or non-finite segments, skipped before casting.
    pub degenerate_count: usize,
}

/// Six position-aligned output lists plus the hit records they came from.
///
/// Entry `k` of every list describes the same input segment,
/// `hits[k].input_index`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReflectionResult {
    pub hit_points: Vec<Point3>,
    pub incoming_segments: Vec<Line3>,
    pub outgoing_segments: Vec<Line3>,
    pub incoming_directions: Vec<Vec3>,
    pub reflected_directions: Vec<Vec3>,
    pub face_normals: Vec<Vec3>,
    pub hits: Vec<HitRecord>,
    pub diagnostics: ReflectDiagnostics,
}

impl ReflectionResult {
    #[must_use]
    pub fn len(&self) -> usize {
        self.hit_points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hit_points.is_empty()
    }
}

/// Mirrors `incoming` about the plane with normal `normal`.
///
/// The normal is negated before use, `n' = -n`, and the result is
/// `d - 2 (n' · d) n'`. The formula is even in `n'`, so either winding gives
/// the same direction. Reflecting twice about the same normal returns the
/// original vector.
#[must_use]
pub fn reflect_direction(incoming: Vec3, normal: Vec3) -> Vec3 {
    let n = -normal;
    incoming - n * (2.0 * n.dot(incoming))
}

/// Intersection stage: nearest forward hit for every usable segment, in
/// ascending input order.
#[must_use]
pub fn find_hits(lines: &[Line3], mesh: &PreparedMesh, options: &ReflectOptions) -> Vec<HitRecord> {
    find_hits_with_diagnostics(lines, mesh, options).0
}

fn find_hits_with_diagnostics(
    lines: &[Line3],
    mesh: &PreparedMesh,
    options: &ReflectOptions,
) -> (Vec<HitRecord>, ReflectDiagnostics) {
    let mut diagnostics = ReflectDiagnostics {
        input_count: lines.len(),
        ..ReflectDiagnostics::default()
    };
    let mut hits = Vec::new();
    let t_max = options.extent.t_max();

    for (input_index, line) in lines.iter().enumerate() {
        let incoming_direction = match line.direction().normalized() {
            Some(dir) if !line.is_degenerate() => dir,
            _ => {
                log::trace!("segment {input_index} is degenerate, skipped");
                diagnostics.degenerate_count += 1;
                continue;
            }
        };

        // The first contact decides; one inside the epsilon band drops the
        // segment instead of exposing a surface behind it.
        let hit = mesh
            .cast_ray(line.start, line.direction(), 0.0, t_max)
            .filter(|hit| hit.t > options.hit_epsilon);
        let Some(hit) = hit else {
            log::trace!("segment {input_index} has no contact beyond the epsilon");
            diagnostics.miss_count += 1;
            continue;
        };

        let Some(face_normal) = mesh.face_normal(hit.face_index) else {
            diagnostics.miss_count += 1;
            continue;
        };

        hits.push(HitRecord {
            input_index,
            hit_point: line.point_at(hit.t),
            ray_parameter: hit.t,
            face_index: hit.face_index,
            face_normal,
            incoming_direction,
        });
    }

    diagnostics.hit_count = hits.len();
    (hits, diagnostics)
}

/// Reflection stage: one outgoing segment of signed `length` per hit.
#[must_use]
pub fn reflect_hits(hits: &[HitRecord], length: f64) -> Vec<Reflection> {
    hits.iter()
        .map(|hit| {
            let reflected_direction = reflect_direction(hit.incoming_direction, hit.face_normal);
            let outgoing_segment = Line3::from_direction(hit.hit_point, reflected_direction, length)
                .unwrap_or(Line3::new(hit.hit_point, hit.hit_point));
            Reflection {
                reflected_direction,
                outgoing_segment,
            }
        })
        .collect()
}

/// Runs both stages and assembles the aligned output lists.
///
/// The mesh is only read; its face normals are computed into a local table.
pub fn reflect_lines(
    lines: &[Line3],
    mesh: &PolyMesh,
    reference_length: f64,
    options: &ReflectOptions,
) -> Result<ReflectionResult, ReflectError> {
    options.validate()?;
    let prepared = PreparedMesh::with_tolerance(mesh, options.tolerance)?;
    reflect_lines_prepared(lines, &prepared, reference_length, options)
}

/// Same as [`reflect_lines`] against a mesh that was prepared up front.
pub fn reflect_lines_prepared(
    lines: &[Line3],
    mesh: &PreparedMesh,
    reference_length: f64,
    options: &ReflectOptions,
) -> Result<ReflectionResult, ReflectError> {
    options.validate()?;
    if !reference_length.is_finite() {
        return Err(ReflectError::NonFiniteLength(reference_length));
    }

    let (hits, diagnostics) = find_hits_with_diagnostics(lines, mesh, options);
    let reflections = reflect_hits(&hits, reference_length);

    let mut result = ReflectionResult {
        diagnostics,
        ..ReflectionResult::default()
    };
    for (hit, reflection) in hits.iter().zip(&reflections) {
        let source = lines[hit.input_index];
        result.hit_points.push(hit.hit_point);
        result.incoming_segments.push(Line3::new(source.start, hit.hit_point));
        result.outgoing_segments.push(reflection.outgoing_segment);
        result.incoming_directions.push(hit.incoming_direction);
        result.reflected_directions.push(reflection.reflected_direction);
        result.face_normals.push(hit.face_normal);
    }
    result.hits = hits;

    log::debug!(
        "reflect: {} inputs, {} hits, {} misses, {} degenerate",
        diagnostics.input_count,
        diagnostics.hit_count,
        diagnostics.miss_count,
        diagnostics.degenerate_count
    );

    Ok(result)
}
