use super::{Point3, Vec3};

/// Finite directed line segment from `start` to `end`.
///
/// Parameter `t = 0` is the start point and `t = 1` the end point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3 {
    pub start: Point3,
    pub end: Point3,
}

impl Line3 {
    #[must_use]
    pub const fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn from_arrays(start: [f64; 3], end: [f64; 3]) -> Self {
        Self::new(Point3::from(start), Point3::from(end))
    }

    /// Segment of signed `length` that starts at `origin` and runs along
    /// `direction`. A negative length points the segment the other way.
    ///
    /// Returns `None` when `direction` cannot be normalized.
    #[must_use]
    pub fn from_direction(origin: Point3, direction: Vec3, length: f64) -> Option<Self> {
        let unit = direction.normalized()?;
        Some(Self::new(origin, origin.add_vec(unit.mul_scalar(length))))
    }

    /// Unnormalized direction `end - start`.
    #[must_use]
    pub const fn direction(self) -> Vec3 {
        self.end.sub_point(self.start)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.direction().length()
    }

    #[must_use]
    pub fn point_at(self, t: f64) -> Point3 {
        self.start.add_vec(self.direction().mul_scalar(t))
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }

    /// True for segments that cannot define a ray: non-finite endpoints or a
    /// direction that does not normalize.
    #[must_use]
    pub fn is_degenerate(self) -> bool {
        !self.is_finite() || self.direction().normalized().is_none()
    }

    #[must_use]
    pub const fn to_arrays(self) -> ([f64; 3], [f64; 3]) {
        (self.start.to_array(), self.end.to_array())
    }
}
