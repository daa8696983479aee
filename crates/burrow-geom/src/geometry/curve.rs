use serde::{Deserialize, Serialize};

use super::{Point3, Vec3};
use crate::error::GeometryError;

/// A guide curve: a non-rational B-spline over the normalized domain [0, 1].
///
/// Open curves use a clamped uniform knot vector, so they start on the first
/// control point and end on the last. Closed curves are uniform periodic
/// B-splines that wrap back onto their start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveData", into = "CurveData")]
pub struct GuideCurve {
    control_points: Vec<Point3>,
    degree: usize,
    closed: bool,
}

/// Serialized form of a [`GuideCurve`]. Deserializing goes through the same
/// checks as [`GuideCurve::with_degree`].
#[derive(Serialize, Deserialize)]
struct CurveData {
    control_points: Vec<Point3>,
    degree: usize,
    #[serde(default)]
    closed: bool,
}

impl TryFrom<CurveData> for GuideCurve {
    type Error = GeometryError;

    fn try_from(data: CurveData) -> Result<Self, Self::Error> {
        let curve = GuideCurve::with_degree(data.control_points, data.degree)?;
        if data.closed {
            curve.closed()
        } else {
            Ok(curve)
        }
    }
}

impl From<GuideCurve> for CurveData {
    fn from(curve: GuideCurve) -> Self {
        Self {
            control_points: curve.control_points,
            degree: curve.degree,
            closed: curve.closed,
        }
    }
}

impl GuideCurve {
    /// Degree used when none is given.
    pub const DEFAULT_DEGREE: usize = 3;

    /// Cubic curve through the given control points.
    pub fn new(control_points: Vec<Point3>) -> Result<Self, GeometryError> {
        Self::with_degree(control_points, Self::DEFAULT_DEGREE)
    }

    /// Curve of the requested degree. The effective degree is clamped to
    /// `control_points.len() - 1`.
    pub fn with_degree(control_points: Vec<Point3>, degree: usize) -> Result<Self, GeometryError> {
        if control_points.len() < 2 {
            return Err(GeometryError::InsufficientControlPoints {
                required: 2,
                provided: control_points.len(),
            });
        }
        if degree == 0 {
            return Err(GeometryError::degenerate_curve("degree must be at least 1"));
        }
        if control_points
            .iter()
            .any(|p| !p.coords.iter().all(|c| c.is_finite()))
        {
            return Err(GeometryError::degenerate_curve("non-finite control point"));
        }
        Ok(Self {
            control_points,
            degree,
            closed: false,
        })
    }

    /// Close the curve so it wraps from its last control point back to its first.
    pub fn closed(mut self) -> Result<Self, GeometryError> {
        if self.control_points.len() < 3 {
            return Err(GeometryError::InsufficientControlPoints {
                required: 3,
                provided: self.control_points.len(),
            });
        }
        self.closed = true;
        Ok(self)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn control_points(&self) -> &[Point3] {
        &self.control_points
    }

    pub fn control_point(&self, index: usize) -> Option<Point3> {
        self.control_points.get(index).copied()
    }

    pub fn num_control_points(&self) -> usize {
        self.control_points.len()
    }

    /// Effective polynomial degree.
    pub fn degree(&self) -> usize {
        self.degree.min(self.control_points.len() - 1)
    }

    /// Apply `f` to every control point.
    pub fn map_points(&self, f: impl Fn(&Point3) -> Point3) -> Self {
        Self {
            control_points: self.control_points.iter().map(f).collect(),
            degree: self.degree,
            closed: self.closed,
        }
    }

    /// True when every control point coincides with the first one.
    pub fn is_degenerate(&self, tolerance: f64) -> bool {
        let first = self.control_points[0];
        self.control_points
            .iter()
            .all(|p| nalgebra::distance(p, &first) < tolerance)
    }

    /// Evaluate the curve at normalized parameter `t` (clamped to [0, 1]).
    pub fn point_at(&self, t: f64) -> Point3 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let basis = self.basis();
        let u = basis.to_knot_space(t);
        let span = basis.find_span(u);
        let values = basis.basis_functions(span, u);
        let p = basis.degree;

        let mut point = Vec3::zeros();
        for (i, weight) in values.iter().enumerate() {
            point += basis.points[span - p + i].coords * *weight;
        }
        Point3::from(point)
    }

    /// First derivative with respect to the normalized parameter.
    ///
    /// Central finite difference; one-sided at the ends of an open curve.
    pub fn derivative_at(&self, t: f64) -> Vec3 {
        const H: f64 = 1e-6;
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let (t0, t1) = if self.closed {
            (t - H, t + H)
        } else {
            ((t - H).max(0.0), (t + H).min(1.0))
        };
        let p0 = self.point_at_wrapped(t0);
        let p1 = self.point_at_wrapped(t1);
        (p1 - p0) / (t1 - t0)
    }

    /// Unit tangent at `t`.
    pub fn tangent_at(&self, t: f64) -> Result<Vec3, GeometryError> {
        let tol = crate::default_tolerance();
        if self.is_degenerate(tol.coincidence) {
            return Err(GeometryError::degenerate_curve(
                "all control points coincide",
            ));
        }
        let d = self.derivative_at(t);
        if tol.is_zero_direction(&d) {
            return Err(GeometryError::degenerate_curve(format!(
                "no tangent direction at parameter {t}"
            )));
        }
        Ok(d.normalize())
    }

    /// Polyline length through `samples` evenly spaced parameters.
    pub fn approximate_length(&self, samples: usize) -> f64 {
        let samples = samples.max(1);
        let mut length = 0.0;
        let mut prev = self.point_at(0.0);
        for i in 1..=samples {
            let curr = self.point_at(i as f64 / samples as f64);
            length += nalgebra::distance(&prev, &curr);
            prev = curr;
        }
        length
    }

    fn point_at_wrapped(&self, t: f64) -> Point3 {
        if self.closed {
            self.point_at(t.rem_euclid(1.0))
        } else {
            self.point_at(t)
        }
    }

    fn basis(&self) -> Basis {
        let p = self.degree();
        let n = self.control_points.len();
        if self.closed {
            let mut points = self.control_points.clone();
            points.extend_from_slice(&self.control_points[..p]);
            let knots = (0..points.len() + p + 1).map(|j| j as f64).collect();
            Basis {
                degree: p,
                points,
                knots,
                domain: (p as f64, (n + p) as f64),
            }
        } else {
            let interior = n - p;
            let mut knots = vec![0.0; p + 1];
            knots.extend((1..interior).map(|k| k as f64 / interior as f64));
            knots.extend(std::iter::repeat(1.0).take(p + 1));
            Basis {
                degree: p,
                points: self.control_points.clone(),
                knots,
                domain: (0.0, 1.0),
            }
        }
    }
}

/// Knot vector and (possibly wrapped) control net ready for evaluation.
struct Basis {
    degree: usize,
    points: Vec<Point3>,
    /// len = points.len() + degree + 1
    knots: Vec<f64>,
    domain: (f64, f64),
}

impl Basis {
    fn to_knot_space(&self, t: f64) -> f64 {
        self.domain.0 + t * (self.domain.1 - self.domain.0)
    }

    /// Knot span containing `u`, by binary search.
    fn find_span(&self, u: f64) -> usize {
        let n = self.points.len() - 1;
        let p = self.degree;

        if u >= self.knots[n + 1] {
            return n;
        }
        if u <= self.knots[p] {
            return p;
        }

        let mut low = p;
        let mut high = n + 1;
        let mut mid = (low + high) / 2;
        while u < self.knots[mid] || u >= self.knots[mid + 1] {
            if u < self.knots[mid] {
                high = mid;
            } else {
                low = mid;
            }
            mid = (low + high) / 2;
        }
        mid
    }

    /// Non-zero B-spline basis functions at `u` (Cox-de Boor).
    fn basis_functions(&self, span: usize, u: f64) -> Vec<f64> {
        let p = self.degree;
        let mut values = vec![0.0; p + 1];
        let mut left = vec![0.0; p + 1];
        let mut right = vec![0.0; p + 1];

        values[0] = 1.0;
        for j in 1..=p {
            left[j] = u - self.knots[span + 1 - j];
            right[j] = self.knots[span + j] - u;
            let mut saved = 0.0;
            for r in 0..j {
                let temp = values[r] / (right[r + 1] + left[j - r]);
                values[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            values[j] = saved;
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line(length: f64) -> GuideCurve {
        GuideCurve::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, length / 3.0),
            Point3::new(0.0, 0.0, 2.0 * length / 3.0),
            Point3::new(0.0, 0.0, length),
        ])
        .unwrap()
    }

    #[test]
    fn test_open_curve_interpolates_endpoints() {
        let curve = GuideCurve::new(vec![
            Point3::new(-0.6, 42.7, 0.0),
            Point3::new(-2.9, 32.4, 0.0),
            Point3::new(-0.8, 30.0, 0.0),
            Point3::new(1.2, 27.7, 0.0),
            Point3::new(3.0, 16.4, 0.0),
            Point3::new(-1.7, 0.6, 0.0),
        ])
        .unwrap();
        assert_relative_eq!(curve.point_at(0.0), Point3::new(-0.6, 42.7, 0.0), epsilon = 1e-12);
        assert_relative_eq!(curve.point_at(1.0), Point3::new(-1.7, 0.6, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_uniform_line_has_linear_parametrization() {
        let curve = line(9.0);
        assert_relative_eq!(curve.point_at(0.5), Point3::new(0.0, 0.0, 4.5), epsilon = 1e-9);
        assert_relative_eq!(curve.approximate_length(50), 9.0, epsilon = 1e-9);
    }

    #[test]
    fn test_tangent_of_line() {
        let curve = line(10.0);
        let t = curve.tangent_at(0.01).unwrap();
        assert_relative_eq!(t, Vec3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_degree_clamped_to_point_count() {
        let curve = GuideCurve::new(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]).unwrap();
        assert_eq!(curve.degree(), 1);
        assert_relative_eq!(curve.point_at(0.25), Point3::new(0.25, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_coincident_points_are_degenerate() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let curve = GuideCurve::new(vec![p, p, p, p]).unwrap();
        assert!(curve.is_degenerate(1e-7));
        assert!(matches!(
            curve.tangent_at(0.01),
            Err(GeometryError::DegenerateCurve { .. })
        ));
    }

    #[test]
    fn test_single_point_rejected() {
        assert!(matches!(
            GuideCurve::new(vec![Point3::origin()]),
            Err(GeometryError::InsufficientControlPoints { required: 2, provided: 1 })
        ));
    }

    #[test]
    fn test_non_finite_point_rejected() {
        let result = GuideCurve::new(vec![Point3::origin(), Point3::new(f64::NAN, 0.0, 0.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_closed_curve_wraps() {
        let square = GuideCurve::new(vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, -1.0),
        ])
        .unwrap()
        .closed()
        .unwrap();
        assert!(square.is_closed());
        assert_relative_eq!(square.point_at(0.0), square.point_at(1.0), epsilon = 1e-12);
        // Symmetric control net: the curve's samples average to the origin.
        let mean = (0..64)
            .map(|i| square.point_at(i as f64 / 64.0).coords)
            .fold(Vec3::zeros(), |a, b| a + b)
            / 64.0;
        assert_relative_eq!(mean, Vec3::zeros(), epsilon = 1e-9);
        // Tangent across the seam is continuous.
        let before = square.tangent_at(0.9999).unwrap();
        let after = square.tangent_at(0.0001).unwrap();
        assert!(before.dot(&after) > 0.99);
    }

    #[test]
    fn test_closing_two_points_fails() {
        let curve = GuideCurve::new(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]).unwrap();
        assert!(curve.closed().is_err());
    }

    #[test]
    fn test_map_points_translates() {
        let curve = line(3.0).map_points(|p| p + Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(curve.point_at(0.0), Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_deserialize_rejects_empty_curve() {
        let json = r#"{"control_points":[],"degree":3,"closed":false}"#;
        assert!(serde_json::from_str::<GuideCurve>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_closed_two_point_curve() {
        let json = r#"{"control_points":[[0,0,0],[1,0,0]],"degree":1,"closed":true}"#;
        assert!(serde_json::from_str::<GuideCurve>(json).is_err());
    }

    #[test]
    fn test_serde_keeps_closed_flag() {
        let square = GuideCurve::new(vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ])
        .unwrap()
        .closed()
        .unwrap();
        let json = serde_json::to_string(&square).unwrap();
        let back: GuideCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(back, square);
    }
}
