pub mod curve;
pub mod frame;
pub mod profile;

/// A point in 3D Euclidean space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D Euclidean space.
pub type Vec3 = nalgebra::Vector3<f64>;

/// Unit vector perpendicular to `normal`, picked away from the closest world axis.
pub fn perpendicular(normal: &Vec3) -> Vec3 {
    let reference = if normal.x.abs() < 0.9 {
        Vec3::x()
    } else {
        Vec3::y()
    };
    reference.cross(normal).normalize()
}

/// Polygon normal by Newell's method. `None` when the polygon has no area.
///
/// The orientation follows the right-hand rule over the vertex order.
pub fn newell_normal(points: &[Point3]) -> Option<Vec3> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    let mut normal = Vec3::zeros();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal.try_normalize(1e-15)
}

/// Arithmetic mean of a set of points. Origin for an empty slice.
pub fn centroid(points: &[Point3]) -> Point3 {
    if points.is_empty() {
        return Point3::origin();
    }
    let sum = points.iter().fold(Vec3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len() as f64)
}
