use super::{Point3, Vec3};

/// A local coordinate frame at a path station.
///
/// Profiles lie in the `normal`/`binormal` plane; `binormal = tangent x normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub tangent: Vec3,
    pub normal: Vec3,
    pub binormal: Vec3,
}

impl Frame {
    /// Frame from a tangent and an in-plane axis, re-orthogonalized.
    pub fn new(tangent: Vec3, normal: Vec3) -> Self {
        let normal = (normal - tangent * normal.dot(&tangent)).normalize();
        Self {
            tangent,
            normal,
            binormal: tangent.cross(&normal),
        }
    }

    /// Point at `angle` radians on a circle of `radius` around `center` in this frame.
    pub fn circle_point(&self, center: &Point3, radius: f64, angle: f64) -> Point3 {
        *center + (self.normal * angle.cos() + self.binormal * angle.sin()) * radius
    }
}

/// Carry `first` along the path with rotation-minimizing frames
/// (double reflection). `tangents[i]` is the unit tangent at `path[i]`.
///
/// Zero-length path segments reuse the previous frame.
pub fn transport_frames(first: Frame, path: &[Point3], tangents: &[Vec3]) -> Vec<Frame> {
    let n = path.len().min(tangents.len());
    let mut frames = Vec::with_capacity(n);
    if n == 0 {
        return frames;
    }
    frames.push(first);

    for i in 1..n {
        let prev = frames[i - 1];
        let ti = tangents[i];

        let v1 = path[i] - path[i - 1];
        let c1 = v1.dot(&v1);
        if c1 < 1e-30 {
            frames.push(Frame {
                tangent: ti,
                ..prev
            });
            continue;
        }

        // First reflection across the plane bisecting the segment.
        let r_l = prev.normal - v1 * (2.0 * v1.dot(&prev.normal) / c1);
        let t_l = prev.tangent - v1 * (2.0 * v1.dot(&prev.tangent) / c1);

        // Second reflection aligns the reflected tangent with the new one.
        let v2 = ti - t_l;
        let c2 = v2.dot(&v2);
        let ni = if c2 < 1e-30 {
            r_l
        } else {
            r_l - v2 * (2.0 * v2.dot(&r_l) / c2)
        };

        frames.push(Frame::new(ti, ni));
    }

    frames
}
