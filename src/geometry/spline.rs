use cgmath::{InnerSpace, Vector3};

use crate::data_structures::model::{MeshData, ModelVertex};

/// Sample a cardinal spline through `points`, treated as a line strip with adjacency.
///
/// The first and last points only steer the tangents: `n` points give `n - 3`
/// curve segments from `points[1]` to `points[n - 2]`. Each segment contributes
/// `divisions` samples and the final point closes the curve. `tension` scales the
/// Hermite tangents; 0.5 gives a Catmull-Rom curve.
pub fn cardinal_spline(points: &[Vector3<f32>], tension: f32, divisions: u32) -> Vec<Vector3<f32>> {
    if points.len() < 4 {
        return Vec::new();
    }
    let divisions = divisions.max(1);
    let mut curve = Vec::with_capacity((points.len() - 3) * divisions as usize + 1);
    for window in points.windows(4) {
        let [p0, p1, p2, p3] = [window[0], window[1], window[2], window[3]];
        let m1 = (p2 - p0) * tension;
        let m2 = (p3 - p1) * tension;
        for step in 0..divisions {
            let t = step as f32 / divisions as f32;
            curve.push(hermite(p1, m1, p2, m2, t));
        }
    }
    curve.push(points[points.len() - 2]);
    curve
}

fn hermite(p1: Vector3<f32>, m1: Vector3<f32>, p2: Vector3<f32>, m2: Vector3<f32>, t: f32) -> Vector3<f32> {
    let t2 = t * t;
    let t3 = t2 * t;
    p1 * (2.0 * t3 - 3.0 * t2 + 1.0)
        + m1 * (t3 - 2.0 * t2 + t)
        + p2 * (-2.0 * t3 + 3.0 * t2)
        + m2 * (t3 - t2)
}

/// Extrude a poly-line in the XY plane into a flat strip `width` wide.
pub fn ribbon(points: &[Vector3<f32>], width: f32, color: [f32; 3]) -> MeshData {
    if points.len() < 2 {
        return MeshData::default();
    }
    let half = width * 0.5;
    let normal = [0.0, 0.0, 1.0];
    let last = points.len() - 1;
    let mut vertices = Vec::with_capacity(points.len() * 2);
    for (i, point) in points.iter().enumerate() {
        let before = points[i.saturating_sub(1)];
        let after = points[(i + 1).min(last)];
        let direction = after - before;
        let side = if direction.magnitude2() > f32::EPSILON {
            Vector3::new(-direction.y, direction.x, 0.0).normalize() * half
        } else {
            Vector3::new(0.0, half, 0.0)
        };
        let u = i as f32 / last as f32;
        vertices.push(
            ModelVertex::new((*point + side).into(), normal)
                .with_color(color)
                .with_tex_coords([u, 0.0]),
        );
        vertices.push(
            ModelVertex::new((*point - side).into(), normal)
                .with_color(color)
                .with_tex_coords([u, 1.0]),
        );
    }

    let mut indices = Vec::with_capacity(last * 6);
    for i in 0..last as u32 {
        let a = i * 2;
        indices.extend([a, a + 1, a + 2, a + 2, a + 1, a + 3]);
    }
    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    fn zigzag() -> Vec<Vector3<f32>> {
        vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(3.0, 1.0, 0.0),
            Vector3::new(4.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn needs_four_points() {
        assert!(cardinal_spline(&zigzag()[..3], 0.5, 10).is_empty());
    }

    #[test]
    fn passes_through_inner_control_points() {
        let points = zigzag();
        let curve = cardinal_spline(&points, 0.5, 8);
        // two segments of eight samples plus the end point
        assert_eq!(curve.len(), 2 * 8 + 1);
        assert!(close(curve[0], points[1]));
        assert!(close(curve[8], points[2]));
        assert!(close(curve[16], points[3]));
    }

    #[test]
    fn evenly_spaced_line_stays_linear_at_catmull_rom() {
        let points: Vec<_> = (0..4).map(|i| Vector3::new(i as f32, 0.0, 0.0)).collect();
        let curve = cardinal_spline(&points, 0.5, 4);
        assert!(close(curve[2], Vector3::new(1.5, 0.0, 0.0)));
    }

    #[test]
    fn zero_divisions_count_as_one() {
        let curve = cardinal_spline(&zigzag(), 0.5, 0);
        assert_eq!(curve.len(), 3);
    }

    #[test]
    fn ribbon_has_two_vertices_per_point() {
        let points = zigzag();
        let strip = ribbon(&points, 0.2, [1.0, 0.0, 0.0]);
        assert_eq!(strip.vertices.len(), points.len() * 2);
        assert_eq!(strip.triangle_count(), (points.len() - 1) * 2);
        let [a, b] = [strip.vertices[0].position, strip.vertices[1].position];
        let gap = Vector3::from(a) - Vector3::from(b);
        assert!((gap.magnitude() - 0.2).abs() < 1e-5);
        assert!(strip.vertices.iter().all(|v| v.color == [1.0, 0.0, 0.0]));
    }

    #[test]
    fn ribbon_of_a_single_point_is_empty() {
        assert_eq!(ribbon(&zigzag()[..1], 0.1, [1.0; 3]), MeshData::default());
    }
}
