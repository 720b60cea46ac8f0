use nalgebra::{Point2, Vector3};

const EPSILON: f32 = 1e-5;

/// Barycentric coordinates of `p` with respect to triangle (a, b, c),
/// via the dot-product form of the 2D edge functions.
///
/// Returns `None` for degenerate (near-zero area) triangles; callers
/// skip those pixels silently, they are expected geometry.
///
/// The result is `(alpha, beta, gamma)` weighting a, b, c in order.
pub fn barycentric_coordinates(
    p: Point2<f32>,
    a: Point2<f32>,
    b: Point2<f32>,
    c: Point2<f32>,
) -> Option<Vector3<f32>> {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d00 = ab.dot(&ab);
    let d01 = ab.dot(&ac);
    let d11 = ac.dot(&ac);
    let d20 = ap.dot(&ab);
    let d21 = ap.dot(&ac);

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < 1e-6 {
        return None;
    }

    let beta = (d11 * d20 - d01 * d21) / denom;
    let gamma = (d00 * d21 - d01 * d20) / denom;
    let alpha = 1.0 - beta - gamma;

    Some(Vector3::new(alpha, beta, gamma))
}

/// A pixel is covered when all three weights are non-negative and their
/// sum does not exceed 1. The epsilon absorbs float error at shared
/// edges; it is not a license for overlap.
#[inline(always)]
pub fn is_inside_triangle(bary: Vector3<f32>) -> bool {
    bary.x >= 0.0 && bary.y >= 0.0 && bary.z >= 0.0 && bary.x + bary.y + bary.z <= 1.0 + EPSILON
}

/// Perspective-corrects barycentric weights by each vertex's 1/w.
///
/// Returns `None` when the reciprocal sum degenerates, which callers
/// treat like a degenerate triangle.
pub fn perspective_correct_barycentric(
    bary: Vector3<f32>,
    w1: f32,
    w2: f32,
    w3: f32,
) -> Option<Vector3<f32>> {
    if w1.abs() < EPSILON || w2.abs() < EPSILON || w3.abs() < EPSILON {
        return None;
    }

    let wa = bary.x / w1;
    let wb = bary.y / w2;
    let wc = bary.z / w3;

    let sum = wa + wb + wc;
    if sum.abs() < EPSILON {
        return None;
    }
    Some(Vector3::new(wa / sum, wb / sum, wc / sum))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> (Point2<f32>, Point2<f32>, Point2<f32>) {
        (
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
        )
    }

    #[test]
    fn vertices_map_to_unit_weights() {
        let (a, b, c) = tri();
        let w = barycentric_coordinates(a, a, b, c).unwrap();
        assert!((w.x - 1.0).abs() < 1e-6 && w.y.abs() < 1e-6 && w.z.abs() < 1e-6);

        let w = barycentric_coordinates(c, a, b, c).unwrap();
        assert!((w.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn centroid_is_inside_and_outside_points_are_not() {
        let (a, b, c) = tri();
        let centroid = Point2::new(10.0 / 3.0, 10.0 / 3.0);
        let w = barycentric_coordinates(centroid, a, b, c).unwrap();
        assert!(is_inside_triangle(w));

        let outside = Point2::new(11.0, 11.0);
        let w = barycentric_coordinates(outside, a, b, c).unwrap();
        assert!(!is_inside_triangle(w));
    }

    #[test]
    fn degenerate_triangle_is_rejected() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(5.0, 5.0);
        let c = Point2::new(10.0, 10.0);
        assert!(barycentric_coordinates(Point2::new(1.0, 1.0), a, b, c).is_none());
    }

    #[test]
    fn equal_w_leaves_weights_unchanged() {
        let bary = Vector3::new(0.2, 0.3, 0.5);
        let corrected = perspective_correct_barycentric(bary, 2.0, 2.0, 2.0).unwrap();
        assert!((corrected - bary).norm() < 1e-6);
    }

    #[test]
    fn correction_favors_the_closer_vertex() {
        // Smaller w = closer to the camera = larger corrected weight.
        let bary = Vector3::new(0.5, 0.5, 0.0);
        let corrected = perspective_correct_barycentric(bary, 1.0, 4.0, 1.0).unwrap();
        assert!(corrected.x > corrected.y);
        assert!((corrected.x + corrected.y + corrected.z - 1.0).abs() < 1e-6);
    }
}
