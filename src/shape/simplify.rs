//! Douglas-Peucker reduction for closed pixel outlines.

use glam::IVec2;
use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;

/// Simplify a closed polygon, dropping points that lie within `epsilon`
/// of the reduced outline.
///
/// The closed mode of `approximate_polygon_dp` measures against the chord
/// between the first and last traced points, which are pixel neighbours.
/// Instead the polygon is split at the point farthest from the first one and
/// each half is reduced as an open chain, so the result never collapses the
/// closing edge.
pub fn simplify_closed(points: &[IVec2], epsilon: f64) -> Vec<IVec2> {
    let n = points.len();
    if n < 4 || epsilon <= 0.0 {
        return points.to_vec();
    }

    let anchor = points[0].as_dvec2();
    let (split, split_dist) = points
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, p)| (i, p.as_dvec2().distance(anchor)))
        .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
    if split_dist == 0.0 {
        return vec![points[0]];
    }

    let mut result = simplify_open(&points[..=split], epsilon);

    let mut tail: Vec<IVec2> = points[split..].to_vec();
    tail.push(points[0]);
    let tail = simplify_open(&tail, epsilon);
    // Skip the split point (already present) and the repeated anchor.
    result.extend_from_slice(&tail[1..tail.len() - 1]);
    result
}

/// Reduce an open chain. The first and last points are always kept.
fn simplify_open(points: &[IVec2], epsilon: f64) -> Vec<IVec2> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let chain: Vec<Point<i32>> = points.iter().map(|p| Point::new(p.x, p.y)).collect();
    approximate_polygon_dp(&chain, epsilon, false)
        .into_iter()
        .map(|p| IVec2::new(p.x, p.y))
        .collect()
}

/// Remove consecutive duplicates, including a last point equal to the first.
pub(crate) fn dedup_closed(points: &mut Vec<IVec2>) {
    points.dedup();
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collinear_points_removed() {
        // A 10x10 square traced with a point every pixel along each side.
        let mut points = Vec::new();
        for x in 0..10 {
            points.push(IVec2::new(x, 0));
        }
        for y in 0..10 {
            points.push(IVec2::new(10, y));
        }
        for x in (1..=10).rev() {
            points.push(IVec2::new(x, 10));
        }
        for y in (1..=10).rev() {
            points.push(IVec2::new(0, y));
        }

        let simplified = simplify_closed(&points, 0.5);
        assert_eq!(simplified.len(), 4);
        for corner in [
            IVec2::new(0, 0),
            IVec2::new(10, 0),
            IVec2::new(10, 10),
            IVec2::new(0, 10),
        ] {
            assert!(simplified.contains(&corner), "missing corner {:?}", corner);
        }
    }

    #[test]
    fn test_small_tolerance_keeps_detail() {
        let points = vec![
            IVec2::new(0, 0),
            IVec2::new(5, 2),
            IVec2::new(10, 0),
            IVec2::new(10, 10),
            IVec2::new(0, 10),
        ];
        assert_eq!(simplify_closed(&points, 1.0).len(), 5);
        assert_eq!(simplify_closed(&points, 3.0).len(), 4);
    }

    #[test]
    fn test_triangle_untouched() {
        let points = vec![IVec2::new(0, 0), IVec2::new(4, 0), IVec2::new(0, 4)];
        assert_eq!(simplify_closed(&points, 100.0), points);
    }

    #[test]
    fn test_open_chain_keeps_endpoints() {
        let chain = vec![IVec2::new(0, 0), IVec2::new(3, 1), IVec2::new(6, 0), IVec2::new(9, 0)];
        let reduced = simplify_open(&chain, 2.0);
        assert_eq!(reduced.first(), Some(&IVec2::new(0, 0)));
        assert_eq!(reduced.last(), Some(&IVec2::new(9, 0)));
        assert_eq!(reduced.len(), 2);
    }

    #[test]
    fn test_dedup_closed() {
        let mut points = vec![
            IVec2::new(0, 0),
            IVec2::new(0, 0),
            IVec2::new(1, 0),
            IVec2::new(1, 1),
            IVec2::new(0, 0),
        ];
        dedup_closed(&mut points);
        assert_eq!(points, vec![IVec2::new(0, 0), IVec2::new(1, 0), IVec2::new(1, 1)]);
    }
}
