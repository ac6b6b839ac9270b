/// Spherical-Earth geometry over WGS84 lat/lng input: polygon area,
/// centroid, point-in-polygon and great-circle distance. Pure functions,
/// no state.

use crate::error::EstimateError;
use crate::geo::coordinate::Coordinate;

/// Mean Earth radius, meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Unsigned area enclosed by the polygon, square meters.
///
/// Accumulates `Δλ·(2 + cos φ_i + cos φ_j)` over the closed ring and scales
/// by `R²/2`, an oblate-spheroid-motivated variant of the classic spherical
/// excess accumulation. Sign (winding order) is discarded. The vertex list
/// is implicitly closed; self-intersecting input is not validated and
/// produces a well-defined (if meaningless) number rather than a panic.
pub fn polygon_area_m2(points: &[Coordinate]) -> Result<f64, EstimateError> {
    if points.len() < 3 {
        return Err(EstimateError::InvalidPolygon(points.len()));
    }

    let mut sum = 0.0;
    for i in 0..points.len() {
        let a = &points[i];
        let b = &points[(i + 1) % points.len()];
        let d_lng = (b.lng - a.lng).to_radians();
        sum += d_lng * (2.0 + a.lat.to_radians().cos() + b.lat.to_radians().cos());
    }

    Ok((sum * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0).abs())
}

/// Arithmetic mean of the vertex coordinates. Not area-weighted, which is
/// an acceptable approximation at city scale.
pub fn centroid(points: &[Coordinate]) -> Coordinate {
    let n = points.len().max(1) as f64;
    Coordinate {
        lat: points.iter().map(|p| p.lat).sum::<f64>() / n,
        lng: points.iter().map(|p| p.lng).sum::<f64>() / n,
    }
}

/// Ray-casting parity test over the polygon edges.
///
/// Boundary rule: comparisons are strict, so edges behave as half-open
/// intervals — a point lying exactly on an edge or vertex is generally
/// classified as outside.
pub fn point_in_polygon(lat: f64, lng: f64, points: &[Coordinate]) -> bool {
    if points.is_empty() {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let pi = &points[i];
        let pj = &points[j];
        if (pi.lat > lat) != (pj.lat > lat)
            && lng < (pj.lng - pi.lng) * (lat - pi.lat) / (pj.lat - pi.lat) + pi.lng
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Great-circle distance between two coordinates, meters.
pub fn haversine_distance_m(a: &Coordinate, b: &Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    /// Square over Lisbon's outskirts, ~19.3 km².
    fn lisbon_square() -> Vec<Coordinate> {
        vec![
            coord(38.70, -9.15),
            coord(38.70, -9.10),
            coord(38.75, -9.10),
            coord(38.75, -9.15),
        ]
    }

    #[test]
    fn area_of_lisbon_square() {
        let area = polygon_area_m2(&lisbon_square()).unwrap();
        let expected = 1.93e7;
        assert!(
            (area - expected).abs() / expected < 0.01,
            "area {:.0} m² not within 1% of {:.0}",
            area,
            expected
        );
    }

    #[test]
    fn area_invariant_under_rotation_and_reversal() {
        let square = lisbon_square();
        let base = polygon_area_m2(&square).unwrap();

        for shift in 1..square.len() {
            let mut rotated = square.clone();
            rotated.rotate_left(shift);
            let area = polygon_area_m2(&rotated).unwrap();
            assert!((area - base).abs() < 1.0, "rotation by {} changed area", shift);
        }

        let mut reversed = square.clone();
        reversed.reverse();
        let area = polygon_area_m2(&reversed).unwrap();
        assert!((area - base).abs() < 1.0, "winding reversal changed area");
    }

    #[test]
    fn area_of_degenerate_line_is_zero() {
        let line = vec![
            coord(38.70, -9.15),
            coord(38.72, -9.13),
            coord(38.74, -9.11),
        ];
        let area = polygon_area_m2(&line).unwrap();
        assert!(area < 1.0, "collinear ring should enclose nothing, got {}", area);
    }

    #[test]
    fn too_few_points_is_invalid() {
        let two = vec![coord(38.70, -9.15), coord(38.75, -9.10)];
        assert_eq!(polygon_area_m2(&two), Err(EstimateError::InvalidPolygon(2)));
    }

    #[test]
    fn centroid_of_convex_polygon_is_inside() {
        let square = lisbon_square();
        let c = centroid(&square);
        assert!((c.lat - 38.725).abs() < 1e-9);
        assert!((c.lng + 9.125).abs() < 1e-9);
        assert!(point_in_polygon(c.lat, c.lng, &square));
    }

    #[test]
    fn point_outside_polygon() {
        let square = lisbon_square();
        assert!(!point_in_polygon(38.60, -9.125, &square));
        assert!(!point_in_polygon(38.725, -9.30, &square));
    }

    #[test]
    fn haversine_along_meridian() {
        // 0.05° of latitude is ~5560 m regardless of longitude.
        let d = haversine_distance_m(&coord(38.70, -9.15), &coord(38.75, -9.15));
        assert!((d - 5559.7).abs() < 5.0, "got {}", d);
    }

    #[test]
    fn haversine_is_symmetric_and_zero_at_identity() {
        let a = coord(38.70, -9.15);
        let b = coord(41.15, -8.61);
        assert!((haversine_distance_m(&a, &b) - haversine_distance_m(&b, &a)).abs() < 1e-6);
        assert_eq!(haversine_distance_m(&a, &a), 0.0);
    }
}
