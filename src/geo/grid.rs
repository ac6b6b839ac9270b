use crate::geo::coordinate::Coordinate;
use crate::geo::geodesy::point_in_polygon;

/// Axis-aligned bounding box of a vertex list, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    pub fn of(points: &[Coordinate]) -> Self {
        let mut b = Bounds {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lng: f64::INFINITY,
            max_lng: f64::NEG_INFINITY,
        };
        for p in points {
            b.min_lat = b.min_lat.min(p.lat);
            b.max_lat = b.max_lat.max(p.lat);
            b.min_lng = b.min_lng.min(p.lng);
            b.max_lng = b.max_lng.max(p.lng);
        }
        b
    }
}

/// Samples an `n`×`n` grid over the polygon's bounding box and keeps the
/// candidates that fall inside the polygon.
///
/// `n == 1` degenerates to the single bounding-box minimum corner (step 0,
/// no interior test — the corner of a degenerate 1×1 grid is the grid).
pub fn sample_grid(points: &[Coordinate], n: usize) -> Vec<Coordinate> {
    if points.is_empty() || n == 0 {
        return Vec::new();
    }

    let bounds = Bounds::of(points);
    if n == 1 {
        return vec![Coordinate { lat: bounds.min_lat, lng: bounds.min_lng }];
    }

    let lat_step = (bounds.max_lat - bounds.min_lat) / (n - 1) as f64;
    let lng_step = (bounds.max_lng - bounds.min_lng) / (n - 1) as f64;

    let mut cells = Vec::new();
    for i in 0..n {
        for j in 0..n {
            let lat = bounds.min_lat + i as f64 * lat_step;
            let lng = bounds.min_lng + j as f64 * lng_step;
            if point_in_polygon(lat, lng, points) {
                cells.push(Coordinate { lat, lng });
            }
        }
    }
    cells
}
