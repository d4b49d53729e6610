//! Coverage estimation — turns a location spec into an area and an
//! area-plus-budget into reach/impression/CPM figures.
//!
//! Every function here is pure and total: identical input yields
//! bit-identical output, and degenerate input (polygon with fewer than three
//! vertices, zero impressions for CPM) yields a zero/`None` sentinel rather
//! than an error.

use studio_core::config::EstimatorConfig;
use studio_core::types::{CoverageEstimate, GeoPoint, LocationSpec};

/// Square metres per square kilometre, used to scale the planar
/// degrees-to-km product down to km².
const AREA_SCALE: f64 = 1_000_000.0;

/// Area of a circular coverage zone, π·r² in km². Non-positive radii yield 0.
pub fn radius_area_km2(radius_km: f64) -> f64 {
    if radius_km <= 0.0 {
        return 0.0;
    }
    std::f64::consts::PI * radius_km * radius_km
}

/// Planar polygon area via the shoelace formula over raw coordinate pairs,
/// converted with a fixed km-per-degree factor. Fewer than three vertices
/// yield 0. Vertex orientation does not matter.
pub fn polygon_area_km2(vertices: &[GeoPoint], km_per_degree: f64) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        sum += a.lon * b.lat - b.lon * a.lat;
    }

    sum.abs() / 2.0 * km_per_degree * km_per_degree / AREA_SCALE
}

/// Full coverage estimate for a location spec and optional budget.
///
/// City/state lists describe coverage qualitatively and produce no numeric
/// estimate. CPM is only defined when impressions are positive and a budget
/// is known.
pub fn estimate(
    spec: &LocationSpec,
    budget: Option<f64>,
    cfg: &EstimatorConfig,
) -> CoverageEstimate {
    let area_km2 = match spec {
        LocationSpec::Radius { radius_km, .. } => Some(radius_area_km2(*radius_km)),
        LocationSpec::Polygon { vertices } => Some(polygon_area_km2(vertices, cfg.km_per_degree)),
        LocationSpec::Cities { .. } | LocationSpec::States { .. } => None,
    };

    let estimated_reach = area_km2.map(|a| (a * cfg.density_per_km2).round() as u64);
    let estimated_impressions =
        estimated_reach.map(|r| (r as f64 * cfg.impressions_per_person).round() as u64);

    let estimated_cpm = match (budget, estimated_impressions) {
        (Some(b), Some(i)) if i > 0 => Some(b / i as f64 * 1000.0),
        _ => None,
    };

    CoverageEstimate {
        area_km2,
        estimated_reach,
        estimated_impressions,
        estimated_cpm,
    }
}
