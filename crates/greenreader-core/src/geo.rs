//! WGS-84 geodesic distance and green-size inference.
//!
//! All coordinate math here uses f64. Everything downstream of
//! [`infer_green_size_ft`] (the grid, the heightmap, the simulator) works
//! entirely in the green-local feet frame — this module is the only place
//! latitude/longitude appears.

const M_TO_FT: f64 = 3.280839895;

/// WGS-84 semi-major axis, metres.
const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 flattening.
const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS-84 semi-minor axis, metres.
const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);

const MAX_ITERS: usize = 200;
const CONVERGENCE_RAD: f64 = 1e-12;

/// A point on the sphere in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    /// Latitude in degrees, -90 to +90.
    pub lat: f64,
    /// Longitude in degrees, -180 to +180.
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// The four geodesic anchor points bounding a green.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub north: LatLon,
    pub south: LatLon,
    pub east: LatLon,
    pub west: LatLon,
}

/// Vincenty's inverse formula for the geodesic distance between two points
/// on the WGS-84 ellipsoid, in metres.
///
/// Iterates lambda to `CONVERGENCE_RAD` or `MAX_ITERS`, whichever comes
/// first; nearly-antipodal point pairs (not expected for green-sized
/// extents) simply stop at the iteration cap rather than diverging.
fn vincenty_distance_m(a: LatLon, b: LatLon) -> f64 {
    let l = (b.lon - a.lon).to_radians();
    let u1 = ((1.0 - WGS84_F) * a.lat.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * b.lat.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut sin_sigma = 0.0;
    let mut cos_sigma = 1.0;
    let mut sigma = 0.0;
    let mut cos_sq_alpha = 1.0;
    let mut cos_2sigma_m = 0.0;

    for _ in 0..MAX_ITERS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            // Coincident points.
            return 0.0;
        }
        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        cos_2sigma_m = if cos_sq_alpha.abs() < 1e-12 {
            0.0 // equatorial line
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };

        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if (lambda - lambda_prev).abs() < CONVERGENCE_RAD {
            break;
        }
    }

    let u_sq = cos_sq_alpha * (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

    WGS84_B * big_a * (sigma - delta_sigma)
}

/// Geodesic distance between two (lat, lon) points on the WGS-84
/// ellipsoid, in feet.
pub fn geodesic_ft(a: LatLon, b: LatLon) -> f64 {
    vincenty_distance_m(a, b) * M_TO_FT
}

/// Infer a green's physical (width, height) in feet from its four
/// geodesic anchor points. The image is assumed axis-aligned
/// (north-up, east-right); no rotation is applied.
pub fn infer_green_size_ft(extents: &Extents) -> (f64, f64) {
    let width_ft = geodesic_ft(extents.east, extents.west);
    let height_ft = geodesic_ft(extents.north, extents.south);
    (width_ft, height_ft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        let p = LatLon::new(37.7749, -122.4194);
        assert!(geodesic_ft(p, p) < 1e-6);
    }

    #[test]
    fn one_degree_latitude_is_roughly_69_miles() {
        let a = LatLon::new(0.0, 0.0);
        let b = LatLon::new(1.0, 0.0);
        let ft = geodesic_ft(a, b);
        let miles = ft / 5280.0;
        assert!((miles - 69.0).abs() < 1.0, "got {miles} miles");
    }

    #[test]
    fn infer_green_size_matches_known_small_extents() {
        // A roughly 100ft x 60ft green: ~30.48m x 18.3m offsets at the equator.
        let extents = Extents {
            north: LatLon::new(0.000_165, 0.0),
            south: LatLon::new(0.0, 0.0),
            east: LatLon::new(0.0, 0.000_137),
            west: LatLon::new(0.0, 0.0),
        };
        let (width_ft, height_ft) = infer_green_size_ft(&extents);
        assert!(width_ft > 40.0 && width_ft < 60.0, "got {width_ft}");
        assert!(height_ft > 50.0 && height_ft < 70.0, "got {height_ft}");
    }
}
