//! Scattered-data reconstruction: traced contour polylines + a boundary
//! polygon -> a dense heightfield on a grid.
//!
//! The interpolant is a thin-plate-spline radial basis function fit over
//! the densified contour samples, solved as one dense linear system (all
//! samples participate globally — this is not a local/piecewise fit).

use nalgebra::{DMatrix, DVector};

use crate::contour::{densify, ContourSet, Sample};
use crate::error::{GreenReaderError, Result};
use crate::grid::Grid;
use crate::polygon::BoundaryPolygon;

pub const DEFAULT_SAMPLE_STEP_FT: f64 = 1.0;
pub const DEFAULT_SMOOTHING: f64 = 0.25;
const MIN_SAMPLES: usize = 10;

/// Thin-plate-spline kernel: `phi(r) = r^2 * ln(r)`, continuously
/// extended to `phi(0) = 0`.
fn tps_kernel(r: f64) -> f64 {
    if r <= 0.0 {
        0.0
    } else {
        r * r * r.ln()
    }
}

/// The solved RBF: per-sample weights plus a degree-1 polynomial tail
/// (thin-plate splines require the tail for the fit to be well-posed).
struct ThinPlateSpline {
    centers: Vec<(f64, f64)>,
    weights: DVector<f64>, // length centers.len()
    poly: [f64; 3],        // c0 + c1*x + c2*z
}

impl ThinPlateSpline {
    fn fit(samples: &[Sample], smoothing: f64) -> Result<Self> {
        let n = samples.len();
        let dim = n + 3;
        let mut a = DMatrix::<f64>::zeros(dim, dim);
        let mut b = DVector::<f64>::zeros(dim);

        for i in 0..n {
            for j in 0..n {
                let dx = samples[i].x - samples[j].x;
                let dz = samples[i].z - samples[j].z;
                let r = dx.hypot(dz);
                a[(i, j)] = tps_kernel(r);
            }
            a[(i, i)] += smoothing;

            a[(i, n)] = 1.0;
            a[(i, n + 1)] = samples[i].x;
            a[(i, n + 2)] = samples[i].z;
            a[(n, i)] = 1.0;
            a[(n + 1, i)] = samples[i].x;
            a[(n + 2, i)] = samples[i].z;

            b[i] = samples[i].h;
        }

        let decomp = a.lu();
        let solution = decomp.solve(&b).ok_or(GreenReaderError::SingularFit)?;

        let weights = DVector::from_iterator(n, solution.iter().take(n).copied());
        let poly = [solution[n], solution[n + 1], solution[n + 2]];
        let centers = samples.iter().map(|s| (s.x, s.z)).collect();

        Ok(Self {
            centers,
            weights,
            poly,
        })
    }

    fn eval(&self, x: f64, z: f64) -> f64 {
        let mut v = self.poly[0] + self.poly[1] * x + self.poly[2] * z;
        for (i, &(cx, cz)) in self.centers.iter().enumerate() {
            let r = (x - cx).hypot(z - cz);
            v += self.weights[i] * tps_kernel(r);
        }
        v
    }
}

/// Output of [`reconstruct`]: a dense `Y` grid (NaN outside the boundary,
/// before normalization the caller may still want to inspect) plus the
/// `inside` mask, both `nz x nx` row-major matching `grid`.
pub struct Reconstruction {
    pub y: Vec<f64>,
    pub inside: Vec<bool>,
    pub nx: usize,
    pub nz: usize,
}

/// Reconstruct a heightfield from traced contours, masked to a boundary
/// polygon, on the given grid.
///
/// Steps: densify contours to uniform arc spacing, fit a
/// thin-plate-spline RBF over the scattered samples, evaluate at every
/// grid point, mask outside the boundary to NaN, normalize so the
/// minimum inside-boundary elevation is 0.
pub fn reconstruct(
    boundary: &BoundaryPolygon,
    contours: &ContourSet,
    grid: &Grid,
    sample_step_ft: f64,
    smoothing: f64,
) -> Result<Reconstruction> {
    let samples = densify(contours, sample_step_ft);
    if samples.len() < MIN_SAMPLES {
        return Err(GreenReaderError::InsufficientSamples {
            got: samples.len(),
            needed: MIN_SAMPLES,
        });
    }

    let tps = ThinPlateSpline::fit(&samples, smoothing)?;

    let nx = grid.nx();
    let nz = grid.nz();
    let mut y = vec![f64::NAN; nx * nz];
    let mut inside = vec![false; nx * nz];

    let mut any_inside = false;
    for iz in 0..nz {
        for ix in 0..nx {
            let (x, z) = grid.point(iz, ix);
            let idx = iz * nx + ix;
            if boundary.contains(x, z) {
                y[idx] = tps.eval(x, z);
                inside[idx] = true;
                any_inside = true;
            }
        }
    }

    if !any_inside {
        return Err(GreenReaderError::EmptyGrid);
    }

    let min_y = y
        .iter()
        .zip(inside.iter())
        .filter(|(_, &m)| m)
        .map(|(&v, _)| v)
        .fold(f64::INFINITY, f64::min);
    for (v, &m) in y.iter_mut().zip(inside.iter()) {
        if m {
            *v -= min_y;
        }
    }

    Ok(Reconstruction { y, inside, nx, nz })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::Contour;
    use crate::grid::make_local_grid;

    fn circle_points(radius: f64, n: usize) -> Vec<(f64, f64)> {
        (0..=n)
            .map(|i| {
                let a = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                (radius * a.cos(), radius * a.sin())
            })
            .collect()
    }

    fn ringed_contours() -> ContourSet {
        ContourSet::new(vec![
            Contour {
                height_ft: 0.0,
                points_xz: circle_points(5.0, 64),
            },
            Contour {
                height_ft: 1.0,
                points_xz: circle_points(10.0, 64),
            },
            Contour {
                height_ft: 2.0,
                points_xz: circle_points(15.0, 64),
            },
        ])
    }

    #[test]
    fn too_few_samples_fails_fast() {
        let boundary = BoundaryPolygon::new(vec![(-10.0, -10.0), (10.0, -10.0), (10.0, 10.0), (-10.0, 10.0)]);
        let contours = ContourSet::new(vec![Contour {
            height_ft: 1.0,
            points_xz: vec![(0.0, 0.0), (1.0, 0.0)],
        }]);
        let grid = make_local_grid(20.0, 20.0, 1.0);
        let err = reconstruct(&boundary, &contours, &grid, 10.0, 0.25).unwrap_err();
        assert!(matches!(err, GreenReaderError::InsufficientSamples { .. }));
    }

    #[test]
    fn min_inside_is_zero_after_normalization() {
        let boundary = BoundaryPolygon::new(circle_points(20.0, 64));
        let contours = ringed_contours();
        let grid = make_local_grid(40.0, 40.0, 1.0);
        let recon = reconstruct(&boundary, &contours, &grid, 1.0, 0.25).unwrap();

        let min_inside = recon
            .y
            .iter()
            .zip(recon.inside.iter())
            .filter(|(_, &m)| m)
            .map(|(&v, _)| v)
            .fold(f64::INFINITY, f64::min);
        assert!(min_inside.abs() < 1e-6, "got {min_inside}");
    }

    #[test]
    fn outside_boundary_is_nan() {
        let boundary = BoundaryPolygon::new(circle_points(20.0, 64));
        let contours = ringed_contours();
        let grid = make_local_grid(40.0, 40.0, 1.0);
        let recon = reconstruct(&boundary, &contours, &grid, 1.0, 0.25).unwrap();

        for (idx, &m) in recon.inside.iter().enumerate() {
            if !m {
                assert!(recon.y[idx].is_nan());
            }
        }
    }

    #[test]
    fn ringed_contours_reconstruct_close_to_linear_interpolation() {
        // Contours are exact circles of radii {5,10,15} at heights {0,1,2}.
        // At radius 10 (the middle ring), the fit should land near height 1.
        let boundary = BoundaryPolygon::new(circle_points(20.0, 64));
        let contours = ringed_contours();
        let grid = make_local_grid(40.0, 40.0, 1.0);
        let recon = reconstruct(&boundary, &contours, &grid, 1.0, 0.25).unwrap();

        // Normalization shifts everything so min==0 (at radius 5). Check the
        // ring at radius 10 sits roughly 1 ft above the radius-5 ring.
        let nx = grid.nx();
        let height_at = |x: f64, z: f64| -> f64 {
            let ix = grid
                .x_axis
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| (**a - x).abs().total_cmp(&(**b - x).abs()))
                .unwrap()
                .0;
            let iz = grid
                .z_axis
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| (**a - z).abs().total_cmp(&(**b - z).abs()))
                .unwrap()
                .0;
            recon.y[iz * nx + ix]
        };

        let h5 = height_at(5.0, 0.0);
        let h10 = height_at(10.0, 0.0);
        assert!((h10 - h5 - 1.0).abs() < 0.6, "h5={h5} h10={h10}");
    }
}
