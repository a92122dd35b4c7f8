//! The heightmap: a uniform grid of elevations plus a validity mask and
//! derived gradient fields.

use crate::error::{GreenReaderError, Result};
use crate::grid::Grid;

/// A uniform (X, Z, Y) heightfield in feet, with a boundary mask and
/// (once [`HeightMap::compute_gradients`] is called) derived gradient
/// fields.
///
/// Storage is row-major `nz x nx`, matching [`Grid`].
#[derive(Debug, Clone)]
pub struct HeightMap {
    pub grid: Grid,
    /// Elevation, feet. NaN where `mask` is false, prior to any fill.
    pub y: Vec<f64>,
    pub mask: Vec<bool>,
    pub grad_x: Option<Vec<f64>>,
    pub grad_z: Option<Vec<f64>>,
    pub slope: Option<Vec<f64>>,
}

impl HeightMap {
    /// Construct a heightmap from grid + elevation arrays. `mask`
    /// defaults to `!y[i].is_nan()` when omitted.
    pub fn new(grid: Grid, y: Vec<f64>, mask: Option<Vec<bool>>) -> Result<Self> {
        let expected = grid.nx() * grid.nz();
        if y.len() != expected {
            return Err(GreenReaderError::ShapeMismatch {
                x_shape: (grid.nz(), grid.nx()),
                z_shape: (grid.nz(), grid.nx()),
                y_shape: (y.len(), 1),
            });
        }
        let mask = match mask {
            Some(m) if m.len() == expected => m,
            Some(m) => {
                return Err(GreenReaderError::ShapeMismatch {
                    x_shape: (grid.nz(), grid.nx()),
                    z_shape: (grid.nz(), grid.nx()),
                    y_shape: (m.len(), 1),
                })
            }
            None => y.iter().map(|v| !v.is_nan()).collect(),
        };

        Ok(Self {
            grid,
            y,
            mask,
            grad_x: None,
            grad_z: None,
            slope: None,
        })
    }

    /// A flat disc of the given radius, centered at the origin. `Y = 0`
    /// inside, NaN outside. Used by tests and scenario fixtures.
    pub fn circular(radius_ft: f64, res_ft: f64) -> Self {
        let grid = crate::grid::make_local_grid(2.0 * radius_ft, 2.0 * radius_ft, res_ft);
        let nx = grid.nx();
        let nz = grid.nz();
        let mut y = vec![0.0; nx * nz];
        let mut mask = vec![false; nx * nz];

        for iz in 0..nz {
            for ix in 0..nx {
                let (x, z) = grid.point(iz, ix);
                let idx = iz * nx + ix;
                if x * x + z * z <= radius_ft * radius_ft {
                    mask[idx] = true;
                } else {
                    y[idx] = f64::NAN;
                }
            }
        }

        Self {
            grid,
            y,
            mask,
            grad_x: None,
            grad_z: None,
            slope: None,
        }
    }

    pub fn nx(&self) -> usize {
        self.grid.nx()
    }

    pub fn nz(&self) -> usize {
        self.grid.nz()
    }

    fn idx(&self, iz: usize, ix: usize) -> usize {
        iz * self.nx() + ix
    }

    /// `Y += slope_x * X + slope_z * Z` on masked cells. `slope_x`,
    /// `slope_z` are dimensionless rise/run (e.g. `0.02` = 2% grade).
    pub fn add_planar_slope(&mut self, slope_x: f64, slope_z: f64) {
        let nx = self.nx();
        for iz in 0..self.nz() {
            for ix in 0..nx {
                let idx = self.idx(iz, ix);
                if self.mask[idx] {
                    let (x, z) = self.grid.point(iz, ix);
                    self.y[idx] += slope_x * x + slope_z * z;
                }
            }
        }
    }

    /// Adds a smooth Gaussian bump (or, with negative `height_ft`, a
    /// bowl) centered at `(cx, cz)`.
    pub fn add_gaussian_bump(&mut self, cx: f64, cz: f64, height_ft: f64, sigma_ft: f64) {
        let nx = self.nx();
        for iz in 0..self.nz() {
            for ix in 0..nx {
                let idx = self.idx(iz, ix);
                if self.mask[idx] {
                    let (x, z) = self.grid.point(iz, ix);
                    let dx = x - cx;
                    let dz = z - cz;
                    let bump = height_ft * (-(dx * dx + dz * dz) / (2.0 * sigma_ft * sigma_ft)).exp();
                    self.y[idx] += bump;
                }
            }
        }
    }

    /// Shifts elevations so the minimum masked value is 0.
    pub fn normalize(&mut self) {
        let min_y = self
            .y
            .iter()
            .zip(self.mask.iter())
            .filter(|(_, &m)| m)
            .map(|(&v, _)| v)
            .fold(f64::INFINITY, f64::min);
        if min_y.is_finite() {
            for (v, &m) in self.y.iter_mut().zip(self.mask.iter()) {
                if m {
                    *v -= min_y;
                }
            }
        }
    }

    /// Centered finite-difference gradients at cell spacing `res_ft`.
    ///
    /// NaN/out-of-mask cells are filled with 0 before differencing so the
    /// boundary doesn't corrupt interior derivatives; gradients at
    /// out-of-mask cells are then set to NaN. Must be called before any
    /// gradient query.
    pub fn compute_gradients(&mut self) {
        let nx = self.nx();
        let nz = self.nz();
        let res = self.grid.res_ft;

        let filled: Vec<f64> = self
            .y
            .iter()
            .zip(self.mask.iter())
            .map(|(&v, &m)| if m { v } else { 0.0 })
            .collect();

        let mut grad_x = vec![0.0; nx * nz];
        let mut grad_z = vec![0.0; nx * nz];
        let mut slope = vec![0.0; nx * nz];

        for iz in 0..nz {
            for ix in 0..nx {
                let idx = iz * nx + ix;

                let left = if ix == 0 { 0 } else { ix - 1 };
                let right = if ix + 1 >= nx { nx - 1 } else { ix + 1 };
                let dx = (right - left).max(1) as f64 * res;
                let dvdx = (filled[iz * nx + right] - filled[iz * nx + left]) / dx;

                let down = if iz == 0 { 0 } else { iz - 1 };
                let up = if iz + 1 >= nz { nz - 1 } else { iz + 1 };
                let dz = (up - down).max(1) as f64 * res;
                let dvdz = (filled[up * nx + ix] - filled[down * nx + ix]) / dz;

                if self.mask[idx] {
                    grad_x[idx] = dvdx;
                    grad_z[idx] = dvdz;
                    slope[idx] = (dvdx * dvdx + dvdz * dvdz).sqrt();
                } else {
                    grad_x[idx] = f64::NAN;
                    grad_z[idx] = f64::NAN;
                    slope[idx] = f64::NAN;
                }
            }
        }

        self.grad_x = Some(grad_x);
        self.grad_z = Some(grad_z);
        self.slope = Some(slope);
    }

    /// Nearest-lower-or-equal grid index for `(x, z)`, clamped to
    /// `[0, n-1]` on each axis. Deliberately not bilinear: the simulator is
    /// stable with a piecewise-constant gradient under small `dt`.
    pub fn index_of(&self, x: f64, z: f64) -> (usize, usize) {
        (
            lower_bound_index(&self.grid.z_axis, z),
            lower_bound_index(&self.grid.x_axis, x),
        )
    }

    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        let (iz, ix) = self.index_of(x, z);
        self.y[self.idx(iz, ix)]
    }

    pub fn gradient_at(&self, x: f64, z: f64) -> Result<(f64, f64)> {
        let (gx, gz) = match (&self.grad_x, &self.grad_z) {
            (Some(gx), Some(gz)) => (gx, gz),
            _ => return Err(GreenReaderError::GradientsNotComputed),
        };
        let (iz, ix) = self.index_of(x, z);
        let idx = self.idx(iz, ix);
        Ok((gx[idx], gz[idx]))
    }

    pub fn inside_mask_at(&self, x: f64, z: f64) -> bool {
        let (iz, ix) = self.index_of(x, z);
        self.mask[self.idx(iz, ix)]
    }
}

/// Binary-search for the index of the last value `<= target`, clamped to
/// `[0, axis.len()-1]`. Mirrors `numpy.searchsorted(axis, target) - 1`
/// then clamped.
fn lower_bound_index(axis: &[f64], target: f64) -> usize {
    if axis.is_empty() {
        return 0;
    }
    // partition_point returns the first index where axis[i] > target.
    let pos = axis.partition_point(|&v| v <= target);
    pos.saturating_sub(1).min(axis.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_heightmap_masks_outside_disc() {
        let hm = HeightMap::circular(10.0, 1.0);
        assert!(hm.inside_mask_at(0.0, 0.0));
        assert!(!hm.inside_mask_at(50.0, 50.0));
    }

    #[test]
    fn planar_slope_then_normalize_has_zero_minimum() {
        let mut hm = HeightMap::circular(10.0, 0.5);
        hm.add_planar_slope(0.0, 0.03);
        hm.normalize();
        let min_inside = hm
            .y
            .iter()
            .zip(hm.mask.iter())
            .filter(|(_, &m)| m)
            .map(|(&v, _)| v)
            .fold(f64::INFINITY, f64::min);
        assert!(min_inside.abs() < 1e-9, "got {min_inside}");
    }

    #[test]
    fn gradients_nan_iff_outside_mask() {
        let mut hm = HeightMap::circular(10.0, 1.0);
        hm.add_planar_slope(0.02, 0.0);
        hm.compute_gradients();
        let gx = hm.grad_x.as_ref().unwrap();
        for (idx, &m) in hm.mask.iter().enumerate() {
            assert_eq!(gx[idx].is_nan(), !m);
        }
    }

    #[test]
    fn gradient_query_before_compute_errors() {
        let hm = HeightMap::circular(5.0, 1.0);
        assert!(matches!(
            hm.gradient_at(0.0, 0.0),
            Err(GreenReaderError::GradientsNotComputed)
        ));
    }

    #[test]
    fn planar_slope_gradient_matches_slope_coefficients() {
        let mut hm = HeightMap::circular(10.0, 0.5);
        hm.add_planar_slope(0.02, -0.03);
        hm.compute_gradients();
        let (gx, gz) = hm.gradient_at(0.0, 0.0).unwrap();
        assert!((gx - 0.02).abs() < 1e-6, "gx={gx}");
        assert!((gz - (-0.03)).abs() < 1e-6, "gz={gz}");
    }

    #[test]
    fn index_of_clamps_to_grid_bounds() {
        let hm = HeightMap::circular(5.0, 1.0);
        let (iz, ix) = hm.index_of(1000.0, -1000.0);
        assert_eq!(ix, hm.nx() - 1);
        assert_eq!(iz, 0);
    }
}
