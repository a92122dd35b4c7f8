//! Uniform (x, z) grid in feet, centered at the green-local origin, and
//! the pixel <-> feet coordinate transform used to bring traced points
//! into that frame.

/// A uniform axis-aligned grid in green-local feet.
///
/// `x[i,j] = x_axis[j]`, `z[i,j] = z_axis[i]` — row-major, `nz` rows of
/// `nx` columns, matching the `Y`/`mask`/`grad_x`/`grad_z` layout in
/// [`crate::heightmap::HeightMap`].
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub x_axis: Vec<f64>,
    pub z_axis: Vec<f64>,
    pub res_ft: f64,
}

impl Grid {
    pub fn nx(&self) -> usize {
        self.x_axis.len()
    }

    pub fn nz(&self) -> usize {
        self.z_axis.len()
    }

    /// The mesh point at row `iz`, column `ix`.
    pub fn point(&self, iz: usize, ix: usize) -> (f64, f64) {
        (self.x_axis[ix], self.z_axis[iz])
    }
}

/// Build an axis-aligned grid centered on (0,0) in feet.
///
/// The last coordinate on each axis includes the far endpoint when it
/// falls on a cell boundary, so `x_axis[0] ≈ -width/2` and
/// `x_axis[last] ≈ +width/2` (same for z/height).
pub fn make_local_grid(width_ft: f64, height_ft: f64, res_ft: f64) -> Grid {
    Grid {
        x_axis: axis_range(-width_ft / 2.0, width_ft / 2.0, res_ft),
        z_axis: axis_range(-height_ft / 2.0, height_ft / 2.0, res_ft),
        res_ft,
    }
}

/// `numpy.arange(start, stop + res, res)`-equivalent: monotonically
/// increasing values from `start`, stepping by `res`, including `stop`
/// when it falls (within floating-point slop) on a step boundary.
fn axis_range(start: f64, stop: f64, res: f64) -> Vec<f64> {
    let n = ((stop - start) / res + 1e-9).floor() as i64 + 1;
    (0..n.max(1)).map(|i| start + i as f64 * res).collect()
}

/// Converts between image pixel coordinates (u right, v down, origin
/// top-left) and green-local feet (x right, z up, origin image-center).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelToFeet {
    pub img_w_px: u32,
    pub img_h_px: u32,
    pub green_width_ft: f64,
    pub green_height_ft: f64,
}

impl PixelToFeet {
    pub fn new(img_w_px: u32, img_h_px: u32, green_width_ft: f64, green_height_ft: f64) -> Self {
        Self {
            img_w_px,
            img_h_px,
            green_width_ft,
            green_height_ft,
        }
    }

    pub fn ft_per_px_x(&self) -> f64 {
        self.green_width_ft / self.img_w_px as f64
    }

    pub fn ft_per_px_z(&self) -> f64 {
        self.green_height_ft / self.img_h_px as f64
    }

    pub fn uv_to_xz(&self, u_px: f64, v_px: f64) -> (f64, f64) {
        let cu = u_px - self.img_w_px as f64 / 2.0;
        let cv = v_px - self.img_h_px as f64 / 2.0;
        (cu * self.ft_per_px_x(), -cv * self.ft_per_px_z())
    }

    pub fn xz_to_uv(&self, x_ft: f64, z_ft: f64) -> (f64, f64) {
        let u = x_ft / self.ft_per_px_x() + self.img_w_px as f64 / 2.0;
        let v = -z_ft / self.ft_per_px_z() + self.img_h_px as f64 / 2.0;
        (u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_endpoints_bracket_width_and_height() {
        let g = make_local_grid(20.0, 10.0, 0.5);
        assert!((g.x_axis[0] - (-10.0)).abs() < 1e-9);
        assert!((*g.x_axis.last().unwrap() - 10.0).abs() < 1e-9);
        assert!((g.z_axis[0] - (-5.0)).abs() < 1e-9);
        assert!((*g.z_axis.last().unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn grid_mesh_matches_axis_vectors() {
        let g = make_local_grid(4.0, 2.0, 1.0);
        for iz in 0..g.nz() {
            for ix in 0..g.nx() {
                let (x, z) = g.point(iz, ix);
                assert_eq!(x, g.x_axis[ix]);
                assert_eq!(z, g.z_axis[iz]);
            }
        }
    }

    #[test]
    fn pixel_transform_round_trips() {
        let t = PixelToFeet::new(800, 600, 100.0, 75.0);
        for &(u, v) in &[(0.0, 0.0), (800.0, 600.0), (400.0, 300.0), (123.4, 567.8)] {
            let (x, z) = t.uv_to_xz(u, v);
            let (u2, v2) = t.xz_to_uv(x, z);
            assert!((u2 - u).abs() < 1e-9, "u: {u} -> {u2}");
            assert!((v2 - v).abs() < 1e-9, "v: {v} -> {v2}");
        }
    }

    #[test]
    fn image_center_maps_to_origin() {
        let t = PixelToFeet::new(800, 600, 100.0, 75.0);
        let (x, z) = t.uv_to_xz(400.0, 300.0);
        assert!(x.abs() < 1e-9);
        assert!(z.abs() < 1e-9);
    }
}
