//! Wire types for the artifacts this crate consumes/produces. The core
//! itself performs no I/O; these types are shared by the `tools/*`
//! binaries so every adapter agrees on one shape.

use serde::{Deserialize, Serialize};

use crate::heightmap::HeightMap;

/// `config.json`'s extents object: four (lat, lon) anchors bounding the
/// green, plus the contour tracing interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtentsConfig {
    pub north: LatLonRecord,
    pub south: LatLonRecord,
    pub east: LatLonRecord,
    pub west: LatLonRecord,
    #[serde(default = "default_contour_interval_ft")]
    pub contour_interval_ft: f64,
}

fn default_contour_interval_ft() -> f64 {
    0.25
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonRecord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointXz {
    pub x: f64,
    pub z: f64,
}

/// `boundary.json`: the traced green outline in image pixels plus its
/// real-world extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryRecord {
    pub image_w_px: u32,
    pub image_h_px: u32,
    pub green_width_ft: f64,
    pub green_height_ft: f64,
    pub points_xz_ft: Vec<PointXz>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourEntry {
    pub k: i64,
    pub height_ft: f64,
    pub points_xz_ft: Vec<PointXz>,
}

/// `contours.json`: same header as [`BoundaryRecord`] plus the traced
/// iso-elevation polylines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContoursRecord {
    pub image_w_px: u32,
    pub image_h_px: u32,
    pub green_width_ft: f64,
    pub green_height_ft: f64,
    pub contour_interval_ft: f64,
    pub contours: Vec<ContourEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitsRecord {
    pub x: String,
    pub z: String,
    pub y: String,
}

impl Default for UnitsRecord {
    fn default() -> Self {
        Self {
            x: "ft".to_string(),
            z: "ft".to_string(),
            y: "ft".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridRecord {
    pub nx: usize,
    pub nz: usize,
    pub resolution_ft: f64,
    pub x_min_ft: f64,
    pub z_min_ft: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskRecord {
    pub format: String,
    pub note: String,
}

impl Default for MaskRecord {
    fn default() -> Self {
        Self {
            format: "uint8-sidecar".to_string(),
            note: "1 byte per cell, row-major nz*nx, stored alongside the heightfield binary \
                   in a <name>.mask file; 1 = inside green, 0 = outside"
                .to_string(),
        }
    }
}

/// The heightfield artifact's JSON sidecar: units, grid shape, and mask
/// format. The elevation values themselves live in a separate flat
/// binary file; the validity mask lives in a second `<name>.mask` file,
/// stored explicitly rather than derived from `Y > 0` on reload, since a
/// reconstructed green can legitimately dip below its normalized zero at
/// interior cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightfieldSidecar {
    pub units: UnitsRecord,
    pub grid: GridRecord,
    pub mask: MaskRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hole_xz_ft: Option<PointXz>,
}

/// The camelCase BestLine transport record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestLineRecord {
    pub ball_x_ft: f64,
    pub ball_z_ft: f64,
    pub hole_x_ft: f64,
    pub hole_z_ft: f64,
    pub stimp_ft: f64,
    pub aim_offset_deg: f64,
    pub speed_fps: f64,
    pub v0_x_fps: f64,
    pub v0_z_fps: f64,
    pub holed: bool,
    pub miss_ft: f64,
    pub t_end_s: f64,
    pub path_x_ft: Vec<f64>,
    pub path_z_ft: Vec<f64>,
    pub path_y_ft: Vec<f64>,
}

impl From<&crate::result::BestLine> for BestLineRecord {
    fn from(line: &crate::result::BestLine) -> Self {
        Self {
            ball_x_ft: line.ball_x_ft,
            ball_z_ft: line.ball_z_ft,
            hole_x_ft: line.hole_x_ft,
            hole_z_ft: line.hole_z_ft,
            stimp_ft: line.stimp_ft,
            aim_offset_deg: line.aim_offset_deg,
            speed_fps: line.v0_speed_fps,
            v0_x_fps: line.v0_x_fps,
            v0_z_fps: line.v0_z_fps,
            holed: line.holed,
            miss_ft: line.miss_ft,
            t_end_s: line.t_end_s,
            path_x_ft: line.path_x_ft.clone(),
            path_z_ft: line.path_z_ft.clone(),
            path_y_ft: line.path_y_ft.clone(),
        }
    }
}

/// Encode a heightmap's `Y` array as row-major `nz*nx` little-endian
/// `f32`s, NaN cells stored as `0.0`.
pub fn encode_heightfield_binary(hm: &HeightMap) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(hm.y.len() * 4);
    for &v in &hm.y {
        let v32 = if v.is_nan() { 0.0_f32 } else { v as f32 };
        bytes.extend_from_slice(&v32.to_le_bytes());
    }
    bytes
}

/// Encode the mask as one byte per cell: `1` inside, `0` outside.
pub fn encode_mask_bytes(hm: &HeightMap) -> Vec<u8> {
    hm.mask.iter().map(|&m| u8::from(m)).collect()
}

/// The sidecar JSON describing a heightfield binary written by
/// [`encode_heightfield_binary`]/[`encode_mask_bytes`].
pub fn sidecar_for(hm: &HeightMap, hole_xz_ft: Option<PointXz>) -> HeightfieldSidecar {
    HeightfieldSidecar {
        units: UnitsRecord::default(),
        grid: GridRecord {
            nx: hm.nx(),
            nz: hm.nz(),
            resolution_ft: hm.grid.res_ft,
            x_min_ft: hm.grid.x_axis[0],
            z_min_ft: hm.grid.z_axis[0],
        },
        mask: MaskRecord::default(),
        hole_xz_ft,
    }
}

/// Reconstruct a [`HeightMap`] from the binary payload, mask bytes, and
/// sidecar metadata written by the encode functions above.
pub fn decode_heightfield(
    sidecar: &HeightfieldSidecar,
    binary: &[u8],
    mask_bytes: &[u8],
) -> crate::error::Result<HeightMap> {
    let nx = sidecar.grid.nx;
    let nz = sidecar.grid.nz;
    let res = sidecar.grid.resolution_ft;

    let x_axis: Vec<f64> = (0..nx).map(|j| sidecar.grid.x_min_ft + j as f64 * res).collect();
    let z_axis: Vec<f64> = (0..nz).map(|i| sidecar.grid.z_min_ft + i as f64 * res).collect();
    let grid = crate::grid::Grid { x_axis, z_axis, res_ft: res };

    let y: Vec<f64> = binary
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64)
        .collect();
    let mask: Vec<bool> = mask_bytes.iter().map(|&b| b != 0).collect();

    let mut y = y;
    for (v, &m) in y.iter_mut().zip(mask.iter()) {
        if !m {
            *v = f64::NAN;
        }
    }

    HeightMap::new(grid, y, Some(mask))
}
