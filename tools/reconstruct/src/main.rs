//! Reads a hole directory's `config.json` / `boundary.json` /
//! `contours.json`, reconstructs the heightfield, and writes the
//! artifact (binary + mask + sidecar JSON) back into it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use greenreader_core::geo::{infer_green_size_ft, Extents, LatLon};
use greenreader_core::grid::make_local_grid;
use greenreader_core::heightmap::HeightMap;
use greenreader_core::io::{
    encode_heightfield_binary, encode_mask_bytes, sidecar_for, BoundaryRecord, ContoursRecord,
    ExtentsConfig, PointXz,
};
use greenreader_core::polygon::BoundaryPolygon;
use greenreader_core::reconstruct::{reconstruct, DEFAULT_SAMPLE_STEP_FT, DEFAULT_SMOOTHING};
use greenreader_core::{Contour, ContourSet};

#[derive(Parser, Debug)]
#[command(
    name = "reconstruct",
    about = "Reconstruct a green's heightfield from traced boundary/contour JSON"
)]
struct Args {
    /// Hole directory containing config.json, boundary.json, contours.json.
    hole_dir: PathBuf,

    /// Grid cell size, feet.
    #[arg(long, default_value = "0.5")]
    resolution_ft: f64,

    /// Output file stem, relative to hole_dir (writes <stem>.bin, <stem>.mask, <stem>.json).
    #[arg(long, default_value = "heightfield")]
    out_stem: String,
}

#[derive(serde::Deserialize)]
struct ConfigFile {
    extents: ExtentsConfig,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let hole_dir = &args.hole_dir;

    let config: ConfigFile = read_json(&hole_dir.join("config.json"))?;
    let boundary: BoundaryRecord = read_json(&hole_dir.join("boundary.json"))?;
    let contours: ContoursRecord = read_json(&hole_dir.join("contours.json"))?;

    let extents = Extents {
        north: LatLon::new(config.extents.north.lat, config.extents.north.lon),
        south: LatLon::new(config.extents.south.lat, config.extents.south.lon),
        east: LatLon::new(config.extents.east.lat, config.extents.east.lon),
        west: LatLon::new(config.extents.west.lat, config.extents.west.lon),
    };
    let (green_width_ft, green_height_ft) = infer_green_size_ft(&extents);
    log::info!(
        "{}: inferred green size {:.1} x {:.1} ft",
        hole_dir.display(),
        green_width_ft,
        green_height_ft
    );

    let boundary_poly = BoundaryPolygon::new(to_points(&boundary.points_xz_ft));
    let contour_set = ContourSet::new(
        contours
            .contours
            .iter()
            .map(|c| Contour {
                height_ft: c.height_ft,
                points_xz: to_points(&c.points_xz_ft),
            })
            .collect(),
    );

    let grid = make_local_grid(green_width_ft, green_height_ft, args.resolution_ft);
    let recon = reconstruct(
        &boundary_poly,
        &contour_set,
        &grid,
        DEFAULT_SAMPLE_STEP_FT,
        DEFAULT_SMOOTHING,
    )
    .context("reconstructing heightfield")?;

    let hm = HeightMap::new(grid, recon.y, Some(recon.inside)).context("assembling heightmap")?;

    let bin_path = hole_dir.join(format!("{}.bin", args.out_stem));
    let mask_path = hole_dir.join(format!("{}.mask", args.out_stem));
    let json_path = hole_dir.join(format!("{}.json", args.out_stem));

    fs::write(&bin_path, encode_heightfield_binary(&hm))
        .with_context(|| format!("writing {}", bin_path.display()))?;
    fs::write(&mask_path, encode_mask_bytes(&hm))
        .with_context(|| format!("writing {}", mask_path.display()))?;

    let sidecar = sidecar_for(&hm, None);
    fs::write(&json_path, serde_json::to_string_pretty(&sidecar)?)
        .with_context(|| format!("writing {}", json_path.display()))?;

    log::info!(
        "wrote {} ({}x{} cells)",
        bin_path.display(),
        hm.nx(),
        hm.nz()
    );

    Ok(())
}

fn to_points(points: &[PointXz]) -> Vec<(f64, f64)> {
    points.iter().map(|p| (p.x, p.z)).collect()
}
