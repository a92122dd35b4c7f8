//! Reads a heightfield artifact and ball/hole/stimp parameters, searches
//! for the best putting line, and writes a `BestLine` transport record.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use greenreader_core::io::{decode_heightfield, BestLineRecord, HeightfieldSidecar};
use greenreader_core::{LineOptimizer, ResultEncoder, RollSimulator};

#[derive(Parser, Debug)]
#[command(name = "bestline", about = "Compute the recommended putting line for a green")]
struct Args {
    /// Hole directory containing the heightfield artifact.
    hole_dir: PathBuf,

    /// Heightfield artifact file stem (matches what tools/reconstruct wrote).
    #[arg(long, default_value = "heightfield")]
    stem: String,

    #[arg(long)]
    ball_x_ft: f64,
    #[arg(long)]
    ball_z_ft: f64,
    #[arg(long)]
    hole_x_ft: f64,
    #[arg(long)]
    hole_z_ft: f64,

    /// Green speed, Stimpmeter feet.
    #[arg(long)]
    stimp_ft: f64,

    /// Write the BestLine JSON record here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let hole_dir = &args.hole_dir;

    let bin_path = hole_dir.join(format!("{}.bin", args.stem));
    let mask_path = hole_dir.join(format!("{}.mask", args.stem));
    let json_path = hole_dir.join(format!("{}.json", args.stem));

    let sidecar_raw =
        fs::read_to_string(&json_path).with_context(|| format!("reading {}", json_path.display()))?;
    let sidecar: HeightfieldSidecar =
        serde_json::from_str(&sidecar_raw).with_context(|| format!("parsing {}", json_path.display()))?;
    let binary = fs::read(&bin_path).with_context(|| format!("reading {}", bin_path.display()))?;
    let mask_bytes = fs::read(&mask_path).with_context(|| format!("reading {}", mask_path.display()))?;

    let mut hm = decode_heightfield(&sidecar, &binary, &mask_bytes).context("decoding heightfield")?;
    hm.compute_gradients();

    log::info!(
        "{}: loaded {}x{} heightfield, searching for best line",
        hole_dir.display(),
        hm.nx(),
        hm.nz()
    );

    let sim = RollSimulator::with_defaults(&hm, args.stimp_ft).context("constructing simulator")?;
    let optimizer = LineOptimizer::default();
    let outcome = optimizer.run(&sim, args.ball_x_ft, args.ball_z_ft, args.hole_x_ft, args.hole_z_ft);
    let best = outcome.best();

    log::info!(
        "best line: offset={:.2} deg speed={:.2} fps holed={} miss={:.3} ft",
        best.angle_deg,
        best.speed_fps,
        best.result.holed,
        best.miss_ft
    );

    let line = ResultEncoder::encode(
        args.stimp_ft,
        args.ball_x_ft,
        args.ball_z_ft,
        args.hole_x_ft,
        args.hole_z_ft,
        best,
    );
    let record: BestLineRecord = (&line).into();
    let json = serde_json::to_string_pretty(&record)?;

    match args.out {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        }
        None => println!("{json}"),
    }

    Ok(())
}
