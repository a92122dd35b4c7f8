//! Pure numerical core for computing a golf green's putting line.
//!
//! Reconstructs a dense heightfield from traced boundary/contour
//! polylines, simulates ball roll over it with Stimp-calibrated
//! resistance, and searches launch angle/speed for the best line to the
//! hole. No filesystem or network I/O happens in this crate; see the
//! `tools/*` binaries for adapters that read/write the artifacts in
//! [`io`].

pub mod contour;
pub mod error;
pub mod geo;
pub mod grid;
pub mod heightmap;
pub mod io;
pub mod optimizer;
pub mod polygon;
pub mod reconstruct;
pub mod result;
pub mod simulator;

pub use contour::{Contour, ContourSet};
pub use error::{GreenReaderError, Result};
pub use heightmap::HeightMap;
pub use optimizer::{Candidate, LineOptimizer, OptimizerResult};
pub use result::{BestLine, ResultEncoder};
pub use simulator::{RollSimulator, RollSimulatorParams, SimulationResult};
