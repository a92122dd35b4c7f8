use thiserror::Error;

/// Errors raised by the core numerical pipeline.
///
/// Off-green / stopped / timeout / holed termination are not represented
/// here — they are not errors, and are surfaced as fields on the
/// simulator's result instead (see [`crate::simulator::SimulationResult`]).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GreenReaderError {
    #[error("shape mismatch: X, Z, Y must have the same dimensions (got {x_shape:?}, {z_shape:?}, {y_shape:?})")]
    ShapeMismatch {
        x_shape: (usize, usize),
        z_shape: (usize, usize),
        y_shape: (usize, usize),
    },

    #[error("insufficient contour samples for reconstruction: got {got}, need at least {needed}")]
    InsufficientSamples { got: usize, needed: usize },

    #[error("thin-plate-spline solver reported an ill-conditioned fit")]
    SingularFit,

    #[error("heightmap gradients not computed; call compute_gradients() first")]
    GradientsNotComputed,

    #[error("invalid stimp_ft: {stimp_ft} (must be > 0)")]
    InvalidStimp { stimp_ft: f64 },

    #[error("reconstruction produced an empty grid: no cells inside the boundary")]
    EmptyGrid,
}

pub type Result<T> = std::result::Result<T, GreenReaderError>;
