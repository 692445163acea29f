use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeshError {
    #[error("frames per second must be positive")]
    InvalidFramesPerSecond,
    #[error("animation speed range {min}..={max} must satisfy 0 < min <= max")]
    InvalidSpeedRange { min: f64, max: f64 },
    #[error("subdivisions must be at least 1")]
    InvalidSubdivisions,
    #[error("randomizer range {min}..={max} is empty")]
    InvalidPolicyRange { min: f32, max: f32 },
    #[error("color palette is empty")]
    EmptyPalette,
    #[error("grid of {width}x{height} is too small, both sides need at least 2 cells")]
    GridTooSmall { width: usize, height: usize },
    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}
