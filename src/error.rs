use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("black hole mass must be positive and finite, got {0}")]
    InvalidMass(f64),

    #[error("image dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown camera view '{0}'")]
    UnknownView(String),

    #[error("render worker {0} panicked")]
    WorkerPanicked(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
