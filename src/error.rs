use thiserror::Error;

/// Errors of the oscillator strength and spectrum pipeline.
///
/// Configuration errors are raised before any frame is touched. Lookup and dimension errors
/// abort the frame they occur in, and are wrapped into [SpectrumError::Frame] so that the
/// geometry index is always part of the message.
#[derive(Error, Debug)]
pub enum SpectrumError {
    /// Invalid user input, detected before the computation starts
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Requested data is neither in the store nor available from the provider
    #[error("no data stored under the key: {key}")]
    Lookup { key: String },
    /// Basis function counts (or tensor shapes) that should agree do not
    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        found: usize,
    },
    #[error("orbital index {state} is out of range, the frame has {n_orbitals} orbitals")]
    StateOutOfRange { state: usize, n_orbitals: usize },
    #[error("unknown chemical element: {0}")]
    UnknownElement(String),
    /// The external multipole integral program failed
    #[error("multipole kernel failed: {0}")]
    Kernel(String),
    /// A worker panicked while it held the basis size registry of the integral cache
    #[error("the registry of basis sizes is poisoned")]
    DimensionRegistry,
    /// No frame of the sweep produced a transition
    #[error("no transitions are available for the spectrum")]
    EmptySweep,
    #[error("frame {frame}: {source}")]
    Frame {
        frame: usize,
        #[source]
        source: Box<SpectrumError>,
    },
    #[error("unable to read the trajectory: {0}")]
    Trajectory(#[from] chemfiles::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to read tensor: {0}")]
    ReadNpy(#[from] ndarray_npy::ReadNpyError),
    #[error("unable to write tensor: {0}")]
    WriteNpy(#[from] ndarray_npy::WriteNpyError),
    #[error("incomplete exporter: {0}")]
    Builder(#[from] derive_builder::UninitializedFieldError),
    #[error("tensor has an unexpected shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl SpectrumError {
    /// Attach the geometry index to an error, unless it already carries one.
    pub fn in_frame(self, frame: usize) -> Self {
        match self {
            SpectrumError::Frame { .. } => self,
            other => SpectrumError::Frame {
                frame,
                source: Box::new(other),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, SpectrumError>;
