use crate::param::Valid;

/// Error returned from lens, light and parameter evaluation
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LensError {
    #[error("parameter {key} is free but no value was supplied")]
    UnresolvedParameter { key: String },

    #[error("parameter {key} has the wrong kind: expected {expected}")]
    WrongParameterKind { key: String, expected: &'static str },

    #[error("parameter {key} = {value} is outside of its valid range {valid:?}")]
    OutOfRange { key: String, value: f64, valid: Valid },

    #[error("core radius and scale radius must differ, both are {0}")]
    DegenerateRadii(f64),

    #[error("array shape {actual:?} doesn't match the expected shape {expected:?}")]
    ShapeMismatch {
        actual: (usize, usize),
        expected: (usize, usize),
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("FFT failed: {0}")]
    Fft(String),
}

/// Error returned from the image simulators
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SimulatorError {
    #[error(transparent)]
    Lens(#[from] LensError),

    #[error("convolution mode should be one of 'fft' or 'conv2d', not '{0}'")]
    UnknownConvolutionMode(String),

    #[error("invalid PSF: {0}")]
    InvalidPsf(String),

    #[error("invalid simulator configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<realfft::FftError> for LensError {
    fn from(error: realfft::FftError) -> Self {
        Self::Fft(error.to_string())
    }
}

impl From<realfft::FftError> for SimulatorError {
    fn from(error: realfft::FftError) -> Self {
        LensError::from(error).into()
    }
}
