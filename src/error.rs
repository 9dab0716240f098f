use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToneCipherError {
    #[error("Audio format mismatch: {0}")]
    FormatMismatch(String),

    #[error("Invalid frequency value: {token:?}")]
    Parse { token: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid WAV container: {0}")]
    InvalidContainer(String),

    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<hound::Error> for ToneCipherError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => ToneCipherError::Io(e),
            other => ToneCipherError::InvalidContainer(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ToneCipherError>;
