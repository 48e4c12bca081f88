use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Market data retrieval errors.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("market data request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("market data request timed out")]
    Timeout,

    #[error("market data service returned HTTP {status}")]
    Status { status: u16 },

    #[error("market data response could not be decoded: {0}")]
    Decode(String),

    #[error("market data source unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        match err.status() {
            Some(status) => Self::Status {
                status: status.as_u16(),
            },
            None if err.is_decode() => Self::Decode(err.to_string()),
            None => Self::Request(err),
        }
    }
}

/// The market snapshot cannot be scored as delivered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataShapeError {
    #[error("no records returned from market data source")]
    NoRecords,

    #[error("required column '{column}' missing from market data")]
    MissingColumn { column: &'static str },
}

/// Anomaly model construction and prediction errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("training matrix is empty")]
    EmptyTrainingSet,

    #[error("feature vector has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("feature '{feature}' is not finite ({value})")]
    NonFiniteFeature { feature: &'static str, value: f64 },

    #[error("model has no trees")]
    Untrained,
}

/// Model artifact storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to read model artifact: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write model artifact: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to decode model artifact: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode model artifact: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("model artifact is corrupt: {0}")]
    Corrupt(#[source] ModelError),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    DataShape(#[from] DataShapeError),

    #[error("no market data available")]
    NoMatch,

    #[error("invalid vendor price")]
    InvalidInput { value: String },

    #[error("model prediction failed: {0}")]
    Model(#[from] ModelError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
