use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeometryError {
    #[error("a polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CaptureError {
    #[error("draw the terrain boundary on the map (at least 3 points, {points} so far)")]
    IncompletePolygon { points: usize },
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
    #[error("failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("not signed in, run `terreplus login` first")]
    Unauthenticated,
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("please fix the errors in the form:\n{0}")]
    Invalid(crate::form::FieldErrors),
    #[error("draw the terrain perimeter on the map (minimum 3 points)")]
    PolygonRequired,
    #[error("the terrain has not been saved yet, register it before estimating")]
    NotRegistered,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<GeometryError> for FormError {
    fn from(_: GeometryError) -> Self {
        FormError::PolygonRequired
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to access token file {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no config directory available to store the session token")]
    NoConfigDir,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocationError {
    #[error("permission to access location was denied")]
    PermissionDenied,
    #[error("location unavailable: {0}")]
    Unavailable(String),
}
