use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("tracker already running")]
    AlreadyRunning,
    #[error("tracker not running")]
    NotRunning,
    #[error("invalid tle: {0}")]
    InvalidTle(#[from] sgp4::TleError),
    #[error("elements error: {0}")]
    Elements(#[from] sgp4::ElementsError),
    #[error("propagation error: {0}")]
    Propagation(String),
    #[error("position is not finite")]
    NonFinite,
    #[error("unknown satellite: {0}")]
    UnknownSatellite(String),
    #[error("event queue is full")]
    QueueFull,
    #[error("no marker for satellite: {0}")]
    MarkerNotFound(String),
}

impl From<sgp4::Error> for TrackerError {
    fn from(err: sgp4::Error) -> Self {
        TrackerError::Propagation(err.to_string())
    }
}
