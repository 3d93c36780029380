mod error;
mod position;
mod selection;
mod session;
mod trail;
mod tracker;
mod types;

pub use error::TrackerError;
pub use position::Sgp4Propagator;
pub use selection::Popup;
pub use session::Session;
pub use trail::DEFAULT_TRAIL_LENGTH;
pub use tracker::{Tracker, TrackerMode, TrackerSettings, DEFAULT_UPDATE_INTERVAL};
pub use types::{Event, Position, Telemetry, ViewState};
