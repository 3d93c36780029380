mod error;
mod loader;
mod source;
mod types;

pub use loader::{Catalog, Naming};
pub use source::Source;
pub use types::{ElementSet, SatelliteChoice, SatelliteRecord};
