// Normalization pipeline: raw feed records in, renderable feature collections out

pub mod normalize;
pub mod orchestrator;

pub use normalize::{SeismicNormalizer, WeatherNormalizer};
pub use orchestrator::{fetch_snapshot, MagnitudeClass, MapSnapshot, MapSummary, Normalizers};
