//! Feed normalizers
//!
//! Each normalizer owns one upstream client and turns its payloads into a
//! [`FeatureCollection`](crate::common::types::FeatureCollection). Neither
//! returns an error: seismic fails closed to an empty collection, weather
//! degrades to synthetic data per city.

pub mod conditions;
pub mod fallback;
pub mod format;
pub mod seismic;
pub mod weather;

pub use fallback::SyntheticWeather;
pub use seismic::SeismicNormalizer;
pub use weather::WeatherNormalizer;
