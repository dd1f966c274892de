//! Normalizes Indonesian hazard feeds into map-ready feature collections.
//!
//! Two upstreams are covered: the BMKG earthquake feeds and OpenWeatherMap
//! current conditions for one representative city per province. Both are
//! reduced to [`FeatureCollection`]s of WGS84 points with display-formatted
//! attributes and a provenance tag.

pub mod apis;
pub mod app;
pub mod common;
pub mod config;
pub mod infra;
pub mod observability;
pub mod pipeline;
pub mod registry;

pub use common::{Category, Feature, FeatureCollection, FeedError, Position, Result};
pub use config::Config;
pub use pipeline::{
    fetch_snapshot, MagnitudeClass, MapSnapshot, MapSummary, Normalizers, SeismicNormalizer,
    WeatherNormalizer,
};
