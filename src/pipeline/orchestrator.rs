use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::app::ports::HttpClientPort;
use crate::common::constants::{MAJOR_MAGNITUDE, MAJOR_MARKER_COLOR, MINOR_MARKER_COLOR};
use crate::common::error::Result;
use crate::common::types::FeatureCollection;
use crate::config::Config;
use crate::infra::http_client::ReqwestHttp;
use crate::pipeline::normalize::seismic::attr as seismic_attr;
use crate::pipeline::normalize::weather::attr as weather_attr;
use crate::pipeline::normalize::{SeismicNormalizer, WeatherNormalizer};

/// Marker class for a seismic feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MagnitudeClass {
    Major,
    Minor,
}

impl MagnitudeClass {
    /// Unparseable magnitudes count as minor
    pub fn from_attribute(magnitude: &str) -> Self {
        match magnitude.trim().replace(',', ".").parse::<f64>() {
            Ok(m) if m >= MAJOR_MAGNITUDE => MagnitudeClass::Major,
            _ => MagnitudeClass::Minor,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            MagnitudeClass::Major => MAJOR_MARKER_COLOR,
            MagnitudeClass::Minor => MINOR_MARKER_COLOR,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapSummary {
    pub total_seismic: usize,
    pub total_weather: usize,
    pub provinces_covered: usize,
    pub major_seismic: usize,
}

impl MapSummary {
    pub fn from_collections(seismic: &FeatureCollection, weather: &FeatureCollection) -> Self {
        let provinces: BTreeSet<&str> = weather
            .iter()
            .filter_map(|f| f.attr(weather_attr::PROVINCE))
            .filter(|p| !p.is_empty())
            .collect();
        let major_seismic = seismic
            .iter()
            .filter_map(|f| f.attr(seismic_attr::MAGNITUDE))
            .filter(|m| MagnitudeClass::from_attribute(m) == MagnitudeClass::Major)
            .count();

        Self {
            total_seismic: seismic.len(),
            total_weather: weather.len(),
            provinces_covered: provinces.len(),
            major_seismic,
        }
    }
}

/// Everything the map renders in one refresh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapSnapshot {
    pub seismic: FeatureCollection,
    pub weather: FeatureCollection,
    pub summary: MapSummary,
}

/// Both normalizers wired to one shared HTTP client
pub struct Normalizers {
    pub seismic: SeismicNormalizer,
    pub weather: WeatherNormalizer,
}

impl Normalizers {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http: Arc<dyn HttpClientPort> = Arc::new(ReqwestHttp::new(&config.http)?);
        let api_key = config.openweather_key();
        if api_key.is_none() {
            warn!("No OpenWeatherMap API key configured; weather will be synthetic");
        }
        Ok(Self::with_http(http, config, api_key))
    }

    pub fn with_http(
        http: Arc<dyn HttpClientPort>,
        config: &Config,
        api_key: Option<String>,
    ) -> Self {
        Self {
            seismic: SeismicNormalizer::new(http.clone(), config.seismic.clone()),
            weather: WeatherNormalizer::new(http, config.weather.clone(), api_key),
        }
    }

    pub async fn snapshot(&self) -> MapSnapshot {
        fetch_snapshot(&self.seismic, &self.weather).await
    }
}

/// Fetch both feeds concurrently
#[instrument(skip_all)]
pub async fn fetch_snapshot(seismic: &SeismicNormalizer, weather: &WeatherNormalizer) -> MapSnapshot {
    let (seismic, weather) = tokio::join!(
        seismic.fetch_significant_events(),
        weather.fetch_current_weather()
    );
    let summary = MapSummary::from_collections(&seismic, &weather);
    info!(
        total_seismic = summary.total_seismic,
        total_weather = summary.total_weather,
        provinces_covered = summary.provinces_covered,
        major_seismic = summary.major_seismic,
        "Snapshot complete"
    );
    MapSnapshot {
        seismic,
        weather,
        summary,
    }
}
