use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::apis::openweather::{CurrentWeather, OpenWeatherClient};
use crate::app::ports::HttpClientPort;
use crate::common::constants::{OPENWEATHER_PROVENANCE, UNKNOWN_CONDITION};
use crate::common::types::{Category, Feature, FeatureCollection, Position};
use crate::config::WeatherConfig;
use crate::observability::metrics;
use crate::pipeline::normalize::conditions::icon_for_condition;
use crate::pipeline::normalize::fallback::SyntheticWeather;
use crate::pipeline::normalize::format;
use crate::registry::{City, CITIES};

/// Attribute keys on weather features
pub mod attr {
    pub const NAME: &str = "name";
    pub const PROVINCE: &str = "province";
    pub const CONDITION: &str = "condition";
    pub const CONDITION_MAIN: &str = "condition_main";
    pub const ICON: &str = "icon";
    pub const TEMPERATURE: &str = "temperature";
    pub const FEELS_LIKE: &str = "feels_like";
    pub const HUMIDITY: &str = "humidity";
    pub const PRESSURE: &str = "pressure";
    pub const WIND_SPEED: &str = "wind_speed";
    pub const TIMESTAMP: &str = "timestamp";
}

/// Map one provider observation onto the display feature for `city`
pub fn observation_feature(city: &City, obs: &CurrentWeather, now: DateTime<Utc>) -> Feature {
    let condition = obs.condition();
    let main = condition
        .and_then(|c| c.main.as_deref())
        .filter(|m| !m.is_empty())
        .unwrap_or(UNKNOWN_CONDITION);
    let description = condition
        .and_then(|c| c.description.as_deref())
        .filter(|d| !d.is_empty())
        .unwrap_or(main);
    let name = obs
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(city.name);

    Feature::new(
        Position::new(city.lon, city.lat),
        Category::Weather,
        OPENWEATHER_PROVENANCE,
    )
    .with(attr::NAME, name)
    .with(attr::PROVINCE, city.province)
    .with(attr::CONDITION, description)
    .with(attr::CONDITION_MAIN, main)
    .with(attr::ICON, icon_for_condition(main))
    .with(attr::TEMPERATURE, format::temperature(obs.temp()))
    .with(attr::FEELS_LIKE, format::temperature(obs.feels_like()))
    .with(attr::HUMIDITY, format::humidity(obs.humidity()))
    .with(attr::PRESSURE, format::pressure(obs.pressure()))
    .with(attr::WIND_SPEED, format::wind_speed(obs.wind_speed()))
    .with(
        attr::TIMESTAMP,
        format::local_timestamp(format::observation_time(obs.dt, now)),
    )
}

/// Current conditions for every registry city, one feature each
pub struct WeatherNormalizer {
    client: OpenWeatherClient,
    api_key: Option<String>,
    cities: &'static [City],
    fallback: Mutex<SyntheticWeather>,
}

impl WeatherNormalizer {
    /// `api_key` is the already-resolved credential; `None` disables live fetches
    pub fn new(http: Arc<dyn HttpClientPort>, config: WeatherConfig, api_key: Option<String>) -> Self {
        Self {
            client: OpenWeatherClient::new(http, config),
            api_key,
            cities: &CITIES,
            fallback: Mutex::new(SyntheticWeather::from_entropy()),
        }
    }

    /// Replace the fallback random source
    pub fn with_fallback(mut self, fallback: SyntheticWeather) -> Self {
        self.fallback = Mutex::new(fallback);
        self
    }

    /// Restrict to a subset of the registry
    pub fn with_cities(mut self, cities: &'static [City]) -> Self {
        self.cities = cities;
        self
    }

    pub fn cities(&self) -> &'static [City] {
        self.cities
    }

    /// One feature per city, in registry order. Never fails.
    ///
    /// Cities are fetched one at a time to stay under the provider's rate
    /// limit. A failed city gets synthetic data and the loop moves on; a
    /// rejected credential (401/403) abandons the remaining requests and the
    /// whole collection becomes synthetic.
    #[instrument(skip(self))]
    pub async fn fetch_current_weather(&self) -> FeatureCollection {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("OpenWeatherMap API key is missing. Returning fallback weather data.");
            return self.fallback_collection();
        };

        let mut features = FeatureCollection::with_capacity(self.cities.len());
        for city in self.cities {
            match self.client.current(api_key, city.lat, city.lon).await {
                Ok(obs) => {
                    metrics::weather::live_feature();
                    features.push(observation_feature(city, &obs, Utc::now()));
                }
                Err(e) if e.is_auth_failure() => {
                    metrics::weather::auth_rejected();
                    warn!("OpenWeatherMap API key rejected ({}). Returning fallback weather data.", e);
                    return self.fallback_collection();
                }
                Err(e) => {
                    warn!(
                        city = city.name,
                        "Failed to fetch weather, using fallback data: {}", e
                    );
                    metrics::weather::fallback_features(1);
                    features.push(self.fallback_feature(city));
                }
            }
        }

        info!(
            "Weather collected for {} cities ({} live)",
            features.len(),
            features.count_provenance(OPENWEATHER_PROVENANCE)
        );
        features
    }

    /// Synthetic features for every city
    pub fn fallback_collection(&self) -> FeatureCollection {
        metrics::weather::fallback_features(self.cities.len());
        let now = Utc::now();
        let mut synth = self.fallback.lock().unwrap_or_else(PoisonError::into_inner);
        self.cities.iter().map(|city| synth.feature(city, now)).collect()
    }

    fn fallback_feature(&self, city: &City) -> Feature {
        self.fallback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .feature(city, Utc::now())
    }
}
