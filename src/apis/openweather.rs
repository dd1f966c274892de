use std::sync::Arc;

use serde::Deserialize;
use tracing::instrument;

use crate::apis::lenient;
use crate::app::ports::{HttpClientPort, HttpGetRequest};
use crate::common::error::Result;
use crate::config::WeatherConfig;

/// `/data/2.5/weather` response; only the fields the map displays.
/// A field of the wrong type decodes as absent rather than failing the whole
/// observation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CurrentWeather {
    #[serde(default, deserialize_with = "lenient::shape")]
    pub weather: Option<Vec<WeatherCondition>>,
    #[serde(default, deserialize_with = "lenient::shape")]
    pub main: Option<MainReadings>,
    #[serde(default, deserialize_with = "lenient::shape")]
    pub wind: Option<Wind>,
    /// Observation time, Unix seconds
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub dt: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WeatherCondition {
    #[serde(default, deserialize_with = "lenient::text")]
    pub main: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MainReadings {
    #[serde(default, deserialize_with = "lenient::number")]
    pub temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub feels_like: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Wind {
    #[serde(default, deserialize_with = "lenient::number")]
    pub speed: Option<f64>,
}

impl CurrentWeather {
    pub fn condition(&self) -> Option<&WeatherCondition> {
        self.weather.as_ref().and_then(|w| w.first())
    }

    pub fn temp(&self) -> Option<f64> {
        self.main.as_ref().and_then(|m| m.temp)
    }

    pub fn feels_like(&self) -> Option<f64> {
        self.main.as_ref().and_then(|m| m.feels_like)
    }

    pub fn humidity(&self) -> Option<f64> {
        self.main.as_ref().and_then(|m| m.humidity)
    }

    pub fn pressure(&self) -> Option<f64> {
        self.main.as_ref().and_then(|m| m.pressure)
    }

    pub fn wind_speed(&self) -> Option<f64> {
        self.wind.as_ref().and_then(|w| w.speed)
    }
}

/// Client for OpenWeatherMap current conditions
pub struct OpenWeatherClient {
    http: Arc<dyn HttpClientPort>,
    config: WeatherConfig,
}

impl OpenWeatherClient {
    pub fn new(http: Arc<dyn HttpClientPort>, config: WeatherConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    pub fn request_for(&self, api_key: &str, lat: f64, lon: f64) -> HttpGetRequest {
        HttpGetRequest::new(self.config.base_url.as_str())
            .query("lat", lat)
            .query("lon", lon)
            .query("appid", api_key)
            .query("units", &self.config.units)
            .query("lang", &self.config.lang)
            .revalidate(self.config.revalidate_seconds)
    }

    /// Current conditions at one coordinate. 401/403 come back as
    /// `FeedError::Unauthorized`, other non-2xx as `FeedError::Status`.
    #[instrument(skip(self, api_key))]
    pub async fn current(&self, api_key: &str, lat: f64, lon: f64) -> Result<CurrentWeather> {
        let request = self.request_for(api_key, lat, lon);
        let payload = self.http.get(&request).await?.into_success()?;
        let observation: CurrentWeather = serde_json::from_slice(&payload)?;
        Ok(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::HttpGetResult;
    use async_trait::async_trait;

    struct StaticHttp;

    #[async_trait]
    impl HttpClientPort for StaticHttp {
        async fn get(&self, _request: &HttpGetRequest) -> Result<HttpGetResult> {
            unreachable!("request building only")
        }
    }

    #[test]
    fn test_request_carries_all_parameters() {
        let client = OpenWeatherClient::new(Arc::new(StaticHttp), WeatherConfig::default());
        let req = client.request_for("secret", -6.2088, 106.8456);
        assert_eq!(req.url, "https://api.openweathermap.org/data/2.5/weather");
        assert_eq!(req.query_value("lat"), Some("-6.2088"));
        assert_eq!(req.query_value("lon"), Some("106.8456"));
        assert_eq!(req.query_value("appid"), Some("secret"));
        assert_eq!(req.query_value("units"), Some("metric"));
        assert_eq!(req.query_value("lang"), Some("id"));
        assert_eq!(req.revalidate_secs, Some(600));
    }

    #[test]
    fn test_decode_partial_payload() {
        let body = r#"{"weather":[{"main":"Rain"}],"main":{"temp":27.4},"name":"Jakarta"}"#;
        let obs: CurrentWeather = serde_json::from_str(body).unwrap();
        assert_eq!(obs.condition().and_then(|c| c.main.as_deref()), Some("Rain"));
        assert_eq!(obs.temp(), Some(27.4));
        assert_eq!(obs.humidity(), None);
        assert_eq!(obs.wind_speed(), None);
        assert_eq!(obs.dt, None);
    }

    #[test]
    fn test_decode_mistyped_fields_keeps_the_rest() {
        let body = r#"{
            "weather": {"main": "Rain"},
            "main": {"temp": 27.4, "feels_like": 30.1, "humidity": "n/a", "pressure": 1008},
            "wind": {"speed": null},
            "dt": 1760770000.5,
            "name": 42
        }"#;
        let obs: CurrentWeather = serde_json::from_str(body).unwrap();
        assert!(obs.condition().is_none());
        assert_eq!(obs.temp(), Some(27.4));
        assert_eq!(obs.humidity(), None);
        assert_eq!(obs.pressure(), Some(1008.0));
        assert_eq!(obs.wind_speed(), None);
        assert_eq!(obs.dt, Some(1_760_770_000));
        assert_eq!(obs.name.as_deref(), Some("42"));
    }

    #[test]
    fn test_decode_non_object_main_is_absent() {
        let obs: CurrentWeather = serde_json::from_str(r#"{"main":"unavailable","wind":{"speed":2.5}}"#).unwrap();
        assert!(obs.main.is_none());
        assert_eq!(obs.wind_speed(), Some(2.5));
    }

    #[test]
    fn test_decode_empty_object() {
        let obs: CurrentWeather = serde_json::from_str("{}").unwrap();
        assert!(obs.condition().is_none());
        assert!(obs.temp().is_none());
    }
}
