//! Synthetic weather for cities the provider could not answer for.
//!
//! Values stay inside a plausible tropical range so the map still renders
//! sensibly, and every feature is tagged with the fallback provenance so it is
//! never mistaken for an observation.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::common::constants::OPENWEATHER_FALLBACK_PROVENANCE;
use crate::common::types::{Category, Feature, Position};
use crate::pipeline::normalize::format;
use crate::pipeline::normalize::weather::attr;
use crate::registry::City;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackCondition {
    pub description: &'static str,
    pub main: &'static str,
    pub icon: &'static str,
}

const fn condition(description: &'static str, main: &'static str, icon: &'static str) -> FallbackCondition {
    FallbackCondition {
        description,
        main,
        icon,
    }
}

pub const FALLBACK_CONDITIONS: [FallbackCondition; 6] = [
    condition("cerah", "Clear", "☀️"),
    condition("berawan", "Clouds", "☁️"),
    condition("hujan ringan", "Drizzle", "🌦️"),
    condition("berawan sebagian", "Clouds", "⛅"),
    condition("cerah berawan", "Clear", "🌤️"),
    condition("kabut", "Mist", "🌫️"),
];

/// Synthetic feature for one city, drawing every value from `rng`
pub fn synthetic_feature<R: Rng + ?Sized>(rng: &mut R, city: &City, now: DateTime<Utc>) -> Feature {
    let temp: i64 = rng.gen_range(26..=33);
    let feels_like = temp + rng.gen_range(0..=2);
    let humidity: i64 = rng.gen_range(65..=89);
    let wind: f64 = rng.gen_range(1.0..=5.0);
    let pressure: i64 = rng.gen_range(1005..=1024);
    let weather = FALLBACK_CONDITIONS[rng.gen_range(0..FALLBACK_CONDITIONS.len())];

    Feature::new(
        Position::new(city.lon, city.lat),
        Category::Weather,
        OPENWEATHER_FALLBACK_PROVENANCE,
    )
    .with(attr::NAME, city.name)
    .with(attr::PROVINCE, city.province)
    .with(attr::CONDITION, weather.description)
    .with(attr::CONDITION_MAIN, weather.main)
    .with(attr::ICON, weather.icon)
    .with(attr::TEMPERATURE, format!("{}°C", temp))
    .with(attr::FEELS_LIKE, format!("{}°C", feels_like))
    .with(attr::HUMIDITY, format!("{}%", humidity))
    .with(attr::PRESSURE, format!("{} hPa", pressure))
    .with(attr::WIND_SPEED, format::wind_speed(Some(wind)))
    .with(attr::TIMESTAMP, format::local_timestamp(now))
}

/// Owns the random source used for fallback data
pub struct SyntheticWeather {
    rng: Box<dyn RngCore + Send>,
}

impl SyntheticWeather {
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Use a caller-supplied generator, e.g. a seeded one in tests
    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self { rng: Box::new(rng) }
    }

    pub fn feature(&mut self, city: &City, now: DateTime<Utc>) -> Feature {
        synthetic_feature(&mut self.rng, city, now)
    }
}

impl Default for SyntheticWeather {
    fn default() -> Self {
        Self::from_entropy()
    }
}
