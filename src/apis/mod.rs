// Upstream feed clients: fetch and decode raw payloads, no normalization

pub mod bmkg;
pub mod lenient;
pub mod openweather;

pub use bmkg::{BmkgClient, QuakeRecord};
pub use openweather::{CurrentWeather, OpenWeatherClient};
