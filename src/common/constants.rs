//! Upstream endpoints, provenance tags and display constants shared across the crate.

// Upstream endpoints
pub const BMKG_SIGNIFICANT_URL: &str = "https://data.bmkg.go.id/DataMKG/TEWS/gempaterkini.json";
pub const BMKG_LATEST_URL: &str = "https://data.bmkg.go.id/DataMKG/TEWS/autogempa.json";
pub const OPENWEATHER_CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

// Revalidation hints, in seconds
pub const SEISMIC_REVALIDATE_SECS: u64 = 300;
pub const WEATHER_REVALIDATE_SECS: u64 = 600;

/// The significant-events feed lists newest first; only this many are kept.
pub const MAX_SEISMIC_EVENTS: usize = 20;

// Provenance tags (consistent across the application)
pub const BMKG_PROVENANCE: &str = "BMKG";
pub const OPENWEATHER_PROVENANCE: &str = "OpenWeatherMap";
pub const OPENWEATHER_FALLBACK_PROVENANCE: &str = "OpenWeatherMap (fallback)";

// Credential lookup chain
pub const OPENWEATHER_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const OPENWEATHER_PUBLIC_KEY_ENV: &str = "NEXT_PUBLIC_OPENWEATHER_KEY";
/// Built-in credential. Empty means "none", which sends every city to the fallback path.
pub const DEFAULT_OPENWEATHER_KEY: &str = "";

// Display values
pub const PLACEHOLDER: &str = "–";
pub const SEISMIC_KIND: &str = "Gempa Bumi";
pub const NO_TSUNAMI_POTENTIAL: &str = "Tidak berpotensi tsunami";
pub const UNKNOWN_CONDITION: &str = "-";
pub const DEFAULT_UNITS: &str = "metric";
pub const DEFAULT_LANG: &str = "id";

/// Magnitude at or above which an event is drawn as a major quake.
pub const MAJOR_MAGNITUDE: f64 = 5.0;
pub const MAJOR_MARKER_COLOR: &str = "#dc2626";
pub const MINOR_MARKER_COLOR: &str = "#fbbf24";

pub const USER_AGENT: &str = concat!("sig-nusantara/", env!("CARGO_PKG_VERSION"));
