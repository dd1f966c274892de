use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::apis::bmkg::{BmkgClient, QuakeRecord};
use crate::app::ports::HttpClientPort;
use crate::common::constants::{BMKG_PROVENANCE, NO_TSUNAMI_POTENTIAL, SEISMIC_KIND};
use crate::common::error::{FeedError, Result};
use crate::common::types::{Category, Feature, FeatureCollection, Position};
use crate::config::SeismicConfig;
use crate::observability::metrics;

/// Attribute keys on seismic features
pub mod attr {
    pub const KIND: &str = "kind";
    pub const LOCATION: &str = "location";
    pub const MAGNITUDE: &str = "magnitude";
    pub const DEPTH: &str = "depth";
    pub const TIME: &str = "time";
    pub const TSUNAMI_POTENTIAL: &str = "tsunami_potential";
}

static LATITUDE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\d.]+)\s*(LU|LS)").expect("latitude pattern compiles"));
static LONGITUDE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\d.]+)\s*(BT|BB)").expect("longitude pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn pattern(self) -> &'static Regex {
        match self {
            Axis::Latitude => &LATITUDE_PATTERN,
            Axis::Longitude => &LONGITUDE_PATTERN,
        }
    }

    /// Hemisphere code that flips the sign (south / west)
    fn negative_code(self) -> &'static str {
        match self {
            Axis::Latitude => "LS",
            Axis::Longitude => "BB",
        }
    }
}

/// Parse `"6.62 LS"` / `"127,52 BT"` into signed degrees.
///
/// Zero is rejected along with non-finite values: the feed emits zero when a
/// coordinate could not be determined, so a real event at exactly 0° on
/// either axis is dropped too.
pub fn parse_hemisphere_coordinate(raw: &str, axis: Axis) -> Result<f64> {
    let normalized = raw.replace(',', ".");
    let caps = axis.pattern().captures(&normalized).ok_or_else(|| {
        FeedError::InvalidCoordinate(format!("{:?} '{}' has no hemisphere code", axis, raw))
    })?;
    let degrees: f64 = caps[1]
        .parse()
        .map_err(|_| FeedError::InvalidCoordinate(format!("{:?} '{}' is not a number", axis, raw)))?;
    let signed = if &caps[2] == axis.negative_code() {
        -degrees
    } else {
        degrees
    };
    usable(signed, raw)
}

/// Parse the latest-event `"<lat>,<lon>"` form into a position
pub fn parse_coordinate_pair(raw: &str) -> Result<Position> {
    let mut parts = raw.split(',').map(str::trim);
    let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FeedError::InvalidCoordinate(format!(
            "'{}' is not a lat,lon pair",
            raw
        )));
    };
    let lat = lat
        .parse::<f64>()
        .map_err(|_| FeedError::InvalidCoordinate(format!("latitude in '{}'", raw)))?;
    let lon = lon
        .parse::<f64>()
        .map_err(|_| FeedError::InvalidCoordinate(format!("longitude in '{}'", raw)))?;
    Ok(Position::new(usable(lon, raw)?, usable(lat, raw)?))
}

fn usable(value: f64, raw: &str) -> Result<f64> {
    if value.is_finite() && value != 0.0 {
        Ok(value)
    } else {
        Err(FeedError::InvalidCoordinate(format!(
            "'{}' parses to unusable value {}",
            raw, value
        )))
    }
}

/// Position of a significant-events record (`Lintang` / `Bujur` fields)
pub fn hemisphere_position(record: &QuakeRecord) -> Result<Position> {
    let lat = record
        .latitude
        .as_deref()
        .ok_or_else(|| FeedError::MissingField("Lintang".into()))?;
    let lon = record
        .longitude
        .as_deref()
        .ok_or_else(|| FeedError::MissingField("Bujur".into()))?;
    Ok(Position::new(
        parse_hemisphere_coordinate(lon, Axis::Longitude)?,
        parse_hemisphere_coordinate(lat, Axis::Latitude)?,
    ))
}

/// Position of a latest-event record (`Coordinates` field)
pub fn pair_position(record: &QuakeRecord) -> Result<Position> {
    let raw = record
        .coordinates
        .as_deref()
        .ok_or_else(|| FeedError::MissingField("Coordinates".into()))?;
    parse_coordinate_pair(raw)
}

/// Build the display feature for an already-located record
pub fn quake_feature(record: &QuakeRecord, position: Position) -> Feature {
    let time = format!(
        "{} {}",
        record.date.as_deref().unwrap_or_default(),
        record.time.as_deref().unwrap_or_default()
    );
    let potential = record
        .potential
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(NO_TSUNAMI_POTENTIAL);

    Feature::new(position, Category::Seismic, BMKG_PROVENANCE)
        .with(attr::KIND, SEISMIC_KIND)
        .with(attr::LOCATION, record.region.clone().unwrap_or_default())
        .with(attr::MAGNITUDE, record.magnitude.clone().unwrap_or_default())
        .with(attr::DEPTH, record.depth.clone().unwrap_or_default())
        .with(attr::TIME, time.trim())
        .with(attr::TSUNAMI_POTENTIAL, potential)
}

/// Keep the first `max` records, drop any that cannot be located, preserve order
pub fn normalize_records<F>(records: &[QuakeRecord], max: usize, locate: F) -> FeatureCollection
where
    F: Fn(&QuakeRecord) -> Result<Position>,
{
    records
        .iter()
        .take(max)
        .filter_map(|record| match locate(record) {
            Ok(position) => Some(quake_feature(record, position)),
            Err(e) => {
                warn!(
                    region = record.region.as_deref().unwrap_or("?"),
                    "Invalid coordinates for earthquake record: {}", e
                );
                metrics::seismic::record_rejected();
                None
            }
        })
        .collect()
}

/// Turns BMKG earthquake feeds into seismic features
pub struct SeismicNormalizer {
    client: BmkgClient,
}

impl SeismicNormalizer {
    pub fn new(http: Arc<dyn HttpClientPort>, config: SeismicConfig) -> Self {
        Self {
            client: BmkgClient::new(http, config),
        }
    }

    /// Recent significant events. Never fails: any fetch or decode error is
    /// logged and yields an empty collection.
    #[instrument(skip(self))]
    pub async fn fetch_significant_events(&self) -> FeatureCollection {
        match self.client.fetch_significant().await {
            Ok(records) => {
                metrics::seismic::fetch_success();
                let features = normalize_records(
                    &records,
                    self.client.config().max_events,
                    hemisphere_position,
                );
                metrics::seismic::records_accepted(features.len());
                info!(
                    "Normalized {} of {} significant events",
                    features.len(),
                    records.len().min(self.client.config().max_events)
                );
                features
            }
            Err(e) => {
                metrics::seismic::fetch_error();
                error!("Error fetching BMKG significant events: {}", e);
                FeatureCollection::new()
            }
        }
    }

    /// The most recent event, with the same failure behavior as
    /// [`fetch_significant_events`](Self::fetch_significant_events)
    #[instrument(skip(self))]
    pub async fn fetch_latest_event(&self) -> FeatureCollection {
        match self.client.fetch_latest().await {
            Ok(records) => {
                metrics::seismic::fetch_success();
                let features = normalize_records(&records, records.len(), pair_position);
                metrics::seismic::records_accepted(features.len());
                features
            }
            Err(e) => {
                metrics::seismic::fetch_error();
                error!("Error fetching BMKG latest event: {}", e);
                FeatureCollection::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::{HttpGetRequest, HttpGetResult};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct CannedHttp {
        status: u16,
        body: Vec<u8>,
    }

    impl CannedHttp {
        fn json(body: Value) -> Arc<Self> {
            Arc::new(Self {
                status: 200,
                body: body.to_string().into_bytes(),
            })
        }
    }

    #[async_trait]
    impl HttpClientPort for CannedHttp {
        async fn get(&self, request: &HttpGetRequest) -> Result<HttpGetResult> {
            assert_eq!(request.revalidate_secs, Some(300));
            Ok(HttpGetResult {
                status: self.status,
                bytes: self.body.clone(),
                content_type: "application/json".into(),
            })
        }
    }

    struct FailingHttp;

    #[async_trait]
    impl HttpClientPort for FailingHttp {
        async fn get(&self, _request: &HttpGetRequest) -> Result<HttpGetResult> {
            Err(FeedError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        }
    }

    fn quake(lat: &str, lon: &str, region: &str) -> Value {
        json!({
            "Tanggal": "18 Okt 2026",
            "Jam": "10:01:02 WIB",
            "Lintang": lat,
            "Bujur": lon,
            "Magnitude": "5.3",
            "Kedalaman": "10 km",
            "Wilayah": region,
            "Potensi": "Tidak berpotensi tsunami"
        })
    }

    #[test]
    fn test_hemisphere_signs() {
        assert_eq!(parse_hemisphere_coordinate("6.62 LS", Axis::Latitude).unwrap(), -6.62);
        assert_eq!(parse_hemisphere_coordinate("2.15 LU", Axis::Latitude).unwrap(), 2.15);
        assert_eq!(parse_hemisphere_coordinate("127.52 BT", Axis::Longitude).unwrap(), 127.52);
        assert_eq!(parse_hemisphere_coordinate("97.10 BB", Axis::Longitude).unwrap(), -97.10);
    }

    #[test]
    fn test_comma_decimal_separator() {
        assert_eq!(parse_hemisphere_coordinate("6,62 LS", Axis::Latitude).unwrap(), -6.62);
        assert_eq!(parse_hemisphere_coordinate("127,52BT", Axis::Longitude).unwrap(), 127.52);
    }

    #[test]
    fn test_wrong_or_missing_hemisphere_code_is_rejected() {
        assert!(parse_hemisphere_coordinate("6.62", Axis::Latitude).is_err());
        assert!(parse_hemisphere_coordinate("6.62 BT", Axis::Latitude).is_err());
        assert!(parse_hemisphere_coordinate("127.52 LS", Axis::Longitude).is_err());
        assert!(parse_hemisphere_coordinate("", Axis::Longitude).is_err());
    }

    #[test]
    fn test_unparseable_number_is_rejected() {
        assert!(parse_hemisphere_coordinate(". LS", Axis::Latitude).is_err());
        assert!(parse_hemisphere_coordinate("1.2.3 LU", Axis::Latitude).is_err());
    }

    #[test]
    fn test_zero_is_treated_as_unparseable() {
        assert!(parse_hemisphere_coordinate("0.00 LU", Axis::Latitude).is_err());
        assert!(parse_hemisphere_coordinate("0 BT", Axis::Longitude).is_err());
    }

    #[test]
    fn test_coordinate_pair() {
        assert_eq!(
            parse_coordinate_pair("-1.63,127.52").unwrap(),
            Position::new(127.52, -1.63)
        );
        assert_eq!(
            parse_coordinate_pair(" 3.1 , 98.2 ").unwrap(),
            Position::new(98.2, 3.1)
        );
        assert!(parse_coordinate_pair("-1.63").is_err());
        assert!(parse_coordinate_pair("-1.63,127.52,9").is_err());
        assert!(parse_coordinate_pair("0,127.52").is_err());
        assert!(parse_coordinate_pair("NaN,127.52").is_err());
        assert!(parse_coordinate_pair("inf,127.52").is_err());
    }

    #[test]
    fn test_feature_attributes() {
        let record: QuakeRecord =
            serde_json::from_value(quake("6.62 LS", "127.52 BT", "Laut Banda")).unwrap();
        let feature = quake_feature(&record, hemisphere_position(&record).unwrap());
        assert_eq!(feature.position, Position::new(127.52, -6.62));
        assert_eq!(feature.category, Category::Seismic);
        assert_eq!(feature.provenance, "BMKG");
        assert_eq!(feature.attr(attr::KIND), Some("Gempa Bumi"));
        assert_eq!(feature.attr(attr::LOCATION), Some("Laut Banda"));
        assert_eq!(feature.attr(attr::MAGNITUDE), Some("5.3"));
        assert_eq!(feature.attr(attr::DEPTH), Some("10 km"));
        assert_eq!(feature.attr(attr::TIME), Some("18 Okt 2026 10:01:02 WIB"));
        assert_eq!(feature.attr(attr::TSUNAMI_POTENTIAL), Some("Tidak berpotensi tsunami"));
    }

    #[test]
    fn test_missing_tsunami_advisory_gets_default() {
        let record = QuakeRecord {
            latitude: Some("1.0 LU".into()),
            longitude: Some("120.0 BT".into()),
            potential: Some("  ".into()),
            ..QuakeRecord::default()
        };
        let feature = quake_feature(&record, hemisphere_position(&record).unwrap());
        assert_eq!(feature.attr(attr::TSUNAMI_POTENTIAL), Some(NO_TSUNAMI_POTENTIAL));
    }

    #[test]
    fn test_invalid_records_dropped_in_order() {
        let records: Vec<QuakeRecord> = serde_json::from_value(json!([
            quake("6.62 LS", "127.52 BT", "first"),
            quake("0.00 LU", "120.00 BT", "zero latitude"),
            quake("2.10 LU", "garbage", "bad longitude"),
            quake("3,50 LU", "97,25 BB", "second"),
        ]))
        .unwrap();

        let features = normalize_records(&records, 20, hemisphere_position);
        let regions: Vec<_> = features.iter().map(|f| f.attr(attr::LOCATION).unwrap()).collect();
        assert_eq!(regions, vec!["first", "second"]);
        assert_eq!(features.features[1].position, Position::new(-97.25, 3.5));
        assert!(features.iter().all(|f| f.position != Position::new(0.0, 0.0)));
    }

    #[test]
    fn test_equator_event_is_dropped() {
        // A genuine event on the equator is indistinguishable from the feed's
        // "unknown" zero and is dropped along with it.
        let records = vec![QuakeRecord {
            latitude: Some("0.00 LU".into()),
            longitude: Some("109.33 BT".into()),
            ..QuakeRecord::default()
        }];
        assert!(normalize_records(&records, 20, hemisphere_position).is_empty());
    }

    #[test]
    fn test_caps_at_max_events() {
        let records: Vec<QuakeRecord> = (1..=25)
            .map(|i| QuakeRecord {
                latitude: Some(format!("{}.5 LS", i % 9 + 1)),
                longitude: Some("120.0 BT".into()),
                region: Some(format!("event {}", i)),
                ..QuakeRecord::default()
            })
            .collect();
        let features = normalize_records(&records, 20, hemisphere_position);
        assert_eq!(features.len(), 20);
        assert_eq!(features.features[19].attr(attr::LOCATION), Some("event 20"));
    }

    #[tokio::test]
    async fn test_fetch_significant_events() {
        let http = CannedHttp::json(json!({
            "Infogempa": { "gempa": [
                quake("6.62 LS", "127.52 BT", "Laut Banda"),
                quake("0 LU", "0 BT", "unknown"),
            ]}
        }));
        let normalizer = SeismicNormalizer::new(http, SeismicConfig::default());
        let features = normalizer.fetch_significant_events().await;
        assert_eq!(features.len(), 1);
        assert_eq!(features.features[0].position, Position::new(127.52, -6.62));
    }

    #[tokio::test]
    async fn test_mistyped_record_does_not_empty_the_feed() {
        let mut numeric = quake("2.15 LU", "96.40 BT", "Simeulue");
        numeric["Magnitude"] = json!(5.1);
        let http = CannedHttp::json(json!({
            "Infogempa": { "gempa": [
                quake("6.62 LS", "127.52 BT", "Laut Banda"),
                numeric,
                ["not", "a", "record"],
            ]}
        }));
        let normalizer = SeismicNormalizer::new(http, SeismicConfig::default());
        let features = normalizer.fetch_significant_events().await;

        assert_eq!(features.len(), 2);
        assert_eq!(features.features[0].attr(attr::MAGNITUDE), Some("5.3"));
        assert_eq!(features.features[1].attr(attr::MAGNITUDE), Some("5.1"));
        assert_eq!(features.features[1].position, Position::new(96.40, 2.15));
    }

    #[tokio::test]
    async fn test_fetch_fails_closed() {
        let normalizer = SeismicNormalizer::new(Arc::new(FailingHttp), SeismicConfig::default());
        assert!(normalizer.fetch_significant_events().await.is_empty());
        assert!(normalizer.fetch_latest_event().await.is_empty());

        let server_error = Arc::new(CannedHttp {
            status: 500,
            body: b"oops".to_vec(),
        });
        let normalizer = SeismicNormalizer::new(server_error, SeismicConfig::default());
        assert!(normalizer.fetch_significant_events().await.is_empty());

        let malformed = Arc::new(CannedHttp {
            status: 200,
            body: b"{not json".to_vec(),
        });
        let normalizer = SeismicNormalizer::new(malformed, SeismicConfig::default());
        assert!(normalizer.fetch_significant_events().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_latest_event_single_object() {
        let http = CannedHttp::json(json!({
            "Infogempa": { "gempa": {
                "Tanggal": "18 Okt 2026",
                "Jam": "04:12:55 WIB",
                "Coordinates": "-1.63,127.52",
                "Magnitude": "4.8",
                "Kedalaman": "12 km",
                "Wilayah": "Pusat gempa berada di laut"
            }}
        }));
        let normalizer = SeismicNormalizer::new(http, SeismicConfig::default());
        let features = normalizer.fetch_latest_event().await;
        assert_eq!(features.len(), 1);
        let feature = &features.features[0];
        assert_eq!(feature.position, Position::new(127.52, -1.63));
        assert_eq!(feature.attr(attr::MAGNITUDE), Some("4.8"));
        assert_eq!(feature.attr(attr::TSUNAMI_POTENTIAL), Some(NO_TSUNAMI_POTENTIAL));
    }
}
