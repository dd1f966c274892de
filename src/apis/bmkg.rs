use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::apis::lenient;
use crate::app::ports::{HttpClientPort, HttpGetRequest};
use crate::common::error::Result;
use crate::config::SeismicConfig;
use crate::observability::metrics;

/// One earthquake report as published by BMKG. Every field is optional on the
/// wire and numbers are accepted where text is expected; validation happens in
/// the seismic normalizer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuakeRecord {
    #[serde(rename = "Tanggal", default, deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(rename = "Jam", default, deserialize_with = "lenient::text")]
    pub time: Option<String>,
    #[serde(rename = "DateTime", default, deserialize_with = "lenient::text")]
    pub date_time: Option<String>,
    /// `"<lat>,<lon>"` in signed decimal degrees (latest-event feed)
    #[serde(rename = "Coordinates", default, deserialize_with = "lenient::text")]
    pub coordinates: Option<String>,
    /// `"<value> LU|LS"`
    #[serde(rename = "Lintang", default, deserialize_with = "lenient::text")]
    pub latitude: Option<String>,
    /// `"<value> BT|BB"`
    #[serde(rename = "Bujur", default, deserialize_with = "lenient::text")]
    pub longitude: Option<String>,
    #[serde(rename = "Magnitude", default, deserialize_with = "lenient::text")]
    pub magnitude: Option<String>,
    #[serde(rename = "Kedalaman", default, deserialize_with = "lenient::text")]
    pub depth: Option<String>,
    #[serde(rename = "Wilayah", default, deserialize_with = "lenient::text")]
    pub region: Option<String>,
    #[serde(rename = "Potensi", default, deserialize_with = "lenient::text")]
    pub potential: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuakeEnvelope {
    #[serde(rename = "Infogempa", alias = "event_info")]
    info: QuakeInfo,
}

#[derive(Debug, Deserialize)]
struct QuakeInfo {
    #[serde(rename = "gempa", alias = "event", default)]
    events: Option<OneOrMany<Value>>,
}

/// BMKG returns a bare object when the list has one entry
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(v) => v,
            OneOrMany::One(t) => vec![t],
        }
    }
}

/// Decode a BMKG `Infogempa` envelope into its records, in feed order.
///
/// Records are decoded one at a time; an entry that is not a record object is
/// dropped with a warning and the rest of the feed is kept.
pub fn parse_envelope(bytes: &[u8]) -> Result<Vec<QuakeRecord>> {
    let envelope: QuakeEnvelope = serde_json::from_slice(bytes)?;
    let entries: Vec<Value> = envelope.info.events.map(Vec::from).unwrap_or_default();
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<QuakeRecord>(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, "Skipping malformed BMKG record: {}", e);
                metrics::seismic::record_rejected();
                None
            }
        })
        .collect())
}

/// Client for the BMKG TEWS earthquake feeds
pub struct BmkgClient {
    http: Arc<dyn HttpClientPort>,
    config: SeismicConfig,
}

impl BmkgClient {
    pub fn new(http: Arc<dyn HttpClientPort>, config: SeismicConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &SeismicConfig {
        &self.config
    }

    /// Recent significant (M 5.0+) events, newest first
    #[instrument(skip(self))]
    pub async fn fetch_significant(&self) -> Result<Vec<QuakeRecord>> {
        let records = self.fetch(&self.config.significant_url).await?;
        info!(
            "Successfully fetched {} significant events from BMKG",
            records.len()
        );
        Ok(records)
    }

    /// The single most recent event
    #[instrument(skip(self))]
    pub async fn fetch_latest(&self) -> Result<Vec<QuakeRecord>> {
        let records = self.fetch(&self.config.latest_url).await?;
        info!("Successfully fetched latest event from BMKG");
        Ok(records)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<QuakeRecord>> {
        let request = HttpGetRequest::new(url).revalidate(self.config.revalidate_seconds);
        let payload = self.http.get(&request).await?.into_success()?;
        debug!("BMKG payload: {} bytes", payload.len());
        parse_envelope(&payload)
    }
}
