//! Client for the external time-zone conversion service (timeapi.io).
//!
//! Conversion is a presentation concern: the scheduling core works on
//! absolute instants, and this client only relabels them into a user's
//! declared zone for display. A failed conversion degrades to the original
//! instant, but the outcome type keeps the degradation visible instead of
//! silently mixing converted and unconverted times.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::api::Event;

const DEFAULT_BASE_URL: &str = "https://timeapi.io";
const CONVERT_PATH: &str = "/api/Conversion/ConvertTimeZone";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of a single instant conversion.
///
/// `Failed` carries the original instant's wall-clock reading so callers can
/// still render something, while remaining able to tell a real conversion
/// from a degraded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeZoneConversion {
    /// Wall-clock time in the requested target zone.
    Converted(NaiveDateTime),
    /// Conversion failed; this is the original instant, unconverted.
    Failed(NaiveDateTime),
}

impl TimeZoneConversion {
    /// The wall-clock time to display, converted or not.
    pub fn wall_time(&self) -> NaiveDateTime {
        match *self {
            Self::Converted(t) | Self::Failed(t) => t,
        }
    }

    /// True when the conversion service could not be used.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConvertRequest<'a> {
    from_time_zone: &'a str,
    date_time: String,
    to_time_zone: &'a str,
    dst_ambiguity: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConvertResponse {
    conversion_result: ConversionResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConversionResult {
    date_time: String,
}

/// HTTP client for timeapi.io's zone-conversion endpoint.
#[derive(Debug, Clone)]
pub struct TimeZoneClient {
    http: reqwest::Client,
    base_url: String,
}

impl TimeZoneClient {
    /// Create a client against a specific base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Create a client from `TIME_API_BASE_URL`, defaulting to timeapi.io.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("TIME_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Convert an instant from one zone's reading to another's.
    ///
    /// Never fails: a transport or parse error yields
    /// [`TimeZoneConversion::Failed`] carrying the original instant.
    pub async fn convert(
        &self,
        instant: DateTime<Utc>,
        from_zone: &str,
        to_zone: &str,
    ) -> TimeZoneConversion {
        match self.try_convert(instant, from_zone, to_zone).await {
            Ok(wall_time) => TimeZoneConversion::Converted(wall_time),
            Err(err) => {
                warn!(
                    from_zone,
                    to_zone,
                    error = %err,
                    "time zone conversion failed, reusing original instant"
                );
                TimeZoneConversion::Failed(instant.naive_utc())
            }
        }
    }

    async fn try_convert(
        &self,
        instant: DateTime<Utc>,
        from_zone: &str,
        to_zone: &str,
    ) -> anyhow::Result<NaiveDateTime> {
        let body = ConvertRequest {
            from_time_zone: from_zone,
            date_time: instant.format("%Y-%m-%d %H:%M:%S").to_string(),
            to_time_zone: to_zone,
            dst_ambiguity: "",
        };

        let response: ConvertResponse = self
            .http
            .post(format!("{}{}", self.base_url, CONVERT_PATH))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_wall_time(&response.conversion_result.date_time)
    }
}

/// The service answers with a zone-less wall time, e.g. "2024-10-23T06:00:00".
fn parse_wall_time(raw: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_err(|e| anyhow::anyhow!("Unparseable conversion result '{}': {}", raw, e))
}

/// An event relabeled into a viewer's zone.
#[derive(Debug, Clone, Serialize)]
pub struct RelabeledEvent {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// False when either endpoint fell back to the unconverted instant.
    pub converted: bool,
}

/// Relabel a list of events from `from_zone` into `to_zone`.
///
/// Degraded conversions keep the original instants and are marked
/// `converted: false`; the listing itself never fails.
pub async fn convert_events(
    client: &TimeZoneClient,
    events: &[Event],
    from_zone: &str,
    to_zone: &str,
) -> Vec<RelabeledEvent> {
    let mut relabeled = Vec::with_capacity(events.len());
    for event in events {
        let start = client.convert(event.period.start, from_zone, to_zone).await;
        let end = client.convert(event.period.end, from_zone, to_zone).await;
        relabeled.push(RelabeledEvent {
            title: event.title.clone(),
            start: start.wall_time(),
            end: end.wall_time(),
            converted: !start.is_degraded() && !end.is_degraded(),
        });
    }
    relabeled
}
