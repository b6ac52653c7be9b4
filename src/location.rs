use log::{debug, warn};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub const PLACEHOLDER: &str = "--";

pub const GEO_URL: &str = "https://ipinfo.io/json";

/// Only the two fields the widget shows; everything else in the response is ignored.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct GeoResponse {
    pub country: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("geolocation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed geolocation response: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub struct LocationInfo {
    pub country: String,
    pub city: String,
}

impl LocationInfo {
    pub fn placeholder() -> Self {
        Self { country: PLACEHOLDER.to_string(), city: PLACEHOLDER.to_string() }
    }

    pub fn from_response(response: &GeoResponse) -> Self {
        Self {
            country: response.country.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
            city: response
                .timezone
                .as_deref()
                .map(city_from_timezone)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        }
    }
}

/// `"Europe/Paris"` -> `"Paris"`. A zone without a `/` names no city.
pub fn city_from_timezone(timezone: &str) -> String {
    match timezone.rsplit_once('/') {
        Some((_, city)) if !city.is_empty() => city.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

pub trait LocationSource {
    fn lookup(&self) -> impl Future<Output = Result<GeoResponse, GeoError>> + Send;
}

/// Public IP geolocation over plain HTTP GET, no auth, no retries.
#[derive(Clone, Debug)]
pub struct IpInfoClient {
    client: reqwest::Client,
    url: String,
}

impl IpInfoClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url: url.into() })
    }
}

impl LocationSource for IpInfoClient {
    async fn lookup(&self) -> Result<GeoResponse, GeoError> {
        let body = self.client.get(&self.url).send().await?.error_for_status()?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Any lookup failure degrades to placeholders, never to an aborted tick.
pub async fn locate<S: LocationSource>(source: &S) -> LocationInfo {
    match source.lookup().await {
        Ok(response) => {
            debug!("Geolocation response: {:?}", response);
            LocationInfo::from_response(&response)
        }
        Err(e) => {
            warn!("{}", e);
            LocationInfo::placeholder()
        }
    }
}

#[cfg(test)]
pub(crate) mod stubs {
    use super::*;

    /// Answers every lookup with the same response.
    pub(crate) struct Fixed(pub GeoResponse);

    impl LocationSource for Fixed {
        async fn lookup(&self) -> Result<GeoResponse, GeoError> {
            Ok(self.0.clone())
        }
    }

    pub(crate) fn paris() -> Fixed {
        Fixed(GeoResponse { country: Some("FR".into()), timezone: Some("Europe/Paris".into()) })
    }

    /// Fails every lookup the way a rate-limit page does.
    pub(crate) struct Failing;

    impl LocationSource for Failing {
        async fn lookup(&self) -> Result<GeoResponse, GeoError> {
            Err(serde_json::from_str::<GeoResponse>("<html>rate limited</html>").unwrap_err().into())
        }
    }
}
