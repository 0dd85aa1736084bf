//! Weather, reverse geocoding and position lookup
//!
//! All three services are unauthenticated and read-only. The forecast is
//! requested with `timezone=auto`, so every timestamp in the response is
//! local wall-clock time at the forecast location.

use crate::error::{ClientError, Result};
use crate::fetch::HttpFetcher;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const REVERSE_GEOCODE_URL: &str = "https://api.bigdatacloud.net/data/reverse-geocode-client";
const IP_LOCATION_URL: &str = "https://ipapi.co/json/";

/// A position on the globe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// `current` block of the forecast response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentBlock {
    pub time: String,
    #[serde(default)]
    pub temperature_2m: Option<f64>,
    #[serde(default)]
    pub apparent_temperature: Option<f64>,
    #[serde(default)]
    pub weather_code: Option<u16>,
    #[serde(default)]
    pub is_day: Option<u8>,
}

/// `hourly` block: parallel arrays indexed by hour
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub precipitation_probability: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation: Vec<Option<f64>>,
}

/// `daily` block: parallel arrays indexed by day
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub weather_code: Vec<Option<u16>>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<f64>>,
}

/// Forecast response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub current: Option<CurrentBlock>,
    #[serde(default)]
    pub hourly: Option<HourlyBlock>,
    #[serde(default)]
    pub daily: Option<DailyBlock>,
}

/// Place name returned by reverse geocoding
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default, rename = "principalSubdivision")]
    pub region: Option<String>,
    #[serde(default, rename = "countryName")]
    pub country: Option<String>,
}

impl Place {
    /// Most specific non-empty name, if any
    pub fn label(&self) -> Option<String> {
        [&self.city, &self.locality, &self.region, &self.country]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Weather API client trait
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Current, hourly and 3-day forecast for a position
    async fn forecast(&self, at: Coordinates) -> Result<ForecastResponse>;

    /// Human-readable place name for a position
    async fn reverse_geocode(&self, at: Coordinates) -> Result<Place>;
}

/// One-shot position lookup
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn locate(&self) -> Result<Coordinates>;
}

/// [`WeatherClient`] backed by Open-Meteo and BigDataCloud
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    fetcher: HttpFetcher,
    forecast_url: String,
    geocode_url: String,
}

impl OpenMeteoClient {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self::with_endpoints(fetcher, FORECAST_URL, REVERSE_GEOCODE_URL)
    }

    /// Point the client at different hosts (mirrors, test servers)
    pub fn with_endpoints(fetcher: HttpFetcher, forecast_url: &str, geocode_url: &str) -> Self {
        Self {
            fetcher,
            forecast_url: forecast_url.to_string(),
            geocode_url: geocode_url.to_string(),
        }
    }

    fn forecast_params(at: Coordinates) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", at.latitude.to_string()),
            ("longitude", at.longitude.to_string()),
            (
                "current",
                "temperature_2m,apparent_temperature,weather_code,is_day".to_string(),
            ),
            (
                "hourly",
                "precipitation_probability,precipitation".to_string(),
            ),
            (
                "daily",
                "weather_code,temperature_2m_max,temperature_2m_min,precipitation_probability_max"
                    .to_string(),
            ),
            ("timezone", "auto".to_string()),
            ("forecast_days", "3".to_string()),
        ]
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    async fn forecast(&self, at: Coordinates) -> Result<ForecastResponse> {
        let payload = self
            .fetcher
            .get_json(&self.forecast_url, &Self::forecast_params(at), None)
            .await?;
        serde_json::from_value(payload).map_err(|e| ClientError::Decode(format!("forecast: {}", e)))
    }

    async fn reverse_geocode(&self, at: Coordinates) -> Result<Place> {
        let params = [
            ("latitude", at.latitude.to_string()),
            ("longitude", at.longitude.to_string()),
            ("localityLanguage", "en".to_string()),
        ];
        let payload = self.fetcher.get_json(&self.geocode_url, &params, None).await?;
        serde_json::from_value(payload).map_err(|e| ClientError::Decode(format!("geocode: {}", e)))
    }
}

#[derive(Debug, Deserialize)]
struct IpLocation {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// [`Geolocator`] that asks an IP geolocation service.
///
/// Terminals have no position API, so the public IP is the closest stand-in.
/// The lookup is bounded by `timeout`; exceeding it is reported like a denial.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    fetcher: HttpFetcher,
    url: String,
    timeout: Duration,
}

impl IpGeolocator {
    pub fn new(fetcher: HttpFetcher, timeout: Duration) -> Self {
        Self {
            fetcher,
            url: IP_LOCATION_URL.to_string(),
            timeout,
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn locate(&self) -> Result<Coordinates> {
        let lookup = self.fetcher.get_json(&self.url, &[], None);
        let payload = match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(payload)) => payload,
            Ok(Err(e)) => return Err(ClientError::Geolocation(e.to_string())),
            Err(_) => {
                return Err(ClientError::Geolocation(format!(
                    "timed out after {}s",
                    self.timeout.as_secs()
                )))
            }
        };

        let location: IpLocation = serde_json::from_value(payload)
            .map_err(|e| ClientError::Geolocation(e.to_string()))?;
        match (location.latitude, location.longitude) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates::new(latitude, longitude)),
            _ => Err(ClientError::Geolocation(
                "position not included in response".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_place_label_prefers_city() {
        let place = Place {
            city: Some("".to_string()),
            locality: Some("Kreuzberg".to_string()),
            region: Some("Berlin".to_string()),
            country: None,
        };
        assert_eq!(place.label(), Some("Kreuzberg".to_string()));
        assert_eq!(Place::default().label(), None);
    }

    #[tokio::test]
    async fn test_forecast_requests_auto_timezone() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("timezone", "auto"))
            .and(query_param("latitude", "52.5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "timezone": "Europe/Berlin",
                "current": { "time": "2024-05-01T10:00", "temperature_2m": 14.2,
                             "apparent_temperature": 12.9, "weather_code": 3, "is_day": 1 },
                "hourly": { "time": ["2024-05-01T10:00"], "precipitation_probability": [20],
                            "precipitation": [0.0] }
            })))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_endpoints(
            HttpFetcher::new().unwrap(),
            &server.uri(),
            &server.uri(),
        );
        let forecast = client.forecast(Coordinates::new(52.5, 13.4)).await.unwrap();

        assert_eq!(forecast.timezone.as_deref(), Some("Europe/Berlin"));
        let current = forecast.current.unwrap();
        assert_eq!(current.weather_code, Some(3));
        assert_eq!(forecast.hourly.unwrap().precipitation_probability, vec![Some(20.0)]);
        assert!(forecast.daily.is_none());
    }

    #[tokio::test]
    async fn test_reverse_geocode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "city": "Berlin", "principalSubdivision": "Berlin", "countryName": "Germany"
            })))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_endpoints(
            HttpFetcher::new().unwrap(),
            &server.uri(),
            &server.uri(),
        );
        let place = client
            .reverse_geocode(Coordinates::new(52.5, 13.4))
            .await
            .unwrap();
        assert_eq!(place.label(), Some("Berlin".to_string()));
        assert_eq!(place.country.as_deref(), Some("Germany"));
    }

    #[tokio::test]
    async fn test_geolocation_denied_maps_to_geolocation_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let locator = IpGeolocator::new(HttpFetcher::new().unwrap(), Duration::from_secs(5))
            .with_url(&server.uri());
        let err = locator.locate().await.unwrap_err();
        assert!(matches!(err, ClientError::Geolocation(_)));
    }

    #[tokio::test]
    async fn test_geolocation_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"latitude": 1.0, "longitude": 2.0}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let locator = IpGeolocator::new(HttpFetcher::new().unwrap(), Duration::from_millis(50))
            .with_url(&server.uri());
        let err = locator.locate().await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
