//! Weather snapshot
//!
//! The forecast arrives as parallel arrays in the location's local time.
//! [`normalize_forecast`] zips them into typed rows and derives the next
//! rain estimate; [`load_snapshot`] resolves position and label first.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use dash_client::{Coordinates, ForecastResponse, Geolocator, HourlyBlock, WeatherClient};
use dash_config::WeatherSettings;

/// Probability (percent) from which an hour counts as rainy
pub const RAIN_PROBABILITY_THRESHOLD: f64 = 40.0;
/// Label used when no place name could be resolved
pub const FALLBACK_LOCATION: &str = "Your area";

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Human description and glyph for a WMO weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub description: &'static str,
    pub icon: &'static str,
}

pub fn describe(code: u16, is_day: bool) -> Condition {
    let (description, icon) = match code {
        0 if is_day => ("Clear sky", "☀"),
        0 => ("Clear sky", "☾"),
        1 if is_day => ("Mainly clear", "🌤"),
        1 => ("Mainly clear", "☾"),
        2 => ("Partly cloudy", "⛅"),
        3 => ("Overcast", "☁"),
        45 | 48 => ("Fog", "🌫"),
        51 | 53 | 55 => ("Drizzle", "🌦"),
        56 | 57 => ("Freezing drizzle", "🌧"),
        61 | 63 | 65 => ("Rain", "🌧"),
        66 | 67 => ("Freezing rain", "🌧"),
        71 | 73 | 75 | 77 => ("Snow", "❄"),
        80..=82 => ("Rain showers", "🌦"),
        85 | 86 => ("Snow showers", "🌨"),
        95 => ("Thunderstorm", "⛈"),
        96 | 99 => ("Thunderstorm with hail", "⛈"),
        _ => ("Unknown", "?"),
    };
    Condition { description, icon }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub code: u16,
    pub is_day: bool,
    /// Local time at the location
    pub observed_at: NaiveDateTime,
}

impl CurrentConditions {
    pub fn condition(&self) -> Condition {
        describe(self.code, self.is_day)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyPoint {
    pub time: NaiveDateTime,
    /// Percent
    pub probability: Option<f64>,
    /// Millimetres
    pub amount: Option<f64>,
}

impl HourlyPoint {
    fn is_rainy(&self) -> bool {
        self.probability
            .is_some_and(|p| p >= RAIN_PROBABILITY_THRESHOLD)
            || self.amount.is_some_and(|mm| mm > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyOutlook {
    pub date: NaiveDate,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub code: Option<u16>,
    pub precipitation_chance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NextRain {
    Expected {
        at: NaiveDateTime,
        minutes_from_now: i64,
    },
    NoneExpected,
}

impl NextRain {
    pub fn label(&self) -> String {
        match self {
            Self::Expected {
                minutes_from_now: 0,
                ..
            } => "Rain now".to_string(),
            Self::Expected {
                at,
                minutes_from_now,
            } => format!(
                "Rain around {} (in {})",
                at.format("%H:%M"),
                format_minutes(*minutes_from_now)
            ),
            Self::NoneExpected => "No rain expected".to_string(),
        }
    }
}

fn format_minutes(minutes: i64) -> String {
    if minutes < 60 {
        format!("{} min", minutes)
    } else {
        format!("{}h {:02}m", minutes / 60, minutes % 60)
    }
}

/// Point-in-time weather for one location
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub location: String,
    pub current: CurrentConditions,
    pub next_rain: NextRain,
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DailyOutlook>,
    pub fetched_at: DateTime<Utc>,
}

/// First hour, starting with the current one, that is likely to be wet
pub fn next_rain(hourly: &[HourlyPoint], now: NaiveDateTime) -> NextRain {
    hourly
        .iter()
        .filter(|point| point.time + Duration::hours(1) > now)
        .find(|point| point.is_rainy())
        .map(|point| NextRain::Expected {
            at: point.time,
            minutes_from_now: (point.time - now).num_minutes().max(0),
        })
        .unwrap_or(NextRain::NoneExpected)
}

fn parse_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIME_FORMAT).ok()
}

fn hourly_points(block: &HourlyBlock) -> Vec<HourlyPoint> {
    block
        .time
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            Some(HourlyPoint {
                time: parse_time(raw)?,
                probability: block.precipitation_probability.get(i).copied().flatten(),
                amount: block.precipitation.get(i).copied().flatten(),
            })
        })
        .collect()
}

/// Zip the forecast blocks into a snapshot.
///
/// Fails when the response has no usable current conditions.
pub fn normalize_forecast(
    forecast: &ForecastResponse,
    location: String,
    fetched_at: DateTime<Utc>,
) -> Result<WeatherSnapshot> {
    let current = forecast
        .current
        .as_ref()
        .context("Forecast did not include current conditions")?;
    let observed_at = parse_time(&current.time)
        .ok_or_else(|| anyhow!("Unreadable forecast time {:?}", current.time))?;
    let temperature = current
        .temperature_2m
        .context("Forecast did not include a temperature")?;

    let hourly = forecast
        .hourly
        .as_ref()
        .map(hourly_points)
        .unwrap_or_default();

    let daily = forecast
        .daily
        .as_ref()
        .map(|block| {
            block
                .time
                .iter()
                .enumerate()
                .filter_map(|(i, raw)| {
                    Some(DailyOutlook {
                        date: NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()?,
                        min: block.temperature_2m_min.get(i).copied().flatten(),
                        max: block.temperature_2m_max.get(i).copied().flatten(),
                        code: block.weather_code.get(i).copied().flatten(),
                        precipitation_chance: block
                            .precipitation_probability_max
                            .get(i)
                            .copied()
                            .flatten(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(WeatherSnapshot {
        location,
        next_rain: next_rain(&hourly, observed_at),
        current: CurrentConditions {
            temperature,
            feels_like: current.apparent_temperature,
            code: current.weather_code.unwrap_or_default(),
            is_day: current.is_day.unwrap_or(1) == 1,
            observed_at,
        },
        hourly,
        daily,
        fetched_at,
    })
}

fn is_blank(label: &str) -> bool {
    label.trim().is_empty()
}

/// Configured label, then the geocoded one, then the generic fallback.
/// Blank labels count as absent at every step.
pub fn resolve_location_label(configured: Option<&str>, geocoded: Option<String>) -> String {
    configured
        .filter(|label| !is_blank(label))
        .map(str::to_string)
        .or(geocoded.filter(|label| !is_blank(label)))
        .unwrap_or_else(|| FALLBACK_LOCATION.to_string())
}

/// Resolve position and label, then fetch and normalize the forecast.
///
/// Configured coordinates skip geolocation entirely; without them a failed
/// lookup is an error rather than a silent default position.
pub async fn load_snapshot(
    settings: &WeatherSettings,
    client: &dyn WeatherClient,
    geolocator: &dyn Geolocator,
) -> Result<WeatherSnapshot> {
    let position = match settings.coordinates() {
        Some((latitude, longitude)) => Coordinates::new(latitude, longitude),
        None => geolocator.locate().await?,
    };

    let configured = settings.configured_label();
    let (forecast, geocoded) = if configured.is_some() {
        (client.forecast(position).await, None)
    } else {
        let (forecast, place) =
            tokio::join!(client.forecast(position), client.reverse_geocode(position));
        let geocoded = match place {
            Ok(place) => place.label(),
            Err(e) => {
                log::warn!("Reverse geocoding failed: {}", e);
                None
            }
        };
        (forecast, geocoded)
    };

    let forecast = forecast.context("Forecast unavailable")?;
    let location = resolve_location_label(configured, geocoded);
    normalize_forecast(&forecast, location, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dash_client::{ClientError, CurrentBlock, DailyBlock, Place};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn at(raw: &str) -> NaiveDateTime {
        parse_time(raw).unwrap()
    }

    fn point(time: &str, probability: f64, amount: f64) -> HourlyPoint {
        HourlyPoint {
            time: at(time),
            probability: Some(probability),
            amount: Some(amount),
        }
    }

    #[test]
    fn test_next_rain_picks_first_crossing() {
        let series = vec![
            point("2024-05-01T10:00", 10.0, 0.0),
            point("2024-05-01T11:00", 45.0, 0.0),
            point("2024-05-01T12:00", 90.0, 2.0),
        ];
        assert_eq!(
            next_rain(&series, at("2024-05-01T10:00")),
            NextRain::Expected {
                at: at("2024-05-01T11:00"),
                minutes_from_now: 60
            }
        );
    }

    #[test]
    fn test_next_rain_amount_alone_counts() {
        let series = vec![
            point("2024-05-01T10:00", 5.0, 0.0),
            point("2024-05-01T11:00", 5.0, 0.1),
        ];
        let rain = next_rain(&series, at("2024-05-01T10:20"));
        assert_eq!(
            rain,
            NextRain::Expected {
                at: at("2024-05-01T11:00"),
                minutes_from_now: 40
            }
        );
        assert_eq!(rain.label(), "Rain around 11:00 (in 40 min)");
    }

    #[test]
    fn test_next_rain_starts_at_current_hour() {
        let series = vec![
            point("2024-05-01T08:00", 80.0, 1.0),
            point("2024-05-01T10:00", 60.0, 0.0),
            point("2024-05-01T11:00", 0.0, 0.0),
        ];
        let rain = next_rain(&series, at("2024-05-01T10:30"));
        assert_eq!(rain.label(), "Rain now");
    }

    #[test]
    fn test_no_rain_expected() {
        let series = vec![point("2024-05-01T10:00", 39.0, 0.0)];
        let rain = next_rain(&series, at("2024-05-01T09:00"));
        assert_eq!(rain, NextRain::NoneExpected);
        assert_eq!(rain.label(), "No rain expected");
        assert_eq!(next_rain(&[], at("2024-05-01T09:00")), NextRain::NoneExpected);
    }

    #[test]
    fn test_location_precedence() {
        assert_eq!(
            resolve_location_label(Some("Office"), Some("Berlin".to_string())),
            "Office"
        );
        assert_eq!(
            resolve_location_label(None, Some("Berlin".to_string())),
            "Berlin"
        );
        assert_eq!(resolve_location_label(None, None), "Your area");
        assert_eq!(resolve_location_label(Some("  "), None), "Your area");
        assert_eq!(
            resolve_location_label(Some("  "), Some("Berlin".to_string())),
            "Berlin"
        );
        assert_eq!(
            resolve_location_label(None, Some(" ".to_string())),
            "Your area"
        );
    }

    #[test]
    fn test_describe_codes() {
        assert_eq!(describe(0, true).description, "Clear sky");
        assert_ne!(describe(0, true).icon, describe(0, false).icon);
        assert_eq!(describe(63, true).description, "Rain");
        assert_eq!(describe(1234, true).description, "Unknown");
    }

    fn forecast() -> ForecastResponse {
        ForecastResponse {
            timezone: Some("Europe/Berlin".to_string()),
            current: Some(CurrentBlock {
                time: "2024-05-01T10:15".to_string(),
                temperature_2m: Some(14.0),
                apparent_temperature: Some(12.5),
                weather_code: Some(61),
                is_day: Some(1),
            }),
            hourly: Some(HourlyBlock {
                time: vec!["2024-05-01T10:00".to_string(), "garbage".to_string()],
                precipitation_probability: vec![Some(70.0)],
                precipitation: vec![Some(0.4), Some(1.0)],
            }),
            daily: Some(DailyBlock {
                time: vec!["2024-05-01".to_string(), "2024-05-02".to_string()],
                weather_code: vec![Some(61), None],
                temperature_2m_max: vec![Some(17.0), Some(19.0)],
                temperature_2m_min: vec![Some(8.0)],
                precipitation_probability_max: vec![Some(80.0), Some(10.0)],
            }),
        }
    }

    #[test]
    fn test_normalize_forecast() {
        let fetched_at = Utc::now();
        let snapshot = normalize_forecast(&forecast(), "Berlin".to_string(), fetched_at).unwrap();

        assert_eq!(snapshot.location, "Berlin");
        assert_eq!(snapshot.fetched_at, fetched_at);
        assert_eq!(snapshot.current.temperature, 14.0);
        assert_eq!(snapshot.current.condition().description, "Rain");
        assert_eq!(snapshot.hourly.len(), 1);
        assert_eq!(snapshot.next_rain.label(), "Rain now");
        assert_eq!(snapshot.daily.len(), 2);
        assert_eq!(snapshot.daily[1].min, None);
        assert_eq!(snapshot.daily[1].code, None);
    }

    #[test]
    fn test_normalize_without_current_is_an_error() {
        let mut response = forecast();
        response.current = None;
        let err = normalize_forecast(&response, "x".to_string(), Utc::now()).unwrap_err();
        assert_eq!(err.to_string(), "Forecast did not include current conditions");
    }

    struct FakeWeather {
        fail_forecast: bool,
        geocode_calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherClient for FakeWeather {
        async fn forecast(&self, _at: Coordinates) -> dash_client::Result<ForecastResponse> {
            if self.fail_forecast {
                return Err(ClientError::Http {
                    status: 503,
                    url: "forecast".to_string(),
                });
            }
            Ok(forecast())
        }

        async fn reverse_geocode(&self, _at: Coordinates) -> dash_client::Result<Place> {
            self.geocode_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Place {
                city: Some("Potsdam".to_string()),
                ..Default::default()
            })
        }
    }

    struct FakeLocator(Option<Coordinates>);

    #[async_trait]
    impl Geolocator for FakeLocator {
        async fn locate(&self) -> dash_client::Result<Coordinates> {
            self.0
                .ok_or_else(|| ClientError::Geolocation("permission denied".to_string()))
        }
    }

    fn weather(fail_forecast: bool) -> FakeWeather {
        FakeWeather {
            fail_forecast,
            geocode_calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn test_load_snapshot_with_geolocation() {
        let client = weather(false);
        let locator = FakeLocator(Some(Coordinates::new(52.4, 13.1)));
        let snapshot = load_snapshot(&WeatherSettings::default(), &client, &locator)
            .await
            .unwrap();
        assert_eq!(snapshot.location, "Potsdam");
        assert_eq!(client.geocode_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_configured_location_skips_lookups() {
        let settings = WeatherSettings {
            latitude: Some(48.1),
            longitude: Some(11.6),
            label: Some("Munich office".to_string()),
            ..Default::default()
        };
        let client = weather(false);
        let snapshot = load_snapshot(&settings, &client, &FakeLocator(None))
            .await
            .unwrap();
        assert_eq!(snapshot.location, "Munich office");
        assert_eq!(client.geocode_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_geolocation_denied_is_an_error() {
        let err = load_snapshot(&WeatherSettings::default(), &weather(false), &FakeLocator(None))
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("permission denied"));
    }

    #[tokio::test]
    async fn test_forecast_failure_is_an_error() {
        let locator = FakeLocator(Some(Coordinates::new(1.0, 2.0)));
        let err = load_snapshot(&WeatherSettings::default(), &weather(true), &locator)
            .await
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.starts_with("Forecast unavailable: "), "{}", message);
        assert!(message.contains("503"));
    }
}
