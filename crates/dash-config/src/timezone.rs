//! Timezone validation for the clock

use chrono::{DateTime, Local, Timelike, Utc};
use chrono_tz::Tz;

/// Zone the clock renders in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Whatever the operating system is set to
    System,
    Named(Tz),
}

impl Zone {
    /// Format `now` in this zone with a `strftime` pattern
    pub fn format(&self, now: DateTime<Utc>, pattern: &str) -> String {
        match self {
            Self::System => now.with_timezone(&Local).format(pattern).to_string(),
            Self::Named(tz) => now.with_timezone(tz).format(pattern).to_string(),
        }
    }

    /// Hour of day (0-23) of `now` in this zone
    pub fn hour(&self, now: DateTime<Utc>) -> u32 {
        match self {
            Self::System => now.with_timezone(&Local).hour(),
            Self::Named(tz) => now.with_timezone(tz).hour(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::System => "system time".to_string(),
            Self::Named(tz) => tz.name().to_string(),
        }
    }
}

/// Outcome of validating a user-entered timezone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTimezone {
    pub zone: Zone,
    /// Shown next to the clock when the input was rejected
    pub warning: Option<String>,
}

/// Validate an IANA timezone id.
///
/// Empty input selects the system zone. An unknown id also selects the
/// system zone but carries a warning; the caller keeps the raw input so it
/// stays editable.
pub fn resolve_timezone(input: &str) -> ResolvedTimezone {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return ResolvedTimezone {
            zone: Zone::System,
            warning: None,
        };
    }

    match trimmed.parse::<Tz>() {
        Ok(tz) => ResolvedTimezone {
            zone: Zone::Named(tz),
            warning: None,
        },
        Err(_) => {
            log::debug!("Rejected timezone {:?}", trimmed);
            ResolvedTimezone {
                zone: Zone::System,
                warning: Some(format!(
                    "Unknown timezone \"{}\", showing system time",
                    trimmed
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_is_system_without_warning() {
        let resolved = resolve_timezone("  ");
        assert_eq!(resolved.zone, Zone::System);
        assert_eq!(resolved.warning, None);
    }

    #[test]
    fn test_valid_zone() {
        let resolved = resolve_timezone("Asia/Tokyo");
        assert_eq!(resolved.zone, Zone::Named(chrono_tz::Asia::Tokyo));
        assert_eq!(resolved.warning, None);

        let noon_utc = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(resolved.zone.hour(noon_utc), 21);
        assert_eq!(resolved.zone.format(noon_utc, "%H:%M"), "21:00");
        assert_eq!(resolved.zone.name(), "Asia/Tokyo");
    }

    #[test]
    fn test_invalid_zone_falls_back_with_warning() {
        let resolved = resolve_timezone("Mars/Olympus");
        assert_eq!(resolved.zone, Zone::System);
        assert!(resolved.warning.unwrap().contains("Mars/Olympus"));
    }
}
