//! Caption rules: display names, date label and assembly order
use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use photocast_core::PhotoMetadata;
use std::collections::HashMap;

/// Label used when the capture date is unknown
pub const UNKNOWN_DATE: &str = "Unknown";

static COUNTRY_NAMES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([("Russian Federation", "Russia")]));

static CITY_NAMES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([("Saint Petersburg", "Saint P.")]));

pub fn display_country(country: &str) -> &str {
    COUNTRY_NAMES.get(country).copied().unwrap_or(country)
}

pub fn display_city(city: &str) -> &str {
    CITY_NAMES.get(city).copied().unwrap_or(city)
}

/// "May 2023", or "Unknown" without a timestamp
pub fn format_date(timestamp: Option<&DateTime<FixedOffset>>) -> String {
    match timestamp {
        Some(ts) => ts.format("%B %Y").to_string(),
        None => UNKNOWN_DATE.to_string(),
    }
}

/// Builds "{country}, {city}, {date}", dropping whichever place part is absent.
pub fn build_caption(metadata: &PhotoMetadata) -> String {
    let country = non_blank(metadata.country.as_deref()).map(display_country);
    let city = non_blank(metadata.city.as_deref()).map(display_city);
    let date = format_date(metadata.capture_timestamp.as_ref());

    match (country, city) {
        (Some(country), Some(city)) => format!("{}, {}, {}", country, city, date),
        (Some(country), None) => format!("{}, {}", country, date),
        (None, Some(city)) => format!("{}, {}", city, date),
        (None, None) => date,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Option<DateTime<FixedOffset>> {
        Some(DateTime::parse_from_rfc3339(s).unwrap())
    }

    #[test]
    fn test_full_caption_with_short_names() {
        let meta = PhotoMetadata {
            country: Some("Russian Federation".into()),
            city: Some("Saint Petersburg".into()),
            capture_timestamp: ts("2023-05-14T18:30:00+03:00"),
            orientation_code: None,
        };
        assert_eq!(build_caption(&meta), "Russia, Saint P., May 2023");
    }

    #[test]
    fn test_date_only() {
        let meta = PhotoMetadata {
            capture_timestamp: ts("2021-01-03T09:00:00Z"),
            ..Default::default()
        };
        assert_eq!(build_caption(&meta), "January 2021");
    }

    #[test]
    fn test_country_without_date() {
        let meta = PhotoMetadata {
            country: Some("France".into()),
            ..Default::default()
        };
        assert_eq!(build_caption(&meta), "France, Unknown");
    }

    #[test]
    fn test_city_only() {
        let meta = PhotoMetadata {
            city: Some("Saint Petersburg".into()),
            capture_timestamp: ts("2019-12-31T23:59:59+00:00"),
            ..Default::default()
        };
        assert_eq!(build_caption(&meta), "Saint P., December 2019");
    }

    #[test]
    fn test_nothing_known() {
        assert_eq!(build_caption(&PhotoMetadata::default()), "Unknown");
    }

    #[test]
    fn test_month_follows_capture_offset() {
        // still April where the photo was taken
        let meta = PhotoMetadata {
            capture_timestamp: ts("2022-04-30T22:00:00-05:00"),
            ..Default::default()
        };
        assert_eq!(build_caption(&meta), "April 2022");
    }

    #[test]
    fn test_blank_place_names_are_ignored() {
        let meta = PhotoMetadata {
            country: Some("  ".into()),
            city: Some("Lyon".into()),
            ..Default::default()
        };
        assert_eq!(build_caption(&meta), "Lyon, Unknown");
    }

    #[test]
    fn test_unlisted_names_pass_through() {
        assert_eq!(display_country("Germany"), "Germany");
        assert_eq!(display_city("Saint Petersburg"), "Saint P.");
    }
}
