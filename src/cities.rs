//! Built-in city database and search.
//!
//! Ships a fixed set of world cities (name, country, coordinates, timezone
//! id) plus case-insensitive substring search over name and country. The
//! search contract matches the selection UI: queries under two characters
//! return nothing, results are capped at ten.
//!
//! For coordinates without a trustworthy timezone id (a stored city whose id
//! no longer parses), `timezone_for_coordinates` resolves one from the
//! timezone boundary data via `tzf-rs`.

use chrono_tz::Tz;
use once_cell::sync::Lazy;
use tzf_rs::DefaultFinder;

use crate::constants::{SEARCH_MAX_RESULTS, SEARCH_MIN_QUERY_LEN};

/// A selectable city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub country: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub timezone: &'static str,
}

/// Timezone boundary finder, built once on first use (the polygon data is
/// a few megabytes to deserialize).
static TZ_FINDER: Lazy<DefaultFinder> = Lazy::new(DefaultFinder::new);

/// Look up a city by exact name.
pub fn find_by_name(name: &str) -> Option<&'static City> {
    CITIES.iter().find(|city| city.name == name)
}

/// Case-insensitive substring search over city and country names.
///
/// Queries shorter than two characters return nothing; at most ten results
/// are returned, in dataset order.
pub fn search(query: &str) -> Vec<&'static City> {
    let query = query.trim().to_lowercase();
    if query.len() < SEARCH_MIN_QUERY_LEN {
        return Vec::new();
    }

    CITIES
        .iter()
        .filter(|city| {
            city.name.to_lowercase().contains(&query)
                || city.country.to_lowercase().contains(&query)
        })
        .take(SEARCH_MAX_RESULTS)
        .collect()
}

/// Resolve a timezone for arbitrary coordinates from timezone boundary data.
///
/// Ocean coordinates come back as `Etc/GMT±N` zones, which `chrono-tz`
/// parses fine; anything unparseable falls back to UTC so a bad lookup can
/// never break a clock.
pub fn timezone_for_coordinates(lat: f64, lng: f64) -> Tz {
    let name = TZ_FINDER.get_tz_name(lng, lat);
    name.parse::<Tz>().unwrap_or(Tz::UTC)
}

/// The built-in dataset: thirty cities across every inhabited continent.
pub static CITIES: &[City] = &[
    // North America
    City { name: "New York", country: "USA", lat: 40.7128, lng: -74.0060, timezone: "America/New_York" },
    City { name: "Los Angeles", country: "USA", lat: 34.0522, lng: -118.2437, timezone: "America/Los_Angeles" },
    City { name: "Chicago", country: "USA", lat: 41.8781, lng: -87.6298, timezone: "America/Chicago" },
    City { name: "Toronto", country: "Canada", lat: 43.6532, lng: -79.3832, timezone: "America/Toronto" },
    City { name: "Vancouver", country: "Canada", lat: 49.2827, lng: -123.1207, timezone: "America/Vancouver" },
    City { name: "Mexico City", country: "Mexico", lat: 19.4326, lng: -99.1332, timezone: "America/Mexico_City" },
    // South America
    City { name: "Rio de Janeiro", country: "Brazil", lat: -22.9068, lng: -43.1729, timezone: "America/Sao_Paulo" },
    City { name: "Buenos Aires", country: "Argentina", lat: -34.6037, lng: -58.3816, timezone: "America/Argentina/Buenos_Aires" },
    City { name: "Santiago", country: "Chile", lat: -33.4489, lng: -70.6693, timezone: "America/Santiago" },
    City { name: "Lima", country: "Peru", lat: -12.0464, lng: -77.0428, timezone: "America/Lima" },
    // Europe
    City { name: "London", country: "United Kingdom", lat: 51.5074, lng: -0.1278, timezone: "Europe/London" },
    City { name: "Paris", country: "France", lat: 48.8566, lng: 2.3522, timezone: "Europe/Paris" },
    City { name: "Berlin", country: "Germany", lat: 52.5200, lng: 13.4050, timezone: "Europe/Berlin" },
    City { name: "Rome", country: "Italy", lat: 41.9028, lng: 12.4964, timezone: "Europe/Rome" },
    City { name: "Madrid", country: "Spain", lat: 40.4168, lng: -3.7038, timezone: "Europe/Madrid" },
    City { name: "Moscow", country: "Russia", lat: 55.7558, lng: 37.6173, timezone: "Europe/Moscow" },
    // Asia
    City { name: "Tokyo", country: "Japan", lat: 35.6762, lng: 139.6503, timezone: "Asia/Tokyo" },
    City { name: "Shanghai", country: "China", lat: 31.2304, lng: 121.4737, timezone: "Asia/Shanghai" },
    City { name: "Hong Kong", country: "China", lat: 22.3193, lng: 114.1694, timezone: "Asia/Hong_Kong" },
    City { name: "Singapore", country: "Singapore", lat: 1.3521, lng: 103.8198, timezone: "Asia/Singapore" },
    City { name: "Mumbai", country: "India", lat: 19.0760, lng: 72.8777, timezone: "Asia/Kolkata" },
    City { name: "Dubai", country: "UAE", lat: 25.2048, lng: 55.2708, timezone: "Asia/Dubai" },
    City { name: "Seoul", country: "South Korea", lat: 37.5665, lng: 126.9780, timezone: "Asia/Seoul" },
    // Oceania
    City { name: "Sydney", country: "Australia", lat: -33.8688, lng: 151.2093, timezone: "Australia/Sydney" },
    City { name: "Melbourne", country: "Australia", lat: -37.8136, lng: 144.9631, timezone: "Australia/Melbourne" },
    City { name: "Auckland", country: "New Zealand", lat: -36.8485, lng: 174.7633, timezone: "Pacific/Auckland" },
    // Africa
    City { name: "Cairo", country: "Egypt", lat: 30.0444, lng: 31.2357, timezone: "Africa/Cairo" },
    City { name: "Johannesburg", country: "South Africa", lat: -26.2041, lng: 28.0473, timezone: "Africa/Johannesburg" },
    City { name: "Nairobi", country: "Kenya", lat: -1.2921, lng: 36.8219, timezone: "Africa/Nairobi" },
    City { name: "Lagos", country: "Nigeria", lat: 6.5244, lng: 3.3792, timezone: "Africa/Lagos" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_city_timezone_parses() {
        for city in CITIES {
            assert!(
                city.timezone.parse::<Tz>().is_ok(),
                "{} has unparseable timezone {}",
                city.name,
                city.timezone
            );
            assert!((-90.0..=90.0).contains(&city.lat));
            assert!(city.lng > -180.0 && city.lng <= 180.0);
        }
    }

    #[test]
    fn search_requires_two_characters() {
        assert!(search("").is_empty());
        assert!(search("t").is_empty());
        assert!(!search("to").is_empty());
    }

    #[test]
    fn search_matches_name_and_country_case_insensitively() {
        let by_name = search("LONDON");
        assert!(by_name.iter().any(|c| c.name == "London"));

        let by_country = search("japan");
        assert!(by_country.iter().any(|c| c.name == "Tokyo"));
    }

    #[test]
    fn search_caps_results_at_ten() {
        // "a" is too short, but "an" matches plenty of names/countries
        assert!(search("an").len() <= SEARCH_MAX_RESULTS);
    }

    #[test]
    fn timezone_resolution_for_known_coordinates() {
        assert_eq!(
            timezone_for_coordinates(40.7128, -74.0060),
            chrono_tz::America::New_York
        );
        assert_eq!(
            timezone_for_coordinates(35.6762, 139.6503),
            chrono_tz::Asia::Tokyo
        );
    }
}
