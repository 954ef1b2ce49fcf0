//! Per-city clock state: analog hand angles and digital formatting.
//!
//! One `ClockWidget` exists per displayed city. The widget derives its local
//! time from the shared UTC instant, so every clock on screen agrees on the
//! moment being displayed. Face drawing is the surface's concern; this module
//! only computes angles and strings.

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;

use crate::settings::TimeFormat;

/// Analog hand positions in degrees clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

/// Clock state for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockWidget {
    pub city: String,
    timezone: Tz,
}

impl ClockWidget {
    pub fn new(city: impl Into<String>, timezone: Tz) -> Self {
        Self {
            city: city.into(),
            timezone,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// The shared UTC instant converted to this clock's zone, DST included.
    pub fn local_time(&self, now: DateTime<Utc>) -> DateTime<Tz> {
        now.with_timezone(&self.timezone)
    }

    /// Hand angles for an instant.
    ///
    /// The hour hand advances continuously with the minutes (10:30 puts it
    /// halfway between 10 and 11); minute and second hands step whole units.
    pub fn hand_angles(&self, now: DateTime<Utc>) -> HandAngles {
        let local = self.local_time(now);
        let hours = (local.hour() % 12) as f64;
        let minutes = local.minute() as f64;
        let seconds = local.second() as f64;

        HandAngles {
            hour: (hours + minutes / 60.0) * 30.0,
            minute: minutes * 6.0,
            second: seconds * 6.0,
        }
    }

    /// Digital time string: "3:04:05 PM" or "15:04:05".
    pub fn digital(&self, now: DateTime<Utc>, format: TimeFormat) -> String {
        let local = self.local_time(now);
        match format {
            TimeFormat::H12 => local.format("%-I:%M:%S %p").to_string(),
            TimeFormat::H24 => local.format("%H:%M:%S").to_string(),
        }
    }

    /// Short time for map labels: "3:04 PM" or "15:04".
    pub fn short_time(&self, now: DateTime<Utc>, format: TimeFormat) -> String {
        let local = self.local_time(now);
        match format {
            TimeFormat::H12 => local.format("%-I:%M %p").to_string(),
            TimeFormat::H24 => local.format("%H:%M").to_string(),
        }
    }

    /// Date line in the clock's local zone: "Friday, Jun 21".
    ///
    /// Cities on opposite sides of the date line will legitimately disagree.
    pub fn date_line(&self, now: DateTime<Utc>) -> String {
        let local = self.local_time(now);
        format!(
            "{}, {} {}",
            local.weekday_name(),
            local.month_name(),
            local.day()
        )
    }
}

trait CalendarNames {
    fn weekday_name(&self) -> &'static str;
    fn month_name(&self) -> &'static str;
}

impl CalendarNames for DateTime<Tz> {
    fn weekday_name(&self) -> &'static str {
        match self.weekday() {
            chrono::Weekday::Mon => "Monday",
            chrono::Weekday::Tue => "Tuesday",
            chrono::Weekday::Wed => "Wednesday",
            chrono::Weekday::Thu => "Thursday",
            chrono::Weekday::Fri => "Friday",
            chrono::Weekday::Sat => "Saturday",
            chrono::Weekday::Sun => "Sunday",
        }
    }

    fn month_name(&self) -> &'static str {
        match self.month() {
            1 => "Jan",
            2 => "Feb",
            3 => "Mar",
            4 => "Apr",
            5 => "May",
            6 => "Jun",
            7 => "Jul",
            8 => "Aug",
            9 => "Sep",
            10 => "Oct",
            11 => "Nov",
            _ => "Dec",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_source::parse_datetime;

    fn utc_clock() -> ClockWidget {
        ClockWidget::new("Greenwich", Tz::UTC)
    }

    #[test]
    fn hands_at_midnight_all_point_up() {
        let angles = utc_clock().hand_angles(parse_datetime("2024-01-01 00:00:00").unwrap());
        assert_eq!(angles.hour, 0.0);
        assert_eq!(angles.minute, 0.0);
        assert_eq!(angles.second, 0.0);
    }

    #[test]
    fn hour_hand_advances_with_minutes() {
        // 10:30 -> halfway between 10 and 11: (10 + 0.5) * 30 = 315
        let angles = utc_clock().hand_angles(parse_datetime("2024-01-01 10:30:00").unwrap());
        assert!((angles.hour - 315.0).abs() < 1e-9);
        assert!((angles.minute - 180.0).abs() < 1e-9);
    }

    #[test]
    fn fifteen_hundred_hours_reads_as_three() {
        let now = parse_datetime("2024-01-01 15:04:05").unwrap();
        let clock = utc_clock();
        assert_eq!(clock.digital(now, TimeFormat::H24), "15:04:05");
        assert_eq!(clock.digital(now, TimeFormat::H12), "3:04:05 PM");
        // 15h % 12 = 3h: (3 + 4/60) * 30
        let angles = clock.hand_angles(now);
        assert!((angles.hour - (3.0 + 4.0 / 60.0) * 30.0).abs() < 1e-9);
    }

    #[test]
    fn clocks_in_different_zones_share_the_instant() {
        let now = parse_datetime("2024-06-21 23:30:00").unwrap();
        let tokyo = ClockWidget::new("Tokyo", chrono_tz::Asia::Tokyo);
        let new_york = ClockWidget::new("New York", chrono_tz::America::New_York);

        // Same UTC instant, different walls: Tokyo is already on the 22nd
        assert_eq!(tokyo.digital(now, TimeFormat::H24), "08:30:00");
        assert_eq!(new_york.digital(now, TimeFormat::H24), "19:30:00");
        assert_eq!(tokyo.date_line(now), "Saturday, Jun 22");
        assert_eq!(new_york.date_line(now), "Friday, Jun 21");
    }

    #[test]
    fn dst_transition_is_reflected() {
        let paris = ClockWidget::new("Paris", chrono_tz::Europe::Paris);
        // Winter: UTC+1
        let winter = parse_datetime("2024-01-15 12:00:00").unwrap();
        assert_eq!(paris.digital(winter, TimeFormat::H24), "13:00:00");
        // Summer: UTC+2
        let summer = parse_datetime("2024-07-15 12:00:00").unwrap();
        assert_eq!(paris.digital(summer, TimeFormat::H24), "14:00:00");
    }
}
