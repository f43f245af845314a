// sav - a library for writing SPSS system files.
// Copyright (C) 2025 Free Software Foundation, Inc.
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <http://www.gnu.org/licenses/>.

//! Dates and times as system files represent them.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, ParseError};

/// The calendar epoch: dates and times are stored as seconds since midnight,
/// 14 Oct 1582.
pub const EPOCH: NaiveDate = NaiveDate::from_ymd_opt(1582, 10, 14).unwrap();

const EPOCH_DATETIME: NaiveDateTime = EPOCH.and_time(NaiveTime::MIN);

/// Difference between the [EPOCH] and the Unix epoch, in seconds:
/// `sav_seconds = unix_seconds + UNIX_OFFSET`.
pub const UNIX_OFFSET: i64 = 12_219_379_200;

/// Converts `date_time` into seconds since the [EPOCH].
pub fn date_time_to_sav(date_time: NaiveDateTime) -> f64 {
    (date_time - EPOCH_DATETIME).as_seconds_f64()
}

/// Parses a date in the `D-Mmm-YYYY` input pattern, such as `1-Jan-1970`,
/// as a date-time at midnight.
pub fn parse_date(s: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDate::parse_from_str(s, "%d-%b-%Y").map(|date| date.and_time(NaiveTime::MIN))
}

/// Parses a date and time in the `D-Mmm-YYYY HH:MM:SS` input pattern, such
/// as `1-Jan-1970 13:30:59`.
pub fn parse_date_time(s: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(s, "%d-%b-%Y %H:%M:%S")
}

#[cfg(test)]
mod tests {
    use super::{date_time_to_sav, parse_date, parse_date_time, UNIX_OFFSET};

    #[test]
    fn unix_epoch_offset() {
        let unix_epoch = parse_date("1-Jan-1970").unwrap();
        assert_eq!(date_time_to_sav(unix_epoch), UNIX_OFFSET as f64);
    }

    #[test]
    fn dates() {
        assert_eq!(
            date_time_to_sav(parse_date("2-Jan-1970").unwrap()),
            (UNIX_OFFSET + 86_400) as f64
        );
        assert_eq!(
            date_time_to_sav(parse_date_time("1-Jan-1970 00:01:40").unwrap()),
            (UNIX_OFFSET + 100) as f64
        );
        assert!(parse_date("31-Dec-1969").is_ok());
        assert!(parse_date("05-May-2017").is_ok());
    }

    #[test]
    fn invalid_dates() {
        assert!(parse_date("bogus").is_err());
        assert!(parse_date("32-Jan-1970").is_err());
        assert!(parse_date("1-Foo-1970").is_err());
        assert!(parse_date_time("1-Jan-1970").is_err());
        assert!(parse_date_time("1-Jan-1970 25:00:00").is_err());
    }
}
