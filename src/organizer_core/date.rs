use crate::organizer_core::error::{OrganizerError, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// Date format used in EXIF tags.
pub const EXIF_DATE_FORMAT: &[FormatItem] =
    format_description!("[year]:[month]:[day] [hour]:[minute]:[second]");

/// Date format requested for video container creation dates.
pub const CONTAINER_DATE_FORMAT: &[FormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Date format used in log output.
pub const LOG_DATE_FORMAT: &[FormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// A capture date and time. Always a valid calendar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CaptureDate(PrimitiveDateTime);

impl CaptureDate {
    pub fn new(date_time: PrimitiveDateTime) -> Self {
        Self(date_time)
    }

    /// A date at midnight.
    pub fn from_date(date: Date) -> Self {
        Self(PrimitiveDateTime::new(date, Time::MIDNIGHT))
    }

    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self> {
        let month = Month::try_from(month)
            .map_err(|e| OrganizerError::InvalidDateFormat(e.to_string()))?;
        let date = Date::from_calendar_date(year, month, day)
            .map_err(|e| OrganizerError::InvalidDateFormat(e.to_string()))?;
        Ok(Self::from_date(date))
    }

    #[cfg(test)]
    pub fn date_time(&self) -> PrimitiveDateTime {
        self.0
    }

    /// The calendar date; time of day is not used for placement.
    pub fn date(&self) -> Date {
        self.0.date()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u8 {
        self.0.month() as u8
    }

    pub fn day(&self) -> u8 {
        self.0.day()
    }

    /// Zero-padded `[YYYY, MM, DD]` folder names.
    pub fn folder_components(&self) -> [String; 3] {
        [
            format!("{:04}", self.year()),
            format!("{:02}", self.month()),
            format!("{:02}", self.day()),
        ]
    }

    /// `base/YYYY/MM/DD`.
    pub fn folder_under(&self, base: &Path) -> PathBuf {
        let mut dir = base.to_path_buf();
        for component in self.folder_components() {
            dir.push(component);
        }
        dir
    }
}

impl std::fmt::Display for CaptureDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.format(LOG_DATE_FORMAT) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}

/// Parse an EXIF `YYYY:MM:DD HH:MM:SS` value.
pub fn parse_exif_date(value: &str) -> Result<CaptureDate> {
    parse_with(value, EXIF_DATE_FORMAT)
}

/// Parse a container `YYYY-MM-DD HH:MM:SS` value.
pub fn parse_container_date(value: &str) -> Result<CaptureDate> {
    parse_with(value, CONTAINER_DATE_FORMAT)
}

fn parse_with(value: &str, format: &[FormatItem]) -> Result<CaptureDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(OrganizerError::InvalidDateFormat("empty date".to_string()));
    }
    PrimitiveDateTime::parse(value, format)
        .map(CaptureDate::new)
        .map_err(|e| OrganizerError::InvalidDateFormat(format!("{value:?}: {e}")))
}

/// Parse exactly eight ASCII digits as `YYYYMMDD`.
pub fn parse_compact_date(value: &str) -> Result<CaptureDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(OrganizerError::InvalidDateFormat(format!(
            "{value:?} is not YYYYMMDD"
        )));
    }
    let year: i32 = value[0..4]
        .parse()
        .map_err(|e: std::num::ParseIntError| OrganizerError::InvalidDateFormat(e.to_string()))?;
    let month: u8 = value[4..6]
        .parse()
        .map_err(|e: std::num::ParseIntError| OrganizerError::InvalidDateFormat(e.to_string()))?;
    let day: u8 = value[6..8]
        .parse()
        .map_err(|e: std::num::ParseIntError| OrganizerError::InvalidDateFormat(e.to_string()))?;
    if year < 1 {
        return Err(OrganizerError::InvalidDateFormat(format!(
            "{value:?} has year 0"
        )));
    }
    CaptureDate::from_ymd(year, month, day)
}

/// Substring by character positions, truncated at the end of the string.
fn char_slice(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end.saturating_sub(start)).collect()
}

/// The `YYYYMMDD` candidates tried for a file name, in order:
/// `YYYY-MM-DD_...`, `IMG_YYYYMMDD_...`, `YYYYMMDD_...`.
pub fn filename_date_candidates(file_name: &str) -> [String; 3] {
    [
        char_slice(file_name, 0, 10).replace('-', ""),
        char_slice(file_name, 4, 12),
        char_slice(file_name, 0, 8),
    ]
}

/// Guess a date from a file name; the first candidate that parses wins.
pub fn guess_date_from_filename(file_name: &str) -> Result<CaptureDate> {
    filename_date_candidates(file_name)
        .iter()
        .find_map(|candidate| parse_compact_date(candidate).ok())
        .ok_or_else(|| OrganizerError::FilenamePatternMismatch(file_name.to_string()))
}

/// Convert a filesystem time to a local capture date.
pub fn from_system_time(time: SystemTime, offset: UtcOffset) -> CaptureDate {
    let local = OffsetDateTime::from(time).to_offset(offset);
    CaptureDate::new(PrimitiveDateTime::new(local.date(), local.time()))
}

/// The local timezone offset, falling back to UTC when it cannot be determined.
pub fn get_local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_parse_exif_date() {
        let date = parse_exif_date("2021:06:01 08:30:00").unwrap();
        assert_eq!(date.date_time(), datetime!(2021-06-01 08:30:00));
    }

    #[test]
    fn test_parse_exif_date_rejects_other_formats() {
        assert!(parse_exif_date("").is_err());
        assert!(parse_exif_date("2021-06-01 08:30:00").is_err());
        assert!(parse_exif_date("0000:00:00 00:00:00").is_err());
    }

    #[test]
    fn test_parse_container_date() {
        let date = parse_container_date("2019-12-31 23:59:58").unwrap();
        assert_eq!(date.year(), 2019);
        assert_eq!(date.month(), 12);
        assert_eq!(date.day(), 31);
        assert!(parse_container_date("2019:12:31 23:59:58").is_err());
    }

    #[test]
    fn test_parse_compact_date_strict() {
        assert_eq!(
            parse_compact_date("20230115").unwrap(),
            CaptureDate::from_ymd(2023, 1, 15).unwrap()
        );
        assert!(parse_compact_date("20230230").is_err());
        assert!(parse_compact_date("2023011").is_err());
        assert!(parse_compact_date("2023-01-").is_err());
        assert!(parse_compact_date("+2023011").is_err());
        assert!(parse_compact_date("00000101").is_err());
    }

    #[test]
    fn test_filename_candidates() {
        let [a, b, c] = filename_date_candidates("IMG_20230115_101500.jpg");
        assert_eq!(a, "IMG_202301");
        assert_eq!(b, "20230115");
        assert_eq!(c, "IMG_2023");

        // Short names are truncated rather than rejected
        let [a, b, c] = filename_date_candidates("a.jpg");
        assert_eq!(a, "a.jpg");
        assert_eq!(b, "g");
        assert_eq!(c, "a.jpg");
    }

    #[test]
    fn test_guess_date_from_filename_patterns() {
        let expected = CaptureDate::from_ymd(2023, 1, 15).unwrap();
        assert_eq!(guess_date_from_filename("2023-01-15_10-15-00_123.heic").unwrap(), expected);
        assert_eq!(guess_date_from_filename("IMG_20230115_101500.jpg").unwrap(), expected);
        assert_eq!(guess_date_from_filename("VID_20230115_101500.mp4").unwrap(), expected);
        assert_eq!(guess_date_from_filename("20230115_101500.jpg").unwrap(), expected);
    }

    #[test]
    fn test_guess_date_from_filename_midnight() {
        let date = guess_date_from_filename("20230115_101500.jpg").unwrap();
        assert_eq!(date.date_time(), datetime!(2023-01-15 00:00:00));
    }

    #[test]
    fn test_guess_date_from_filename_mismatch() {
        let err = guess_date_from_filename("random.mov").unwrap_err();
        assert!(matches!(err, OrganizerError::FilenamePatternMismatch(_)));
        assert!(guess_date_from_filename("IMG_20231345_000000.jpg").is_err());
        assert!(guess_date_from_filename("é").is_err());
        assert!(guess_date_from_filename("00000101_x.jpg").is_err());
    }

    #[test]
    fn test_folder_under() {
        let date = CaptureDate::from_ymd(987, 3, 7).unwrap();
        assert_eq!(
            date.folder_under(Path::new("/base")),
            PathBuf::from("/base/0987/03/07")
        );
    }

    #[test]
    fn test_from_system_time_uses_offset() {
        let instant = SystemTime::from(datetime!(2020-03-10 23:30:00 UTC));
        let utc = from_system_time(instant, UtcOffset::UTC);
        assert_eq!(utc.day(), 10);

        let ahead = from_system_time(instant, UtcOffset::from_hms(2, 0, 0).unwrap());
        assert_eq!(ahead.day(), 11);
    }

    #[test]
    fn test_display() {
        let date = parse_exif_date("2021:06:01 08:30:00").unwrap();
        assert_eq!(date.to_string(), "2021-06-01 08:30:00");
    }
}
