use crate::error::{Error, Result};
use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    Morning,
    Afternoon,
    Night,
}

impl Period {
    /// Declaration order, also used as the tie-break order between slots.
    pub const ALL: [Period; 3] = [Period::Morning, Period::Afternoon, Period::Night];

    pub fn name(&self) -> &'static str {
        match self {
            Period::Morning => "Morning",
            Period::Afternoon => "Afternoon",
            Period::Night => "Night",
        }
    }

    /// The fixed medicine list bound to this period.
    pub fn medicines(&self) -> &'static [&'static str] {
        match self {
            Period::Morning => &["Metformin", "Sulfonylureas"],
            Period::Afternoon => &["DPP-4 Inhibitors", "SGLT2 Inhibitors"],
            Period::Night => &["Metformin", "Thiazolidinediones"],
        }
    }

    pub fn next(&self) -> Period {
        match self {
            Period::Morning => Period::Afternoon,
            Period::Afternoon => Period::Night,
            Period::Night => Period::Morning,
        }
    }

    pub fn prev(&self) -> Period {
        match self {
            Period::Morning => Period::Night,
            Period::Afternoon => Period::Morning,
            Period::Night => Period::Afternoon,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(Period::Morning),
            "afternoon" => Ok(Period::Afternoon),
            "night" => Ok(Period::Night),
            other => Err(Error::InvalidArgument(format!(
                "unknown period '{}' (expected morning, afternoon or night)",
                other
            ))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Taken,
    Missed,
}

impl Status {
    pub const ALL: [Status; 2] = [Status::Taken, Status::Missed];

    pub fn name(&self) -> &'static str {
        match self {
            Status::Taken => "Taken",
            Status::Missed => "Missed",
        }
    }

    pub fn note(&self) -> &'static str {
        match self {
            Status::Taken => "Medication taken on time",
            Status::Missed => "Medication missed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "taken" => Ok(Status::Taken),
            "missed" => Ok(Status::Missed),
            other => Err(Error::InvalidArgument(format!(
                "unknown status '{}' (expected taken or missed)",
                other
            ))),
        }
    }
}

/// Wall-clock time without a date, stored as minutes since midnight.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(Error::InvalidArgument(format!(
                "time {:02}:{:02} is out of range",
                hour, minute
            )));
        }
        Ok(Self((hour * 60 + minute) as u16))
    }

    /// Wraps around midnight, so any integer is accepted.
    pub fn from_minutes(minutes: i64) -> Self {
        Self(minutes.rem_euclid(MINUTES_PER_DAY as i64) as u16)
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }

    pub fn hour(&self) -> u32 {
        (self.0 / 60) as u32
    }

    pub fn minute(&self) -> u32 {
        (self.0 % 60) as u32
    }

    pub fn add_minutes(&self, delta: i64) -> Self {
        Self::from_minutes(self.0 as i64 + delta)
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }

    /// `08:00 AM` style.
    pub fn format_12h(&self) -> String {
        self.to_naive_time().format("%I:%M %p").to_string()
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(t: NaiveTime) -> Self {
        Self((t.hour() * 60 + t.minute()) as u16)
    }
}

impl From<NaiveDateTime> for TimeOfDay {
    fn from(t: NaiveDateTime) -> Self {
        t.time().into()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidArgument(format!("invalid time '{}' (expected HH:MM)", s));
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSlot {
    pub period: Period,
    pub time: TimeOfDay,
    pub medicines: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IntakeRecord {
    pub timestamp: NaiveDateTime,
    pub period: Period,
    pub medicines: Vec<String>,
    pub status: Status,
    pub note: String,
}

impl IntakeRecord {
    pub fn new(timestamp: NaiveDateTime, period: Period, medicines: &[String], status: Status) -> Self {
        Self {
            timestamp,
            period,
            medicines: medicines.to_vec(),
            status,
            note: status.note().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_from_str() {
        assert_eq!("Morning".parse::<Period>(), Ok(Period::Morning));
        assert_eq!(" night ".parse::<Period>(), Ok(Period::Night));
        assert!(matches!(
            "evening".parse::<Period>(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("TAKEN".parse::<Status>(), Ok(Status::Taken));
        assert!(matches!(
            "skipped".parse::<Status>(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_time_of_day_parse_and_display() {
        let t: TimeOfDay = "19:30".parse().unwrap();
        assert_eq!(t.minutes(), 19 * 60 + 30);
        assert_eq!(t.to_string(), "19:30");
        assert_eq!("8:05".parse::<TimeOfDay>().unwrap().to_string(), "08:05");
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("12:60".parse::<TimeOfDay>().is_err());
        assert!("1200".parse::<TimeOfDay>().is_err());
        assert!("12:5".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn test_time_of_day_truncates_seconds() {
        let t = NaiveTime::from_hms_opt(13, 0, 59).unwrap();
        assert_eq!(TimeOfDay::from(t), TimeOfDay::new(13, 0).unwrap());
    }

    #[test]
    fn test_time_of_day_wraps() {
        let t = TimeOfDay::new(23, 55).unwrap();
        assert_eq!(t.add_minutes(10), TimeOfDay::new(0, 5).unwrap());
        assert_eq!(TimeOfDay::new(0, 0).unwrap().add_minutes(-5).to_string(), "23:55");
    }

    #[test]
    fn test_format_12h() {
        assert_eq!(TimeOfDay::new(19, 30).unwrap().format_12h(), "07:30 PM");
        assert_eq!(TimeOfDay::new(8, 0).unwrap().format_12h(), "08:00 AM");
    }

    #[test]
    fn test_time_of_day_serde() {
        let t = TimeOfDay::new(8, 0).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"08:00\"");
        let back: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<TimeOfDay>("\"25:00\"").is_err());
    }

    #[test]
    fn test_record_note_follows_status() {
        let at = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 1, 0)
            .unwrap();
        let meds = vec!["Metformin".to_string()];
        let record = IntakeRecord::new(at, Period::Morning, &meds, Status::Missed);
        assert_eq!(record.note, "Medication missed");
        assert_eq!(record.medicines, meds);
    }
}
