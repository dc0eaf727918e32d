use serde::{Deserialize, Deserializer, Serialize};
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;
use thiserror::Error;

pub const MINUTES_PER_DAY: u32 = 1440;

/// Wall-clock time in minutes since midnight.
///
/// Parsed values always fall inside a single day. The running clock of an
/// itinerary walk reuses the type and may run past midnight.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Time(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("expected HH:MM, got {0:?}")]
    Format(String),
    #[error("hour {0} is out of range 0-23")]
    HourOutOfRange(u32),
    #[error("minute {0} is out of range 0-59")]
    MinuteOutOfRange(u32),
}

impl Time {
    pub fn hm(hours: u32, minutes: u32) -> Time {
        Time(hours * 60 + minutes)
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    /// Half-open overlap of `[time.0, time.1)` and `[window.0, window.1)`.
    pub fn is_overlapping(time: &(Time, Time), window: &(Time, Time)) -> bool {
        time.0 < window.1 && time.1 > window.0
    }

    /// Parses an optional `HH:MM` value where a blank string means unset.
    pub fn parse_optional(s: &str) -> Result<Option<Time>, TimeParseError> {
        if s.trim().is_empty() {
            Ok(None)
        } else {
            s.parse().map(Some)
        }
    }
}

impl FromStr for Time {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TimeParseError::Format(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(malformed)?;
        let segment = |part: &str| -> Result<u32, TimeParseError> {
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            part.parse::<u32>().map_err(|_| malformed())
        };

        let hours = segment(h)?;
        let minutes = segment(m)?;
        if hours > 23 {
            return Err(TimeParseError::HourOutOfRange(hours));
        }
        if minutes > 59 {
            return Err(TimeParseError::MinuteOutOfRange(minutes));
        }
        Ok(Time::hm(hours, minutes))
    }
}

impl TryFrom<String> for Time {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Time> for String {
    fn from(value: Time) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let days = self.0 / MINUTES_PER_DAY;
        let remaining = self.0 % MINUTES_PER_DAY;
        let hours = remaining / 60;
        let mins = remaining % 60;
        if days == 0 {
            write!(f, "{:02}:{:02}", hours, mins)
        } else {
            write!(f, "{:02}:{:02} (+{}d)", hours, mins, days)
        }
    }
}

/// Deserializes an optional `HH:MM` field, treating `null` and `""` as unset.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Time>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(s) => Time::parse_optional(&s).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

// The clock saturates instead of wrapping, a stay of `u32::MAX` minutes is
// still a valid input.
impl Add<u32> for Time {
    type Output = Self;

    fn add(self, rhs: u32) -> Self::Output {
        Time(self.0.saturating_add(rhs))
    }
}

impl Sub<Time> for Time {
    type Output = u32;

    fn sub(self, rhs: Time) -> Self::Output {
        self.0.saturating_sub(rhs.0)
    }
}

impl AddAssign<u32> for Time {
    fn add_assign(&mut self, rhs: u32) {
        self.0 = self.0.saturating_add(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_well_formed() {
        assert_eq!(Ok(Time(0)), "00:00".parse::<Time>());
        assert_eq!(Ok(Time(9 * 60)), "09:00".parse::<Time>());
        assert_eq!(Ok(Time(9 * 60 + 5)), "9:05".parse::<Time>());
        assert_eq!(Ok(Time(1439)), "23:59".parse::<Time>());
        assert_eq!(Ok(Time(18 * 60)), " 18:00 ".parse::<Time>());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Err(TimeParseError::Format("".into())), "".parse::<Time>());
        assert_eq!(Err(TimeParseError::Format("0900".into())), "0900".parse::<Time>());
        assert_eq!(Err(TimeParseError::Format(":30".into())), ":30".parse::<Time>());
        assert_eq!(Err(TimeParseError::Format("12:".into())), "12:".parse::<Time>());
        assert_eq!(Err(TimeParseError::Format("12:30:00".into())), "12:30:00".parse::<Time>());
        assert_eq!(Err(TimeParseError::Format("1a:00".into())), "1a:00".parse::<Time>());
        assert_eq!(Err(TimeParseError::Format("-1:00".into())), "-1:00".parse::<Time>());
        assert_eq!(Err(TimeParseError::Format("123:00".into())), "123:00".parse::<Time>());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert_eq!(Err(TimeParseError::HourOutOfRange(24)), "24:00".parse::<Time>());
        assert_eq!(Err(TimeParseError::MinuteOutOfRange(60)), "10:60".parse::<Time>());
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(Ok(None), Time::parse_optional(""));
        assert_eq!(Ok(None), Time::parse_optional("   "));
        assert_eq!(Ok(Some(Time::hm(12, 0))), Time::parse_optional("12:00"));
        assert!(Time::parse_optional("noon").is_err());
    }

    #[test]
    fn test_display_past_midnight() {
        assert_eq!("09:00", Time::hm(9, 0).to_string());
        assert_eq!("00:30 (+1d)", (Time::hm(23, 0) + 90).to_string());
    }

    #[test]
    fn test_arithmetic_saturates() {
        let mut clock = Time::hm(9, 0);
        clock += u32::MAX;
        assert_eq!(Time(u32::MAX), clock);
        assert_eq!(Time(u32::MAX), Time::hm(9, 0) + u32::MAX);
        assert_eq!(0, Time::hm(9, 0) - Time::hm(10, 0));
        assert_eq!(u32::MAX - 540, clock - Time::hm(9, 0));
    }

    #[test]
    fn test_overlap_is_half_open() {
        let lunch = (Time::hm(12, 0), Time::hm(13, 0));
        assert!(!Time::is_overlapping(&(Time::hm(11, 0), Time::hm(12, 0)), &lunch));
        assert!(Time::is_overlapping(&(Time::hm(11, 0), Time::hm(12, 1)), &lunch));
        assert!(!Time::is_overlapping(&(Time::hm(13, 0), Time::hm(14, 0)), &lunch));
        assert!(Time::is_overlapping(&(Time::hm(12, 59), Time::hm(14, 0)), &lunch));
    }

    #[test]
    fn test_serde_as_string() {
        let t: Time = serde_json::from_str("\"08:15\"").unwrap();
        assert_eq!(Time::hm(8, 15), t);
        assert_eq!("\"08:15\"", serde_json::to_string(&t).unwrap());
        assert!(serde_json::from_str::<Time>("\"25:00\"").is_err());
    }

    proptest! {
        #[test]
        fn test_display_parse_round_trip(hours in 0..24u32, minutes in 0..60u32) {
            let time = Time::hm(hours, minutes);
            prop_assert_eq!(Ok(time), time.to_string().parse::<Time>());
        }
    }
}
