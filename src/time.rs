use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MINUTES_PER_DAY: u32 = 24 * 60;
pub const MINUTES_PER_WEEK: u32 = 7 * MINUTES_PER_DAY;

/// Day of the abstract repeating week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    M,
    T,
    W,
    H,
    F,
    S,
    U,
}

impl Day {
    pub const ALL: [Day; 7] = [Day::M, Day::T, Day::W, Day::H, Day::F, Day::S, Day::U];

    pub fn index(self) -> u32 {
        match self {
            Day::M => 0,
            Day::T => 1,
            Day::W => 2,
            Day::H => 3,
            Day::F => 4,
            Day::S => 5,
            Day::U => 6,
        }
    }

    pub fn code(self) -> char {
        match self {
            Day::M => 'M',
            Day::T => 'T',
            Day::W => 'W',
            Day::H => 'H',
            Day::F => 'F',
            Day::S => 'S',
            Day::U => 'U',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Day::M => "Monday",
            Day::T => "Tuesday",
            Day::W => "Wednesday",
            Day::H => "Thursday",
            Day::F => "Friday",
            Day::S => "Saturday",
            Day::U => "Sunday",
        }
    }

    pub fn from_code(code: char) -> Option<Day> {
        Day::ALL
            .into_iter()
            .find(|d| d.code() == code.to_ascii_uppercase())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A point in the repeating 7-day week, minute resolution. The derived
/// ordering (day, then hour, then minute) matches minutes-since-week-start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Instant {
    day: Day,
    hour: u8,
    minute: u8,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid instant '{0}', expected <day>-<hour>-<minute> like M-8-30")]
pub struct ParseInstantError(String);

impl Instant {
    /// Out-of-range components are rejected rather than normalized.
    pub fn new(day: Day, hour: u8, minute: u8) -> Option<Instant> {
        (hour < 24 && minute < 60).then_some(Instant { day, hour, minute })
    }

    pub fn day(self) -> Day {
        self.day
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn to_minutes(self) -> u32 {
        self.day.index() * MINUTES_PER_DAY + self.hour as u32 * 60 + self.minute as u32
    }

    pub fn from_minutes(total: u32) -> Instant {
        let total = total % MINUTES_PER_WEEK;
        let remaining = total % MINUTES_PER_DAY;
        Instant {
            day: Day::ALL[(total / MINUTES_PER_DAY) as usize],
            hour: (remaining / 60) as u8,
            minute: (remaining % 60) as u8,
        }
    }

    /// Wraps past Sunday back to Monday.
    pub fn add_minutes(self, minutes: u32) -> Instant {
        Instant::from_minutes(self.to_minutes() + minutes)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.day, self.hour, self.minute)
    }
}

impl FromStr for Instant {
    type Err = ParseInstantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseInstantError(s.to_string());
        let mut parts = s.split('-');
        let day = parts
            .next()
            .and_then(|p| {
                let mut chars = p.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Day::from_code(c),
                    _ => None,
                }
            })
            .ok_or_else(err)?;
        let hour = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(err)?;
        let minute = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(err)?;
        if parts.next().is_some() {
            return Err(err());
        }
        Instant::new(day, hour, minute).ok_or_else(err)
    }
}
