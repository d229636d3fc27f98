//! Weekly calendar primitives: weekdays, times of day, and the slot grid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::SlotId;

/// Teaching day of the week. Sunday is never scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    #[serde(alias = "monday")]
    Mon,
    #[serde(alias = "tuesday")]
    Tue,
    #[serde(alias = "wednesday")]
    Wed,
    #[serde(alias = "thursday")]
    Thu,
    #[serde(alias = "friday")]
    Fri,
    #[serde(alias = "saturday")]
    Sat,
}

impl Weekday {
    /// All teaching days in calendar order.
    pub const ALL: [Weekday; 6] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// Number of teaching days.
    pub const COUNT: usize = 6;

    /// Zero-based position in the week (Mon = 0).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a time of day cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time of day `{0}`, expected HH:MM")]
pub struct TimeParseError(pub String);

/// A time of day with minute resolution, stored as minutes since midnight.
///
/// Serialized as an `"HH:MM"` string.
///
/// # Examples
///
/// ```
/// use timetabler_core::TimeOfDay;
///
/// let t: TimeOfDay = "09:30".parse().unwrap();
/// assert_eq!(t, TimeOfDay::hm(9, 30));
/// assert_eq!(t.minutes(), 570);
/// assert_eq!(t.to_string(), "09:30");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Latest representable minute (23:59).
    pub const MAX_MINUTES: u16 = 24 * 60 - 1;

    /// Creates a time from hours and minutes.
    #[inline]
    pub const fn hm(hour: u8, minute: u8) -> Self {
        TimeOfDay(hour as u16 * 60 + minute as u16)
    }

    /// Creates a time from minutes since midnight.
    #[inline]
    pub const fn from_minutes(minutes: u16) -> Self {
        TimeOfDay(minutes)
    }

    #[inline]
    pub const fn minutes(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    #[inline]
    pub const fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || TimeParseError(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(err)?;
        let hour: u16 = h.parse().map_err(|_| err())?;
        let minute: u16 = m.parse().map_err(|_| err())?;
        if hour > 23 || minute > 59 {
            return Err(err());
        }
        Ok(TimeOfDay(hour * 60 + minute))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeOfDay({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// A half-open interval `[start, end)` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeWindow {
    pub const fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Returns true if the window has positive length.
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    /// Length of the overlap between this window and `[start, end)`, in minutes.
    pub fn overlap_minutes(&self, start: TimeOfDay, end: TimeOfDay) -> u32 {
        let lo = self.start.max(start).minutes();
        let hi = self.end.min(end).minutes();
        hi.saturating_sub(lo) as u32
    }

    /// Minutes of `[start, end)` that fall outside this window.
    ///
    /// ```
    /// use timetabler_core::{TimeOfDay, TimeWindow};
    ///
    /// let morning = TimeWindow::new(TimeOfDay::hm(9, 0), TimeOfDay::hm(12, 0));
    /// assert_eq!(morning.minutes_outside(TimeOfDay::hm(9, 0), TimeOfDay::hm(10, 0)), 0);
    /// assert_eq!(morning.minutes_outside(TimeOfDay::hm(11, 30), TimeOfDay::hm(12, 30)), 30);
    /// assert_eq!(morning.minutes_outside(TimeOfDay::hm(16, 0), TimeOfDay::hm(17, 0)), 60);
    /// ```
    pub fn minutes_outside(&self, start: TimeOfDay, end: TimeOfDay) -> u32 {
        let length = end.minutes().saturating_sub(start.minutes()) as u32;
        length - self.overlap_minutes(start, end)
    }
}

/// One teachable period of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    pub id: SlotId,
    pub day: Weekday,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    /// Position of this slot among the slots of its day, starting at 0.
    pub ordinal: u16,
}

impl TimeSlot {
    #[inline]
    pub fn duration_minutes(&self) -> u32 {
        (self.end.minutes() - self.start.minutes()) as u32
    }
}

/// Generator for the fixed weekly slot grid.
///
/// The default grid covers Monday to Saturday, 08:00 to 18:00 in one-hour
/// steps with the 13:00 lunch hour excluded, giving 9 slots a day and 54 a week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SlotGrid {
    pub days: Vec<Weekday>,
    pub day_start: TimeOfDay,
    pub day_end: TimeOfDay,
    pub step_minutes: u16,
    /// Periods that never hold a class, such as lunch.
    pub breaks: Vec<TimeWindow>,
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self {
            days: Weekday::ALL.to_vec(),
            day_start: TimeOfDay::hm(8, 0),
            day_end: TimeOfDay::hm(18, 0),
            step_minutes: 60,
            breaks: vec![TimeWindow::new(TimeOfDay::hm(13, 0), TimeOfDay::hm(14, 0))],
        }
    }
}

impl SlotGrid {
    /// Creates a grid over the given days with no breaks.
    pub fn new(days: impl Into<Vec<Weekday>>, day_start: TimeOfDay, day_end: TimeOfDay) -> Self {
        Self {
            days: days.into(),
            day_start,
            day_end,
            step_minutes: 60,
            breaks: Vec::new(),
        }
    }

    pub fn with_step_minutes(mut self, step: u16) -> Self {
        self.step_minutes = step;
        self
    }

    pub fn with_break(mut self, window: TimeWindow) -> Self {
        self.breaks.push(window);
        self
    }

    /// Enumerates the slots of this grid, day by day in calendar order.
    ///
    /// Duplicate days are ignored. A step that would run past `day_end` or
    /// overlap a break is skipped. Slot ids are assigned sequentially.
    pub fn slots(&self) -> Vec<TimeSlot> {
        let mut days = self.days.clone();
        days.sort();
        days.dedup();

        let mut slots = Vec::new();
        if self.step_minutes == 0 {
            return slots;
        }

        for day in days {
            let mut ordinal = 0u16;
            let mut start = self.day_start.minutes();
            while start + self.step_minutes <= self.day_end.minutes() {
                let slot_start = TimeOfDay::from_minutes(start);
                let slot_end = TimeOfDay::from_minutes(start + self.step_minutes);
                start += self.step_minutes;

                let in_break = self
                    .breaks
                    .iter()
                    .any(|b| b.overlap_minutes(slot_start, slot_end) > 0);
                if in_break {
                    continue;
                }

                slots.push(TimeSlot {
                    id: SlotId::from_index(slots.len()),
                    day,
                    start: slot_start,
                    end: slot_end,
                    ordinal,
                });
                ordinal += 1;
            }
        }
        slots
    }
}
