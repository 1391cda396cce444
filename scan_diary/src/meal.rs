//! Meal-slot resolution from local wall-clock time.
//!
//! A [`MealSchedule`] is an ordered list of half-open windows
//! (`start <= t < end`, local 24-hour time) plus a default meal. The first
//! window containing `t` wins, so overlapping windows resolve to whichever was
//! configured first. Anything outside every window gets the default.

use std::{fmt, str::FromStr};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed set of diary meal categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MealWindowParseError {
    #[error("unknown meal type {0:?} (expected Breakfast, Lunch, Dinner or Snack)")]
    UnknownMeal(String),

    #[error("window {0:?} is not in HH:MM-HH:MM form")]
    Format(String),

    #[error("bad time {0:?} in meal window")]
    Time(String),

    #[error("window {0:?} ends before it starts")]
    Empty(String),
}

impl FromStr for MealType {
    type Err = MealWindowParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MealType::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MealWindowParseError::UnknownMeal(s.to_string()))
    }
}

/// One configured `[start, end)` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealWindow {
    pub meal: MealType,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl MealWindow {
    /// Parses `"HH:MM-HH:MM"`; whitespace around either time is ignored.
    ///
    /// Windows do not wrap past midnight, so `end` must be after `start`.
    pub fn parse(meal: MealType, range: &str) -> Result<Self, MealWindowParseError> {
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| MealWindowParseError::Format(range.to_string()))?;
        let start = parse_hhmm(start)?;
        let end = parse_hhmm(end)?;
        if end <= start {
            return Err(MealWindowParseError::Empty(range.to_string()));
        }
        Ok(Self { meal, start, end })
    }

    pub fn contains(&self, t: NaiveTime) -> bool {
        self.start <= t && t < self.end
    }
}

fn parse_hhmm(s: &str) -> Result<NaiveTime, MealWindowParseError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| MealWindowParseError::Time(s.trim().to_string()))
}

/// Ordered meal windows plus the fallback category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealSchedule {
    windows: Vec<MealWindow>,
    default: MealType,
}

impl MealSchedule {
    /// Built-in windows, used for any meal not configured explicitly.
    pub const DEFAULT_WINDOWS: [(MealType, &'static str); 3] = [
        (MealType::Breakfast, "05:00-10:00"),
        (MealType::Lunch, "11:00-13:00"),
        (MealType::Dinner, "14:00-16:00"),
    ];

    pub fn new(windows: Vec<MealWindow>, default: MealType) -> Self {
        Self { windows, default }
    }

    pub fn windows(&self) -> &[MealWindow] {
        &self.windows
    }

    pub fn default_meal(&self) -> MealType {
        self.default
    }

    /// Meal for local time `t`: first matching window, else the default.
    pub fn resolve(&self, t: NaiveTime) -> MealType {
        self.windows
            .iter()
            .find(|w| w.contains(t))
            .map(|w| w.meal)
            .unwrap_or(self.default)
    }
}

impl Default for MealSchedule {
    fn default() -> Self {
        let windows = Self::DEFAULT_WINDOWS
            .iter()
            .filter_map(|(meal, range)| MealWindow::parse(*meal, range).ok())
            .collect();
        Self::new(windows, MealType::Snack)
    }
}
