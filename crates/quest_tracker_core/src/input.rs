//! crates/quest_tracker_core/src/input.rs
//!
//! Strongly typed inputs for the engine, validated from the raw strings a
//! request handler receives. Nothing in here touches stored state, so a failed
//! validation can never leave a half-applied change behind.

use crate::domain::{DailyQuestFlags, Quest, DATE_FORMAT};
use chrono::NaiveDate;
use std::str::FromStr;

/// Raised when user input cannot be turned into a typed value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid weight '{0}'")]
    InvalidWeight(String),
    #[error("Unknown quest '{0}'")]
    UnknownQuest(String),
}

impl FromStr for Quest {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quest::ALL
            .into_iter()
            .find(|q| q.as_str() == s.trim())
            .ok_or_else(|| ValidationError::UnknownQuest(s.to_string()))
    }
}

impl DailyQuestFlags {
    /// Builds the flags from the names of the selected quests; every quest not
    /// listed is marked as not done.
    pub fn from_selected<S: AsRef<str>>(selected: &[S]) -> Result<Self, ValidationError> {
        let mut flags = DailyQuestFlags::default();
        for name in selected {
            flags.set(name.as_ref().parse()?, true);
        }
        Ok(flags)
    }
}

/// Parses a strict, zero-padded `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    // chrono accepts "2024-1-5"; stored dates must stay lexicographically sortable.
    if trimmed.len() != 10 {
        return Err(ValidationError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Parses a body weight. It must be a finite, positive number.
pub fn parse_weight(raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(w) if w.is_finite() && w > 0.0 => Ok(w),
        _ => Err(ValidationError::InvalidWeight(raw.to_string())),
    }
}

/// A validated submission of one day's quests.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySubmission {
    pub date: NaiveDate,
    /// `None` keeps whatever weight the day already had.
    pub weight: Option<f64>,
    pub quests: DailyQuestFlags,
}

impl DailySubmission {
    pub fn parse<S: AsRef<str>>(
        date: &str,
        weight: Option<&str>,
        selected_quests: &[S],
    ) -> Result<Self, ValidationError> {
        let date = parse_date(date)?;
        let weight = match weight.map(str::trim).filter(|w| !w.is_empty()) {
            Some(raw) => Some(parse_weight(raw)?),
            None => None,
        };
        let quests = DailyQuestFlags::from_selected(selected_quests)?;
        Ok(Self {
            date,
            weight,
            quests,
        })
    }

    pub fn date_key(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// A validated change to the profile's current weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightUpdate {
    pub weight: f64,
}

impl WeightUpdate {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            weight: parse_weight(raw)?,
        })
    }
}

/// Inclusive date bounds; a missing side is unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    /// Validates both bounds. Blank strings count as absent.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, ValidationError> {
        let bound = |raw: Option<&str>| -> Result<Option<String>, ValidationError> {
            match raw.map(str::trim).filter(|s| !s.is_empty()) {
                Some(s) => Ok(Some(parse_date(s)?.format(DATE_FORMAT).to_string())),
                None => Ok(None),
            }
        };
        Ok(Self {
            start: bound(start)?,
            end: bound(end)?,
        })
    }
}
