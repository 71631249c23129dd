//! crates/quest_tracker_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or storage format; the serde
//! derives describe the shape shared with the JSON API and the flat-file store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical date format for every stored and submitted date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Body weight a brand new profile starts from.
pub const DEFAULT_WEIGHT: f64 = 110.5;

//=========================================================================================
// Quests
//=========================================================================================

/// One of the four fixed daily tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quest {
    Cardio,
    Strength,
    Stretching,
    Water,
}

impl Quest {
    pub const ALL: [Quest; 4] = [Quest::Cardio, Quest::Strength, Quest::Stretching, Quest::Water];

    pub fn as_str(self) -> &'static str {
        match self {
            Quest::Cardio => "cardio",
            Quest::Strength => "strength",
            Quest::Stretching => "stretching",
            Quest::Water => "water",
        }
    }

    /// What completing the quest means, shown on the info page.
    pub fn description(self) -> &'static str {
        match self {
            Quest::Cardio => "30 minutes of cardio. For example: running, cycling, jump rope.",
            Quest::Strength => "Strength exercises. For example: push-ups, squats, weights.",
            Quest::Stretching => "A stretching routine. For example: yoga, joint mobility.",
            Quest::Water => "Drink 2 litres of water.",
        }
    }
}

impl fmt::Display for Quest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion flags for the four quests of a single day. All keys are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyQuestFlags {
    pub cardio: bool,
    pub strength: bool,
    pub stretching: bool,
    pub water: bool,
}

impl DailyQuestFlags {
    pub fn is_done(&self, quest: Quest) -> bool {
        match quest {
            Quest::Cardio => self.cardio,
            Quest::Strength => self.strength,
            Quest::Stretching => self.stretching,
            Quest::Water => self.water,
        }
    }

    pub fn set(&mut self, quest: Quest, done: bool) {
        match quest {
            Quest::Cardio => self.cardio = done,
            Quest::Strength => self.strength = done,
            Quest::Stretching => self.stretching = done,
            Quest::Water => self.water = done,
        }
    }

    /// Iterates over the quests marked as done, in declaration order.
    pub fn completed(&self) -> impl Iterator<Item = Quest> {
        let flags = *self;
        Quest::ALL.into_iter().filter(move |q| flags.is_done(*q))
    }
}

//=========================================================================================
// Profile and History
//=========================================================================================

/// The user's current standing. `xp` is the experience within the current level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileState {
    pub weight: f64,
    pub level: u32,
    pub xp: u32,
}

impl ProfileState {
    pub fn with_weight(weight: f64) -> Self {
        Self {
            weight,
            level: 1,
            xp: 0,
        }
    }
}

impl Default for ProfileState {
    fn default() -> Self {
        Self::with_weight(DEFAULT_WEIGHT)
    }
}

/// One saved day. `level` is the profile level before the save that wrote the
/// record and `xp` is the experience earned on that day alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: String,
    pub weight: f64,
    pub level: u32,
    pub xp: u32,
    #[serde(rename = "daily_quests")]
    pub quests: DailyQuestFlags,
}

impl DailyRecord {
    /// Parses the stored date. Records read from older files may hold junk here.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

/// Everything the storage port loads and saves in one go.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub profile: ProfileState,
    pub history: Vec<DailyRecord>,
}

impl ProgressSnapshot {
    pub fn find(&self, date: &str) -> Option<&DailyRecord> {
        self.history.iter().find(|r| r.date == date)
    }
}

/// Result of rolling a history up into a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progression {
    pub level: u32,
    pub xp: u32,
    /// Lifetime experience across all days.
    pub total_xp: u32,
}

//=========================================================================================
// Aggregates
//=========================================================================================

/// Bucketing period for historical summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
}

/// Averages of every record that fell in one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub label: String,
    pub weight: f64,
    pub level: f64,
    pub xp: f64,
}

/// A record left out of an aggregation because its date could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationWarning {
    pub date: String,
    pub reason: String,
}

/// Daily series plus both aggregations for a (possibly filtered) history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub dates: Vec<String>,
    pub weights: Vec<f64>,
    pub levels: Vec<u32>,
    pub xps: Vec<u32>,
    pub weekly: Vec<PeriodSummary>,
    pub monthly: Vec<PeriodSummary>,
    pub skipped: Vec<AggregationWarning>,
}
