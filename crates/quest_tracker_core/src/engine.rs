//! crates/quest_tracker_core/src/engine.rs
//!
//! The progression and aggregation rules. Every function here is pure: it takes
//! plain snapshots and returns new values, leaving persistence to the caller.
//!
//! Scoring follows the cumulative rule: each completed quest is worth
//! [`XP_PER_QUEST`] and every [`XP_PER_LEVEL`] lifetime points raise the level.

use crate::domain::{
    AggregationWarning, ChartSeries, DailyQuestFlags, DailyRecord, Period, PeriodSummary,
    ProfileState, Progression, ProgressSnapshot,
};
use crate::input::{DailySubmission, DateRange, WeightUpdate};
use chrono::Datelike;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const XP_PER_QUEST: u32 = 100;
pub const XP_PER_LEVEL: u32 = 1000;

//=========================================================================================
// Experience and Levels
//=========================================================================================

/// Experience earned on a single day.
pub fn compute_daily_xp(flags: &DailyQuestFlags) -> u32 {
    flags.completed().count() as u32 * XP_PER_QUEST
}

/// Sum of every day's experience.
pub fn lifetime_xp(history: &[DailyRecord]) -> u32 {
    history.iter().map(|r| compute_daily_xp(&r.quests)).sum()
}

/// Rebuilds level and in-level xp from scratch. Never incremental, so an edit to
/// a past day is always reflected.
pub fn recompute_profile(history: &[DailyRecord]) -> Progression {
    let total_xp = lifetime_xp(history);
    Progression {
        level: 1 + total_xp / XP_PER_LEVEL,
        xp: total_xp % XP_PER_LEVEL,
        total_xp,
    }
}

/// Points still missing before the next level.
pub fn xp_to_next_level(profile: &ProfileState) -> u32 {
    XP_PER_LEVEL - profile.xp.min(XP_PER_LEVEL - 1)
}

//=========================================================================================
// Daily Records
//=========================================================================================

/// Result of saving one day.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOutcome {
    pub snapshot: ProgressSnapshot,
    pub record: DailyRecord,
}

/// The stored record for `date`, or an unsaved zero-state record built from the
/// current profile when the day has not been logged yet.
pub fn record_for_date(snapshot: &ProgressSnapshot, date: &str) -> DailyRecord {
    snapshot
        .find(date)
        .cloned()
        .unwrap_or_else(|| DailyRecord {
            date: date.to_string(),
            weight: snapshot.profile.weight,
            level: snapshot.profile.level,
            xp: 0,
            quests: DailyQuestFlags::default(),
        })
}

/// Inserts or overwrites the record for the submitted day, then rolls the whole
/// history up into a fresh profile level.
///
/// The written record keeps the level the profile had *before* this save. That
/// mirrors how records have always been stored; the profile itself carries the
/// post-save level.
pub fn upsert_daily_record(snapshot: &ProgressSnapshot, submission: &DailySubmission) -> UpsertOutcome {
    let date = submission.date_key();
    let mut history = snapshot.history.clone();
    let existing = history.iter().position(|r| r.date == date);

    let weight = submission
        .weight
        .or_else(|| existing.map(|idx| history[idx].weight))
        .unwrap_or(snapshot.profile.weight);

    let record = DailyRecord {
        date,
        weight,
        level: snapshot.profile.level,
        xp: compute_daily_xp(&submission.quests),
        quests: submission.quests,
    };

    match existing {
        Some(idx) => history[idx] = record.clone(),
        None => history.push(record.clone()),
    }

    let progression = recompute_profile(&history);
    debug!(
        date = %record.date,
        day_xp = record.xp,
        total_xp = progression.total_xp,
        level = progression.level,
        "Upserted daily record"
    );

    UpsertOutcome {
        snapshot: ProgressSnapshot {
            profile: ProfileState {
                weight: snapshot.profile.weight,
                level: progression.level,
                xp: progression.xp,
            },
            history,
        },
        record,
    }
}

/// Replaces the profile's current weight. Level and xp are left alone.
pub fn update_weight(profile: &ProfileState, update: WeightUpdate) -> ProfileState {
    ProfileState {
        weight: update.weight,
        ..profile.clone()
    }
}

//=========================================================================================
// Filtering and Aggregation
//=========================================================================================

/// Keeps records whose date lies within the inclusive bounds. Dates are
/// canonical `YYYY-MM-DD`, so string order is calendar order.
pub fn filter_by_date_range(
    records: &[DailyRecord],
    start: Option<&str>,
    end: Option<&str>,
) -> Vec<DailyRecord> {
    records
        .iter()
        .filter(|r| start.map_or(true, |s| r.date.as_str() >= s))
        .filter(|r| end.map_or(true, |e| r.date.as_str() <= e))
        .cloned()
        .collect()
}

/// Buckets records by ISO week or calendar month and averages each bucket.
/// Records with an unreadable date are skipped and reported back.
pub fn group_by_period_with_warnings(
    records: &[DailyRecord],
    period: Period,
) -> (Vec<PeriodSummary>, Vec<AggregationWarning>) {
    // Keyed numerically so week 10 sorts after week 9.
    let mut buckets: BTreeMap<(i32, u32), Vec<&DailyRecord>> = BTreeMap::new();
    let mut warnings = Vec::new();

    for record in records {
        let Some(date) = record.parsed_date() else {
            warn!(date = %record.date, "Skipping record with unparseable date");
            warnings.push(AggregationWarning {
                date: record.date.clone(),
                reason: "date is not in YYYY-MM-DD format".to_string(),
            });
            continue;
        };
        let key = match period {
            Period::Week => {
                let week = date.iso_week();
                (week.year(), week.week())
            }
            Period::Month => (date.year(), date.month()),
        };
        buckets.entry(key).or_default().push(record);
    }

    let summaries = buckets
        .into_iter()
        .map(|((year, n), items)| {
            let count = items.len() as f64;
            let mean = |f: fn(&DailyRecord) -> f64| items.iter().map(|r| f(r)).sum::<f64>() / count;
            PeriodSummary {
                label: match period {
                    Period::Week => format!("{year}-W{n:02}"),
                    Period::Month => format!("{year}-{n:02}"),
                },
                weight: mean(|r| r.weight),
                level: mean(|r| f64::from(r.level)),
                xp: mean(|r| f64::from(r.xp % XP_PER_LEVEL)),
            }
        })
        .collect();

    (summaries, warnings)
}

pub fn group_by_period(records: &[DailyRecord], period: Period) -> Vec<PeriodSummary> {
    group_by_period_with_warnings(records, period).0
}

pub fn group_by_week(records: &[DailyRecord]) -> Vec<PeriodSummary> {
    group_by_period(records, Period::Week)
}

pub fn group_by_month(records: &[DailyRecord]) -> Vec<PeriodSummary> {
    group_by_period(records, Period::Month)
}

/// Everything the charts view needs for the records inside `range`.
pub fn chart_series(history: &[DailyRecord], range: &DateRange) -> ChartSeries {
    let filtered = filter_by_date_range(history, range.start.as_deref(), range.end.as_deref());
    let (weekly, skipped) = group_by_period_with_warnings(&filtered, Period::Week);
    let (monthly, _) = group_by_period_with_warnings(&filtered, Period::Month);

    ChartSeries {
        dates: filtered.iter().map(|r| r.date.clone()).collect(),
        weights: filtered.iter().map(|r| r.weight).collect(),
        levels: filtered.iter().map(|r| r.level).collect(),
        xps: filtered.iter().map(|r| r.xp % XP_PER_LEVEL).collect(),
        weekly,
        monthly,
        skipped,
    }
}
