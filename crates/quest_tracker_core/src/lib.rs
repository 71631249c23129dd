pub mod domain;
pub mod engine;
pub mod input;
pub mod ports;

pub use domain::{
    AggregationWarning, ChartSeries, DailyQuestFlags, DailyRecord, Period, PeriodSummary,
    ProfileState, Progression, ProgressSnapshot, Quest,
};
pub use input::{DailySubmission, DateRange, ValidationError, WeightUpdate};
pub use ports::{PortError, PortResult, ProgressStore};
