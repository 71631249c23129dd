//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the client and the API server.
//! Incoming values stay as raw strings here; they are validated into the
//! core's typed inputs inside the handlers.

use quest_tracker_core::domain::{ChartSeries, DailyRecord, ProfileState};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

//=========================================================================================
// Payloads Sent FROM the Client TO the Server
//=========================================================================================

/// Selects the day a daily request applies to. Defaults to today.
#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateQuery {
    /// Day in `YYYY-MM-DD` format.
    pub date: Option<String>,
}

/// One day's quest submission.
#[derive(Deserialize, Debug, ToSchema)]
pub struct DailyForm {
    /// Body weight on that day. Omit to keep the weight already recorded.
    pub weight: Option<String>,
    /// Names of the completed quests; every quest not listed is marked as not done.
    #[serde(default)]
    pub daily_quests: Vec<String>,
}

/// A new current body weight for the profile.
#[derive(Deserialize, Debug, ToSchema)]
pub struct WeightForm {
    pub weight: String,
}

/// Optional inclusive bounds for the charts view.
#[derive(Deserialize, Debug, Default, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ChartQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

//=========================================================================================
// Payloads Sent FROM the Server TO the Client
//=========================================================================================

#[derive(Serialize, Debug, ToSchema)]
pub struct DashboardResponse {
    #[schema(value_type = Object)]
    pub profile: ProfileState,
    pub total_xp: u32,
    pub xp_to_next_level: u32,
    pub days_logged: usize,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct DailyResponse {
    pub date: String,
    /// False when the day has not been logged and the record is a blank template.
    pub saved: bool,
    #[schema(value_type = Object)]
    pub record: DailyRecord,
    #[schema(value_type = Object)]
    pub profile: ProfileState,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct UpsertResponse {
    #[schema(value_type = Object)]
    pub record: DailyRecord,
    #[schema(value_type = Object)]
    pub profile: ProfileState,
    pub total_xp: u32,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HistoryResponse {
    #[schema(value_type = Vec<Object>)]
    pub history: Vec<DailyRecord>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ChartsResponse {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[schema(value_type = Object)]
    pub series: ChartSeries,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct QuestInfo {
    pub quest: String,
    pub description: String,
}
