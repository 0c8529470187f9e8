//! Data models for Carbonico.
//!
//! JSON field names are camelCase. The `activities` payload stored with each
//! calculation is a serialized [`ActivityRecord`], so its shape is part of the
//! persistence contract and must stay stable.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EstimateError;

/// Longest accepted username, in characters.
pub const MAX_USERNAME_CHARS: usize = 64;

/// Video quality tier used while streaming.
///
/// The set is closed: any other value is rejected when parsed or
/// deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoQuality {
    #[serde(rename = "sd")]
    Sd,
    #[serde(rename = "hd")]
    Hd,
    #[serde(rename = "4k")]
    Uhd4k,
}

impl VideoQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoQuality::Sd => "sd",
            VideoQuality::Hd => "hd",
            VideoQuality::Uhd4k => "4k",
        }
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoQuality {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sd" => Ok(VideoQuality::Sd),
            "hd" => Ok(VideoQuality::Hd),
            "4k" => Ok(VideoQuality::Uhd4k),
            other => Err(EstimateError::InvalidVideoQuality(other.to_string())),
        }
    }
}

/// One day of self-reported digital activity.
///
/// Numeric fields are not validated. Range limits are a concern of whoever
/// collects the input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// Hours of video streaming per day.
    pub streaming_hours: f64,

    /// Quality tier of the streamed video.
    pub video_quality: VideoQuality,

    /// Hours of social media per day.
    pub social_media_hours: f64,

    /// Emails sent or received per day.
    pub emails_per_day: f64,

    /// Total data kept in cloud storage, in GB.
    #[serde(rename = "cloudStorageGB")]
    pub cloud_storage_gb: f64,

    /// Hours of video calls per day.
    pub video_calls_hours: f64,
}

impl ActivityRecord {
    /// A record with no activity at all, streaming at SD.
    pub fn idle() -> Self {
        Self {
            streaming_hours: 0.0,
            video_quality: VideoQuality::Sd,
            social_media_hours: 0.0,
            emails_per_day: 0.0,
            cloud_storage_gb: 0.0,
            video_calls_hours: 0.0,
        }
    }
}

/// Real-world quantities equivalent to a footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Equivalents {
    /// Kilometres driven by car.
    pub driving_km: f64,

    /// Trees needed for one day to absorb the same amount.
    pub tree_days: f64,

    /// Hours a 10W LED bulb could run.
    pub lightbulb_hours: f64,
}

/// A static, rule-triggered recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub title: &'static str,
    pub description: &'static str,
    /// Estimated reduction of the footprint, in percent. Fixed per rule.
    pub impact_percent: u8,
}

/// Full estimate for one activity record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationResult {
    /// Grams of CO₂, rounded to one decimal.
    pub carbon_footprint_grams: f64,
    pub equivalents: Equivalents,
    /// At most three suggestions, in rule order.
    pub suggestions: Vec<Suggestion>,
}

/// A stored footprint calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calculation {
    pub id: i64,
    pub username: String,
    /// Grams of CO₂, rounded to one decimal.
    pub carbon_footprint: f64,
    /// Server-side timestamp of the calculation (UTC).
    pub date: DateTime<Utc>,
    pub activities: ActivityRecord,
}

/// A calculation that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewCalculation {
    pub username: String,
    pub carbon_footprint: f64,
    pub date: DateTime<Utc>,
    pub activities: ActivityRecord,
}

/// Request body for POST /api/calculations.
///
/// The footprint is always computed by the server. A `carbonFootprint` field
/// sent by older clients is accepted and ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculationRequest {
    pub username: String,
    pub activities: ActivityRecord,
}

/// Trim a username and check that it is usable.
pub fn normalize_username(raw: &str) -> Result<String, &'static str> {
    let username = raw.trim();
    if username.is_empty() {
        return Err("username must not be empty");
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err("username must be at most 64 characters");
    }
    Ok(username.to_string())
}

/// Direction of a user's footprint over their history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// The latest footprint is lower than the first one.
    Down,
    /// The latest footprint is higher than the first one.
    Up,
    /// Unchanged, or not enough data to tell.
    Neutral,
}

impl Trend {
    /// Compare the first and last footprint of an oldest-first series.
    pub fn from_series(footprints: &[f64]) -> Self {
        match (footprints.first(), footprints.last()) {
            (Some(first), Some(last)) if footprints.len() >= 2 => {
                if last < first {
                    Trend::Down
                } else if last > first {
                    Trend::Up
                } else {
                    Trend::Neutral
                }
            }
            _ => Trend::Neutral,
        }
    }
}

/// Response for GET /api/users/{username}/history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserHistory {
    pub username: String,
    pub trend: Trend,
    /// Oldest first.
    pub calculations: Vec<Calculation>,
}

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based position; lowest average footprint ranks first.
    pub rank: u32,
    pub username: String,
    pub calculations_count: i64,
    /// Mean footprint across the user's calculations, rounded to one decimal.
    pub average_footprint: f64,
    pub best_footprint: f64,
    pub last_calculation: DateTime<Utc>,
}

/// Response for GET /api/leaderboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
    pub limit: u32,
}

/// Response for GET /api/users/recent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentUsersResponse {
    /// Most recently active first.
    pub usernames: Vec<String>,
    pub limit: u32,
}

/// Query parameters for GET /api/equivalents.
#[derive(Debug, Deserialize)]
pub struct EquivalentsQuery {
    pub grams: f64,
}

/// Query parameters for GET /api/leaderboard.
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// Maximum number of entries (default: 10).
    #[serde(default = "default_leaderboard_limit")]
    pub limit: u32,
}

fn default_leaderboard_limit() -> u32 {
    10
}

/// Query parameters for GET /api/users/recent.
#[derive(Debug, Deserialize)]
pub struct RecentUsersQuery {
    /// Maximum number of usernames (default: 5).
    #[serde(default = "default_recent_limit")]
    pub limit: u32,
}

fn default_recent_limit() -> u32 {
    5
}
