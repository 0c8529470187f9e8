//! Leaderboard, per-user history and recent users.
//!
//! These views are read-only aggregations over stored calculations. Ranking
//! is by mean footprint, so a single low calculation does not put a heavy
//! user at the top.

use crate::model::{
    LeaderboardEntry, LeaderboardResponse, RecentUsersResponse, Trend, UserHistory,
};
use crate::storage::Storage;

/// Upper bound for the leaderboard `limit` parameter.
pub const MAX_LEADERBOARD_LIMIT: u32 = 100;

/// Upper bound for the recent users `limit` parameter.
pub const MAX_RECENT_USERS_LIMIT: u32 = 50;

/// Build the leaderboard: one entry per user, lowest average footprint first.
///
/// # Arguments
///
/// * `storage` - Database connection
/// * `limit` - Maximum number of entries, capped at [`MAX_LEADERBOARD_LIMIT`]
pub async fn compute_leaderboard(
    storage: &Storage,
    limit: u32,
) -> anyhow::Result<LeaderboardResponse> {
    let limit = limit.min(MAX_LEADERBOARD_LIMIT);

    let aggregates = storage.user_aggregates(limit).await?;

    let entries = aggregates
        .into_iter()
        .zip(1..)
        .map(|(aggregate, rank)| LeaderboardEntry {
            rank,
            username: aggregate.username,
            calculations_count: aggregate.calculations_count,
            average_footprint: round_tenth(aggregate.average_footprint),
            best_footprint: aggregate.best_footprint,
            last_calculation: aggregate.last_calculation,
        })
        .collect();

    Ok(LeaderboardResponse { entries, limit })
}

/// All calculations of a user, oldest first, with the overall trend.
///
/// An unknown user yields an empty history with a neutral trend.
pub async fn user_history(storage: &Storage, username: &str) -> anyhow::Result<UserHistory> {
    let calculations = storage.list_user_calculations(username).await?;

    let footprints: Vec<f64> = calculations.iter().map(|c| c.carbon_footprint).collect();
    let trend = Trend::from_series(&footprints);

    Ok(UserHistory {
        username: username.to_string(),
        trend,
        calculations,
    })
}

/// The most recently active usernames, newest first.
pub async fn recent_users(storage: &Storage, limit: u32) -> anyhow::Result<RecentUsersResponse> {
    let limit = limit.min(MAX_RECENT_USERS_LIMIT);
    let usernames = storage.recent_usernames(limit).await?;

    Ok(RecentUsersResponse { usernames, limit })
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
