use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::user::models::UserStats;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStatsResponseData {
    pub total_users: u64,
    pub unique_domain_count: u64,
    pub first_user: Option<DateTime<Utc>>,
    pub last_user: Option<DateTime<Utc>>,
    pub top_domains: Vec<DomainCountData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainCountData {
    pub domain: String,
    pub count: u64,
}

impl From<UserStats> for UserStatsResponseData {
    fn from(stats: UserStats) -> Self {
        Self {
            total_users: stats.total_users,
            unique_domain_count: stats.unique_domain_count,
            first_user: stats.first_user,
            last_user: stats.last_user,
            top_domains: stats
                .top_domains
                .into_iter()
                .map(|entry| DomainCountData {
                    domain: entry.domain,
                    count: entry.count,
                })
                .collect(),
        }
    }
}

/// Aggregate analytics: totals plus the top ten email domains, ranked by
/// count with lexicographic tie-break.
pub async fn user_stats(
    State(state): State<AppState>,
) -> Result<ApiSuccess<UserStatsResponseData>, ApiError> {
    state
        .user_service
        .get_stats()
        .await
        .map_err(ApiError::from)
        .map(|stats| ApiSuccess::new(StatusCode::OK, stats.into()))
}
