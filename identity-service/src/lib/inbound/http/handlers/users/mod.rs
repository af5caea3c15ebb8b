pub mod create_many_users;
pub mod create_user;
pub mod delete_many_users;
pub mod delete_user;
pub mod list_users;
pub mod list_users_page;
pub mod replace_user;
pub mod search_users;
pub mod update_many_users;
pub mod update_user;
pub mod user_stats;

pub use create_many_users::create_many_users;
pub use create_user::create_user;
pub use delete_many_users::delete_many_users;
pub use delete_user::delete_user;
pub use list_users::list_users;
pub use list_users_page::list_users_page;
pub use replace_user::replace_user;
pub use search_users::search_users;
pub use update_many_users::update_many_users;
pub use update_user::update_user;
pub use user_stats::user_stats;

use serde::Serialize;

use crate::domain::user::models::UpdateReport;

/// Matched/modified counts as rendered for every update-style endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateReportData {
    pub matched: u64,
    pub modified: u64,
}

impl From<UpdateReport> for UpdateReportData {
    fn from(report: UpdateReport) -> Self {
        Self {
            matched: report.matched,
            modified: report.modified,
        }
    }
}
