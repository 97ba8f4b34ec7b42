//! Activity log endpoints

use shared::models::{ActivityEntry, ActivityQuery, ActivityRecord};
use shared::{Page, PageBody};

use super::SmartPassClient;
use crate::error::ClientResult;

const ACTIVITY: &str = "/api/activity";
const ACTIVITY_EXPORT: &str = "/api/activity/export";

impl SmartPassClient {
    pub async fn list_activity(&self, query: &ActivityQuery) -> ClientResult<Page<ActivityEntry>> {
        let body: PageBody<ActivityRecord> =
            self.http.get_query(ACTIVITY, &query.to_params()).await?;
        Ok(body.into_page(query.page, query.limit, |_: &ActivityEntry| true))
    }

    /// Log as CSV, exactly as the backend renders it
    pub async fn export_activity(&self) -> ClientResult<Vec<u8>> {
        let csv = self.http.get_bytes(ACTIVITY_EXPORT).await?;
        tracing::info!(bytes = csv.len(), "activity log exported");
        Ok(csv)
    }
}
