//! Admin user endpoints

use serde::Serialize;
use shared::models::{User, UserDraft, UserQuery, UserRecord, UserUpdate};
use shared::{Page, PageBody};
use smartpass_qr::encode_path_segment;

use super::{Envelope, SmartPassClient};
use crate::error::{ClientError, ClientResult};

const USERS: &str = "/api/users";

fn user_path(id: &str) -> String {
    format!("{USERS}/{}", encode_path_segment(id))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateUser<'a> {
    #[serde(flatten)]
    draft: &'a UserDraft,
    full_name: String,
    status: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Suspend {
    is_active: bool,
}

impl SmartPassClient {
    pub async fn list_users(&self, query: &UserQuery) -> ClientResult<Page<User>> {
        let body: PageBody<UserRecord> = self.http.get_query(USERS, &query.to_params()).await?;
        Ok(body.into_page(query.page, query.limit, |_: &User| true))
    }

    pub async fn get_user(&self, id: &str) -> ClientResult<User> {
        let record: Envelope<UserRecord> = self.http.get(&user_path(id)).await?;
        Ok(User::try_from(record.into_inner())?)
    }

    /// Register an admin account with the draft's temporary password
    pub async fn create_user(&self, draft: &UserDraft) -> ClientResult<()> {
        draft.check()?;
        let body = CreateUser {
            draft,
            full_name: draft.full_name(),
            status: "Active",
        };
        self.http.post_discard(USERS, &body).await?;
        tracing::info!(email = %draft.email, role = %draft.role, "user created");
        Ok(())
    }

    pub async fn update_user(&self, id: &str, update: &UserUpdate) -> ClientResult<()> {
        if update.is_empty() {
            return Err(ClientError::Validation("update has no fields".to_string()));
        }
        self.http.put(&user_path(id), update).await
    }

    /// Block sign-in for an account without deleting it
    pub async fn suspend_user(&self, id: &str) -> ClientResult<()> {
        let path = format!("{}/suspend", user_path(id));
        self.http.post_discard(&path, &Suspend { is_active: false }).await?;
        tracing::info!(id = %id, "user suspended");
        Ok(())
    }

    pub async fn upload_user_photo(
        &self,
        id: &str,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> ClientResult<String> {
        let path = format!("{}/photo", user_path(id));
        self.upload_photo(&path, bytes, file_name).await
    }

    pub async fn delete_user(&self, id: &str) -> ClientResult<()> {
        self.http.delete(&user_path(id)).await?;
        tracing::info!(id = %id, "user deleted");
        Ok(())
    }
}
