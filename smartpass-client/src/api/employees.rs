//! Employee endpoints

use serde::Serialize;
use shared::models::{Employee, EmployeeDraft, EmployeeQuery, EmployeeRecord, EmployeeUpdate};
use shared::{DashboardStats, Page, PageBody};
use smartpass_qr::encode_path_segment;

use super::{Envelope, SmartPassClient};
use crate::error::{ClientError, ClientResult};

const EMPLOYEES: &str = "/api/employees";

/// Rows per request when walking every page
const SWEEP_PAGE_SIZE: u32 = 100;

/// Upper bound on pages fetched by one sweep
const SWEEP_MAX_PAGES: u32 = 500;

fn employee_path(id: &str) -> String {
    format!("{EMPLOYEES}/{}", encode_path_segment(id))
}

/// Create body: the form plus the `name` spelling older backends read
#[derive(Serialize)]
struct CreateEmployee<'a> {
    #[serde(flatten)]
    draft: &'a EmployeeDraft,
    name: &'a str,
    #[serde(rename = "qrCode", skip_serializing_if = "Option::is_none")]
    qr_code: Option<&'a str>,
}

impl SmartPassClient {
    /// One page of the employee list
    pub async fn list_employees(&self, query: &EmployeeQuery) -> ClientResult<Page<Employee>> {
        let body: PageBody<EmployeeRecord> =
            self.http.get_query(EMPLOYEES, &query.to_params()).await?;
        Ok(body.into_page(query.page, query.limit, |e: &Employee| query.matches(e)))
    }

    /// Every employee, following pagination when the backend pages
    pub async fn all_employees(&self) -> ClientResult<Vec<Employee>> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let params = [("page", page.to_string()), ("limit", SWEEP_PAGE_SIZE.to_string())];
            let body: PageBody<EmployeeRecord> = self.http.get_query(EMPLOYEES, &params).await?;
            let total_pages = match &body {
                PageBody::Paged { total_pages, .. } => total_pages.unwrap_or(1),
                PageBody::Unpaged(_) => 1,
            };
            all.extend(body.into_all::<Employee>());

            if page >= total_pages.min(SWEEP_MAX_PAGES) {
                break;
            }
            page += 1;
        }

        tracing::debug!(count = all.len(), pages = page, "employee sweep finished");
        Ok(all)
    }

    pub async fn get_employee(&self, id: &str) -> ClientResult<Employee> {
        let record: Envelope<EmployeeRecord> = self.http.get(&employee_path(id)).await?;
        Ok(Employee::try_from(record.into_inner())?)
    }

    /// Insert a new record; the draft is checked before anything is sent
    pub async fn create_employee(&self, draft: &EmployeeDraft) -> ClientResult<Employee> {
        self.create_employee_with_code(draft, None).await
    }

    /// Insert a record that already carries its badge image
    pub(crate) async fn create_employee_with_code(
        &self,
        draft: &EmployeeDraft,
        qr_code: Option<&str>,
    ) -> ClientResult<Employee> {
        draft.check()?;
        let body = CreateEmployee {
            draft,
            name: draft.full_name.trim(),
            qr_code,
        };
        let record: Envelope<EmployeeRecord> = self.http.post(EMPLOYEES, &body).await?;
        let employee = Employee::try_from(record.into_inner())?;
        tracing::info!(id = %employee.id, name = %employee.full_name, "employee created");
        Ok(employee)
    }

    pub async fn update_employee(&self, id: &str, update: &EmployeeUpdate) -> ClientResult<()> {
        if update.is_empty() {
            return Err(ClientError::Validation("update has no fields".to_string()));
        }
        self.http.put(&employee_path(id), update).await
    }

    pub async fn delete_employee(&self, id: &str) -> ClientResult<()> {
        self.http.delete(&employee_path(id)).await?;
        tracing::info!(id = %id, "employee deleted");
        Ok(())
    }

    /// Store a badge image on the record addressed by `identifier`
    pub async fn save_qr_code(&self, identifier: &str, data_url: &str) -> ClientResult<()> {
        self.http
            .put(&employee_path(identifier), &EmployeeUpdate::qr_code(data_url))
            .await
    }

    /// Replace the record's profile picture; returns the stored reference
    pub async fn upload_employee_photo(
        &self,
        id: &str,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> ClientResult<String> {
        let path = format!("{}/upload-photo", employee_path(id));
        let photo = self.upload_photo(&path, bytes, file_name).await?;
        tracing::info!(id = %id, photo = %photo, "employee photo uploaded");
        Ok(photo)
    }

    /// Dashboard counters over the whole employee list
    pub async fn dashboard_stats(&self) -> ClientResult<DashboardStats> {
        let employees = self.all_employees().await?;
        Ok(DashboardStats::from_employees(&employees))
    }
}
