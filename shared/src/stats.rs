//! Dashboard counters

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{BadgeState, Employee};

/// Entries shown in the "recent activity" panel
pub const RECENT_LIMIT: usize = 5;

/// One line of the recent-activity panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub name: String,
    pub action: &'static str,
    pub at: Option<DateTime<Utc>>,
    pub photo: Option<String>,
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_employees: usize,
    pub active_employees: usize,
    pub qr_generated: usize,
    pub recent_activity: Vec<RecentActivity>,
}

impl DashboardStats {
    pub fn from_employees(employees: &[Employee]) -> Self {
        let mut newest: Vec<&Employee> = employees.iter().collect();
        // Undated records sort last
        newest.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let recent_activity = newest
            .into_iter()
            .take(RECENT_LIMIT)
            .map(|e| RecentActivity {
                name: e.full_name.clone(),
                action: match e.badge_state() {
                    BadgeState::CodePresent => "QR Code Generated",
                    BadgeState::CodeAbsent => "New Employee Added",
                },
                at: e.created_at,
                photo: e.photo.clone(),
            })
            .collect();

        Self {
            total_employees: employees.len(),
            active_employees: employees.iter().filter(|e| e.status.is_active()).count(),
            qr_generated: employees
                .iter()
                .filter(|e| e.badge_state() == BadgeState::CodePresent)
                .count(),
            recent_activity,
        }
    }

    /// Share of employees holding a badge code, 0..=100
    pub fn qr_coverage_percent(&self) -> u32 {
        if self.total_employees == 0 {
            return 0;
        }
        (self.qr_generated * 100 / self.total_employees) as u32
    }
}
