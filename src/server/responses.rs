//! Response bodies returned by server operations.

use crate::models::{Admin, Department, Event, EventStatus};
use crate::tenant::ObjectId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Admin as shown to callers. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub id: ObjectId,
    pub username: String,
    pub workspace: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Admin> for AdminSummary {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            workspace: admin.workspace.clone(),
            is_active: admin.is_active,
            created_at: admin.created_at,
        }
    }
}

/// Result of a successful signup.
#[derive(Debug, Clone, Serialize)]
pub struct SignupOutcome {
    pub admin: AdminSummary,
    pub department: Department,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedInUser {
    pub username: String,
}

/// Result of a successful signin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub token: String,
    pub token_type: String,
    pub user: SignedInUser,
}

/// Per-number outcome of a bulk student import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkStudentsOutcome {
    pub added: Vec<String>,
    pub already_added: Vec<String>,
    pub unadded: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current: usize,
    pub pages: usize,
    pub total: usize,
    pub limit: usize,
}

impl Pagination {
    pub fn new(current: usize, total: usize, limit: usize) -> Self {
        Self {
            current,
            pages: total.div_ceil(limit.max(1)),
            total,
            limit,
        }
    }
}

/// One page of events.
#[derive(Debug, Clone, Serialize)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub pagination: Pagination,
}

/// Event counts per status for one department.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventStats {
    pub total: usize,
    pub upcoming: usize,
    pub ongoing: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl EventStats {
    pub(crate) fn record(&mut self, status: EventStatus) {
        self.total += 1;
        match status {
            EventStatus::Upcoming => self.upcoming += 1,
            EventStatus::Ongoing => self.ongoing += 1,
            EventStatus::Completed => self.completed += 1,
            EventStatus::Cancelled => self.cancelled += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_pages() {
        assert_eq!(Pagination::new(1, 0, 10).pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).pages, 1);
        assert_eq!(Pagination::new(2, 11, 10).pages, 2);
    }

    #[test]
    fn test_bulk_outcome_field_names() {
        let json = serde_json::to_value(BulkStudentsOutcome::default()).unwrap();
        assert!(json.get("alreadyAdded").is_some());
        assert!(json.get("unadded").is_some());
    }

    #[test]
    fn test_event_stats_record() {
        let mut stats = EventStats::default();
        stats.record(EventStatus::Upcoming);
        stats.record(EventStatus::Cancelled);
        stats.record(EventStatus::Cancelled);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.cancelled, 2);
        assert_eq!(stats.upcoming, 1);
    }
}
