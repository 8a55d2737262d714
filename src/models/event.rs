use crate::error::ValidationError;
use crate::models::{Document, TenantScoped};
use crate::tenant::{ObjectId, TenantFields};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub const ALL: [EventStatus; 4] = [
        EventStatus::Upcoming,
        EventStatus::Ongoing,
        EventStatus::Completed,
        EventStatus::Cancelled,
    ];

    /// Status assigned when an event is created at `now`.
    pub fn at_creation(event_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if event_date < now {
            EventStatus::Completed
        } else if event_date - now <= Duration::hours(24) {
            EventStatus::Ongoing
        } else {
            EventStatus::Upcoming
        }
    }

    /// Status as observed on `today`.
    ///
    /// Only `upcoming` moves: to `completed` once its date has passed and to
    /// `ongoing` on the day itself. Time of day is ignored.
    pub fn effective(self, event_date: DateTime<Utc>, today: NaiveDate) -> Self {
        if self != EventStatus::Upcoming {
            return self;
        }
        let date = event_date.date_naive();
        if date < today {
            EventStatus::Completed
        } else if date == today {
            EventStatus::Ongoing
        } else {
            EventStatus::Upcoming
        }
    }

    /// Counted as an active event in department statistics.
    pub fn is_active(self) -> bool {
        matches!(self, EventStatus::Upcoming | EventStatus::Ongoing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidStatus {
                value: s.to_string(),
            })
    }
}

/// A campus event.
///
/// `status` is the stored value. Reads report [`Event::with_effective_status`]
/// and never write the derived value back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub venue: String,
    pub event_date: DateTime<Utc>,
    pub status: EventStatus,
    pub created_by: String,
    #[serde(flatten)]
    pub tenant: TenantFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Copy of the event with its status derived for `today`.
    pub fn with_effective_status(mut self, today: NaiveDate) -> Self {
        self.status = self.status.effective(self.event_date, today);
        self
    }
}

impl Document for Event {
    const COLLECTION: &'static str = "events";
    const RESOURCE_TYPE: &'static str = "Event";

    fn id(&self) -> ObjectId {
        self.id
    }
}

impl TenantScoped for Event {
    fn tenant(&self) -> &TenantFields {
        &self.tenant
    }

    fn tenant_mut(&mut self) -> &mut TenantFields {
        &mut self.tenant
    }
}
