//! Event operations.
//!
//! Every event returned by these operations carries its status as of the
//! server clock's current date (see [`EventStatus::effective`]). Reads never
//! write the derived status back.

use super::core::YearbookServer;
use super::responses::{EventPage, EventStats, Pagination};
use crate::auth::AuthenticatedContext;
use crate::error::{YearbookError, YearbookResult};
use crate::models::{Event, EventListOptions, EventQuery, EventSortKey, EventStatus, EventUpdate, NewEvent};
use crate::storage::StorageProvider;
use crate::tenant::{ObjectId, RequestContext, TenantFields, TenantIdentifier};
use chrono::NaiveDate;
use log::{debug, info};
use std::cmp::Ordering;

impl<S: StorageProvider> YearbookServer<S> {
    pub async fn create_event(
        &self,
        context: &AuthenticatedContext,
        request: NewEvent,
    ) -> YearbookResult<Event> {
        let event_date = request.validate()?;
        let department = self.caller_department(context).await?;
        let now = self.now();

        let event = Event {
            id: ObjectId::new(),
            title: request.title.trim().to_string(),
            description: request.description.trim().to_string(),
            venue: request.venue.trim().to_string(),
            event_date,
            status: EventStatus::at_creation(event_date, now),
            created_by: context.admin_id().to_hex(),
            tenant: TenantFields::canonical(department.id),
            created_at: now,
            updated_at: now,
        };
        let event = self.events.insert(&event).await?;

        info!(
            "Created event {} '{}' ({}) in {} (request: '{}')",
            event.id,
            event.title,
            event.status,
            department.slug,
            context.request_id()
        );
        Ok(event)
    }

    /// Page through events, optionally restricted to one department given
    /// by id or slug.
    pub async fn list_events(
        &self,
        context: &AuthenticatedContext,
        query: EventQuery,
    ) -> YearbookResult<EventPage> {
        let options = query.validate(self.config.default_page_size, self.config.max_page_size)?;

        let events = match &options.department {
            Some(department) => {
                let identifier = TenantIdentifier::infer(department.as_str());
                let tenant = self.resolver.resolve(&identifier).await?;
                self.events.in_tenant(&tenant).await?
            }
            None => self.events.all().await?,
        };

        let page = paginate(events, &options, self.today());
        debug!(
            "Listed page {} of {} events (request: '{}')",
            page.pagination.current,
            page.pagination.total,
            context.request_id()
        );
        Ok(page)
    }

    /// Page through the caller's department's events.
    pub async fn list_department_events(
        &self,
        context: &AuthenticatedContext,
        query: EventQuery,
    ) -> YearbookResult<EventPage> {
        let options = query.validate(self.config.default_page_size, self.config.max_page_size)?;
        let tenant = self.caller_tenant(context).await?;
        let events = self.events.in_tenant(&tenant).await?;
        Ok(paginate(events, &options, self.today()))
    }

    /// Every event of a tenant, soonest first.
    pub async fn list_workspace_events(
        &self,
        identifier: &TenantIdentifier,
        context: &RequestContext,
    ) -> YearbookResult<Vec<Event>> {
        let tenant = self.resolver.resolve(identifier).await?;
        let today = self.today();
        let mut events: Vec<Event> = self
            .events
            .in_tenant(&tenant)
            .await?
            .into_iter()
            .map(|event| event.with_effective_status(today))
            .collect();
        events.sort_by_key(|event| event.event_date);

        debug!(
            "Listed {} events for {} (request: '{}')",
            events.len(),
            identifier,
            context.request_id
        );
        Ok(events)
    }

    pub async fn get_event(
        &self,
        context: &AuthenticatedContext,
        event_id: ObjectId,
    ) -> YearbookResult<Event> {
        let department = self.caller_department(context).await?;
        let event = self
            .events
            .get_owned(event_id, &department)
            .await?
            .ok_or_else(|| YearbookError::not_found("Event", event_id.to_hex()))?;
        Ok(event.with_effective_status(self.today()))
    }

    /// Change an event of the caller's department.
    ///
    /// An explicit status always wins. Moving the date of an event that is
    /// not cancelled recomputes its status as at creation.
    pub async fn update_event(
        &self,
        context: &AuthenticatedContext,
        event_id: ObjectId,
        request: EventUpdate,
    ) -> YearbookResult<Event> {
        let changes = request.validate()?;
        let department = self.caller_department(context).await?;
        let mut event = self
            .events
            .get_owned(event_id, &department)
            .await?
            .ok_or_else(|| YearbookError::not_found("Event", event_id.to_hex()))?;

        let now = self.now();
        if let Some(title) = changes.title {
            event.title = title;
        }
        if let Some(description) = changes.description {
            event.description = description;
        }
        if let Some(venue) = changes.venue {
            event.venue = venue;
        }
        if let Some(event_date) = changes.event_date {
            event.event_date = event_date;
            if changes.status.is_none() && event.status != EventStatus::Cancelled {
                event.status = EventStatus::at_creation(event_date, now);
            }
        }
        if let Some(status) = changes.status {
            event.status = status;
        }
        event.updated_at = now;

        let event = self.events.save(&event).await?;
        info!(
            "Updated event {} to status {} (request: '{}')",
            event.id,
            event.status,
            context.request_id()
        );
        Ok(event.with_effective_status(self.today()))
    }

    pub async fn delete_event(
        &self,
        context: &AuthenticatedContext,
        event_id: ObjectId,
    ) -> YearbookResult<Event> {
        let department = self.caller_department(context).await?;
        let event = self
            .events
            .get_owned(event_id, &department)
            .await?
            .ok_or_else(|| YearbookError::not_found("Event", event_id.to_hex()))?;

        self.events.delete(event.id).await?;
        info!(
            "Deleted event {} (request: '{}')",
            event.id,
            context.request_id()
        );
        Ok(event)
    }

    /// Event counts per current status for the caller's department.
    pub async fn event_stats(&self, context: &AuthenticatedContext) -> YearbookResult<EventStats> {
        let tenant = self.caller_tenant(context).await?;
        let today = self.today();
        let mut stats = EventStats::default();
        for event in self.events.in_tenant(&tenant).await? {
            stats.record(event.status.effective(event.event_date, today));
        }
        Ok(stats)
    }
}

/// Derive statuses, then filter, sort and cut one page.
fn paginate(events: Vec<Event>, options: &EventListOptions, today: NaiveDate) -> EventPage {
    let mut events: Vec<Event> = events
        .into_iter()
        .map(|event| event.with_effective_status(today))
        .filter(|event| options.status.is_none_or(|status| event.status == status))
        .collect();

    events.sort_by(|a, b| {
        let ordering = compare(a, b, options.sort_by);
        if options.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });

    let total = events.len();
    let events = events
        .into_iter()
        .skip((options.page - 1).saturating_mul(options.limit))
        .take(options.limit)
        .collect();

    EventPage {
        events,
        pagination: Pagination::new(options.page, total, options.limit),
    }
}

fn compare(a: &Event, b: &Event, key: EventSortKey) -> Ordering {
    match key {
        EventSortKey::EventDate => a.event_date.cmp(&b.event_date),
        EventSortKey::Title => a.title.cmp(&b.title),
        EventSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        EventSortKey::Status => a.status.as_str().cmp(b.status.as_str()),
    }
}
