//! Request payloads.
//!
//! Each payload is an explicit serde struct with a `validate` step that runs
//! before any record is touched.

use crate::error::{ValidationError, ValidationResult};
use crate::models::department::slugify;
use crate::models::event::EventStatus;
use crate::tenant::ObjectId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        Err(ValidationError::missing(field))
    } else {
        Ok(())
    }
}

fn bounded(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let len = value.trim().chars().count();
    if (min..=max).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::length(field, min, max))
    }
}

fn absolute_uri(field: &str, value: &str) -> ValidationResult<()> {
    let valid = value.split_once(':').is_some_and(|(scheme, rest)| {
        let mut chars = scheme.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
            && !rest.is_empty()
            && !rest.chars().any(char::is_whitespace)
    });
    if valid {
        Ok(())
    } else {
        Err(ValidationError::format(field, "must be an absolute URI"))
    }
}

/// Parse an ISO-8601 date-time, or a bare date taken as midnight UTC.
pub fn parse_event_date(field: &str, value: &str) -> ValidationResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| ValidationError::format(field, "must be an ISO-8601 date"))
}

/// Admin and department signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub department_name: String,
    pub department_code: String,
}

impl SignupRequest {
    pub fn validate(&self) -> ValidationResult<()> {
        required("username", &self.username)?;
        required("password", &self.password)?;
        required("departmentName", &self.department_name)?;
        required("departmentCode", &self.department_code)?;
        if slugify(&self.department_name).is_empty() {
            return Err(ValidationError::format("departmentName", "produces an empty slug"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

impl SigninRequest {
    pub fn validate(&self) -> ValidationResult<()> {
        required("username", &self.username)?;
        required("password", &self.password)
    }
}

/// Standalone department creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDepartment {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub slug: Option<String>,
}

impl NewDepartment {
    pub fn validate(&self) -> ValidationResult<()> {
        required("name", &self.name)?;
        required("code", &self.code)?;
        if self.slug().is_empty() {
            return Err(ValidationError::format("slug", "must contain a non-space character"));
        }
        Ok(())
    }

    /// The supplied slug, normalized, or one derived from the name.
    pub fn slug(&self) -> String {
        match self.slug.as_deref() {
            Some(slug) if !slug.trim().is_empty() => slugify(slug),
            _ => slugify(&self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub reference_number: String,
}

impl NewStudent {
    pub fn validate(&self) -> ValidationResult<()> {
        required("referenceNumber", &self.reference_number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkStudents {
    pub reference_numbers: Vec<String>,
}

impl BulkStudents {
    pub fn validate(&self) -> ValidationResult<()> {
        if self.reference_numbers.is_empty() {
            return Err(ValidationError::EmptyList {
                field: "referenceNumbers".to_string(),
            });
        }
        self.reference_numbers
            .iter()
            .try_for_each(|number| required("referenceNumbers", number))
    }
}

/// Public, one-time profile submission by a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfileUpdate {
    pub reference_number: String,
    pub department_slug: String,
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub quote: String,
}

impl StudentProfileUpdate {
    pub fn validate(&self) -> ValidationResult<()> {
        required("referenceNumber", &self.reference_number)?;
        required("departmentSlug", &self.department_slug)?;
        required("name", &self.name)?;
        if !self.image.is_empty() {
            absolute_uri("image", &self.image)?;
        }
        Ok(())
    }
}

/// Admin edit of a student; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAdminUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub quote: Option<String>,
}

impl StudentAdminUpdate {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(image) = self.image.as_deref().filter(|image| !image.is_empty()) {
            absolute_uri("image", image)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlbum {
    pub album_name: String,
    #[serde(default)]
    pub cover_image: Option<String>,
}

impl NewAlbum {
    pub fn validate(&self) -> ValidationResult<()> {
        required("albumName", &self.album_name)?;
        if let Some(cover) = &self.cover_image {
            absolute_uri("coverImage", cover)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumUpdate {
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl AlbumUpdate {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.album_name {
            required("albumName", name)?;
        }
        if let Some(cover) = &self.cover_image {
            absolute_uri("coverImage", cover)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpload {
    pub album_name: String,
    pub album_id: String,
    #[serde(rename = "pictureURL")]
    pub picture_url: String,
    pub uploaded_by: String,
    pub reference_number: String,
    pub department_slug: String,
}

impl ImageUpload {
    pub fn validate(&self) -> ValidationResult<()> {
        required("albumName", &self.album_name)?;
        required("albumId", &self.album_id)?;
        self.album_id()?;
        required("pictureURL", &self.picture_url)?;
        absolute_uri("pictureURL", &self.picture_url)?;
        required("uploadedBy", &self.uploaded_by)?;
        required("referenceNumber", &self.reference_number)?;
        required("departmentSlug", &self.department_slug)
    }

    /// The target album id.
    pub fn album_id(&self) -> ValidationResult<ObjectId> {
        ObjectId::parse_str(self.album_id.trim())
            .map_err(|_| ValidationError::format("albumId", "must be a 24-character hex id"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub venue: String,
    pub event_date: String,
}

impl NewEvent {
    pub fn validate(&self) -> ValidationResult<DateTime<Utc>> {
        bounded("title", &self.title, 3, 255)?;
        bounded("description", &self.description, 10, 1000)?;
        bounded("venue", &self.venue, 3, 255)?;
        parse_event_date("eventDate", &self.event_date)
    }
}

/// Partial event update; may set any status including `cancelled`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Validated form of [`EventUpdate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub status: Option<EventStatus>,
}

impl EventUpdate {
    pub fn validate(&self) -> ValidationResult<EventChanges> {
        if let Some(title) = &self.title {
            bounded("title", title, 3, 255)?;
        }
        if let Some(description) = &self.description {
            bounded("description", description, 10, 1000)?;
        }
        if let Some(venue) = &self.venue {
            bounded("venue", venue, 3, 255)?;
        }
        let event_date = self
            .event_date
            .as_deref()
            .map(|date| parse_event_date("eventDate", date))
            .transpose()?;
        let status = self
            .status
            .as_deref()
            .map(str::parse::<EventStatus>)
            .transpose()?;

        Ok(EventChanges {
            title: self.title.as_ref().map(|t| t.trim().to_string()),
            description: self.description.as_ref().map(|d| d.trim().to_string()),
            venue: self.venue.as_ref().map(|v| v.trim().to_string()),
            event_date,
            status,
        })
    }
}

/// Event list query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    #[serde(default)]
    pub status: Option<String>,
    /// Department id or slug.
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
}

/// Event attribute to sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventSortKey {
    #[default]
    EventDate,
    Title,
    CreatedAt,
    Status,
}

/// Validated form of [`EventQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventListOptions {
    pub status: Option<EventStatus>,
    pub department: Option<String>,
    pub page: usize,
    pub limit: usize,
    pub sort_by: EventSortKey,
    pub descending: bool,
}

impl EventQuery {
    pub fn validate(&self, default_limit: usize, max_limit: usize) -> ValidationResult<EventListOptions> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(ValidationError::OutOfRange {
                field: "page".to_string(),
                min: 1,
                max: u64::MAX,
            });
        }

        let limit = self.limit.unwrap_or(default_limit);
        if limit == 0 || limit > max_limit {
            return Err(ValidationError::OutOfRange {
                field: "limit".to_string(),
                min: 1,
                max: max_limit as u64,
            });
        }

        let sort_by = match self.sort_by.as_deref() {
            None | Some("eventDate") => EventSortKey::EventDate,
            Some("title") => EventSortKey::Title,
            Some("createdAt") => EventSortKey::CreatedAt,
            Some("status") => EventSortKey::Status,
            Some(other) => {
                return Err(ValidationError::format(
                    "sortBy",
                    format!("unknown sort key '{}'", other),
                ));
            }
        };

        let descending = match self.sort_order.as_deref() {
            None | Some("asc") => false,
            Some("desc") => true,
            Some(other) => {
                return Err(ValidationError::format(
                    "sortOrder",
                    format!("expected asc or desc, got '{}'", other),
                ));
            }
        };

        let status = self
            .status
            .as_deref()
            .map(str::parse::<EventStatus>)
            .transpose()?;

        Ok(EventListOptions {
            status,
            department: self.department.clone().filter(|d| !d.trim().is_empty()),
            page,
            limit,
            sort_by,
            descending,
        })
    }
}

/// Report submitted by a student. The department comes from the caller's
/// token when present, otherwise from `department_slug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubmission {
    pub title: String,
    pub content: String,
    pub reference_number: String,
    #[serde(default)]
    pub department_slug: Option<String>,
}

impl ReportSubmission {
    pub fn validate(&self) -> ValidationResult<()> {
        required("title", &self.title)?;
        required("content", &self.content)?;
        required("referenceNumber", &self.reference_number)
    }
}
