//! Core operation handler infrastructure
//!
//! This module contains the request and response types and the main dispatcher.
//! Handlers for each resource live in `handlers`.

use crate::auth::{AuthError, AuthenticatedContext};
use crate::error::{YearbookError, YearbookResult};
use crate::models::{
    AlbumUpdate, BulkStudents, EventQuery, EventUpdate, ImageUpload, NewAlbum, NewDepartment,
    NewEvent, NewStudent, ReportSubmission, SigninRequest, SignupRequest, StudentAdminUpdate,
    StudentProfileUpdate,
};
use crate::server::YearbookServer;
use crate::storage::StorageProvider;
use crate::tenant::RequestContext;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;

/// Framework-agnostic handler for yearbook operations.
///
/// Authenticates the bearer token when one is supplied, dispatches to the
/// server and wraps every outcome in one [`OperationResponse`] envelope.
pub struct YearbookOperationHandler<S: StorageProvider> {
    pub(super) server: YearbookServer<S>,
}

/// One operation plus its transport metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    pub operation: YearbookOperation,
    /// `Authorization` header value or bare token
    pub bearer_token: Option<String>,
    /// Request ID for tracing and correlation
    pub request_id: Option<String>,
}

impl OperationRequest {
    pub fn new(operation: impl Into<YearbookOperation>) -> Self {
        Self {
            operation: operation.into(),
            bearer_token: None,
            request_id: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// Every operation the handler accepts, grouped by resource.
#[derive(Debug, Clone, PartialEq)]
pub enum YearbookOperation {
    Account(AccountOperation),
    Department(DepartmentOperation),
    Student(StudentOperation),
    Album(AlbumOperation),
    Image(ImageOperation),
    Event(EventOperation),
    Report(ReportOperation),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccountOperation {
    Signup(SignupRequest),
    Signin(SigninRequest),
    SetActive { admin_id: String, active: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DepartmentOperation {
    Create(NewDepartment),
    List,
    Get { slug: String },
    Statistics { department: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StudentOperation {
    Create(NewStudent),
    BulkCreate(BulkStudents),
    Delete { reference_number: String },
    List { workspace: String },
    Get { workspace: String, reference_number: String },
    UpdateProfile(StudentProfileUpdate),
    AdminUpdate { id: String, update: StudentAdminUpdate },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlbumOperation {
    Create(NewAlbum),
    /// Albums of a workspace, or of the caller's department when `None`
    List { workspace: Option<String> },
    Update { id: String, update: AlbumUpdate },
    Delete { id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageOperation {
    Upload(ImageUpload),
    List { album_id: String },
    ListPublic { album_id: String },
    Count,
    Delete { id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventOperation {
    Create(NewEvent),
    List(EventQuery),
    ListDepartment(EventQuery),
    ListWorkspace { workspace: String },
    Get { id: String },
    Update { id: String, update: EventUpdate },
    Delete { id: String },
    Stats,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportOperation {
    Create(ReportSubmission),
    List,
    Get { id: String },
    Toggle { id: String },
    Delete { id: String },
}

macro_rules! operation_group {
    ($($group:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$group> for YearbookOperation {
                fn from(operation: $group) -> Self {
                    YearbookOperation::$variant(operation)
                }
            }
        )*
    };
}

operation_group! {
    AccountOperation => Account,
    DepartmentOperation => Department,
    StudentOperation => Student,
    AlbumOperation => Album,
    ImageOperation => Image,
    EventOperation => Event,
    ReportOperation => Report,
}

impl YearbookOperation {
    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Account(op) => match op {
                AccountOperation::Signup(_) => "signup",
                AccountOperation::Signin(_) => "signin",
                AccountOperation::SetActive { .. } => "set_admin_active",
            },
            Self::Department(op) => match op {
                DepartmentOperation::Create(_) => "create_department",
                DepartmentOperation::List => "list_departments",
                DepartmentOperation::Get { .. } => "get_department",
                DepartmentOperation::Statistics { .. } => "department_statistics",
            },
            Self::Student(op) => match op {
                StudentOperation::Create(_) => "create_student",
                StudentOperation::BulkCreate(_) => "bulk_create_students",
                StudentOperation::Delete { .. } => "delete_student",
                StudentOperation::List { .. } => "list_students",
                StudentOperation::Get { .. } => "get_student",
                StudentOperation::UpdateProfile(_) => "update_student_profile",
                StudentOperation::AdminUpdate { .. } => "admin_update_student",
            },
            Self::Album(op) => match op {
                AlbumOperation::Create(_) => "create_album",
                AlbumOperation::List { .. } => "list_albums",
                AlbumOperation::Update { .. } => "update_album",
                AlbumOperation::Delete { .. } => "delete_album",
            },
            Self::Image(op) => match op {
                ImageOperation::Upload(_) => "upload_image",
                ImageOperation::List { .. } => "list_images",
                ImageOperation::ListPublic { .. } => "list_public_images",
                ImageOperation::Count => "count_images",
                ImageOperation::Delete { .. } => "delete_image",
            },
            Self::Event(op) => match op {
                EventOperation::Create(_) => "create_event",
                EventOperation::List(_) => "list_events",
                EventOperation::ListDepartment(_) => "list_department_events",
                EventOperation::ListWorkspace { .. } => "list_workspace_events",
                EventOperation::Get { .. } => "get_event",
                EventOperation::Update { .. } => "update_event",
                EventOperation::Delete { .. } => "delete_event",
                EventOperation::Stats => "event_stats",
            },
            Self::Report(op) => match op {
                ReportOperation::Create(_) => "create_report",
                ReportOperation::List => "list_reports",
                ReportOperation::Get { .. } => "get_report",
                ReportOperation::Toggle { .. } => "toggle_report",
                ReportOperation::Delete { .. } => "delete_report",
            },
        }
    }

    /// Status reported on success.
    pub fn success_status(&self) -> u16 {
        match self {
            Self::Account(AccountOperation::Signup(_))
            | Self::Department(DepartmentOperation::Create(_))
            | Self::Student(StudentOperation::Create(_) | StudentOperation::BulkCreate(_))
            | Self::Album(AlbumOperation::Create(_))
            | Self::Image(ImageOperation::Upload(_))
            | Self::Event(EventOperation::Create(_))
            | Self::Report(ReportOperation::Create(_)) => 201,
            _ => 200,
        }
    }
}

/// Normalized response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    pub ok: bool,
    /// HTTP-equivalent status code
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
    pub request_id: String,
}

/// Error body of a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationError {
    pub code: String,
    pub msg: String,
    /// Offending request field, for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Who is calling, as seen by the handlers.
pub(super) struct Caller {
    pub(super) request: RequestContext,
    pub(super) admin: Option<AuthenticatedContext>,
}

impl Caller {
    /// The authenticated admin, required by protected operations.
    pub(super) fn admin(&self) -> YearbookResult<&AuthenticatedContext> {
        self.admin
            .as_ref()
            .ok_or(YearbookError::Auth(AuthError::MissingToken))
    }
}

impl<S: StorageProvider> YearbookOperationHandler<S> {
    /// Create a new operation handler with the given server.
    pub fn new(server: YearbookServer<S>) -> Self {
        Self { server }
    }

    pub fn server(&self) -> &YearbookServer<S> {
        &self.server
    }

    /// Handle one operation.
    ///
    /// This is the main entry point. It never fails: every error becomes an
    /// error envelope with the matching status.
    pub async fn handle_operation(&self, request: OperationRequest) -> OperationResponse {
        let request_id = request
            .request_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let name = request.operation.name();
        let success_status = request.operation.success_status();

        info!(
            "Yearbook operation handler processing {} (request: '{}')",
            name, request_id
        );

        let result = match self.caller(request.bearer_token.as_deref(), &request_id) {
            Ok(caller) => self.dispatch(request.operation, &caller).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(data) => {
                debug!(
                    "Yearbook operation {} completed successfully (request: '{}')",
                    name, request_id
                );
                OperationResponse {
                    ok: true,
                    status: success_status,
                    data: Some(data),
                    error: None,
                    request_id,
                }
            }
            Err(e) => {
                warn!(
                    "Yearbook operation {} failed: {} (request: '{}')",
                    name, e, request_id
                );
                super::errors::create_error_response(
                    e,
                    request_id,
                    self.server.config().expose_internal_errors,
                )
            }
        }
    }

    /// Authenticate the token if one was supplied. A supplied token that
    /// does not verify fails the request even for public operations.
    fn caller(&self, bearer_token: Option<&str>, request_id: &str) -> YearbookResult<Caller> {
        let admin = bearer_token
            .map(|token| self.server.authenticate(token))
            .transpose()?
            .map(|identity| identity.into_context(request_id));

        let request = match &admin {
            Some(admin) => admin.request().clone(),
            None => RequestContext::new(request_id),
        };
        Ok(Caller { request, admin })
    }

    async fn dispatch(&self, operation: YearbookOperation, caller: &Caller) -> YearbookResult<Value> {
        match operation {
            YearbookOperation::Account(op) => super::handlers::accounts::handle(self, op, caller).await,
            YearbookOperation::Department(op) => {
                super::handlers::accounts::handle_department(self, op, caller).await
            }
            YearbookOperation::Student(op) => super::handlers::students::handle(self, op, caller).await,
            YearbookOperation::Album(op) => super::handlers::media::handle_album(self, op, caller).await,
            YearbookOperation::Image(op) => super::handlers::media::handle_image(self, op, caller).await,
            YearbookOperation::Event(op) => super::handlers::events::handle(self, op, caller).await,
            YearbookOperation::Report(op) => super::handlers::reports::handle(self, op, caller).await,
        }
    }
}
