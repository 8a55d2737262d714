//! Account and department handlers.

use super::to_data;
use crate::error::YearbookResult;
use crate::operation_handler::core::{AccountOperation, Caller, DepartmentOperation, YearbookOperationHandler};
use crate::operation_handler::errors::parse_id;
use crate::storage::StorageProvider;
use crate::tenant::TenantIdentifier;
use serde_json::Value;

/// Handle signup, signin and admin activation.
pub async fn handle<S: StorageProvider>(
    handler: &YearbookOperationHandler<S>,
    operation: AccountOperation,
    caller: &Caller,
) -> YearbookResult<Value> {
    let server = handler.server();
    match operation {
        AccountOperation::Signup(request) => to_data(server.signup(request, &caller.request).await?),
        AccountOperation::Signin(request) => to_data(server.signin(request, &caller.request).await?),
        AccountOperation::SetActive { admin_id, active } => {
            let admin_id = parse_id("adminId", &admin_id)?;
            to_data(server.set_admin_active(caller.admin()?, admin_id, active).await?)
        }
    }
}

/// Handle department operations.
pub async fn handle_department<S: StorageProvider>(
    handler: &YearbookOperationHandler<S>,
    operation: DepartmentOperation,
    caller: &Caller,
) -> YearbookResult<Value> {
    let server = handler.server();
    match operation {
        DepartmentOperation::Create(request) => {
            to_data(server.create_department(caller.admin()?, request).await?)
        }
        DepartmentOperation::List => to_data(server.list_departments(&caller.request).await?),
        DepartmentOperation::Get { slug } => {
            to_data(server.get_department_by_slug(&slug, &caller.request).await?)
        }
        DepartmentOperation::Statistics { department } => {
            let identifier = TenantIdentifier::infer(department);
            to_data(
                server
                    .department_statistics(caller.admin()?, &identifier)
                    .await?,
            )
        }
    }
}
