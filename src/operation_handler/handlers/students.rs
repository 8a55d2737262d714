//! Student handlers.

use super::to_data;
use crate::error::YearbookResult;
use crate::operation_handler::core::{Caller, StudentOperation, YearbookOperationHandler};
use crate::operation_handler::errors::parse_id;
use crate::storage::StorageProvider;
use crate::tenant::TenantIdentifier;
use serde_json::Value;

pub async fn handle<S: StorageProvider>(
    handler: &YearbookOperationHandler<S>,
    operation: StudentOperation,
    caller: &Caller,
) -> YearbookResult<Value> {
    let server = handler.server();
    match operation {
        StudentOperation::Create(request) => {
            to_data(server.create_student(caller.admin()?, request).await?)
        }
        StudentOperation::BulkCreate(request) => {
            to_data(server.bulk_create_students(caller.admin()?, request).await?)
        }
        StudentOperation::Delete { reference_number } => {
            to_data(server.delete_student(caller.admin()?, &reference_number).await?)
        }
        StudentOperation::List { workspace } => {
            let identifier = TenantIdentifier::infer(workspace);
            to_data(server.list_students(&identifier, &caller.request).await?)
        }
        StudentOperation::Get {
            workspace,
            reference_number,
        } => {
            let identifier = TenantIdentifier::infer(workspace);
            to_data(
                server
                    .get_student(&identifier, &reference_number, &caller.request)
                    .await?,
            )
        }
        StudentOperation::UpdateProfile(request) => {
            to_data(server.update_student_profile(request, &caller.request).await?)
        }
        StudentOperation::AdminUpdate { id, update } => {
            let id = parse_id("id", &id)?;
            to_data(server.admin_update_student(caller.admin()?, id, update).await?)
        }
    }
}
