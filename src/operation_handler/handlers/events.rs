//! Event handlers.

use super::to_data;
use crate::error::YearbookResult;
use crate::operation_handler::core::{Caller, EventOperation, YearbookOperationHandler};
use crate::operation_handler::errors::parse_id;
use crate::storage::StorageProvider;
use crate::tenant::TenantIdentifier;
use serde_json::Value;

pub async fn handle<S: StorageProvider>(
    handler: &YearbookOperationHandler<S>,
    operation: EventOperation,
    caller: &Caller,
) -> YearbookResult<Value> {
    let server = handler.server();
    match operation {
        EventOperation::Create(request) => to_data(server.create_event(caller.admin()?, request).await?),
        EventOperation::List(query) => to_data(server.list_events(caller.admin()?, query).await?),
        EventOperation::ListDepartment(query) => {
            to_data(server.list_department_events(caller.admin()?, query).await?)
        }
        EventOperation::ListWorkspace { workspace } => {
            let identifier = TenantIdentifier::infer(workspace);
            to_data(server.list_workspace_events(&identifier, &caller.request).await?)
        }
        EventOperation::Get { id } => {
            let id = parse_id("id", &id)?;
            to_data(server.get_event(caller.admin()?, id).await?)
        }
        EventOperation::Update { id, update } => {
            let id = parse_id("id", &id)?;
            to_data(server.update_event(caller.admin()?, id, update).await?)
        }
        EventOperation::Delete { id } => {
            let id = parse_id("id", &id)?;
            to_data(server.delete_event(caller.admin()?, id).await?)
        }
        EventOperation::Stats => to_data(server.event_stats(caller.admin()?).await?),
    }
}
