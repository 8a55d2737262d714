//! Report handlers.
//!
//! Reports are filed with or without a token; every other report operation
//! needs an admin.

use super::to_data;
use crate::error::YearbookResult;
use crate::operation_handler::core::{Caller, ReportOperation, YearbookOperationHandler};
use crate::operation_handler::errors::parse_id;
use crate::storage::StorageProvider;
use serde_json::Value;

pub async fn handle<S: StorageProvider>(
    handler: &YearbookOperationHandler<S>,
    operation: ReportOperation,
    caller: &Caller,
) -> YearbookResult<Value> {
    let server = handler.server();
    match operation {
        ReportOperation::Create(request) => to_data(
            server
                .create_report(request, caller.admin.as_ref(), &caller.request)
                .await?,
        ),
        ReportOperation::List => to_data(server.list_reports(caller.admin()?).await?),
        ReportOperation::Get { id } => {
            let id = parse_id("id", &id)?;
            to_data(server.get_report(caller.admin()?, id).await?)
        }
        ReportOperation::Toggle { id } => {
            let id = parse_id("id", &id)?;
            to_data(server.toggle_report(caller.admin()?, id).await?)
        }
        ReportOperation::Delete { id } => {
            let id = parse_id("id", &id)?;
            to_data(server.delete_report(caller.admin()?, id).await?)
        }
    }
}
