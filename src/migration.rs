//! One-time rewrite of tenant attributes to the canonical encoding.
//!
//! Records written by older code carry their department under one of several
//! encodings: a `departmentId` reference, a `departmentId` holding the id as
//! text, a `workspace` text holding the id or the slug, or a legacy
//! `workspaceName` holding the slug or the display name. [`TenantBackfill`]
//! finds the department each record belongs to and rewrites the record with
//! `workspace = <hex id>` and `departmentId = {"$oid": <hex id>}`. All other
//! attributes, including `workspaceName`, are left as they are.
//!
//! The backfill is idempotent. Records it cannot place are reported and left
//! untouched, and stay reachable through the resolver.

use crate::error::{YearbookError, YearbookResult};
use crate::models::{Album, Department, Document, Event, Image, Report, Student};
use crate::storage::{Filter, StorageKey, StorageProvider};
use crate::tenant::key::{DEPARTMENT_ID_ATTR, WORKSPACE_ATTR, reference_value};
use crate::tenant::{ObjectId, TenantFields, TenantKey};
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Collections whose records are owned by a department.
pub const TENANT_SCOPED_COLLECTIONS: [&str; 5] = [
    Student::COLLECTION,
    Album::COLLECTION,
    Image::COLLECTION,
    Event::COLLECTION,
    Report::COLLECTION,
];

const BATCH_SIZE: usize = 500;

/// Outcome of one backfill run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub scanned: usize,
    pub rewritten: usize,
    pub already_canonical: usize,
    /// Records whose department could not be determined.
    pub unresolved: Vec<StorageKey>,
}

/// Department lookup tables built once per run.
struct DepartmentIndex {
    by_id: HashMap<ObjectId, ObjectId>,
    by_slug: HashMap<String, ObjectId>,
    by_name: HashMap<String, ObjectId>,
}

impl DepartmentIndex {
    fn new(departments: &[Department]) -> Self {
        let mut index = Self {
            by_id: HashMap::new(),
            by_slug: HashMap::new(),
            by_name: HashMap::new(),
        };
        for department in departments {
            index.by_id.insert(department.id, department.id);
            index.by_slug.insert(department.slug.clone(), department.id);
            index.by_name.entry(department.name.clone()).or_insert(department.id);
        }
        index
    }

    fn id_text(&self, text: &str) -> Option<ObjectId> {
        ObjectId::parse_str(text)
            .ok()
            .and_then(|oid| self.by_id.get(&oid).copied())
    }

    /// The department a record belongs to, trying the encodings in the
    /// order the resolver queries them.
    fn locate(&self, fields: &TenantFields) -> Option<ObjectId> {
        let workspace = fields.workspace.as_deref();

        workspace
            .and_then(|workspace| self.id_text(workspace))
            .or_else(|| match &fields.department_id {
                Some(TenantKey::Reference(oid)) => self.by_id.get(oid).copied(),
                Some(TenantKey::Text(text)) => self.id_text(text),
                None => None,
            })
            .or_else(|| workspace.and_then(|workspace| self.by_slug.get(workspace).copied()))
            .or_else(|| {
                fields.workspace_name.as_deref().and_then(|name| {
                    self.by_slug
                        .get(name)
                        .or_else(|| self.by_name.get(name))
                        .copied()
                })
            })
    }
}

/// Rewrites every tenant-scoped record to the canonical tenant encoding.
pub struct TenantBackfill<S> {
    storage: Arc<S>,
}

impl<S: StorageProvider> TenantBackfill<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub async fn run(&self) -> YearbookResult<BackfillReport> {
        let departments = self.departments().await?;
        let index = DepartmentIndex::new(&departments);
        info!(
            "Starting tenant backfill over {} departments",
            departments.len()
        );

        let mut report = BackfillReport::default();
        for collection in TENANT_SCOPED_COLLECTIONS {
            self.backfill_collection(collection, &index, &mut report)
                .await?;
        }

        info!(
            "Tenant backfill finished: {} scanned, {} rewritten, {} already canonical, {} unresolved",
            report.scanned,
            report.rewritten,
            report.already_canonical,
            report.unresolved.len()
        );
        Ok(report)
    }

    async fn departments(&self) -> YearbookResult<Vec<Department>> {
        let found = self
            .storage
            .find(StorageKey::collection(Department::COLLECTION), &Filter::new())
            .await
            .map_err(YearbookError::storage)?;
        crate::models::decode_documents(found)
    }

    async fn backfill_collection(
        &self,
        collection: &str,
        index: &DepartmentIndex,
        report: &mut BackfillReport,
    ) -> YearbookResult<()> {
        let mut offset = 0;
        loop {
            let batch = self
                .storage
                .list(StorageKey::collection(collection), offset, BATCH_SIZE)
                .await
                .map_err(YearbookError::storage)?;
            if batch.is_empty() {
                return Ok(());
            }
            offset += batch.len();

            for (key, document) in batch {
                report.scanned += 1;
                let fields: TenantFields = match serde_json::from_value(document.clone()) {
                    Ok(fields) => fields,
                    Err(e) => {
                        warn!("Unreadable tenant attributes on {}: {}", key, e);
                        report.unresolved.push(key);
                        continue;
                    }
                };

                let Some(department_id) = index.locate(&fields) else {
                    warn!("No department found for {}", key);
                    report.unresolved.push(key);
                    continue;
                };

                if fields.is_canonical() && fields.workspace == Some(department_id.to_hex()) {
                    report.already_canonical += 1;
                    continue;
                }

                let rewritten = canonicalize(document, department_id)?;
                self.storage
                    .put(key.clone(), rewritten)
                    .await
                    .map_err(YearbookError::storage)?;
                debug!("Rewrote tenant attributes of {}", key);
                report.rewritten += 1;
            }
        }
    }
}

fn canonicalize(mut document: Value, department_id: ObjectId) -> YearbookResult<Value> {
    let object = document
        .as_object_mut()
        .ok_or_else(|| YearbookError::internal("stored document is not an object"))?;
    object.insert(
        WORKSPACE_ATTR.to_string(),
        Value::String(department_id.to_hex()),
    );
    object.insert(
        DEPARTMENT_ID_ATTR.to_string(),
        reference_value(&department_id),
    );
    Ok(document)
}
