//! Tenant Resolution Benchmarks
//!
//! Measures scoped lookups over stores where the department's records use
//! one encoding, or are spread across every legacy encoding.

use chrono::Utc;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::sync::Arc;
use yearbook_server::models::{Department, Document, Student};
use yearbook_server::storage::{Filter, InMemoryStorage, StorageKey, StorageProvider};
use yearbook_server::tenant::{ObjectId, TenantFields, TenantIdentifier, TenantKey, TenantKeyResolver};

/// How the seeded students point at their department.
#[derive(Clone, Copy, Debug)]
enum Layout {
    Canonical,
    ReferenceOnly,
    Mixed,
}

fn tenant_fields(layout: Layout, department: ObjectId, n: usize) -> TenantFields {
    let encoding = match layout {
        Layout::Canonical => return TenantFields::canonical(department),
        Layout::ReferenceOnly => 1,
        Layout::Mixed => n % 3,
    };
    match encoding {
        0 => TenantFields {
            workspace: Some(department.to_hex()),
            ..TenantFields::default()
        },
        1 => TenantFields {
            department_id: Some(TenantKey::Reference(department)),
            ..TenantFields::default()
        },
        _ => TenantFields {
            department_id: Some(TenantKey::Text(department.to_hex())),
            ..TenantFields::default()
        },
    }
}

async fn put<D: Document>(storage: &InMemoryStorage, record: &D) {
    storage
        .put(
            StorageKey::new(D::COLLECTION, record.id().to_hex()),
            serde_json::to_value(record).unwrap(),
        )
        .await
        .unwrap();
}

/// Seed `departments` departments of `students` students each.
async fn seed(layout: Layout, departments: usize, students: usize) -> Arc<InMemoryStorage> {
    let storage = Arc::new(InMemoryStorage::new());
    let now = Utc::now();
    for d in 0..departments {
        let department = Department::new(format!("Dept {d}"), format!("D{d}"), format!("dept-{d}"), now);
        put(&storage, &department).await;
        for n in 0..students {
            let mut student = Student::new(format!("S{n:05}"), department.id, now);
            student.tenant = tenant_fields(layout, department.id, n);
            put(&storage, &student).await;
        }
    }
    storage
}

fn bench_scoped_listing(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("scoped_listing");

    for students in [10, 100, 1000] {
        group.throughput(Throughput::Elements(students as u64));
        for layout in [Layout::Canonical, Layout::ReferenceOnly, Layout::Mixed] {
            let storage = runtime.block_on(seed(layout, 5, students));
            let resolver = TenantKeyResolver::new(storage);
            let identifier = TenantIdentifier::slug("dept-2");

            group.bench_with_input(
                BenchmarkId::new(format!("{layout:?}"), students),
                &identifier,
                |b, identifier| {
                    b.iter(|| {
                        runtime.block_on(async {
                            let resolved = resolver.resolve(black_box(identifier)).await.unwrap();
                            let found: Vec<Student> =
                                resolver.find_scoped(&resolved, Filter::new()).await.unwrap();
                            black_box(found)
                        })
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_point_lookup(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("point_lookup");
    let storage = runtime.block_on(seed(Layout::Mixed, 5, 1000));
    let resolver = TenantKeyResolver::new(storage);

    // S00002 sits on the last plan step in the mixed layout.
    for reference in ["S00000", "S00001", "S00002"] {
        group.bench_function(reference, |b| {
            b.iter(|| {
                runtime.block_on(async {
                    let resolved = resolver
                        .resolve(&TenantIdentifier::slug("dept-2"))
                        .await
                        .unwrap();
                    let found: Option<Student> = resolver
                        .find_one_scoped(&resolved, Filter::new().eq("referenceNumber", black_box(reference)))
                        .await
                        .unwrap();
                    black_box(found)
                })
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scoped_listing, bench_point_lookup);
criterion_main!(benches);
