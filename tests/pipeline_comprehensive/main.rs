//! End-to-end pipeline tests
//!
//! Exercise the full backup → archive → merge-import path against the
//! in-memory store doubles, covering the pipeline's observable contracts:
//! full restores into an empty store, import idempotence, retention,
//! per-row failure isolation, and the service-level JSON bodies.

use rentvault::testing::{record, MemoryBlobStore, MemoryCatalog, MemoryRecordStore};
use rentvault::{
    ArchiveReader, BackupAction, BackupConfig, BackupEngine, BackupKind, BackupService, BlobStore,
    CollectionSpec, ImportEngine, ImportService, RecordStore, SnapshotCatalog, SnapshotIndex,
    SnapshotStatus, StoreLayout, RETAINED_SNAPSHOTS,
};
use serde_json::json;
use std::sync::Arc;

/// Three collections, two containers: the shape used by most scenarios
fn demo_layout() -> StoreLayout {
    StoreLayout {
        collections: vec![
            CollectionSpec::updatable("contact_requests", "id").required(),
            CollectionSpec::updatable("properties", "id"),
            CollectionSpec::immutable("lead_documents", "id"),
        ],
        containers: vec!["lead-uploads".to_string(), "property-images".to_string()],
    }
}

struct Fixture {
    records: Arc<MemoryRecordStore>,
    blobs: Arc<MemoryBlobStore>,
    catalog: Arc<MemoryCatalog>,
    engine: BackupEngine,
}

fn fixture(layout: StoreLayout) -> Fixture {
    let records = Arc::new(MemoryRecordStore::new());
    let blobs = Arc::new(MemoryBlobStore::new());
    let catalog = Arc::new(MemoryCatalog::new());
    let engine = BackupEngine::new(
        records.clone(),
        blobs.clone(),
        catalog.clone(),
        BackupConfig {
            layout,
            ..BackupConfig::default()
        },
    );
    Fixture {
        records,
        blobs,
        catalog,
        engine,
    }
}

/// Seed the concrete scenario: collections with 2, 0 and 5 records,
/// containers with 3 and 0 objects (plus a placeholder entry)
fn seed_demo_store(fx: &Fixture) {
    fx.records.seed(
        "contact_requests",
        vec![
            record(&[
                ("id", json!(1)),
                ("name", json!("Ada Lovelace")),
                ("message", json!("Is the villa free in June?\nWe are 4.")),
            ]),
            record(&[
                ("id", json!(2)),
                ("name", json!("Grace, Hopper")),
                ("message", json!("Parking available?")),
            ]),
        ],
    );
    let documents = (0..5)
        .map(|i| {
            record(&[
                ("id", json!(100 + i)),
                ("file", json!(format!("doc-{}.pdf", i))),
            ])
        })
        .collect();
    fx.records.seed("lead_documents", documents);
    fx.blobs.seed("lead-uploads", "a.pdf", b"one".to_vec());
    fx.blobs.seed("lead-uploads", "b.pdf", b"two".to_vec());
    fx.blobs.seed("lead-uploads", "c.pdf", b"three".to_vec());
    fx.blobs
        .seed("lead-uploads", ".emptyFolderPlaceholder", vec![]);
}

#[test]
fn backup_then_restore_into_empty_store() {
    let fx = fixture(demo_layout());
    seed_demo_store(&fx);

    let report = fx.engine.create_backup(BackupKind::Manual).unwrap();
    assert_eq!(report.files_included, 3); // placeholder excluded

    let archive = fx.blobs.download("backups", &report.file_name).unwrap();
    let reader = ArchiveReader::from_bytes(&archive).unwrap();
    let manifest = reader.manifest().unwrap();
    assert_eq!(manifest.files_included, 3);
    assert_eq!(manifest.collections.len(), 3);
    assert!(reader.verify_checksums(&manifest));

    // Restore into an empty target store
    let target = Arc::new(MemoryRecordStore::new());
    let importer = ImportEngine::new(target.clone(), demo_layout());
    let imported = importer.import_archive(&archive).unwrap();

    assert_eq!(imported.details["contact_requests"].inserted, 2);
    assert_eq!(imported.details["properties"].inserted, 0);
    assert_eq!(imported.details["lead_documents"].inserted, 5);
    assert!(imported.errors.is_empty());

    // Values survive the tabular round trip, embedded newline included
    let restored = target
        .find_by_key("contact_requests", "id", &json!(1))
        .unwrap()
        .unwrap();
    assert_eq!(
        restored.get("message"),
        Some(&json!("Is the villa free in June?\nWe are 4."))
    );
}

#[test]
fn second_import_is_idempotent() {
    let fx = fixture(demo_layout());
    seed_demo_store(&fx);

    let report = fx.engine.create_backup(BackupKind::Manual).unwrap();
    let archive = fx.blobs.download("backups", &report.file_name).unwrap();

    let target = Arc::new(MemoryRecordStore::new());
    let importer = ImportEngine::new(target.clone(), demo_layout());

    let first = importer.import_archive(&archive).unwrap();
    let second = importer.import_archive(&archive).unwrap();

    for (name, counts) in &second.details {
        assert_eq!(counts.inserted, 0, "collection {}", name);
        assert_eq!(
            counts.updated + counts.skipped,
            first.details[name].inserted,
            "collection {}",
            name
        );
    }
    assert_eq!(target.len("contact_requests"), 2);
    assert_eq!(target.len("lead_documents"), 5);
}

#[test]
fn retention_keeps_ten_most_recent_completed() {
    let fx = fixture(demo_layout());

    let mut file_names = Vec::new();
    for _ in 0..13 {
        let report = fx.engine.create_backup(BackupKind::Scheduled).unwrap();
        file_names.push(report.file_name);
    }

    let completed: Vec<_> = fx
        .catalog
        .list()
        .unwrap()
        .into_iter()
        .filter(|s| s.status == SnapshotStatus::Completed)
        .collect();
    assert_eq!(completed.len(), RETAINED_SNAPSHOTS);

    // The survivors are exactly the ten most recently created archives
    let surviving: Vec<String> = completed.iter().map(|s| s.file_name.clone()).collect();
    for name in &file_names[3..] {
        assert!(surviving.contains(name));
    }
    for name in &file_names[..3] {
        assert!(!surviving.contains(name));
        assert!(!fx.blobs.object_names("backups").contains(name));
    }
}

#[test]
fn degraded_collection_read_still_produces_archive() {
    let fx = fixture(demo_layout());
    seed_demo_store(&fx);
    fx.records.poison_collection("lead_documents");

    let report = fx.engine.create_backup(BackupKind::Manual).unwrap();
    let archive = fx.blobs.download("backups", &report.file_name).unwrap();
    let reader = ArchiveReader::from_bytes(&archive).unwrap();

    // The poisoned collection dumps empty, the rest survive
    assert_eq!(
        reader.text("database/lead_documents.csv").unwrap(),
        Some("")
    );
    let contacts = reader.text("database/contact_requests.csv").unwrap().unwrap();
    assert!(contacts.contains("Ada Lovelace"));

    let target = Arc::new(MemoryRecordStore::new());
    let imported = ImportEngine::new(target, demo_layout())
        .import_archive(&archive)
        .unwrap();
    assert_eq!(imported.details["contact_requests"].inserted, 2);
    assert_eq!(imported.details["lead_documents"].inserted, 0);
}

#[test]
fn malformed_row_skips_one_of_one_hundred() {
    let fx = fixture(demo_layout());
    let mut rows = Vec::new();
    for i in 0..100 {
        // Row 50 has no primary key and cannot be merged
        let id = if i == 50 { json!(null) } else { json!(i) };
        rows.push(record(&[("id", id), ("name", json!(format!("n{}", i)))]));
    }
    fx.records.seed("contact_requests", rows);

    let report = fx.engine.create_backup(BackupKind::Manual).unwrap();
    let archive = fx.blobs.download("backups", &report.file_name).unwrap();

    let target = Arc::new(MemoryRecordStore::new());
    let imported = ImportEngine::new(target, demo_layout())
        .import_archive(&archive)
        .unwrap();

    let counts = &imported.details["contact_requests"];
    assert_eq!(counts.inserted, 99);
    assert_eq!(counts.skipped, 1);
    assert_eq!(counts.total(), 100);
    assert_eq!(imported.errors.len(), 1);
}

#[test]
fn service_surface_roundtrip() {
    let fx = fixture(demo_layout());
    seed_demo_store(&fx);
    let backup_service = BackupService::new(
        fx.engine,
        SnapshotIndex::new(fx.catalog.clone(), fx.blobs.clone(), "backups"),
    );

    let created = backup_service.handle(BackupAction::CreateBackup {
        kind: BackupKind::Manual,
    });
    assert_eq!(created["success"], json!(true));
    assert_eq!(created["files_included"], json!(3));

    let listed = backup_service.handle(BackupAction::ListBackups);
    let backups = listed["backups"].as_array().unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0]["status"], json!("completed"));

    let download = backup_service.handle(BackupAction::DownloadBackup {
        backup_id: created["backup_id"].as_str().unwrap().to_string(),
    });
    let file_name = download["file_name"].as_str().unwrap();

    // Feed the very archive back through the import service
    let archive = fx.blobs.download("backups", file_name).unwrap();
    let target = Arc::new(MemoryRecordStore::new());
    let import_service = ImportService::new(ImportEngine::new(target, demo_layout()));

    let imported = import_service.handle_upload(&archive);
    assert_eq!(imported["success"], json!(true));
    assert_eq!(imported["details"]["contact_requests"]["inserted"], json!(2));
    assert_eq!(imported["details"]["lead_documents"]["inserted"], json!(5));
}

#[test]
fn upload_failure_surfaces_as_hard_error() {
    let fx = fixture(demo_layout());
    seed_demo_store(&fx);
    fx.blobs.fail_uploads(true);

    let err = fx.engine.create_backup(BackupKind::Manual).unwrap_err();
    assert!(err.to_string().contains("upload"));

    // No completed row may reference the failed upload
    let rows = fx.catalog.list().unwrap();
    assert!(rows.iter().all(|s| s.status != SnapshotStatus::Completed));
}
