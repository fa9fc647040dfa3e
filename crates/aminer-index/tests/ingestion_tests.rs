//! End-to-end ingestion tests against the in-memory store.

use std::io::{Cursor, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use aminer_index::error::{IngestError, IngestResult, StoreError, StoreResult};
use aminer_index::store::{KeyValueStore, MemoryStore};
use aminer_index::{
    Config, IndexStore, IngestReport, IngestState, Ingestor, QueryService, SourceFiles,
};

const EDGES: &str = "#10\t20\t3\n#10\t30\t5\n";

const AUTHORS: &str = "\
#index 1
#n Jane Smith
#a MIT
#pc 50
#cn 1000
#hi 7
#pi 12.5000
#upi 10.2500
#t data mining;machine learning

#index 10
#n Li Wei
#a Tsinghua University
#pc 12
#cn 80
#hi 4
#pi 3.0000
#upi 2.5000
#t data mining
";

async fn run(ingestor: &Ingestor, edges: &str, authors: &str) -> IngestResult<IngestReport> {
    let edges = Cursor::new(edges.to_string());
    let authors = Cursor::new(authors.to_string());
    ingestor.run_readers(edges, authors).await
}

fn setup() -> (MemoryStore, IndexStore, Ingestor) {
    let memory = MemoryStore::new();
    let store = IndexStore::new(Arc::new(memory.clone()));
    let ingestor = Ingestor::new(store.clone(), &Config::for_testing());
    (memory, store, ingestor)
}

async fn raw(memory: &MemoryStore, key: &str) -> Option<String> {
    memory
        .get(key)
        .await
        .unwrap()
        .map(|bytes| String::from_utf8(bytes).unwrap())
}

fn weights(pairs: &[(u64, u32)]) -> Option<std::collections::BTreeMap<u64, u32>> {
    Some(pairs.iter().copied().collect())
}

// =============================================================================
// Index contents
// =============================================================================

#[tokio::test]
async fn test_coauthor_scenario() {
    let (memory, store, ingestor) = setup();

    let report = ingestor
        .ingest_coauthors(Cursor::new("#10 20 3\n#10 30 5\n"))
        .await
        .unwrap();

    assert_eq!(report.records, 2);
    assert_eq!(report.entries, 3);
    assert_eq!(
        raw(&memory, "coauthors:10").await.as_deref(),
        Some(r#"{"20":3,"30":5}"#)
    );
    assert_eq!(
        raw(&memory, "coauthors:20").await.as_deref(),
        Some(r#"{"10":3}"#)
    );
    assert_eq!(store.get_coauthors(30).await.unwrap(), weights(&[(10, 5)]));
}

#[tokio::test]
async fn test_subject_scenario() {
    let (memory, store, ingestor) = setup();

    let (report, subjects) = ingestor.ingest_authors(Cursor::new(AUTHORS)).await.unwrap();

    assert_eq!(report.entries, 2);
    assert_eq!(subjects, 2);
    assert_eq!(
        raw(&memory, "subject:machine learning").await.as_deref(),
        Some(r#"{"1":7}"#)
    );
    assert_eq!(
        raw(&memory, "subject:data mining").await.as_deref(),
        Some(r#"{"1":7,"10":4}"#)
    );
    assert_eq!(
        store.get_subject_list().await.unwrap(),
        Some(vec![
            "data mining".to_string(),
            "machine learning".to_string()
        ])
    );

    let profile = store.get_author(1).await.unwrap().unwrap();
    assert_eq!(profile.name, "Jane Smith");
    assert_eq!(
        profile.research_interests,
        vec!["data mining", "machine learning"]
    );
}

#[tokio::test]
async fn test_author_entry_uses_record_tags() {
    let (memory, _, ingestor) = setup();
    ingestor.ingest_authors(Cursor::new(AUTHORS)).await.unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&raw(&memory, "author:10").await.unwrap()).unwrap();
    assert_eq!(value["index"], 10);
    assert_eq!(value["af"], "Tsinghua University");
    assert_eq!(value["pc"], 12);
    assert_eq!(value["upi"], 2.5);
    assert_eq!(value["t"], "data mining");
}

#[tokio::test]
async fn test_duplicate_edge_last_write_wins() {
    let (_, store, ingestor) = setup();
    ingestor
        .ingest_coauthors(Cursor::new("#1 2 4\n#2 1 9\n"))
        .await
        .unwrap();

    assert_eq!(store.get_coauthors(1).await.unwrap(), weights(&[(2, 9)]));
    assert_eq!(store.get_coauthors(2).await.unwrap(), weights(&[(1, 9)]));
}

// =============================================================================
// Malformed input
// =============================================================================

#[tokio::test]
async fn test_malformed_records_are_skipped() {
    let (_, store, ingestor) = setup();

    let edges = "#10 20 3\n#10 x 5\n10 30 5\n#40 50\n#60 70 1\n";
    let report = ingestor.ingest_coauthors(Cursor::new(edges)).await.unwrap();

    assert_eq!(report.records, 2);
    let lines: Vec<usize> = report.warnings.iter().map(|w| w.line).collect();
    assert_eq!(lines, vec![2, 3, 4]);
    assert!(store.get_coauthors(30).await.unwrap().is_none());
    assert!(store.get_coauthors(70).await.unwrap().is_some());
}

#[tokio::test]
async fn test_malformed_author_block_is_skipped() {
    let (_, store, ingestor) = setup();

    let authors = AUTHORS.replace("#hi 7", "#hi seven");
    let (report, _) = ingestor.ingest_authors(Cursor::new(authors)).await.unwrap();

    assert_eq!(report.records, 1);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].line, 1);
    assert!(store.get_author(1).await.unwrap().is_none());
    assert!(store.get_author(10).await.unwrap().is_some());
}

#[tokio::test]
async fn test_invalid_utf8_is_replaced() {
    let (_, store, ingestor) = setup();

    let mut bytes = AUTHORS.as_bytes().to_vec();
    let at = AUTHORS.find("Li Wei").unwrap() + 2;
    bytes[at] = 0xE9;
    ingestor.ingest_authors(Cursor::new(bytes)).await.unwrap();

    let profile = store.get_author(10).await.unwrap().unwrap();
    assert_eq!(profile.name, "Li\u{fffd}Wei");
}

// =============================================================================
// Full runs
// =============================================================================

#[tokio::test]
async fn test_run_writes_manifest() {
    let (_, store, ingestor) = setup();
    assert!(store.get_manifest().await.unwrap().is_none());

    let report = ingestor
        .run_readers(Cursor::new(EDGES), Cursor::new(AUTHORS))
        .await
        .unwrap();

    let manifest = store.get_manifest().await.unwrap().unwrap();
    assert_eq!(manifest, report.manifest());
    assert_eq!(manifest.state, IngestState::Complete);
    assert_eq!(manifest.edges, 2);
    assert_eq!(manifest.coauthor_entries, 3);
    assert_eq!(manifest.authors, 2);
    assert_eq!(manifest.subjects, 2);
    assert_eq!(manifest.warnings, 0);
}

#[tokio::test]
async fn test_reingestion_is_byte_identical() {
    let (memory, _, ingestor) = setup();
    run(&ingestor, EDGES, AUTHORS).await.unwrap();
    let first = memory.snapshot().await;

    run(&ingestor, EDGES, AUTHORS).await.unwrap();
    assert_eq!(memory.snapshot().await, first);

    let (other, _, other_ingestor) = setup();
    run(&other_ingestor, EDGES, AUTHORS).await.unwrap();
    assert_eq!(other.snapshot().await, first);
}

#[tokio::test]
async fn test_key_namespace() {
    let (memory, _, ingestor) = setup();
    run(&ingestor, EDGES, AUTHORS).await.unwrap();

    assert_eq!(
        memory.keys_with_prefix("author:").await,
        vec!["author:1", "author:10"]
    );
    assert_eq!(memory.keys_with_prefix("coauthors:").await.len(), 3);
    assert_eq!(memory.keys_with_prefix("subject:").await.len(), 2);
    assert!(raw(&memory, "subjects").await.is_some());
    assert!(raw(&memory, "meta:manifest").await.is_some());
}

/// Store that refuses every write.
struct ReadOnlyStore;

#[async_trait::async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>) -> StoreResult<()> {
        Err(StoreError::unavailable("READONLY"))
    }
}

#[tokio::test]
async fn test_store_failure_aborts_run() {
    let store = IndexStore::new(Arc::new(ReadOnlyStore));
    let ingestor = Ingestor::new(store, &Config::for_testing());

    let err = run(&ingestor, EDGES, AUTHORS).await.unwrap_err();
    assert!(matches!(err, IngestError::Index(_)));
    assert!(err.to_string().contains("READONLY"));
}

/// Memory store that starts refusing profile writes once switched.
struct FailingAuthorStore {
    inner: MemoryStore,
    fail_authors: AtomicBool,
}

#[async_trait::async_trait]
impl KeyValueStore for FailingAuthorStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        if key.starts_with("author:") && self.fail_authors.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("connection reset"));
        }
        self.inner.set(key, value).await
    }
}

#[tokio::test]
async fn test_failed_rerun_is_not_ready() {
    let failing = Arc::new(FailingAuthorStore {
        inner: MemoryStore::new(),
        fail_authors: AtomicBool::new(false),
    });
    let store = IndexStore::new(failing.clone());
    let config = Config::for_testing();
    let ingestor = Ingestor::new(store.clone(), &config);
    let service = QueryService::new(store.clone(), &config);

    run(&ingestor, EDGES, AUTHORS).await.unwrap();
    assert!(service.manifest().await.unwrap().is_some());

    failing.fail_authors.store(true, Ordering::SeqCst);
    let err = run(&ingestor, "#10 20 9\n", AUTHORS).await.unwrap_err();
    assert!(err.to_string().contains("connection reset"));

    let stored = store.get_manifest().await.unwrap().unwrap();
    assert_eq!(stored.state, IngestState::Ingesting);
    assert!(service.manifest().await.unwrap().is_none());
}

#[tokio::test]
async fn test_single_pass_leaves_manifest_in_progress() {
    let (_, store, ingestor) = setup();
    run(&ingestor, EDGES, AUTHORS).await.unwrap();

    ingestor.ingest_authors(Cursor::new(AUTHORS)).await.unwrap();
    let manifest = store.get_manifest().await.unwrap().unwrap();
    assert!(!manifest.is_complete());

    run(&ingestor, EDGES, AUTHORS).await.unwrap();
    assert!(store.get_manifest().await.unwrap().unwrap().is_complete());
}

// =============================================================================
// Re-ingestion
// =============================================================================

const RENAMED_TOPIC: &str = "\
#index 1
#n Jane Smith
#a MIT
#pc 50
#cn 1000
#hi 8
#pi 12.5000
#upi 10.2500
#t new topic
";

#[tokio::test]
async fn test_reingestion_retires_vanished_subjects() {
    let (memory, store, ingestor) = setup();
    let service = QueryService::new(store.clone(), &Config::for_testing());

    let old_topic = RENAMED_TOPIC.replace("new topic", "old topic");
    run(&ingestor, EDGES, &old_topic).await.unwrap();
    assert_eq!(service.list_subjects().await.unwrap(), vec!["old topic"]);

    run(&ingestor, EDGES, RENAMED_TOPIC).await.unwrap();

    let err = service.rank_authors_by_subject("old topic").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(service.list_subjects().await.unwrap(), vec!["new topic"]);
    let tombstone = raw(&memory, "subject:old topic").await;
    assert_eq!(tombstone.as_deref(), Some("null"));

    let ranked = service.rank_authors_by_subject("new topic").await.unwrap();
    assert_eq!(ranked[0].author_id, 1);
    assert_eq!(ranked[0].h_index, 8);
}

// =============================================================================
// Source files
// =============================================================================

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_run_from_files_records_digests() {
    let (_, store, ingestor) = setup();
    let edges = write_temp("abc");
    let authors = write_temp(AUTHORS);

    let sources = SourceFiles::new(edges.path(), authors.path())
        .with_checksums(Some("900150983CD24FB0D6963F7D28E17F72".to_string()), None);
    let report = ingestor.run(&sources).await.unwrap();

    assert_eq!(report.coauthors.warnings.len(), 1);
    let manifest = store.get_manifest().await.unwrap().unwrap();
    assert_eq!(manifest.coauthors_md5, "900150983cd24fb0d6963f7d28e17f72");
    assert_eq!(manifest.authors_md5.len(), 32);
}

#[tokio::test]
async fn test_checksum_mismatch_leaves_run_incomplete() {
    let (memory, store, ingestor) = setup();
    let edges = write_temp(EDGES);
    let authors = write_temp(AUTHORS);

    let sources = SourceFiles::new(edges.path(), authors.path())
        .with_checksums(Some("d41d8cd98f00b204e9800998ecf8427e".to_string()), None);
    let err = ingestor.run(&sources).await.unwrap_err();

    assert!(matches!(err, IngestError::ChecksumMismatch { .. }));
    let manifest = store.get_manifest().await.unwrap().unwrap();
    assert_eq!(manifest.state, IngestState::Ingesting);
    assert!(memory.keys_with_prefix("coauthors:").await.is_empty());
}

#[tokio::test]
async fn test_missing_source_file() {
    let (memory, _, ingestor) = setup();
    let dir = tempfile::tempdir().unwrap();
    let authors = write_temp(AUTHORS);

    let missing = dir.path().join("AMiner-Coauthor.txt");
    let sources = SourceFiles::new(missing, authors.path());
    let err = ingestor.run(&sources).await.unwrap_err();

    assert!(matches!(err, IngestError::Io { .. }));
    assert!(err.to_string().contains("AMiner-Coauthor.txt"));
    assert!(memory.is_empty().await);
}
