//! Ingestion pipeline.
//!
//! Each pass reads one source file on a blocking thread, folds the parsed
//! records into an in-memory index, and then writes that index through the
//! [`IndexStore`]. The coauthor and author passes are independent and run
//! concurrently.
//!
//! `meta:manifest` brackets every run: it is marked [`IngestState::Ingesting`]
//! before the first key is written and replaced by the completed manifest
//! only when both passes have succeeded. A run that fails partway leaves the
//! in-progress marker behind.

mod checksum;

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use checksum::Md5Reader;

use crate::config::Config;
use crate::error::{IngestError, IngestResult, MalformedRecord};
use crate::index::{AuthorIndex, CoauthorIndex, Progress};
use crate::parser::{LossyLines, parse_edges, parse_profiles};
use crate::store::IndexStore;

/// Whether the run that wrote a manifest has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestState {
    /// Keys are being written; the index may be a mix of two runs.
    Ingesting,
    /// Every key of the run has been written.
    Complete,
}

/// Summary of the last ingestion run.
///
/// Holds no timestamps, so re-ingesting the same sources writes identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestManifest {
    pub state: IngestState,

    /// Valid edge lines read.
    pub edges: usize,

    /// `coauthors:<id>` entries written.
    pub coauthor_entries: usize,

    /// `author:<id>` entries written.
    pub authors: usize,

    /// `subject:<name>` entries written.
    pub subjects: usize,

    /// Malformed records skipped across both sources.
    pub warnings: usize,

    /// MD5 of the coauthor source.
    pub coauthors_md5: String,

    /// MD5 of the author source.
    pub authors_md5: String,
}

impl IngestManifest {
    /// The marker written while a run is underway.
    #[must_use]
    pub fn in_progress() -> Self {
        Self {
            state: IngestState::Ingesting,
            edges: 0,
            coauthor_entries: 0,
            authors: 0,
            subjects: 0,
            warnings: 0,
            coauthors_md5: String::new(),
            authors_md5: String::new(),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == IngestState::Complete
    }
}

/// Outcome of one ingestion pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    /// Records parsed successfully.
    pub records: usize,

    /// Store entries written.
    pub entries: usize,

    /// Skipped records, in source order.
    pub warnings: Vec<MalformedRecord>,

    /// MD5 of the bytes read.
    pub md5: String,
}

/// Outcome of a full ingestion run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub coauthors: PassReport,
    pub authors: PassReport,

    /// Distinct subjects written.
    pub subjects: usize,
}

impl IngestReport {
    /// Malformed records skipped across both passes.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.coauthors.warnings.len() + self.authors.warnings.len()
    }

    /// The manifest persisted for this run.
    #[must_use]
    pub fn manifest(&self) -> IngestManifest {
        IngestManifest {
            state: IngestState::Complete,
            edges: self.coauthors.records,
            coauthor_entries: self.coauthors.entries,
            authors: self.authors.entries,
            subjects: self.subjects,
            warnings: self.warning_count(),
            coauthors_md5: self.coauthors.md5.clone(),
            authors_md5: self.authors.md5.clone(),
        }
    }
}

/// Source files for an ingestion run.
#[derive(Debug, Clone)]
pub struct SourceFiles {
    /// AMiner coauthor edge list.
    pub coauthors: PathBuf,

    /// AMiner author profile file.
    pub authors: PathBuf,

    /// Expected MD5 of the coauthor file.
    pub coauthors_md5: Option<String>,

    /// Expected MD5 of the author file.
    pub authors_md5: Option<String>,
}

impl SourceFiles {
    /// Sources without checksum validation.
    #[must_use]
    pub fn new(coauthors: impl Into<PathBuf>, authors: impl Into<PathBuf>) -> Self {
        Self {
            coauthors: coauthors.into(),
            authors: authors.into(),
            coauthors_md5: None,
            authors_md5: None,
        }
    }

    /// Require the given digests before anything from these files is written.
    #[must_use]
    pub fn with_checksums(
        mut self,
        coauthors_md5: Option<String>,
        authors_md5: Option<String>,
    ) -> Self {
        self.coauthors_md5 = coauthors_md5;
        self.authors_md5 = authors_md5;
        self
    }
}

/// Parse a coauthor edge list into an index.
///
/// Malformed lines are logged and collected; only an I/O error fails.
pub fn read_coauthors<R: Read>(
    reader: R,
    progress_interval: usize,
) -> io::Result<(CoauthorIndex, PassReport)> {
    let mut lines = LossyLines::new(BufReader::new(Md5Reader::new(reader)));
    let mut index = CoauthorIndex::new();
    let mut report = PassReport::default();

    let progress = Progress::new("coauthor edges", progress_interval, None);
    fold_records(
        parse_edges(lines.by_ref()),
        &mut index,
        &progress,
        &mut report,
    );

    report.md5 = lines.finish()?.into_inner().hex_digest();
    Ok((index, report))
}

/// Parse an author profile file into an index.
///
/// Malformed blocks are logged and collected; only an I/O error fails.
pub fn read_authors<R: Read>(
    reader: R,
    progress_interval: usize,
) -> io::Result<(AuthorIndex, PassReport)> {
    let mut lines = LossyLines::new(BufReader::new(Md5Reader::new(reader)));
    let mut index = AuthorIndex::new();
    let mut report = PassReport::default();

    let progress = Progress::new("author records", progress_interval, None);
    fold_records(
        parse_profiles(lines.by_ref()),
        &mut index,
        &progress,
        &mut report,
    );

    report.md5 = lines.finish()?.into_inner().hex_digest();
    Ok((index, report))
}

fn fold_records<T, I>(
    records: I,
    index: &mut impl Extend<T>,
    progress: &Progress,
    report: &mut PassReport,
) where
    I: Iterator<Item = Result<T, MalformedRecord>>,
{
    for record in records {
        match record {
            Ok(record) => {
                index.extend(std::iter::once(record));
                progress.tick();
            }
            Err(warning) => {
                tracing::warn!(
                    line = warning.line,
                    reason = %warning.reason,
                    text = %warning.text,
                    "Skipping malformed record"
                );
                report.warnings.push(warning);
            }
        }
    }
    report.records = progress.done();
}

/// Drives ingestion into an [`IndexStore`].
#[derive(Debug, Clone)]
pub struct Ingestor {
    store: IndexStore,
    write_concurrency: usize,
    progress_interval: usize,
}

impl Ingestor {
    #[must_use]
    pub fn new(store: IndexStore, config: &Config) -> Self {
        Self {
            store,
            write_concurrency: config.write_concurrency,
            progress_interval: config.progress_interval,
        }
    }

    /// Ingest both source files and write the manifest.
    ///
    /// # Errors
    ///
    /// Fails on an unreadable source, a checksum mismatch, or a store failure.
    /// A failed run never writes the completed manifest.
    pub async fn run(&self, sources: &SourceFiles) -> IngestResult<IngestReport> {
        tracing::info!(
            coauthors = %sources.coauthors.display(),
            authors = %sources.authors.display(),
            "Starting ingestion"
        );

        let coauthors = open(&sources.coauthors)?;
        let authors = open(&sources.authors)?;
        self.begin().await?;

        let (coauthors, (authors, subjects)) = tokio::try_join!(
            self.coauthor_pass(
                &sources.coauthors,
                coauthors,
                sources.coauthors_md5.as_deref()
            ),
            self.author_pass(&sources.authors, authors, sources.authors_md5.as_deref()),
        )?;

        self.finish(IngestReport {
            coauthors,
            authors,
            subjects,
        })
        .await
    }

    /// Ingest from in-memory or streamed sources and write the manifest.
    pub async fn run_readers<A, B>(&self, coauthors: A, authors: B) -> IngestResult<IngestReport>
    where
        A: Read + Send + 'static,
        B: Read + Send + 'static,
    {
        self.begin().await?;

        let (coauthors, (authors, subjects)) = tokio::try_join!(
            self.coauthor_pass(Path::new("<coauthors>"), coauthors, None),
            self.author_pass(Path::new("<authors>"), authors, None),
        )?;

        self.finish(IngestReport {
            coauthors,
            authors,
            subjects,
        })
        .await
    }

    /// Run only the coauthor pass.
    ///
    /// The manifest is left marked in progress until a full run completes.
    pub async fn ingest_coauthors<R>(&self, reader: R) -> IngestResult<PassReport>
    where
        R: Read + Send + 'static,
    {
        self.begin().await?;
        self.coauthor_pass(Path::new("<coauthors>"), reader, None)
            .await
    }

    /// Run only the author pass. Returns the pass report and the number of subjects written.
    ///
    /// The manifest is left marked in progress until a full run completes.
    pub async fn ingest_authors<R>(&self, reader: R) -> IngestResult<(PassReport, usize)>
    where
        R: Read + Send + 'static,
    {
        self.begin().await?;
        self.author_pass(Path::new("<authors>"), reader, None).await
    }

    async fn begin(&self) -> IngestResult<()> {
        self.store.put_manifest(&IngestManifest::in_progress()).await?;
        tracing::debug!("Manifest marked in progress");
        Ok(())
    }

    async fn coauthor_pass<R: Read + Send + 'static>(
        &self,
        path: &Path,
        reader: R,
        expected_md5: Option<&str>,
    ) -> IngestResult<PassReport> {
        let interval = self.progress_interval;
        let owned = path.to_path_buf();
        let (index, mut report) = tokio::task::spawn_blocking(move || {
            read_coauthors(reader, interval).map_err(|e| IngestError::io(owned, e))
        })
        .await??;

        checksum::verify(path, expected_md5, &report.md5)?;
        tracing::info!(
            edges = report.records,
            authors = index.len(),
            warnings = report.warnings.len(),
            "Coauthor source parsed"
        );

        report.entries = index
            .persist(&self.store, self.write_concurrency, self.progress_interval)
            .await?;
        Ok(report)
    }

    async fn author_pass<R: Read + Send + 'static>(
        &self,
        path: &Path,
        reader: R,
        expected_md5: Option<&str>,
    ) -> IngestResult<(PassReport, usize)> {
        let interval = self.progress_interval;
        let owned = path.to_path_buf();
        let (index, mut report) = tokio::task::spawn_blocking(move || {
            read_authors(reader, interval).map_err(|e| IngestError::io(owned, e))
        })
        .await??;

        checksum::verify(path, expected_md5, &report.md5)?;
        tracing::info!(
            profiles = index.profile_count(),
            subjects = index.subject_count(),
            warnings = report.warnings.len(),
            "Author source parsed"
        );

        let (entries, subjects) = index
            .persist(&self.store, self.write_concurrency, self.progress_interval)
            .await?;
        report.entries = entries;
        Ok((report, subjects))
    }

    async fn finish(&self, report: IngestReport) -> IngestResult<IngestReport> {
        let manifest = report.manifest();
        self.store.put_manifest(&manifest).await?;

        tracing::info!(
            edges = manifest.edges,
            authors = manifest.authors,
            subjects = manifest.subjects,
            warnings = manifest.warnings,
            "Ingestion complete"
        );
        Ok(report)
    }
}

fn open(path: &Path) -> IngestResult<File> {
    File::open(path).map_err(|e| IngestError::io(path, e))
}
