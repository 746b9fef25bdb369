use std::path::{Path, PathBuf};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use super::document_parser::{CvDocumentParser, DocumentLoader};
use super::errors::CoreError;
use super::models::{BatchReport, DocumentOutcome, OutcomeStatus};
use super::pdf::{display_name, PageSource};
use super::runtime::ExtractionRuntime;
use super::upserter::ProfileUpserter;

/// Runs every document of a source through the pipeline. Without an upserter
/// profiles are assembled but never persisted.
pub struct BatchService {
    runtime: ExtractionRuntime,
    parser: CvDocumentParser,
    upserter: Option<ProfileUpserter>,
}

impl BatchService {
    pub fn new(runtime: ExtractionRuntime, upserter: Option<ProfileUpserter>) -> Result<Self, CoreError> {
        let parser = runtime.build_parser()?;
        Ok(Self {
            runtime,
            parser,
            upserter,
        })
    }

    pub fn is_dry_run(&self) -> bool {
        self.upserter.is_none()
    }

    /// A single file, or the supported files of a directory (non-recursive) in name order.
    pub async fn list_documents(source: &Path) -> Result<Vec<PathBuf>, CoreError> {
        let metadata = tokio::fs::metadata(source).await.map_err(|err| {
            CoreError::Configuration(format!("cannot read source {}: {err}", source.display()))
        })?;

        if metadata.is_file() {
            return Ok(vec![source.to_path_buf()]);
        }

        let mut dir = tokio::fs::read_dir(source).await?;
        let mut paths = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_file() && DocumentLoader::is_supported(&path) {
                paths.push(path);
            }
        }

        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }

    pub async fn run_batch(&self, source: &Path) -> Result<BatchReport, CoreError> {
        let started_at = Utc::now();
        let paths = Self::list_documents(source).await?;
        let max_concurrency = self.runtime.settings().max_concurrent_documents.max(1);
        info!(
            source = %source.display(),
            documents = paths.len(),
            max_concurrency,
            dry_run = self.is_dry_run(),
            "batch started"
        );

        let mut indexed: Vec<(usize, DocumentOutcome)> = stream::iter(paths.iter().enumerate())
            .map(|(index, path)| async move { (index, self.process_path(path).await) })
            .buffer_unordered(max_concurrency)
            .collect()
            .await;
        indexed.sort_by_key(|(index, _)| *index);

        let outcomes = indexed.into_iter().map(|(_, outcome)| outcome).collect();
        let report = BatchReport::from_outcomes(source.display().to_string(), started_at, outcomes);
        info!(
            created = report.created,
            updated = report.updated,
            accepted = report.accepted,
            rejected = report.rejected,
            duration_seconds = report.duration_seconds,
            "batch completed"
        );
        Ok(report)
    }

    pub async fn process_path(&self, path: &Path) -> DocumentOutcome {
        match self.parser.loader().load(path).await {
            Ok(document) => self.process_document(document.as_ref()).await,
            Err(err) => {
                let source_file = display_name(path);
                warn!(document = %source_file, "{err}");
                DocumentOutcome::rejected(source_file, err.rejection_reason(), Some(err.to_string()), false)
            }
        }
    }

    /// Exactly one outcome per document; errors never escape.
    pub async fn process_document(&self, document: &dyn PageSource) -> DocumentOutcome {
        let source_file = document.name().to_string();

        let text = match self.parser.extract_text(document).await {
            Ok(text) => text,
            Err(err) => return rejected(source_file, err, false),
        };
        let parsed = match self.parser.assemble(&text) {
            Ok(parsed) => parsed,
            Err(err) => return rejected(source_file, err, text.ocr_used),
        };

        let Some(upserter) = &self.upserter else {
            info!(document = %source_file, confidence = parsed.confidence, "profile accepted");
            return DocumentOutcome {
                source_file,
                status: OutcomeStatus::Accepted,
                profile_id: None,
                profile: Some(parsed.profile),
                reason: None,
                detail: None,
                ocr_used: parsed.ocr_used,
                confidence: parsed.confidence,
            };
        };

        match upserter.upsert(parsed.profile.clone()).await {
            Ok(outcome) => DocumentOutcome {
                source_file,
                status: if outcome.created {
                    OutcomeStatus::Created
                } else {
                    OutcomeStatus::Updated
                },
                profile_id: Some(outcome.profile_id),
                profile: Some(parsed.profile),
                reason: None,
                detail: None,
                ocr_used: parsed.ocr_used,
                confidence: parsed.confidence,
            },
            Err(err) => {
                warn!(document = %source_file, "upsert failed: {err}");
                DocumentOutcome::rejected(
                    source_file,
                    err.rejection_reason(),
                    Some(err.to_string()),
                    parsed.ocr_used,
                )
            }
        }
    }

    pub fn shutdown(self) {
        self.runtime.shutdown();
    }
}

fn rejected(source_file: String, err: CoreError, ocr_used: bool) -> DocumentOutcome {
    warn!(document = %source_file, ocr_used, "rejected: {err}");
    DocumentOutcome::rejected(source_file, err.rejection_reason(), Some(err.to_string()), ocr_used)
}
