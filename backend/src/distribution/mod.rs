//! The upload pipeline: parse, validate, pick the roster, split, persist.
//!
//! Every stage either hands a complete result to the next one or aborts the
//! run with its own error; nothing is stored unless all earlier stages
//! succeeded. The uploaded temp file is owned by [`distribute_upload`] and is
//! removed when it returns, whatever the outcome.

pub mod engine;
pub mod materializer;
pub mod parser;
pub mod roster;
pub mod validator;

use crate::db::{AgentDirectory, AssignmentStore};
use crate::error::UploadError;
use common::model::distribution::DistributionEntry;
use log::{info, warn};
use parser::TabularFormat;
use tempfile::NamedTempFile;

/// An uploaded file waiting to be distributed.
#[derive(Debug)]
pub struct UploadedFile {
    /// Deleted from disk when dropped.
    pub file: NamedTempFile,
    pub original_name: String,
    pub format: TabularFormat,
    pub size: u64,
    /// Hex md5 of the uploaded bytes, used to identify uploads in the logs.
    pub md5: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionOutcome {
    pub distribution: Vec<DistributionEntry>,
    pub total_items: usize,
}

/// Runs the whole pipeline for one upload. Blocking.
pub fn distribute_upload<S>(store: &S, upload: UploadedFile) -> Result<DistributionOutcome, UploadError>
where
    S: AgentDirectory + AssignmentStore + ?Sized,
{
    if upload.size == 0 {
        return Err(UploadError::EmptyFile);
    }

    let table = parser::parse_file(upload.file.path(), upload.format)?;
    info!(
        "parsed {} rows from {} ({})",
        table.rows.len(),
        upload.original_name,
        upload.md5
    );

    let records = validator::validate(&table).inspect_err(|e| match e.row() {
        Some(row) => warn!("rejected {} at row {}: {}", upload.original_name, row, e),
        None => warn!("rejected {}: {}", upload.original_name, e),
    })?;

    let roster = roster::select_roster(store)?;
    let buckets = engine::distribute(records, &roster)?;
    info!(
        "bucket sizes for {}: {:?}",
        upload.md5,
        buckets.iter().map(|b| b.items.len()).collect::<Vec<_>>()
    );

    let distribution = materializer::persist(store, buckets)?;
    Ok(DistributionOutcome {
        total_items: materializer::total_items(&distribution),
        distribution,
    })
}
