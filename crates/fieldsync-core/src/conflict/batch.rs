//! Conflict checks for a queue of pending offline actions

use std::collections::BTreeMap;
use std::future::Future;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use super::detect::detect_conflict;
use crate::error::Result;
use crate::models::{ActionTarget, ConflictReport, PendingAction, Record, RecordId};

/// Source of the current server copy of a record.
///
/// `Ok(None)` means the record no longer exists on the server. Implemented
/// for async closures taking `(record_type, id)`.
pub trait RecordFetcher {
    fn fetch_server_record(
        &self,
        record_type: &str,
        id: &RecordId,
    ) -> impl Future<Output = Result<Option<Record>>>;
}

impl<F, Fut> RecordFetcher for F
where
    F: Fn(String, RecordId) -> Fut,
    Fut: Future<Output = Result<Option<Record>>>,
{
    fn fetch_server_record(
        &self,
        record_type: &str,
        id: &RecordId,
    ) -> impl Future<Output = Result<Option<Record>>> {
        self(record_type.to_string(), id.clone())
    }
}

/// Tuning for [`detect_batch_conflicts`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Fields to compare per record type; types not listed compare every field
    pub compare_fields: BTreeMap<String, Vec<String>>,
    /// Fetches in flight at once; 1 keeps the checks strictly sequential
    pub concurrency: usize,
}

impl BatchOptions {
    pub fn fields_for(&self, record_type: &str) -> Option<&[String]> {
        self.compare_fields.get(record_type).map(Vec::as_slice)
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            compare_fields: BTreeMap::new(),
            concurrency: 1,
        }
    }
}

/// Conflict check result for one pending action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchConflict {
    pub action: PendingAction,
    #[serde(flatten)]
    pub report: ConflictReport,
}

/// Check every pending action against the server before pushing.
///
/// Results come back in the order of `actions`. Actions without `payload.id`
/// are creates and never conflict. A missing server record yields a
/// deleted-on-server conflict. A failed fetch, or an id that cannot be looked
/// up, yields `error: true` so the caller can retry that check later. One
/// failure never aborts the batch.
pub async fn detect_batch_conflicts<F: RecordFetcher>(
    actions: &[PendingAction],
    fetcher: &F,
    options: &BatchOptions,
) -> Vec<BatchConflict> {
    let results = stream::iter(actions)
        .map(|action| check_action(action, fetcher, options))
        .buffered(options.concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    let conflicted = results.iter().filter(|result| result.report.has_conflict).count();
    let failed = results.iter().filter(|result| result.report.error).count();
    tracing::info!(
        actions = actions.len(),
        conflicted,
        failed,
        "Checked pending actions for conflicts"
    );

    results
}

async fn check_action<F: RecordFetcher>(
    action: &PendingAction,
    fetcher: &F,
    options: &BatchOptions,
) -> BatchConflict {
    let report = match action.target() {
        ActionTarget::Create => ConflictReport::none(),
        ActionTarget::Unusable(raw) => {
            tracing::warn!(
                record_type = %action.action_type,
                id = %raw,
                "Pending action id cannot be looked up, skipping conflict check"
            );
            ConflictReport::fetch_failed()
        }
        ActionTarget::Existing(id) => match fetcher
            .fetch_server_record(&action.action_type, &id)
            .await
        {
            Ok(Some(server)) => detect_conflict(
                Some(&action.payload),
                Some(&server),
                options.fields_for(&action.action_type),
            ),
            Ok(None) => {
                tracing::info!(record_type = %action.action_type, %id, "Record deleted on server");
                ConflictReport::deleted_on_server()
            }
            Err(error) => {
                tracing::warn!(
                    record_type = %action.action_type,
                    %id,
                    %error,
                    "Failed to fetch server record for conflict check"
                );
                ConflictReport::fetch_failed()
            }
        },
    };

    BatchConflict {
        action: action.clone(),
        report,
    }
}
