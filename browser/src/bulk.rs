//! Actions over a selection of photographs.

use api_client::{ApiClient, ApiClientError};

/// What to do with the remaining ids once one request fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BulkPolicy {
    #[default]
    StopOnFirstFailure,
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOutcome {
    Done,
    Failed(String),
    /// Not attempted because an earlier request failed.
    Skipped,
}

/// One outcome per requested id, in request order. Nothing is rolled back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    pub outcomes: Vec<(u64, BulkOutcome)>,
}

impl BulkReport {
    pub fn succeeded(&self) -> Vec<u64> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == BulkOutcome::Done)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn failed(&self) -> Vec<(u64, &str)> {
        self.outcomes
            .iter()
            .filter_map(|(id, o)| match o {
                BulkOutcome::Failed(msg) => Some((*id, msg.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> Vec<u64> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == BulkOutcome::Skipped)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn first_error(&self) -> Option<&str> {
        self.failed().first().map(|(_, msg)| *msg)
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|(_, o)| *o == BulkOutcome::Done)
    }
}

/// Mark each photograph for deletion, one request at a time.
#[cfg_attr(feature = "trace-spans", tracing::instrument(skip(client)))]
pub async fn delete_photographs(client: &ApiClient, ids: &[u64], policy: BulkPolicy) -> BulkReport {
    let mut report = BulkReport::default();
    let mut stopped = false;
    for &id in ids {
        if stopped {
            report.outcomes.push((id, BulkOutcome::Skipped));
            continue;
        }
        match client.mark_for_deletion(id).await {
            Ok(_) => report.outcomes.push((id, BulkOutcome::Done)),
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to mark photograph for deletion");
                report.outcomes.push((id, BulkOutcome::Failed(e.to_string())));
                stopped = policy == BulkPolicy::StopOnFirstFailure;
            }
        }
    }
    tracing::info!(
        requested = ids.len(),
        done = report.succeeded().len(),
        "Bulk deletion finished"
    );
    report
}

/// Add all `ids` to one album in a single request.
pub async fn add_to_album(
    client: &ApiClient,
    album_id: u64,
    ids: &[u64],
) -> Result<(), ApiClientError> {
    if ids.is_empty() {
        return Ok(());
    }
    client.add_photos_to_album(album_id, ids).await
}

/// Remove all `ids` from one album in a single request.
pub async fn remove_from_album(
    client: &ApiClient,
    album_id: u64,
    ids: &[u64],
) -> Result<(), ApiClientError> {
    if ids.is_empty() {
        return Ok(());
    }
    client.remove_photos_from_album(album_id, ids).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_accessors() {
        let report = BulkReport {
            outcomes: vec![
                (1, BulkOutcome::Done),
                (2, BulkOutcome::Failed("Not Found".into())),
                (3, BulkOutcome::Skipped),
            ],
        };
        assert_eq!(report.succeeded(), vec![1]);
        assert_eq!(report.failed(), vec![(2, "Not Found")]);
        assert_eq!(report.skipped(), vec![3]);
        assert_eq!(report.first_error(), Some("Not Found"));
        assert!(!report.is_complete());
    }
}
