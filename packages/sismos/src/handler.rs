//! Run orchestration: fetch → extract → replace, mapped to an outcome.

use tracing::{error, info};

use crate::extract::extract_records;
use crate::fetch::ReportFetcher;
use crate::store::SnapshotStore;
use crate::types::{ResponseBody, RunOutcome, SuccessBody};

/// Execute one ETL pass.
///
/// Outcome mapping:
/// - fetch failure → 500, store untouched;
/// - no recognizable table → 404, store untouched;
/// - store failure → 500 (the snapshot may be lost or partial, see
///   [`SnapshotStore`]);
/// - success → 200 with count and records.
///
/// There is no partial-success status: a run that extracted good data but
/// failed to persist it reports the same way as any other store failure.
pub async fn run(fetcher: &dyn ReportFetcher, store: &dyn SnapshotStore) -> RunOutcome {
    let html = match fetcher.fetch().await {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, "failed to fetch the IGP report page");
            return RunOutcome {
                status_code: 500,
                body: ResponseBody::Error(format!("Error conectando a IGP: {e}")),
            };
        }
    };

    let records = match extract_records(&html) {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "seismic table missing from fetched markup");
            return RunOutcome {
                status_code: 404,
                body: ResponseBody::Error(
                    "Estructura de web IGP cambió, tabla no encontrada.".to_string(),
                ),
            };
        }
    };

    match store.replace_all(&records).await {
        Ok(summary) => {
            info!(
                purged = summary.purged,
                cantidad = records.len(),
                "snapshot replaced"
            );
            RunOutcome {
                status_code: 200,
                body: ResponseBody::Success(SuccessBody {
                    message: "Scraping exitoso".to_string(),
                    cantidad: records.len(),
                    data: records,
                }),
            }
        }
        Err(e) => {
            error!(error = %e, "failed to persist snapshot");
            RunOutcome {
                status_code: 500,
                body: ResponseBody::Error(format!("Error guardando snapshot: {e}")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::store::{FailPhase, MemoryStore};
    use async_trait::async_trait;

    struct CannedFetcher(Result<String, ()>);

    #[async_trait]
    impl ReportFetcher for CannedFetcher {
        async fn fetch(&self) -> Result<String, FetchError> {
            match &self.0 {
                Ok(html) => Ok(html.clone()),
                Err(()) => Err(FetchError::Status {
                    url: "http://fixture.invalid/".to_string(),
                    status: 503,
                }),
            }
        }
    }

    const FIXTURE: &str = "<table><tbody>\
        <tr><td>IGP/CENSIS/RS 2026-0001</td><td>Lima</td>\
        <td>01/01/2026 00:00</td><td>4.5</td></tr>\
        </tbody></table>";

    #[tokio::test]
    async fn test_success_maps_to_200_with_payload() {
        let fetcher = CannedFetcher(Ok(FIXTURE.to_string()));
        let store = MemoryStore::new();

        let outcome = run(&fetcher, &store).await;

        assert_eq!(outcome.status_code, 200);
        assert_eq!(store.len(), 1);
        match outcome.body {
            ResponseBody::Success(body) => {
                assert_eq!(body.message, "Scraping exitoso");
                assert_eq!(body.cantidad, 1);
                assert_eq!(body.data[0].location, "Lima");
            }
            ResponseBody::Error(e) => panic!("expected success body, got {e}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_maps_to_500_and_skips_store() {
        let fetcher = CannedFetcher(Err(()));
        let store = MemoryStore::new();

        let outcome = run(&fetcher, &store).await;

        assert_eq!(outcome.status_code, 500);
        assert_eq!(store.replace_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_table_maps_to_404_and_skips_store() {
        let fetcher = CannedFetcher(Ok("<html><body>sin tabla</body></html>".to_string()));
        let store = MemoryStore::new();

        let outcome = run(&fetcher, &store).await;

        assert_eq!(outcome.status_code, 404);
        assert_eq!(store.replace_calls(), 0);
        match outcome.body {
            ResponseBody::Error(msg) => assert!(msg.contains("tabla no encontrada")),
            ResponseBody::Success(_) => panic!("expected error body"),
        }
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_500() {
        let fetcher = CannedFetcher(Ok(FIXTURE.to_string()));
        let store = MemoryStore::failing_at(FailPhase::Load);

        let outcome = run(&fetcher, &store).await;

        assert_eq!(outcome.status_code, 500);
        match outcome.body {
            ResponseBody::Error(msg) => assert!(msg.contains("Error guardando snapshot")),
            ResponseBody::Success(_) => panic!("expected error body"),
        }
    }
}
