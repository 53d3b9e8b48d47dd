use crate::error::ServiceError;
use crate::test_block_service::TestBlockService;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::io::ErrorKind;
use util::valgrind_report::{LeakSummary, ReportFilters, ValgrindReport};

/// Everything the report page shows for one block.
#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub block_id: i64,
    pub group_id: i64,
    pub report_path: String,
    pub summary: LeakSummary,
    pub still_reachable: Vec<String>,
    pub filtered_errors: Vec<String>,
    pub content: String,
}

pub struct ReportService;

impl ReportService {
    /// Reads and parses the stored report of a block.
    ///
    /// A block that was never run, or whose report file has since been
    /// deleted, is [`ServiceError::MissingReport`].
    pub async fn load(
        db: &DatabaseConnection,
        block_id: i64,
        filters: &ReportFilters,
    ) -> Result<ReportView, ServiceError> {
        let block = TestBlockService::get(db, block_id).await?;

        let Some(report_path) = block.report_path else {
            return Err(ServiceError::MissingReport(
                "No report available for this test block.".into(),
            ));
        };

        let content = match tokio::fs::read(&report_path).await {
            Ok(raw) => String::from_utf8_lossy(&raw).into_owned(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ServiceError::MissingReport(format!(
                    "The report file '{}' does not exist.",
                    report_path
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let parsed = ValgrindReport::parse(&content, filters);
        Ok(ReportView {
            block_id,
            group_id: block.group_id,
            report_path,
            summary: parsed.summary,
            still_reachable: parsed.still_reachable,
            filtered_errors: parsed.filtered_errors,
            content,
        })
    }
}
