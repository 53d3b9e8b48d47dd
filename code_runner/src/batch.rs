use crate::error::BatchError;
use crate::runner::{RunOutcome, TestRunner};
use db::models::test_block::Model as BlockModel;
use db::models::test_group::Model as GroupModel;
use log::info;
use marker::Verdict;
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;

/// Tally of one batch invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub group_id: i64,
    /// Block ids in the order they were run.
    pub executed: Vec<i64>,
    pub passed: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// True when there was nothing to run.
    pub fn is_empty(&self) -> bool {
        self.executed.is_empty()
    }
}

/// Writes an outcome's verdict and report path onto its block (one commit).
pub async fn record_outcome(
    db: &DatabaseConnection,
    outcome: &RunOutcome,
) -> Result<BlockModel, DbErr> {
    BlockModel::update_result(
        db,
        outcome.block_id,
        outcome.test_result(),
        Some(outcome.report_path_string()),
    )
    .await
}

/// Clears result and report path on every block of the group and commits.
pub async fn reset_group(db: &DatabaseConnection, group_id: i64) -> Result<u64, DbErr> {
    let cleared = BlockModel::clear_results_for_group(db, group_id).await?;
    info!("Reset {} test blocks in group {}", cleared, group_id);
    Ok(cleared)
}

/// Runs a group's blocks through `runner`, strictly one after another.
///
/// Without `restart_all` only blocks that have never been classified are
/// run. With it, every block is reset first and the reset is committed before
/// the first execution. Each result is committed as soon as its block finishes.
pub async fn run_group(
    db: &DatabaseConnection,
    runner: &TestRunner,
    group_id: i64,
    restart_all: bool,
) -> Result<BatchSummary, BatchError> {
    if GroupModel::get_by_id(db, group_id).await?.is_none() {
        return Err(BatchError::GroupNotFound(group_id));
    }

    if restart_all {
        reset_group(db, group_id).await?;
    }

    let blocks = BlockModel::list_for_group(db, group_id, !restart_all).await?;

    let mut summary = BatchSummary {
        group_id,
        ..Default::default()
    };

    if blocks.is_empty() {
        info!("No pending tests found for the selected group.");
        return Ok(summary);
    }

    info!(
        "Running {} test blocks in group {} with the {} classifier",
        blocks.len(),
        group_id,
        runner.classifier_name()
    );

    for block in blocks {
        info!("Running TestBlock ID: {}", block.id);
        let outcome = runner.run_block(&block).await;
        record_outcome(db, &outcome).await?;
        info!("TestBlock ID {} result: {}", block.id, outcome.verdict);

        summary.executed.push(block.id);
        match outcome.verdict {
            Verdict::Pass => summary.passed += 1,
            Verdict::Fail => summary.failed += 1,
        }
    }

    info!("All tests completed.");
    Ok(summary)
}
