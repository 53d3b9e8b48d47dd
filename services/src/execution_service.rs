use crate::error::ServiceError;
use crate::test_block_service::TestBlockService;
use code_runner::{RunOutcome, TestRunner, record_outcome};
use db::models::test_block::Model as TestBlock;
use log::info;
use sea_orm::DatabaseConnection;

/// Result of running a single block on request.
#[derive(Debug, Clone)]
pub struct SingleRunView {
    pub block: TestBlock,
    pub outcome: RunOutcome,
    /// Next block of the same group, for "run next" navigation.
    pub next_block_id: Option<i64>,
}

pub struct ExecutionService;

impl ExecutionService {
    /// Runs one block, stores its verdict and report path, and looks up the
    /// block that follows it in its group.
    ///
    /// Callers must not run the same block id concurrently; the report file
    /// is shared between runs of a block.
    pub async fn run_single_block(
        db: &DatabaseConnection,
        runner: &TestRunner,
        block_id: i64,
    ) -> Result<SingleRunView, ServiceError> {
        let block = TestBlockService::get(db, block_id).await?;

        let outcome = runner.run_block(&block).await;
        let block = record_outcome(db, &outcome).await?;
        info!("TestBlock ID {} result: {}", block.id, outcome.verdict);

        let next_block_id = TestBlock::next_in_group(db, block.group_id, block.id)
            .await?
            .map(|b| b.id);

        Ok(SingleRunView {
            block,
            outcome,
            next_block_id,
        })
    }
}
