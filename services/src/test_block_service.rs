use crate::error::ServiceError;
use crate::test_group_service::TestGroupService;
use db::models::test_block::Model as TestBlock;
use log::info;
use sea_orm::DatabaseConnection;

/// Splits an uploaded document into scripts on blank lines.
///
/// Chunks are separated by `"\n\n"`; each is trimmed and empty ones dropped,
/// so three or more consecutive newlines still produce a single boundary.
pub fn split_into_blocks(content: &str) -> Vec<String> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct TestBlockService;

impl TestBlockService {
    /// Adds one manually typed script to a group.
    pub async fn add_manual(
        db: &DatabaseConnection,
        group_id: i64,
        commands: &str,
    ) -> Result<TestBlock, ServiceError> {
        let commands = commands.trim();
        if commands.is_empty() {
            return Err(ServiceError::InvalidInput(
                "The test commands cannot be empty.".into(),
            ));
        }
        TestGroupService::get(db, group_id).await?;

        Ok(TestBlock::create(db, group_id, commands).await?)
    }

    /// Adds every block of an uploaded document, all or nothing.
    pub async fn add_from_upload(
        db: &DatabaseConnection,
        group_id: i64,
        bytes: &[u8],
    ) -> Result<Vec<TestBlock>, ServiceError> {
        let content = std::str::from_utf8(bytes).map_err(|_| {
            ServiceError::InvalidInput(
                "The file encoding is not supported. Please upload a UTF-8 encoded file.".into(),
            )
        })?;

        let scripts = split_into_blocks(content);
        if scripts.is_empty() {
            return Err(ServiceError::InvalidInput(
                "The file does not contain valid test blocks.".into(),
            ));
        }
        TestGroupService::get(db, group_id).await?;

        let created = TestBlock::create_many(db, group_id, &scripts).await?;
        info!("Added {} test blocks to group {}", created.len(), group_id);
        Ok(created)
    }

    pub async fn list(
        db: &DatabaseConnection,
        group_id: i64,
    ) -> Result<Vec<TestBlock>, ServiceError> {
        TestGroupService::get(db, group_id).await?;
        Ok(TestBlock::list_for_group(db, group_id, false).await?)
    }

    pub async fn get(db: &DatabaseConnection, block_id: i64) -> Result<TestBlock, ServiceError> {
        TestBlock::get_by_id(db, block_id)
            .await?
            .ok_or(ServiceError::BlockNotFound(block_id))
    }
}
