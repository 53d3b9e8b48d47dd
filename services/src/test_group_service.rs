use crate::error::ServiceError;
use db::models::test_group::Model as TestGroup;
use log::info;
use sea_orm::{DatabaseConnection, SqlErr};
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, Validate)]
pub struct CreateTestGroup {
    #[validate(length(
        min = 1,
        max = 80,
        message = "The group name cannot be empty or longer than 80 characters."
    ))]
    pub name: String,
}

impl CreateTestGroup {
    pub fn new(raw_name: &str) -> Self {
        Self {
            name: raw_name.trim().to_string(),
        }
    }
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub struct TestGroupService;

impl TestGroupService {
    /// Creates a group from a raw, untrimmed name.
    pub async fn create(db: &DatabaseConnection, raw_name: &str) -> Result<TestGroup, ServiceError> {
        let params = CreateTestGroup::new(raw_name);
        params
            .validate()
            .map_err(|e| ServiceError::InvalidInput(format_validation_errors(&e)))?;

        match TestGroup::create(db, &params.name).await {
            Ok(group) => {
                info!("Created test group {} ({})", group.id, group.name);
                Ok(group)
            }
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(ServiceError::DuplicateGroupName(params.name))
                }
                _ => Err(e.into()),
            },
        }
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<TestGroup>, ServiceError> {
        Ok(TestGroup::get_all(db).await?)
    }

    pub async fn get(db: &DatabaseConnection, group_id: i64) -> Result<TestGroup, ServiceError> {
        TestGroup::get_by_id(db, group_id)
            .await?
            .ok_or(ServiceError::GroupNotFound(group_id))
    }
}
