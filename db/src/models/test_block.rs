use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "test_result_enum")]
#[serde(rename_all = "UPPERCASE")]
pub enum TestResult {
    #[sea_orm(string_value = "PASS")]
    Pass,
    #[sea_orm(string_value = "FAIL")]
    Fail,
}

/// One script of shell command lines, `test_blocks` table.
///
/// `result` and `report_path` stay `None` until the block is first run and are
/// overwritten on every run.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "test_blocks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text")]
    pub commands: String,
    pub group_id: i64,
    pub report_path: Option<String>,
    pub result: Option<TestResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_group::Entity",
        from = "Column::GroupId",
        to = "super::test_group::Column::Id"
    )]
    TestGroup,
}

impl Related<super::test_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn new_block(group_id: i64, commands: &str) -> ActiveModel {
    let now = Utc::now();
    ActiveModel {
        commands: Set(commands.to_string()),
        group_id: Set(group_id),
        report_path: Set(None),
        result: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        group_id: i64,
        commands: &str,
    ) -> Result<Self, DbErr> {
        new_block(group_id, commands).insert(db).await
    }

    /// Inserts every script in one transaction: either all blocks exist
    /// afterwards or none do.
    pub async fn create_many(
        db: &DatabaseConnection,
        group_id: i64,
        scripts: &[String],
    ) -> Result<Vec<Self>, DbErr> {
        let txn = db.begin().await?;
        let mut created = Vec::with_capacity(scripts.len());
        for script in scripts {
            created.push(new_block(group_id, script).insert(&txn).await?);
        }
        txn.commit().await?;
        Ok(created)
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Blocks of a group in ascending id order. With `only_unresolved`, blocks
    /// that already carry a result are skipped.
    pub async fn list_for_group(
        db: &DatabaseConnection,
        group_id: i64,
        only_unresolved: bool,
    ) -> Result<Vec<Self>, DbErr> {
        let mut query = Entity::find().filter(Column::GroupId.eq(group_id));
        if only_unresolved {
            query = query.filter(Column::Result.is_null());
        }
        query.order_by_asc(Column::Id).all(db).await
    }

    /// Block following `after_id` in the same group, if any.
    pub async fn next_in_group(
        db: &DatabaseConnection,
        group_id: i64,
        after_id: i64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::GroupId.eq(group_id))
            .filter(Column::Id.gt(after_id))
            .order_by_asc(Column::Id)
            .one(db)
            .await
    }

    pub async fn update_result(
        db: &DatabaseConnection,
        id: i64,
        result: TestResult,
        report_path: Option<String>,
    ) -> Result<Self, DbErr> {
        let Some(block) = Self::get_by_id(db, id).await? else {
            return Err(DbErr::RecordNotFound(format!("Test block {id} not found")));
        };

        let mut active = block.into_active_model();
        active.result = Set(Some(result));
        active.report_path = Set(report_path);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub async fn clear_result(db: &DatabaseConnection, id: i64) -> Result<Self, DbErr> {
        let Some(block) = Self::get_by_id(db, id).await? else {
            return Err(DbErr::RecordNotFound(format!("Test block {id} not found")));
        };

        let mut active = block.into_active_model();
        active.result = Set(None);
        active.report_path = Set(None);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    /// Unsets `result` and `report_path` on every block of a group in a single
    /// statement. Returns the number of rows touched.
    pub async fn clear_results_for_group(
        db: &DatabaseConnection,
        group_id: i64,
    ) -> Result<u64, DbErr> {
        let res = Entity::update_many()
            .col_expr(Column::Result, Expr::value(Option::<String>::None))
            .col_expr(Column::ReportPath, Expr::value(Option::<String>::None))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::GroupId.eq(group_id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    pub fn is_resolved(&self) -> bool {
        self.result.is_some()
    }
}
