use db::models::test_block::{Model as BlockModel, TestResult};
use db::models::test_group::Model as GroupModel;
use db::test_utils::setup_test_db;
use sea_orm::SqlErr;

#[tokio::test]
async fn duplicate_group_name_is_a_unique_violation() {
    let db = setup_test_db().await;
    GroupModel::create(&db, "builtins").await.expect("first insert");

    let err = GroupModel::create(&db, "builtins")
        .await
        .expect_err("second insert must fail");
    assert!(matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));
    assert_eq!(GroupModel::get_all(&db).await.unwrap().len(), 1);
    assert!(GroupModel::get_by_name(&db, "builtins").await.unwrap().is_some());
    assert!(GroupModel::get_by_name(&db, "pipes").await.unwrap().is_none());
}

#[tokio::test]
async fn list_for_group_filters_unresolved_in_id_order() {
    let db = setup_test_db().await;
    let group = GroupModel::create(&db, "pipes").await.unwrap();
    let other = GroupModel::create(&db, "redirections").await.unwrap();

    let b1 = BlockModel::create(&db, group.id, "ls | wc -l").await.unwrap();
    let b2 = BlockModel::create(&db, group.id, "echo hi | cat").await.unwrap();
    let b3 = BlockModel::create(&db, group.id, "cat | cat | ls").await.unwrap();
    BlockModel::create(&db, other.id, "echo > out").await.unwrap();

    BlockModel::update_result(&db, b2.id, TestResult::Pass, Some("r/block_2.log".into()))
        .await
        .unwrap();

    let pending: Vec<i64> = BlockModel::list_for_group(&db, group.id, true)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(pending, vec![b1.id, b3.id]);

    let all = BlockModel::list_for_group(&db, group.id, false).await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn update_and_clear_result_round_trip_through_store() {
    let db = setup_test_db().await;
    let group = GroupModel::create(&db, "env").await.unwrap();
    let block = BlockModel::create(&db, group.id, "export A=1\necho $A").await.unwrap();
    assert!(!block.is_resolved());
    assert_eq!(block.report_path, None);

    let updated = BlockModel::update_result(
        &db,
        block.id,
        TestResult::Fail,
        Some("valgrind_reports/block_1.log".into()),
    )
    .await
    .unwrap();
    assert_eq!(updated.result, Some(TestResult::Fail));

    let reloaded = BlockModel::get_by_id(&db, block.id).await.unwrap().unwrap();
    assert_eq!(reloaded.result, Some(TestResult::Fail));
    assert_eq!(reloaded.report_path.as_deref(), Some("valgrind_reports/block_1.log"));

    let cleared = BlockModel::clear_result(&db, block.id).await.unwrap();
    assert_eq!(cleared.result, None);
    assert_eq!(cleared.report_path, None);
}

#[tokio::test]
async fn clear_results_for_group_only_touches_that_group() {
    let db = setup_test_db().await;
    let group = GroupModel::create(&db, "quotes").await.unwrap();
    let other = GroupModel::create(&db, "signals").await.unwrap();

    let a = BlockModel::create(&db, group.id, "echo 'a'").await.unwrap();
    let b = BlockModel::create(&db, group.id, "echo \"b\"").await.unwrap();
    let c = BlockModel::create(&db, other.id, "sleep 1").await.unwrap();
    for id in [a.id, b.id, c.id] {
        BlockModel::update_result(&db, id, TestResult::Pass, Some(format!("block_{id}.log")))
            .await
            .unwrap();
    }

    let touched = BlockModel::clear_results_for_group(&db, group.id).await.unwrap();
    assert_eq!(touched, 2);

    let cleared = BlockModel::list_for_group(&db, group.id, true).await.unwrap();
    assert_eq!(cleared.len(), 2);
    assert!(cleared.iter().all(|b| b.report_path.is_none()));

    let untouched = BlockModel::get_by_id(&db, c.id).await.unwrap().unwrap();
    assert_eq!(untouched.result, Some(TestResult::Pass));
}

#[tokio::test]
async fn create_many_and_next_in_group() {
    let db = setup_test_db().await;
    let group = GroupModel::create(&db, "heredoc").await.unwrap();
    let scripts = vec!["cat << EOF\nx\nEOF".to_string(), "ls".to_string()];

    let created = BlockModel::create_many(&db, group.id, &scripts).await.unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0].commands, scripts[0]);

    let next = BlockModel::next_in_group(&db, group.id, created[0].id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(next.id, created[1].id);
    assert!(
        BlockModel::next_in_group(&db, group.id, created[1].id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn update_result_on_missing_block_is_record_not_found() {
    let db = setup_test_db().await;
    let err = BlockModel::update_result(&db, 404, TestResult::Pass, None)
        .await
        .unwrap_err();
    assert!(matches!(err, sea_orm::DbErr::RecordNotFound(_)));
}
