// tests/integration/policy_flow_tests.rs
use scamwatch_backend::domain::case_document_model;
use scamwatch_backend::domain::case_evidence_model;
use scamwatch_backend::domain::case_model;
use scamwatch_backend::domain::moderation_status::ModerationStatus;
use scamwatch_backend::domain::record_filter::RecordFilter;
use scamwatch_backend::domain::role_model::{Principal, Role};
use scamwatch_backend::domain::user_model;
use scamwatch_backend::error::AppError;
use scamwatch_backend::repository::case_cascade_repository::{
    CascadeRepository, SeaOrmCascadeRepository,
};
use scamwatch_backend::repository::user_repository::SeaOrmUserRepository;
use scamwatch_backend::service::policy_facade::PolicyFacade;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::common::{self, fixtures};

async fn principal(db: &DatabaseConnection, email: &str, role: Role) -> Principal {
    SeaOrmUserRepository::new(db.clone())
        .create(email, email, role)
        .await
        .unwrap()
        .to_principal()
        .unwrap()
}

#[tokio::test]
async fn test_report_workflow_against_database() {
    common::init_test_env();
    let db = common::db::TestDatabase::new().await;
    let facade = PolicyFacade::from_db(db.connection.clone());
    let user = principal(&db.connection, "reporter@scamwatch.test", Role::User).await;
    let admin = principal(&db.connection, "admin@scamwatch.test", Role::Admin).await;

    let report = facade
        .reports()
        .create(Some(&user), fixtures::report_input())
        .await
        .unwrap();
    facade
        .reports()
        .reject(Some(&admin), report.id, "insufficient evidence")
        .await
        .unwrap();
    let approved = facade
        .reports()
        .approve(Some(&admin), report.id, None)
        .await
        .unwrap();
    assert_eq!(approved.moderator_notes, None);

    let stored = facade.reports().get(Some(&user), report.id).await.unwrap();
    assert_eq!(stored.status, ModerationStatus::Approved);
    assert_eq!(stored.moderator_id, Some(admin.id));
    assert_eq!(stored.amount_lost_cents, Some(4_500));

    let listed = facade
        .reports()
        .list(Some(&user), RecordFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_duplicate_case_number_is_validation_error() {
    let db = common::db::TestDatabase::new().await;
    let facade = PolicyFacade::from_db(db.connection.clone());
    let officer = principal(&db.connection, "officer@scamwatch.test", Role::Officer).await;

    facade
        .cases()
        .create(Some(&officer), fixtures::case_input("CASE-9001"))
        .await
        .unwrap();
    let err = facade
        .cases()
        .create(Some(&officer), fixtures::case_input("CASE-9001"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_case_cascade_in_transaction() {
    let db = common::db::TestDatabase::new().await;
    let facade = PolicyFacade::from_db(db.connection.clone());
    let officer = principal(&db.connection, "officer2@scamwatch.test", Role::Officer).await;

    let case = facade
        .cases()
        .create(Some(&officer), fixtures::case_input("CASE-9002"))
        .await
        .unwrap();
    for _ in 0..2 {
        facade
            .case_files()
            .attach_document(Some(&officer), case.id, fixtures::document_input())
            .await
            .unwrap();
    }
    facade
        .case_files()
        .attach_evidence(Some(&officer), case.id, fixtures::evidence_input())
        .await
        .unwrap();

    // 期待ステータスが違えば子レコードの削除ごと取り消される
    let cascade = SeaOrmCascadeRepository::new(db.connection.clone());
    let err = cascade
        .delete_case_with_children(case.id, ModerationStatus::Approved, case.version)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(
        case_document_model::Entity::find()
            .count(&db.connection)
            .await
            .unwrap(),
        2
    );
    assert_eq!(
        case_evidence_model::Entity::find()
            .count(&db.connection)
            .await
            .unwrap(),
        1
    );

    let outcome = facade
        .cases()
        .delete(Some(&officer), case.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.documents_removed, 2);
    assert_eq!(outcome.evidence_removed, 1);
    assert!(case_model::Entity::find_by_id(case.id)
        .one(&db.connection)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        case_document_model::Entity::find()
            .count(&db.connection)
            .await
            .unwrap(),
        0
    );
}

async fn row_counts(db: &DatabaseConnection) -> (u64, u64, u64) {
    (
        case_model::Entity::find().count(db).await.unwrap(),
        case_document_model::Entity::find().count(db).await.unwrap(),
        case_evidence_model::Entity::find().count(db).await.unwrap(),
    )
}

#[tokio::test]
async fn test_child_delete_failure_rolls_back_cascade() {
    common::init_test_env();
    let db = common::db::TestDatabase::new().await;
    let facade = PolicyFacade::from_db(db.connection.clone());
    let officer = principal(&db.connection, "officer3@scamwatch.test", Role::Officer).await;

    let case = facade
        .cases()
        .create(Some(&officer), fixtures::case_input("CASE-9003"))
        .await
        .unwrap();
    for _ in 0..2 {
        facade
            .case_files()
            .attach_document(Some(&officer), case.id, fixtures::document_input())
            .await
            .unwrap();
    }
    facade
        .case_files()
        .attach_evidence(Some(&officer), case.id, fixtures::evidence_input())
        .await
        .unwrap();

    // 証拠品の削除後に書類の削除だけを失敗させる
    db.connection
        .execute_unprepared(
            "CREATE TRIGGER block_document_delete BEFORE DELETE ON case_documents \
             BEGIN SELECT RAISE(ABORT, 'document delete blocked'); END;",
        )
        .await
        .unwrap();

    let err = facade
        .cases()
        .delete(Some(&officer), case.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CascadeFailure(_)));
    assert_eq!(row_counts(&db.connection).await, (1, 2, 1));

    db.connection
        .execute_unprepared("DROP TRIGGER block_document_delete;")
        .await
        .unwrap();
    let outcome = facade
        .cases()
        .delete(Some(&officer), case.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.documents_removed, 2);
    assert_eq!(row_counts(&db.connection).await, (0, 0, 0));
}

#[tokio::test]
async fn test_role_change_approval_updates_user() {
    let db = common::db::TestDatabase::new().await;
    let facade = PolicyFacade::from_db(db.connection.clone());
    let user = principal(&db.connection, "applicant2@scamwatch.test", Role::User).await;
    let admin = principal(&db.connection, "admin2@scamwatch.test", Role::Admin).await;

    let request = facade
        .create_role_change_request(Some(&user), fixtures::role_request_input())
        .await
        .unwrap();
    let err = facade
        .create_role_change_request(Some(&user), fixtures::role_request_input())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    facade
        .approve_role_change_request(Some(&admin), request.id, None)
        .await
        .unwrap();

    let stored = user_model::Entity::find_by_id(user.id)
        .one(&db.connection)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.role, Role::Officer);
    let refreshed = facade.resolve_principal(user.id).await.unwrap().unwrap();
    assert_eq!(refreshed.role, Role::Officer);
}

#[tokio::test]
async fn test_failed_role_grant_rolls_back_approval() {
    let db = common::db::TestDatabase::new().await;
    let facade = PolicyFacade::from_db(db.connection.clone());
    let user = principal(&db.connection, "applicant3@scamwatch.test", Role::User).await;
    let admin = principal(&db.connection, "admin4@scamwatch.test", Role::Admin).await;

    let request = facade
        .create_role_change_request(Some(&user), fixtures::role_request_input())
        .await
        .unwrap();

    // 申請の書き込み後、ユーザーの更新だけを失敗させる
    db.connection
        .execute_unprepared(
            "CREATE TRIGGER block_role_update BEFORE UPDATE ON users \
             BEGIN SELECT RAISE(ABORT, 'role update blocked'); END;",
        )
        .await
        .unwrap();
    let err = facade
        .approve_role_change_request(Some(&admin), request.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DbErr(_)));

    let stored = facade
        .role_requests()
        .get(Some(&admin), request.id)
        .await
        .unwrap();
    assert_eq!(stored.status, ModerationStatus::Pending);
    assert_eq!(stored.moderator_id, None);
    assert_eq!(stored.version, request.version);
    let user_row = user_model::Entity::find_by_id(user.id)
        .one(&db.connection)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user_row.role, Role::User);

    // 障害が解消すれば同じ申請を承認できる
    db.connection
        .execute_unprepared("DROP TRIGGER block_role_update;")
        .await
        .unwrap();
    let approved = facade
        .approve_role_change_request(Some(&admin), request.id, None)
        .await
        .unwrap();
    assert_eq!(approved.version, request.version + 1);
}

#[tokio::test]
async fn test_approved_role_request_cannot_be_moderated_again() {
    let db = common::db::TestDatabase::new().await;
    let facade = PolicyFacade::from_db(db.connection.clone());
    let user = principal(&db.connection, "applicant4@scamwatch.test", Role::User).await;
    let admin = principal(&db.connection, "admin5@scamwatch.test", Role::Admin).await;

    let request = facade
        .create_role_change_request(Some(&user), fixtures::role_request_input())
        .await
        .unwrap();
    facade
        .approve_role_change_request(Some(&admin), request.id, None)
        .await
        .unwrap();

    let err = facade
        .role_requests()
        .reject(Some(&admin), request.id, "Granted by mistake")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let err = facade
        .approve_role_change_request(Some(&admin), request.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let stored = user_model::Entity::find_by_id(user.id)
        .one(&db.connection)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.role, Role::Officer);
    let request = facade
        .role_requests()
        .get(Some(&admin), request.id)
        .await
        .unwrap();
    assert_eq!(request.status, ModerationStatus::Approved);
}

#[tokio::test]
async fn test_comments_follow_alert_visibility() {
    let db = common::db::TestDatabase::new().await;
    let facade = PolicyFacade::from_db(db.connection.clone());
    let admin = principal(&db.connection, "admin3@scamwatch.test", Role::Admin).await;
    let user = principal(&db.connection, "reader@scamwatch.test", Role::User).await;

    let alert = facade
        .alerts()
        .create(Some(&admin), fixtures::alert_input())
        .await
        .unwrap();
    facade
        .create_comment(Some(&user), fixtures::comment_input(alert.id))
        .await
        .unwrap();

    let comments = facade
        .comments()
        .list(None, RecordFilter::default().with_parent(alert.id))
        .await;
    // コメントは公開読み取りの対象外
    assert!(matches!(comments, Err(AppError::Unauthenticated(_))));

    let comments = facade
        .comments()
        .list(Some(&user), RecordFilter::default().with_parent(alert.id))
        .await
        .unwrap();
    assert_eq!(comments.len(), 1);

    // アラート削除でコメントも消える
    facade.alerts().delete(Some(&admin), alert.id).await.unwrap();
    let comments = facade
        .comments()
        .list(Some(&admin), RecordFilter::default())
        .await
        .unwrap();
    assert!(comments.is_empty());
}
