// tests/integration/moderated_repository_tests.rs
use chrono::{Duration, Utc};
use scamwatch_backend::domain::alert_model::{self, AlertSeverity};
use scamwatch_backend::domain::moderated_record::ModerationState;
use scamwatch_backend::domain::moderation_status::ModerationStatus;
use scamwatch_backend::domain::record_filter::{ListingPredicate, RecordFilter, VisibilityScope};
use scamwatch_backend::domain::role_change_request_model;
use scamwatch_backend::domain::role_model::Role;
use scamwatch_backend::error::AppError;
use scamwatch_backend::repository::moderated_repository::{
    ModeratedRepository, SeaOrmModeratedRepository,
};
use scamwatch_backend::repository::user_repository::SeaOrmUserRepository;
use uuid::Uuid;

use crate::common;

fn alert(created_by: Uuid, status: ModerationStatus, expires_in: Option<Duration>) -> alert_model::Model {
    let now = Utc::now();
    alert_model::Model {
        id: Uuid::new_v4(),
        created_by,
        title: "Parcel fee scam".to_string(),
        description: "Fake courier asks for a redelivery fee".to_string(),
        severity: AlertSeverity::Medium,
        region: None,
        expires_at: expires_in.map(|d| now + d),
        status,
        moderator_id: None,
        moderator_notes: None,
        is_active: true,
        created_at: now,
        updated_at: now,
        version: 1,
    }
}

fn role_request(user_id: Uuid) -> role_change_request_model::Model {
    let now = Utc::now();
    let state = ModerationState::pending();
    role_change_request_model::Model {
        id: Uuid::new_v4(),
        user_id,
        requested_role: Role::Officer,
        reason: "Transferred to the cybercrime desk".to_string(),
        status: state.status,
        moderator_id: state.moderator_id,
        moderator_notes: state.moderator_notes,
        is_active: state.is_active,
        created_at: now,
        updated_at: now,
        version: 1,
    }
}

#[tokio::test]
async fn test_compare_and_set_rejects_stale_status() {
    common::init_test_env();
    let db = common::db::TestDatabase::new().await;
    let repo = SeaOrmModeratedRepository::<alert_model::Entity>::new(db.connection.clone());
    let owner = Uuid::new_v4();

    let record = repo
        .insert(alert(owner, ModerationStatus::Pending, None))
        .await
        .unwrap();

    let mut approved = record.clone();
    approved.status = ModerationStatus::Approved;
    repo.compare_and_set(approved.clone(), ModerationStatus::Pending)
        .await
        .unwrap();

    // 読み取り時の pending を前提にした書き込みは競合になる
    let mut rejected = record.clone();
    rejected.status = ModerationStatus::Rejected;
    rejected.moderator_notes = Some("late".to_string());
    let err = repo
        .compare_and_set(rejected, ModerationStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let stored = repo.find_by_id(record.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ModerationStatus::Approved);
    assert_eq!(stored.moderator_notes, None);
}

#[tokio::test]
async fn test_published_listing_excludes_expired_and_inactive() {
    let db = common::db::TestDatabase::new().await;
    let repo = SeaOrmModeratedRepository::<alert_model::Entity>::new(db.connection.clone());
    let owner = Uuid::new_v4();

    let live = repo
        .insert(alert(owner, ModerationStatus::Approved, Some(Duration::days(7))))
        .await
        .unwrap();
    let no_expiry = repo
        .insert(alert(owner, ModerationStatus::Approved, None))
        .await
        .unwrap();
    repo.insert(alert(owner, ModerationStatus::Approved, Some(-Duration::days(1))))
        .await
        .unwrap();
    repo.insert(alert(owner, ModerationStatus::Pending, None))
        .await
        .unwrap();
    let mut inactive = alert(owner, ModerationStatus::Approved, None);
    inactive.is_active = false;
    repo.insert(inactive).await.unwrap();

    let predicate =
        ListingPredicate::new(VisibilityScope::Published, RecordFilter::default(), Utc::now());
    let listed = repo.find_matching(&predicate).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|a| a.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&live.id));
    assert!(ids.contains(&no_expiry.id));

    // 自分のもの OR 公開済み
    let predicate = ListingPredicate::new(
        VisibilityScope::OwnOrPublished(owner),
        RecordFilter::default(),
        Utc::now(),
    );
    assert_eq!(repo.find_matching(&predicate).await.unwrap().len(), 5);

    let predicate = ListingPredicate::new(
        VisibilityScope::OwnOrPublished(Uuid::new_v4()),
        RecordFilter::default().with_status(ModerationStatus::Pending),
        Utc::now(),
    );
    assert!(repo.find_matching(&predicate).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_if_unchanged_is_conditional() {
    let db = common::db::TestDatabase::new().await;
    let repo = SeaOrmModeratedRepository::<alert_model::Entity>::new(db.connection.clone());

    let record = repo
        .insert(alert(Uuid::new_v4(), ModerationStatus::Approved, None))
        .await
        .unwrap();

    let err = repo
        .delete_if_unchanged(record.id, ModerationStatus::Pending, record.version)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // ステータスが同じでも版が古ければ削除しない
    let err = repo
        .delete_if_unchanged(record.id, ModerationStatus::Approved, record.version + 1)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert!(repo.find_by_id(record.id).await.unwrap().is_some());

    repo.delete_if_unchanged(record.id, ModerationStatus::Approved, record.version)
        .await
        .unwrap();
    assert!(repo.find_by_id(record.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_stale_write_with_same_status_conflicts() {
    let db = common::db::TestDatabase::new().await;
    let repo = SeaOrmModeratedRepository::<alert_model::Entity>::new(db.connection.clone());

    let record = repo
        .insert(alert(Uuid::new_v4(), ModerationStatus::Approved, None))
        .await
        .unwrap();
    let stale = repo.find_by_id(record.id).await.unwrap().unwrap();

    // 先に無効化が書き込まれる（ステータスは approved のまま）
    let mut deactivated = repo.find_by_id(record.id).await.unwrap().unwrap();
    deactivated.is_active = false;
    let deactivated = repo
        .compare_and_set(deactivated, ModerationStatus::Approved)
        .await
        .unwrap();
    assert_eq!(deactivated.version, record.version + 1);

    // 古い読み取りに基づく編集は無効化を上書きできない
    let mut edited = stale;
    edited.title = "Parcel fee scam (revised)".to_string();
    let err = repo
        .compare_and_set(edited, ModerationStatus::Approved)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let stored = repo.find_by_id(record.id).await.unwrap().unwrap();
    assert!(!stored.is_active);
    assert_eq!(stored.title, "Parcel fee scam");
    assert_eq!(stored.version, deactivated.version);
}

#[tokio::test]
async fn test_single_pending_request_enforced_by_index() {
    let db = common::db::TestDatabase::new().await;
    let users = SeaOrmUserRepository::new(db.connection.clone());
    let repo =
        SeaOrmModeratedRepository::<role_change_request_model::Entity>::new(db.connection.clone());

    let user = users
        .create("applicant@scamwatch.test", "Applicant", Role::User)
        .await
        .unwrap();

    repo.insert(role_request(user.id)).await.unwrap();
    assert_eq!(repo.count_pending_for_owner(user.id).await.unwrap(), 1);

    // アプリ側のチェックをすり抜けても一意インデックスで弾かれる
    let err = repo.insert(role_request(user.id)).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
    assert_eq!(repo.count_pending_for_owner(user.id).await.unwrap(), 1);
}
