// tests/unit/case_file_tests.rs
use scamwatch_backend::domain::role_model::Role;
use scamwatch_backend::error::AppError;
use scamwatch_backend::shared::dto::case_file_dto::AttachDocumentInput;
use uuid::Uuid;

use crate::common::{fixtures, memory_store::MemoryStore};

#[tokio::test]
async fn test_attach_to_missing_case_is_not_found() {
    let store = MemoryStore::new();
    let facade = store.facade();
    let officer = store.users.add(Role::Officer);

    let err = facade
        .case_files()
        .attach_document(Some(&officer), Uuid::new_v4(), fixtures::document_input())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_only_case_editors_attach_files() {
    let store = MemoryStore::new();
    let facade = store.facade();
    let owner = store.users.add(Role::Officer);
    let other = store.users.add(Role::Officer);
    let admin = store.users.add(Role::Admin);

    let case = facade
        .cases()
        .create(Some(&owner), fixtures::case_input("CASE-7001"))
        .await
        .unwrap();
    facade
        .cases()
        .approve(Some(&admin), case.id, None)
        .await
        .unwrap();

    // 他の警察官は公開済み案件を閲覧できるが添付はできない
    let err = facade
        .case_files()
        .attach_evidence(Some(&other), case.id, fixtures::evidence_input())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // 承認済みの案件は所有者も添付できない
    let err = facade
        .case_files()
        .attach_document(Some(&owner), case.id, fixtures::document_input())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let document = facade
        .case_files()
        .attach_document(Some(&admin), case.id, fixtures::document_input())
        .await
        .unwrap();
    assert_eq!(document.uploaded_by, admin.id);

    let listed = facade
        .case_files()
        .list_documents(Some(&other), case.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_invalid_file_metadata_is_rejected() {
    let store = MemoryStore::new();
    let facade = store.facade();
    let officer = store.users.add(Role::Officer);

    let case = facade
        .cases()
        .create(Some(&officer), fixtures::case_input("CASE-7002"))
        .await
        .unwrap();

    let bad_mime = AttachDocumentInput {
        mime_type: "not a mime".to_string(),
        ..fixtures::document_input()
    };
    let err = facade
        .case_files()
        .attach_document(Some(&officer), case.id, bad_mime)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailure(_)));

    let empty_file = AttachDocumentInput {
        file_size: 0,
        ..fixtures::document_input()
    };
    let err = facade
        .case_files()
        .attach_document(Some(&officer), case.id, empty_file)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailure(_)));
    assert_eq!(store.files.document_count(case.id), 0);
}

#[tokio::test]
async fn test_remove_document_scoped_to_case() {
    let store = MemoryStore::new();
    let facade = store.facade();
    let officer = store.users.add(Role::Officer);

    let case_a = facade
        .cases()
        .create(Some(&officer), fixtures::case_input("CASE-7003"))
        .await
        .unwrap();
    let case_b = facade
        .cases()
        .create(Some(&officer), fixtures::case_input("CASE-7004"))
        .await
        .unwrap();
    let document = facade
        .case_files()
        .attach_document(Some(&officer), case_a.id, fixtures::document_input())
        .await
        .unwrap();

    let err = facade
        .case_files()
        .remove_document(Some(&officer), case_b.id, document.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    facade
        .case_files()
        .remove_document(Some(&officer), case_a.id, document.id)
        .await
        .unwrap();
    assert_eq!(store.files.document_count(case_a.id), 0);
}
