// tests/common/memory_store.rs

use async_trait::async_trait;
use chrono::Utc;
use scamwatch_backend::domain::alert_model::Model as Alert;
use scamwatch_backend::domain::case_document_model::Model as CaseDocument;
use scamwatch_backend::domain::case_evidence_model::Model as CaseEvidence;
use scamwatch_backend::domain::case_model::Model as LegalCase;
use scamwatch_backend::domain::comment_model::Model as Comment;
use scamwatch_backend::domain::moderated_record::ModeratedRecord;
use scamwatch_backend::domain::moderation_status::ModerationStatus;
use scamwatch_backend::domain::record_filter::ListingPredicate;
use scamwatch_backend::domain::report_model::Model as Report;
use scamwatch_backend::domain::role_change_request_model::Model as RoleChangeRequest;
use scamwatch_backend::domain::role_model::{Principal, Role};
use scamwatch_backend::domain::user_model::Model as User;
use scamwatch_backend::error::{AppError, AppResult};
use scamwatch_backend::repository::case_cascade_repository::{CascadeOutcome, CascadeRepository};
use scamwatch_backend::repository::case_file_repository::CaseFileRepository;
use scamwatch_backend::repository::moderated_repository::ModeratedRepository;
use scamwatch_backend::repository::role_grant_repository::RoleGrantRepository;
use scamwatch_backend::repository::user_repository::UserRepository;
use scamwatch_backend::service::policy_facade::{CoreRepositories, PolicyFacade};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;
use uuid::Uuid;

fn conflict<M: ModeratedRecord>(id: Uuid) -> AppError {
    AppError::Conflict(format!("{} {} was modified concurrently", M::KIND, id))
}

// ステータスと版番号が読み取り時のままなら版を進めて書き込む
fn write_if_unchanged<M: ModeratedRecord>(
    records: &mut HashMap<Uuid, M>,
    mut record: M,
    expected: ModerationStatus,
) -> AppResult<M> {
    match records.get(&record.id()) {
        Some(current) if current.status() == expected && current.version() == record.version() => {
            record.set_version(record.version() + 1);
            records.insert(record.id(), record.clone());
            Ok(record)
        }
        _ => Err(conflict::<M>(record.id())),
    }
}

/// テスト用のインメモリ・モデレーションリポジトリ
pub struct MemoryRepository<M> {
    records: Mutex<HashMap<Uuid, M>>,
    // 指定した回数の find_by_id を同時に揃えるためのバリア
    race: Mutex<Option<(Arc<Barrier>, usize)>>,
}

impl<M: ModeratedRecord> MemoryRepository<M> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            race: Mutex::new(None),
        }
    }

    /// 次の `readers` 回の読み取りを全員が揃うまで待たせる
    pub fn hold_reads(&self, readers: usize) {
        *self.race.lock().unwrap() = Some((Arc::new(Barrier::new(readers)), readers));
    }

    pub fn seed(&self, record: M) {
        self.records.lock().unwrap().insert(record.id(), record);
    }

    pub fn stored(&self, id: Uuid) -> Option<M> {
        self.records.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn with_records<R>(&self, f: impl FnOnce(&mut HashMap<Uuid, M>) -> R) -> R {
        let mut records = self.records.lock().unwrap();
        f(&mut records)
    }

    fn take_barrier(&self) -> Option<Arc<Barrier>> {
        let mut race = self.race.lock().unwrap();
        let (barrier, remaining) = race.as_mut()?;
        let barrier = barrier.clone();
        *remaining -= 1;
        if *remaining == 0 {
            *race = None;
        }
        Some(barrier)
    }
}

#[async_trait]
impl<M: ModeratedRecord> ModeratedRepository<M> for MemoryRepository<M> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<M>> {
        let found = self.stored(id);
        if let Some(barrier) = self.take_barrier() {
            barrier.wait().await;
        }
        Ok(found)
    }

    async fn find_matching(&self, predicate: &ListingPredicate) -> AppResult<Vec<M>> {
        let mut matched: Vec<M> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|record| predicate.matches(*record))
            .cloned()
            .collect();
        matched.sort_by_key(|record| std::cmp::Reverse(record.created_at()));

        Ok(matched
            .into_iter()
            .skip(predicate.filter.page_offset() as usize)
            .take(predicate.filter.page_size() as usize)
            .collect())
    }

    async fn insert(&self, record: M) -> AppResult<M> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.id()) {
            return Err(AppError::ValidationError(format!(
                "Duplicate value: {}",
                record.id()
            )));
        }
        records.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn compare_and_set(&self, record: M, expected: ModerationStatus) -> AppResult<M> {
        self.with_records(|records| write_if_unchanged(records, record, expected))
    }

    async fn delete_if_unchanged(
        &self,
        id: Uuid,
        expected: ModerationStatus,
        version: i32,
    ) -> AppResult<()> {
        let mut records = self.records.lock().unwrap();
        match records.get(&id) {
            Some(current) if current.status() == expected && current.version() == version => {
                records.remove(&id);
                Ok(())
            }
            _ => Err(conflict::<M>(id)),
        }
    }

    async fn count_pending_for_owner(&self, owner_id: Uuid) -> AppResult<u64> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.owner_id() == owner_id && r.status() == ModerationStatus::Pending)
            .count() as u64)
    }

    async fn count_by_status(&self, status: ModerationStatus) -> AppResult<u64> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.status() == status)
            .count() as u64)
    }
}

/// テスト用の書類・証拠品ストア
#[derive(Default)]
pub struct MemoryCaseFiles {
    documents: Mutex<HashMap<Uuid, CaseDocument>>,
    evidence: Mutex<HashMap<Uuid, CaseEvidence>>,
}

impl MemoryCaseFiles {
    pub fn document_count(&self, case_id: Uuid) -> usize {
        self.documents
            .lock()
            .unwrap()
            .values()
            .filter(|d| d.case_id == case_id)
            .count()
    }

    pub fn evidence_count(&self, case_id: Uuid) -> usize {
        self.evidence
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.case_id == case_id)
            .count()
    }
}

#[async_trait]
impl CaseFileRepository for MemoryCaseFiles {
    async fn insert_document(&self, document: CaseDocument) -> AppResult<CaseDocument> {
        self.documents
            .lock()
            .unwrap()
            .insert(document.id, document.clone());
        Ok(document)
    }

    async fn insert_evidence(&self, evidence: CaseEvidence) -> AppResult<CaseEvidence> {
        self.evidence
            .lock()
            .unwrap()
            .insert(evidence.id, evidence.clone());
        Ok(evidence)
    }

    async fn find_document(&self, id: Uuid) -> AppResult<Option<CaseDocument>> {
        Ok(self.documents.lock().unwrap().get(&id).cloned())
    }

    async fn find_evidence(&self, id: Uuid) -> AppResult<Option<CaseEvidence>> {
        Ok(self.evidence.lock().unwrap().get(&id).cloned())
    }

    async fn list_documents(&self, case_id: Uuid) -> AppResult<Vec<CaseDocument>> {
        let mut documents: Vec<_> = self
            .documents
            .lock()
            .unwrap()
            .values()
            .filter(|d| d.case_id == case_id)
            .cloned()
            .collect();
        documents.sort_by_key(|d| d.created_at);
        Ok(documents)
    }

    async fn list_evidence(&self, case_id: Uuid) -> AppResult<Vec<CaseEvidence>> {
        let mut evidence: Vec<_> = self
            .evidence
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.case_id == case_id)
            .cloned()
            .collect();
        evidence.sort_by_key(|e| e.created_at);
        Ok(evidence)
    }

    async fn delete_document(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.documents.lock().unwrap().remove(&id).is_some())
    }

    async fn delete_evidence(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.evidence.lock().unwrap().remove(&id).is_some())
    }
}

/// トランザクション相当の連鎖削除（失敗時は何も変更しない）
pub struct MemoryCascade {
    cases: Arc<MemoryRepository<LegalCase>>,
    files: Arc<MemoryCaseFiles>,
    fail_evidence_delete: AtomicBool,
}

impl MemoryCascade {
    pub fn fail_evidence_delete(&self, fail: bool) {
        self.fail_evidence_delete.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CascadeRepository for MemoryCascade {
    async fn delete_case_with_children(
        &self,
        case_id: Uuid,
        expected_status: ModerationStatus,
        expected_version: i32,
    ) -> AppResult<CascadeOutcome> {
        self.cases.with_records(|cases| {
            let mut documents = self.files.documents.lock().unwrap();
            let mut evidence = self.files.evidence.lock().unwrap();

            if self.fail_evidence_delete.load(Ordering::SeqCst) {
                return Err(AppError::CascadeFailure(format!(
                    "Failed to delete children of case {}: evidence store unavailable",
                    case_id
                )));
            }

            match cases.get(&case_id) {
                Some(case) if case.status == expected_status && case.version == expected_version => {}
                _ => {
                    return Err(AppError::Conflict(format!(
                        "case {} was modified concurrently",
                        case_id
                    )))
                }
            }

            let evidence_before = evidence.len();
            evidence.retain(|_, e| e.case_id != case_id);
            let documents_before = documents.len();
            documents.retain(|_, d| d.case_id != case_id);
            cases.remove(&case_id);

            Ok(CascadeOutcome {
                documents_removed: (documents_before - documents.len()) as u64,
                evidence_removed: (evidence_before - evidence.len()) as u64,
            })
        })
    }
}

/// テスト用のユーザーストア
#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<HashMap<Uuid, User>>,
    fail_assign: AtomicBool,
}

impl MemoryUsers {
    pub fn add(&self, role: Role) -> Principal {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let user = User {
            id,
            email: format!("{}@scamwatch.test", id.simple()),
            display_name: format!("{} {}", role, &id.simple().to_string()[..8]),
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().insert(id, user);
        Principal::new(id, role)
    }

    pub fn deactivate(&self, id: Uuid) {
        if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
            user.is_active = false;
        }
    }

    pub fn role_of(&self, id: Uuid) -> Option<Role> {
        self.users.lock().unwrap().get(&id).map(|u| u.role)
    }

    pub fn fail_assign(&self, fail: bool) {
        self.fail_assign.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }
}

/// 申請の承認とロール付与を同じロック区間で確定する
pub struct MemoryRoleGrants {
    requests: Arc<MemoryRepository<RoleChangeRequest>>,
    users: Arc<MemoryUsers>,
}

#[async_trait]
impl RoleGrantRepository for MemoryRoleGrants {
    async fn approve_and_assign(
        &self,
        approved: RoleChangeRequest,
        expected: ModerationStatus,
    ) -> AppResult<(RoleChangeRequest, User)> {
        self.requests.with_records(|requests| {
            let mut users = self.users.users.lock().unwrap();

            // 書き込み前に失敗させ、申請もユーザーも変更しない
            if self.users.fail_assign.load(Ordering::SeqCst) {
                return Err(AppError::InternalServerError(
                    "user store unavailable".to_string(),
                ));
            }
            let user_id = approved.user_id;
            if !users.contains_key(&user_id) {
                return Err(AppError::NotFound(format!(
                    "User with id {} not found",
                    user_id
                )));
            }

            let request = write_if_unchanged(requests, approved, expected)?;
            let user = users
                .get_mut(&user_id)
                .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", user_id)))?;
            user.role = request.requested_role;
            user.updated_at = Utc::now();
            Ok((request, user.clone()))
        })
    }
}

/// 全リポジトリのインメモリ実装一式
pub struct MemoryStore {
    pub reports: Arc<MemoryRepository<Report>>,
    pub alerts: Arc<MemoryRepository<Alert>>,
    pub cases: Arc<MemoryRepository<LegalCase>>,
    pub comments: Arc<MemoryRepository<Comment>>,
    pub role_requests: Arc<MemoryRepository<RoleChangeRequest>>,
    pub files: Arc<MemoryCaseFiles>,
    pub cascade: Arc<MemoryCascade>,
    pub users: Arc<MemoryUsers>,
    pub role_grants: Arc<MemoryRoleGrants>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let cases = Arc::new(MemoryRepository::new());
        let files = Arc::new(MemoryCaseFiles::default());
        let cascade = Arc::new(MemoryCascade {
            cases: cases.clone(),
            files: files.clone(),
            fail_evidence_delete: AtomicBool::new(false),
        });

        let role_requests = Arc::new(MemoryRepository::new());
        let users = Arc::new(MemoryUsers::default());
        let role_grants = Arc::new(MemoryRoleGrants {
            requests: role_requests.clone(),
            users: users.clone(),
        });

        Self {
            reports: Arc::new(MemoryRepository::new()),
            alerts: Arc::new(MemoryRepository::new()),
            cases,
            comments: Arc::new(MemoryRepository::new()),
            role_requests,
            files,
            cascade,
            users,
            role_grants,
        }
    }

    pub fn repositories(&self) -> CoreRepositories {
        CoreRepositories {
            reports: self.reports.clone(),
            alerts: self.alerts.clone(),
            cases: self.cases.clone(),
            comments: self.comments.clone(),
            role_requests: self.role_requests.clone(),
            cascade: self.cascade.clone(),
            case_files: self.files.clone(),
            users: self.users.clone(),
            role_grants: self.role_grants.clone(),
        }
    }

    pub fn facade(&self) -> PolicyFacade {
        PolicyFacade::new(self.repositories())
    }
}
