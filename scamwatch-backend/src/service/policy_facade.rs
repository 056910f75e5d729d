// scamwatch-backend/src/service/policy_facade.rs

use crate::db::DbPool;
use crate::domain::alert_model::{self, Model as Alert};
use crate::domain::case_model::{self, Model as LegalCase};
use crate::domain::comment_model::{self, Model as Comment};
use crate::domain::entity_kind::EntityKind;
use crate::domain::moderated_record::ModeratedRecord;
use crate::domain::record_filter::RecordFilter;
use crate::domain::report_model::{self, Model as Report};
use crate::domain::role_change_request_model::{self, Model as RoleChangeRequest};
use crate::domain::role_model::Principal;
use crate::error::{AppError, AppResult};
use crate::log_with_context;
use crate::repository::case_cascade_repository::{
    CascadeOutcome, CascadeRepository, SeaOrmCascadeRepository,
};
use crate::repository::case_file_repository::{CaseFileRepository, SeaOrmCaseFileRepository};
use crate::repository::moderated_repository::{ModeratedRepository, SeaOrmModeratedRepository};
use crate::repository::role_grant_repository::{RoleGrantRepository, SeaOrmRoleGrantRepository};
use crate::repository::user_repository::{SeaOrmUserRepository, UserRepository};
use crate::service::cascade_manager::CascadeManager;
use crate::service::case_file_service::CaseFileService;
use crate::service::moderation_ledger::ModerationEntry;
use crate::service::visibility_filter::AlertParentGate;
use crate::service::workflow_engine::{require_principal, StatusCounts, WorkflowEngine};
use crate::shared::dto::alert_dto::{CreateAlertInput, UpdateAlertInput};
use crate::shared::dto::case_dto::{CreateCaseInput, UpdateCaseInput};
use crate::shared::dto::comment_dto::{CreateCommentInput, UpdateCommentInput};
use crate::shared::dto::record_input::{NewRecord, RecordPatch};
use crate::shared::dto::report_dto::{CreateReportInput, UpdateReportInput};
use crate::shared::dto::role_change_request_dto::{
    CreateRoleChangeRequestInput, UpdateRoleChangeRequestInput,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// コアが扱う操作。トランスポート層はこれに変換して `dispatch` を呼ぶ
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    List {
        #[serde(default)]
        filter: RecordFilter,
    },
    Get {
        id: Uuid,
    },
    Create {
        payload: Value,
    },
    Update {
        id: Uuid,
        payload: Value,
    },
    Delete {
        id: Uuid,
    },
    Approve {
        id: Uuid,
        #[serde(default)]
        notes: Option<String>,
    },
    Reject {
        id: Uuid,
        notes: String,
    },
    ToggleActive {
        id: Uuid,
        is_active: bool,
    },
    ModerationInfo {
        id: Uuid,
    },
    StatusCounts,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::List { .. } => "list",
            Operation::Get { .. } => "get",
            Operation::Create { .. } => "create",
            Operation::Update { .. } => "update",
            Operation::Delete { .. } => "delete",
            Operation::Approve { .. } => "approve",
            Operation::Reject { .. } => "reject",
            Operation::ToggleActive { .. } => "toggle_active",
            Operation::ModerationInfo { .. } => "moderation_info",
            Operation::StatusCounts => "status_counts",
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Operation::Create { .. }
                | Operation::Update { .. }
                | Operation::Delete { .. }
                | Operation::Approve { .. }
                | Operation::Reject { .. }
                | Operation::ToggleActive { .. }
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum CoreResponse {
    Record(Value),
    Records(Vec<Value>),
    Moderation(ModerationEntry),
    Counts(StatusCounts),
    Deleted {
        id: Uuid,
        cascade: Option<CascadeOutcome>,
    },
}

/// ファサードが依存する永続化層一式
#[derive(Clone)]
pub struct CoreRepositories {
    pub reports: Arc<dyn ModeratedRepository<Report>>,
    pub alerts: Arc<dyn ModeratedRepository<Alert>>,
    pub cases: Arc<dyn ModeratedRepository<LegalCase>>,
    pub comments: Arc<dyn ModeratedRepository<Comment>>,
    pub role_requests: Arc<dyn ModeratedRepository<RoleChangeRequest>>,
    pub role_grants: Arc<dyn RoleGrantRepository>,
    pub cascade: Arc<dyn CascadeRepository>,
    pub case_files: Arc<dyn CaseFileRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl CoreRepositories {
    pub fn sea_orm(db: DbPool) -> Self {
        Self {
            reports: Arc::new(SeaOrmModeratedRepository::<report_model::Entity>::new(
                db.clone(),
            )),
            alerts: Arc::new(SeaOrmModeratedRepository::<alert_model::Entity>::new(
                db.clone(),
            )),
            cases: Arc::new(SeaOrmModeratedRepository::<case_model::Entity>::new(
                db.clone(),
            )),
            comments: Arc::new(SeaOrmModeratedRepository::<comment_model::Entity>::new(
                db.clone(),
            )),
            role_requests: Arc::new(SeaOrmModeratedRepository::<
                role_change_request_model::Entity,
            >::new(db.clone())),
            role_grants: Arc::new(SeaOrmRoleGrantRepository::new(db.clone())),
            cascade: Arc::new(SeaOrmCascadeRepository::new(db.clone())),
            case_files: Arc::new(SeaOrmCaseFileRepository::new(db.clone())),
            users: Arc::new(SeaOrmUserRepository::new(db)),
        }
    }
}

/// 種別ごとのエンジンを束ね、種別固有の規則を重ねる入口
pub struct PolicyFacade {
    reports: WorkflowEngine<Report>,
    alerts: WorkflowEngine<Alert>,
    cases: WorkflowEngine<LegalCase>,
    comments: WorkflowEngine<Comment>,
    role_requests: WorkflowEngine<RoleChangeRequest>,
    case_files: CaseFileService,
    role_grants: Arc<dyn RoleGrantRepository>,
    users: Arc<dyn UserRepository>,
}

impl PolicyFacade {
    pub fn new(repos: CoreRepositories) -> Self {
        let cascade = Arc::new(CascadeManager::new(repos.cascade));
        let alert_gate = Arc::new(AlertParentGate::new(repos.alerts.clone()));
        Self {
            reports: WorkflowEngine::new(repos.reports),
            alerts: WorkflowEngine::new(repos.alerts),
            cases: WorkflowEngine::new(repos.cases.clone()).with_cascade(cascade),
            comments: WorkflowEngine::new(repos.comments).with_parent_gate(alert_gate),
            role_requests: WorkflowEngine::new(repos.role_requests),
            case_files: CaseFileService::new(repos.cases, repos.case_files),
            role_grants: repos.role_grants,
            users: repos.users,
        }
    }

    pub fn from_db(db: DbPool) -> Self {
        Self::new(CoreRepositories::sea_orm(db))
    }

    pub fn reports(&self) -> &WorkflowEngine<Report> {
        &self.reports
    }

    pub fn alerts(&self) -> &WorkflowEngine<Alert> {
        &self.alerts
    }

    pub fn cases(&self) -> &WorkflowEngine<LegalCase> {
        &self.cases
    }

    pub fn comments(&self) -> &WorkflowEngine<Comment> {
        &self.comments
    }

    pub fn role_requests(&self) -> &WorkflowEngine<RoleChangeRequest> {
        &self.role_requests
    }

    pub fn case_files(&self) -> &CaseFileService {
        &self.case_files
    }

    /// 呼び出しごとに最新のロールで解決する（無効ユーザーは None）
    pub async fn resolve_principal(&self, user_id: Uuid) -> AppResult<Option<Principal>> {
        self.users.resolve_principal(user_id).await
    }

    // --- 種別固有の規則 ---

    /// コメントは閲覧できるアラートにのみ付けられる
    pub async fn create_comment(
        &self,
        principal: Option<&Principal>,
        input: CreateCommentInput,
    ) -> AppResult<Comment> {
        let principal = require_principal(principal)?;

        self.alerts
            .get(Some(principal), input.alert_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => {
                    AppError::NotFound(format!("Alert with id {} not found", input.alert_id))
                }
                other => other,
            })?;

        self.comments.create(Some(principal), input).await
    }

    pub async fn create_role_change_request(
        &self,
        principal: Option<&Principal>,
        input: CreateRoleChangeRequestInput,
    ) -> AppResult<RoleChangeRequest> {
        let principal = require_principal(principal)?;

        if input.requested_role == principal.role {
            return Err(AppError::ValidationError(format!(
                "User already has role {}",
                principal.role
            )));
        }

        self.role_requests.create(Some(principal), input).await
    }

    /// 承認と同時にユーザーのロールを変更する
    ///
    /// 申請の承認とロールの付与は一つのトランザクションで確定し、
    /// どちらかが失敗した場合はどちらも書き込まれない。
    pub async fn approve_role_change_request(
        &self,
        principal: Option<&Principal>,
        id: Uuid,
        notes: Option<&str>,
    ) -> AppResult<RoleChangeRequest> {
        let (request, expected) = self
            .role_requests
            .prepare_approval(principal, id, notes)
            .await?;

        match self.role_grants.approve_and_assign(request, expected).await {
            Ok((approved, user)) => {
                log_with_context!(
                    tracing::Level::INFO,
                    "Role change applied",
                    "request_id" => id,
                    "user_id" => user.id,
                    "role" => user.role,
                    "moderator_id" => approved.moderator_id,
                    "previous_status" => expected
                );
                Ok(approved)
            }
            Err(e @ AppError::Conflict(_)) => {
                log_with_context!(
                    tracing::Level::WARN,
                    "Role change request changed before approval",
                    "request_id" => id
                );
                Err(e)
            }
            Err(e) => {
                log_with_context!(
                    tracing::Level::ERROR,
                    "Failed to apply role change",
                    "request_id" => id,
                    "error" => &e
                );
                Err(e)
            }
        }
    }

    // --- 汎用入口 ---

    pub async fn dispatch(
        &self,
        principal: Option<&Principal>,
        kind: EntityKind,
        op: Operation,
    ) -> AppResult<CoreResponse> {
        if op.is_mutation() {
            require_principal(principal)?;
        }

        log_with_context!(
            tracing::Level::DEBUG,
            "Dispatching core operation",
            "kind" => kind,
            "operation" => op.name(),
            "principal_id" => principal.map(|p| p.id)
        );

        match kind {
            EntityKind::Report => {
                run::<Report, CreateReportInput, UpdateReportInput>(&self.reports, principal, op)
                    .await
            }
            EntityKind::Alert => {
                run::<Alert, CreateAlertInput, UpdateAlertInput>(&self.alerts, principal, op).await
            }
            EntityKind::Case => {
                run::<LegalCase, CreateCaseInput, UpdateCaseInput>(&self.cases, principal, op).await
            }
            EntityKind::Comment => match op {
                Operation::Create { payload } => {
                    let input = parse_payload(payload)?;
                    record_response(&self.create_comment(principal, input).await?)
                }
                other => {
                    run::<Comment, CreateCommentInput, UpdateCommentInput>(
                        &self.comments,
                        principal,
                        other,
                    )
                    .await
                }
            },
            EntityKind::RoleChangeRequest => match op {
                Operation::Create { payload } => {
                    let input = parse_payload(payload)?;
                    record_response(&self.create_role_change_request(principal, input).await?)
                }
                Operation::Approve { id, notes } => record_response(
                    &self
                        .approve_role_change_request(principal, id, notes.as_deref())
                        .await?,
                ),
                other => {
                    run::<RoleChangeRequest, CreateRoleChangeRequestInput, UpdateRoleChangeRequestInput>(
                        &self.role_requests,
                        principal,
                        other,
                    )
                    .await
                }
            },
        }
    }
}

async fn run<M, C, U>(
    engine: &WorkflowEngine<M>,
    principal: Option<&Principal>,
    op: Operation,
) -> AppResult<CoreResponse>
where
    M: ModeratedRecord + Serialize,
    C: NewRecord<M> + DeserializeOwned,
    U: RecordPatch<M> + DeserializeOwned,
{
    match op {
        Operation::List { filter } => {
            let records = engine.list(principal, filter).await?;
            let values = records
                .iter()
                .map(to_value)
                .collect::<AppResult<Vec<_>>>()?;
            Ok(CoreResponse::Records(values))
        }
        Operation::Get { id } => record_response(&engine.get(principal, id).await?),
        Operation::Create { payload } => {
            let input: C = parse_payload(payload)?;
            record_response(&engine.create(principal, input).await?)
        }
        Operation::Update { id, payload } => {
            let patch: U = parse_payload(payload)?;
            record_response(&engine.edit(principal, id, patch).await?)
        }
        Operation::Delete { id } => {
            let cascade = engine.delete(principal, id).await?;
            Ok(CoreResponse::Deleted { id, cascade })
        }
        Operation::Approve { id, notes } => {
            record_response(&engine.approve(principal, id, notes.as_deref()).await?)
        }
        Operation::Reject { id, notes } => {
            record_response(&engine.reject(principal, id, &notes).await?)
        }
        Operation::ToggleActive { id, is_active } => {
            record_response(&engine.toggle_active(principal, id, is_active).await?)
        }
        Operation::ModerationInfo { id } => Ok(CoreResponse::Moderation(
            engine.moderation_info(principal, id).await?,
        )),
        Operation::StatusCounts => Ok(CoreResponse::Counts(engine.status_counts(principal).await?)),
    }
}

fn parse_payload<T: DeserializeOwned>(payload: Value) -> AppResult<T> {
    serde_json::from_value(payload)
        .map_err(|e| AppError::ValidationError(format!("Invalid payload: {}", e)))
}

fn to_value<T: Serialize>(record: &T) -> AppResult<Value> {
    serde_json::to_value(record)
        .map_err(|e| AppError::InternalServerError(format!("Failed to serialize record: {}", e)))
}

fn record_response<T: Serialize>(record: &T) -> AppResult<CoreResponse> {
    Ok(CoreResponse::Record(to_value(record)?))
}
