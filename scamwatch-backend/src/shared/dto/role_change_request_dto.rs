// scamwatch-backend/src/shared/dto/role_change_request_dto.rs

use super::record_input::{NewRecord, RecordPatch};
use crate::domain::moderated_record::ModerationState;
use crate::domain::role_change_request_model::Model as RoleChangeRequest;
use crate::domain::role_model::Role;
use crate::shared::validation::{record, validate_not_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// ロール変更申請リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRoleChangeRequestInput {
    pub requested_role: Role,

    #[validate(
        length(min = 1, max = record::NOTES_MAX_LENGTH, message = "Reason must be 1-2000 characters"),
        custom(function = validate_not_blank)
    )]
    pub reason: String,
}

/// 申請理由の更新
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateRoleChangeRequestInput {
    #[validate(
        length(min = 1, max = record::NOTES_MAX_LENGTH, message = "Reason must be 1-2000 characters"),
        custom(function = validate_not_blank)
    )]
    pub reason: Option<String>,
}

impl NewRecord<RoleChangeRequest> for CreateRoleChangeRequestInput {
    fn into_record(
        self,
        id: Uuid,
        owner_id: Uuid,
        state: ModerationState,
        now: DateTime<Utc>,
    ) -> RoleChangeRequest {
        RoleChangeRequest {
            id,
            user_id: owner_id,
            requested_role: self.requested_role,
            reason: self.reason.trim().to_string(),
            status: state.status,
            moderator_id: state.moderator_id,
            moderator_notes: state.moderator_notes,
            is_active: state.is_active,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }
}

impl RecordPatch<RoleChangeRequest> for UpdateRoleChangeRequestInput {
    fn apply_to(self, request: &mut RoleChangeRequest) {
        if let Some(reason) = self.reason {
            request.reason = reason.trim().to_string();
        }
    }

    fn is_empty(&self) -> bool {
        self.reason.is_none()
    }
}
